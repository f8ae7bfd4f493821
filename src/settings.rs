use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the reporting REST API, e.g. https://erp.example/api
    #[serde(default)]
    pub api_base: String,
    /// Employee number of the signed-in user; selects the cost centers the
    /// user may report on and is printed on exported documents.
    #[serde(default)]
    pub employee_no: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_export_dir_string")]
    pub export_dir: String,
}

fn default_currency() -> String {
    "LKR".to_string()
}

fn default_export_dir_string() -> String {
    default_export_dir().to_string_lossy().to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            employee_no: String::new(),
            company_name: String::new(),
            currency: default_currency(),
            export_dir: default_export_dir_string(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("tallyman")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_export_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("tallyman")
        .join("exports")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring unreadable settings at {}: {e}", path.display());
            Settings::default()
        })
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(settings, &settings_path())
}

fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| ReportError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

impl Settings {
    pub fn export_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand_path(&self.export_dir))
    }

    pub fn require_api_base(&self) -> Result<&str> {
        let base = self.api_base.trim();
        if base.is_empty() {
            return Err(ReportError::Settings(
                "no API base configured; run `tallyman init --api-base <url>` or pass --input".into(),
            ));
        }
        Ok(base)
    }
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".config").join("tallyman").join("settings.json");
        let settings = Settings {
            api_base: "https://erp.example/api".to_string(),
            employee_no: "E1234".to_string(),
            company_name: "Utility Board".to_string(),
            currency: "USD".to_string(),
            export_dir: "/tmp/exports".to_string(),
        };
        save_settings_to(&settings, &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().ends_with("}\n"));

        let loaded = load_settings_from(&path);
        assert_eq!(loaded.api_base, "https://erp.example/api");
        assert_eq!(loaded.employee_no, "E1234");
        assert_eq!(loaded.currency, "USD");
        assert_eq!(loaded.export_dir(), PathBuf::from("/tmp/exports"));
    }

    #[test]
    fn test_load_falls_back_on_missing_or_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(load_settings_from(&path).currency, "LKR");

        std::fs::write(&path, "{not json").unwrap();
        let loaded = load_settings_from(&path);
        assert!(loaded.api_base.is_empty());
        assert_eq!(loaded.currency, "LKR");
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"api_base": "http://localhost:8080"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.currency, "LKR");
        assert!(s.employee_no.is_empty());
        assert!(!s.export_dir.is_empty());
        assert_eq!(s.require_api_base().unwrap(), "http://localhost:8080");
    }

    #[test]
    fn test_missing_api_base_is_an_error() {
        let s = Settings::default();
        let msg = s.require_api_base().unwrap_err().to_string();
        assert!(msg.contains("tallyman init"), "got: {msg}");
    }

    #[test]
    fn test_shellexpand_tilde() {
        let expanded = shellexpand_path("~/reports");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("reports"));
        assert_eq!(shellexpand_path("/abs/path"), "/abs/path");
    }
}
