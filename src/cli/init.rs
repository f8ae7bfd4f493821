use crate::error::{ReportError, Result};
use crate::settings::{load_settings, save_settings, settings_path, shellexpand_path};

pub fn run(
    api_base: Option<String>,
    employee_no: Option<String>,
    company: Option<String>,
    currency: Option<String>,
    export_dir: Option<String>,
) -> Result<()> {
    let mut settings = load_settings();

    if let Some(base) = api_base {
        let base = base.trim().trim_end_matches('/').to_string();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ReportError::Settings(format!(
                "API base must start with http:// or https://, got '{base}'"
            )));
        }
        settings.api_base = base;
    }
    if let Some(emp) = employee_no {
        settings.employee_no = emp.trim().to_string();
    }
    if let Some(name) = company {
        settings.company_name = name.trim().to_string();
    }
    if let Some(cur) = currency {
        settings.currency = cur.trim().to_uppercase();
    }
    if let Some(dir) = export_dir {
        settings.export_dir = shellexpand_path(dir.trim());
    }

    save_settings(&settings)?;
    std::fs::create_dir_all(settings.export_dir())?;

    println!("Saved settings to {}", settings_path().display());
    if settings.api_base.is_empty() {
        println!("No API base set yet; reports can still be built from saved responses with --input.");
    }
    Ok(())
}
