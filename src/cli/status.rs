use crate::error::Result;
use crate::settings::{load_settings, settings_path};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let or_unset = |s: &str| if s.is_empty() { "(not set)".to_string() } else { s.to_string() };
    let path = settings_path();

    println!("Settings:   {}", path.display());
    if !path.exists() {
        println!("            (not found, using defaults; run `tallyman init`)");
    }
    println!("API base:   {}", or_unset(&settings.api_base));
    println!("Employee:   {}", or_unset(&settings.employee_no));
    println!("Company:    {}", or_unset(&settings.company_name));
    println!("Currency:   {}", or_unset(&settings.currency));
    println!("Exports:    {}", settings.export_dir().display());
    Ok(())
}
