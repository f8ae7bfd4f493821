use comfy_table::{Cell, Table};

use crate::client::Client;
use crate::error::{ReportError, Result};
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let employee_no = settings.employee_no.trim();
    if employee_no.is_empty() {
        return Err(ReportError::Settings(
            "no employee number configured; run `tallyman init --employee-no <no>`".into(),
        ));
    }
    let client = Client::new(settings.require_api_base()?)?;
    let centers = client.cost_centers(employee_no)?;

    if centers.is_empty() {
        println!("No cost centers assigned to {employee_no}.");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec!["Cost Center", "Name"]);
    for cc in &centers {
        table.add_row(vec![Cell::new(&cc.dept_id), Cell::new(&cc.name)]);
    }
    println!("Cost Centers\n{table}");
    Ok(())
}
