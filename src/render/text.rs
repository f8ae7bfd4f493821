use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::fmt::{amount, NegativeStyle};
use crate::sheet::{Sheet, Slot};
use crate::trial_balance::{Category, CategoryTotals};

/// Terminal rendering: title and filters, then the table. Merged label
/// positions are blank, the same as in CSV.
pub fn render(sheet: &Sheet) -> String {
    let mut table = Table::new();
    table.set_header(sheet.headers());
    for row in &sheet.rows {
        let cells: Vec<Cell> = row
            .slots
            .iter()
            .map(|slot| {
                let cell = Cell::new(slot.flat_text());
                match slot {
                    Slot::Cell(c) if c.numeric => cell.set_alignment(CellAlignment::Right),
                    _ => cell,
                }
            })
            .collect();
        table.add_row(cells);
    }

    let mut out = sheet.meta.title.bold().to_string();
    let filters: Vec<String> = sheet
        .meta
        .filters
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect();
    if !filters.is_empty() {
        out.push('\n');
        out.push_str(&filters.join("  "));
    }
    if !sheet.meta.currency.is_empty() {
        out.push_str(&format!("\nCurrency: {}", sheet.meta.currency));
    }
    if sheet.data_rows().next().is_none() {
        out.push_str("\nNo rows found.");
    }
    out.push_str(&format!("\n{table}"));
    out
}

/// Category-by-cost-center summary shown under a trial balance.
pub fn category_summary(totals: &CategoryTotals, style: NegativeStyle) -> String {
    let centers = totals.cost_centers();
    let mut table = Table::new();
    let mut header = vec!["Category".to_string()];
    header.extend(centers.iter().cloned());
    header.push("Total".to_string());
    table.set_header(header);

    for category in Category::ALL {
        let mut cells = vec![Cell::new(category.label())];
        for cc in &centers {
            cells.push(Cell::new(amount(totals.get(category, cc), style)).set_alignment(CellAlignment::Right));
        }
        cells.push(Cell::new(amount(totals.total(category), style)).set_alignment(CellAlignment::Right));
        table.add_row(cells);
    }
    format!("Category Totals\n{table}")
}
