use std::fmt::Write as _;

use crate::sheet::{RowKind, Sheet, Slot};

/// Escape text for HTML element and attribute content.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

fn row_class(kind: RowKind, index: usize) -> String {
    match kind {
        RowKind::Data if index % 2 == 0 => "stripe-even".to_string(),
        RowKind::Data => "stripe-odd".to_string(),
        RowKind::Subtotal { level } => format!("subtotal level-{level}"),
        RowKind::GrandTotal => "grand-total".to_string(),
    }
}

/// The report table with merged group labels, one `<tr>` per sheet row.
pub fn table(sheet: &Sheet) -> String {
    let mut out = String::from("<table class=\"report\">\n<thead>\n<tr>");
    for column in &sheet.columns {
        let _ = write!(out, "<th>{}</th>", escape(&column.header));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in &sheet.rows {
        let _ = write!(out, "<tr class=\"{}\">", row_class(row.kind, row.index));
        for slot in &row.slots {
            let Slot::Cell(cell) = slot else { continue };
            let tag = if row.kind == RowKind::Data { "td" } else { "th" };
            out.push('<');
            out.push_str(tag);
            if cell.rowspan > 1 {
                let _ = write!(out, " rowspan=\"{}\"", cell.rowspan);
            }
            if cell.colspan > 1 {
                let _ = write!(out, " colspan=\"{}\"", cell.colspan);
            }
            if cell.numeric {
                out.push_str(" class=\"num\"");
            }
            let _ = write!(out, ">{}</{tag}>", escape(&cell.text));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}
