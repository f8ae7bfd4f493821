use std::fmt::Write as _;

use super::html::{escape, table};
use crate::sheet::Sheet;

const STYLE: &str = r#"
@page {
  size: A4 landscape;
  margin: 12mm 10mm 16mm 10mm;
  @bottom-right { content: "Page " counter(page) " of " counter(pages); font-size: 8pt; }
}
body { font-family: Arial, Helvetica, sans-serif; font-size: 9pt; color: #111; }
h1 { font-size: 14pt; margin: 0 0 2mm 0; }
h2 { font-size: 11pt; margin: 0 0 2mm 0; font-weight: normal; }
.filters { margin: 0 0 3mm 0; }
.filters span { margin-right: 6mm; }
table.report { width: 100%; border-collapse: collapse; }
table.report th, table.report td { border: 1px solid #999; padding: 1mm 2mm; vertical-align: top; }
table.report thead th { background: #e5e7eb; }
table.report thead { display: table-header-group; }
table.report tr { page-break-inside: avoid; }
.num { text-align: right; white-space: nowrap; }
.stripe-odd td { background: #f6f7f9; }
.subtotal th { background: #eef2ff; text-align: left; }
.grand-total th { background: #dbeafe; text-align: left; }
.subtotal th.num, .grand-total th.num { text-align: right; }
.footer { margin-top: 4mm; font-size: 8pt; color: #555; }
"#;

pub struct PrintHeader<'a> {
    pub company: &'a str,
    pub printed_by: &'a str,
    pub generated: &'a str,
}

/// Self-contained printable HTML: inline CSS with page margins and page
/// numbers, a title block, then the same table as the on-screen view.
pub fn document(sheet: &Sheet, header: &PrintHeader<'_>) -> String {
    let mut out = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape(&sheet.meta.title));
    let _ = writeln!(out, "<style>{STYLE}</style>\n</head>\n<body>");

    if !header.company.is_empty() {
        let _ = writeln!(out, "<h2>{}</h2>", escape(header.company));
    }
    let _ = writeln!(out, "<h1>{}</h1>", escape(&sheet.meta.title));

    out.push_str("<div class=\"filters\">");
    for (name, value) in &sheet.meta.filters {
        let _ = write!(out, "<span><b>{}:</b> {}</span>", escape(name), escape(value));
    }
    if !sheet.meta.currency.is_empty() {
        let _ = write!(out, "<span><b>Currency:</b> {}</span>", escape(&sheet.meta.currency));
    }
    out.push_str("</div>\n");

    out.push_str(&table(sheet));

    out.push_str("<div class=\"footer\">");
    let _ = write!(out, "Generated {}", escape(header.generated));
    if !header.printed_by.is_empty() {
        let _ = write!(out, " by {}", escape(header.printed_by));
    }
    out.push_str("</div>\n</body>\n</html>\n");
    out
}
