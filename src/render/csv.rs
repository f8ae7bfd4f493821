use crate::error::{ReportError, Result};
use crate::sheet::Sheet;

pub const MIME: &str = "text/csv;charset=utf-8";

/// CSV with a short header block (title, filters, currency), the column
/// header, then every sheet row. Merged label positions are left blank.
pub fn render(sheet: &Sheet) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    wtr.write_record([sheet.meta.title.as_str()])?;
    for (name, value) in &sheet.meta.filters {
        wtr.write_record([name.as_str(), value.as_str()])?;
    }
    if !sheet.meta.currency.is_empty() {
        wtr.write_record(["Currency", sheet.meta.currency.as_str()])?;
    }

    wtr.write_record(sheet.headers())?;
    for row in &sheet.rows {
        wtr.write_record(row.slots.iter().map(|s| s.flat_text()))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| ReportError::Other(format!("CSV flush failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| ReportError::Other(format!("CSV is not UTF-8: {e}")))
}

/// `<ReportName>_<key params>.csv`, with anything unsafe for a file name
/// replaced by `-`.
pub fn file_name(stem: &str, params: &[String]) -> String {
    let mut name = stem.to_string();
    for p in params.iter().filter(|p| !p.is_empty()) {
        name.push('_');
        name.extend(p.chars().map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        }));
    }
    name.push_str(".csv");
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fmt::NegativeStyle;
    use crate::grouping::{build, GroupOptions, GroupOrder, MemberOrder, SubtotalPolicy};
    use crate::models::ReportRow;
    use crate::sheet::{Column, Layout, SheetMeta};
    use serde_json::json;

    fn sheet(rows: serde_json::Value) -> Sheet {
        let rows: Vec<ReportRow> = rows.as_array().unwrap().iter().cloned().map(ReportRow::from).collect();
        let report = build(
            rows,
            |r| crate::normalize::normalize(r.text("Payee").as_deref()),
            |r| r.text_or_empty("Payee"),
            &GroupOptions {
                order: GroupOrder::Alphabetical,
                members: MemberOrder::Input,
                subtotals: SubtotalPolicy::MultipleMembers,
                sum_fields: vec!["ChqAmt".into()],
            },
        );
        let layout = Layout {
            group_columns: vec![Column::text("Payee", "Payee")],
            detail_columns: vec![Column::text("Cheque Run", "ChqRun"), Column::amount("Amount", "ChqAmt")],
            style: NegativeStyle::Absolute,
        };
        let meta = SheetMeta {
            title: "Cash Book Payee Report".into(),
            filters: vec![("From".into(), "2025-01-01".into()), ("To".into(), "2025-01-31".into())],
            currency: "LKR".into(),
        };
        Sheet::from_grouped(&report, &layout, meta)
    }

    #[test]
    fn test_quotes_embedded_commas_and_quotes() {
        let out = render(&sheet(json!([
            {"Payee": "Smith, John \"Jr.\"", "ChqRun": "R1", "ChqAmt": 10}
        ])))
        .unwrap();
        assert!(out.contains("\"Smith, John \"\"Jr.\"\"\",R1,10.00\r\n"), "got: {out}");
    }

    #[test]
    fn test_layout_blanks_merged_labels() {
        let out = render(&sheet(json!([
            {"Payee": "ABC Ltd.", "ChqRun": "R1", "ChqAmt": 1000},
            {"Payee": "abc ltd", "ChqRun": "R2", "ChqAmt": 234.5}
        ])))
        .unwrap();
        let lines: Vec<&str> = out.split("\r\n").collect();
        assert_eq!(lines[0], "Cash Book Payee Report");
        assert_eq!(lines[1], "From,2025-01-01");
        assert_eq!(lines[3], "Currency,LKR");
        assert_eq!(lines[4], "Payee,Cheque Run,Amount");
        assert_eq!(lines[5], "ABC Ltd.,R1,\"1,000.00\"");
        assert_eq!(lines[6], ",R2,234.50");
        assert_eq!(lines[7], "Total ABC Ltd.,,\"1,234.50\"");
        assert_eq!(lines[8], "Grand Total,,\"1,234.50\"");
    }

    #[test]
    fn test_file_name() {
        let name = file_name("CashBookPayee", &["2025-01-01".into(), "2025-01-31".into(), "510.20".into(), String::new()]);
        assert_eq!(name, "CashBookPayee_2025-01-01_2025-01-31_510.20.csv");
        assert_eq!(file_name("Wip", &["A/B C".into()]), "Wip_A-B-C.csv");
    }
}
