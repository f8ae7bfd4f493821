use clap::ValueEnum;

use crate::client::RequestSpec;
use crate::error::Result;
use crate::filters::{require, ReportFilter};
use crate::fmt::NegativeStyle;
use crate::grouping::{self, GroupOptions, GroupOrder, GroupedReport, MemberOrder, SubtotalPolicy};
use crate::hierarchy::{self, HierarchyOptions};
use crate::models::ReportRow;
use crate::normalize::normalize;
use crate::sheet::{Column, Layout, Sheet, SheetMeta};
use crate::trial_balance::{self, category_totals, CategoryTotals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Cheques paid per payee for a cost center and date range.
    CashBook,
    /// Materials issued against a job card, by document.
    JobCard,
    /// Solar connection billing by Division, Province and Area.
    Solar,
    /// Trial balance by account category.
    TrialBalance,
    /// Work in progress by cost center and project.
    Wip,
}

/// A built report ready for any output format.
#[derive(Debug, Clone)]
pub struct ReportOutput {
    pub sheet: Sheet,
    pub style: NegativeStyle,
    /// Category by cost center breakdown, trial balance only.
    pub category_totals: Option<CategoryTotals>,
}

impl ReportKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::CashBook => "Cash Book Payee Report",
            Self::JobCard => "Job Card Materials",
            Self::Solar => "Solar Connection Billing",
            Self::TrialBalance => "Trial Balance",
            Self::Wip => "Work In Progress",
        }
    }

    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::CashBook => "CashBookPayee",
            Self::JobCard => "JobCardMaterials",
            Self::Solar => "SolarBilling",
            Self::TrialBalance => "TrialBalance",
            Self::Wip => "WorkInProgress",
        }
    }

    pub fn timeout_secs(&self) -> u64 {
        match self {
            Self::CashBook => 60,
            Self::JobCard => 30,
            Self::Solar => 180,
            Self::TrialBalance => 120,
            Self::Wip => 90,
        }
    }

    pub fn style(&self) -> NegativeStyle {
        match self {
            Self::CashBook => NegativeStyle::Absolute,
            _ => NegativeStyle::Parenthesized,
        }
    }

    /// Validate the filter and describe the GET that fetches this report.
    /// Nothing is sent when this fails.
    pub fn request(&self, filter: &ReportFilter) -> Result<RequestSpec> {
        let (segments, query): (Vec<String>, Vec<(String, String)>) = match self {
            Self::CashBook => {
                let (from, to) = filter.date_range()?;
                let dept = require(&filter.cost_center, "--cost-center")?;
                let payee = filter.payee()?.unwrap_or_else(|| "ALL".to_string());
                (
                    vec![
                        "cashbook".into(),
                        "ccreport".into(),
                        from.to_string(),
                        to.to_string(),
                        dept.into(),
                        payee,
                    ],
                    Vec::new(),
                )
            }
            Self::JobCard => {
                let dept = require(&filter.cost_center, "--cost-center")?;
                let job = require(&filter.job_no, "--job-no")?;
                (vec!["jobcard".into(), "materials".into(), dept.into(), job.into()], Vec::new())
            }
            Self::Solar => {
                let cycle = require(&filter.cycle, "--cycle")?;
                let mut query = vec![("billCycle".to_string(), cycle.to_string())];
                if let Some(category) = filter.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
                    query.push(("category".into(), category.into()));
                }
                (vec!["solar".into(), "billing".into()], query)
            }
            Self::TrialBalance => {
                let company = require(&filter.company, "--company")?;
                let (month, year) = filter.period()?;
                (
                    vec!["trialbalance".into()],
                    vec![
                        ("companyId".into(), company.into()),
                        ("month".into(), month.to_string()),
                        ("year".into(), year.to_string()),
                    ],
                )
            }
            Self::Wip => {
                let dept = require(&filter.cost_center, "--cost-center")?;
                let (from, to) = filter.date_range()?;
                (vec!["wip".into(), dept.into(), from.to_string(), to.to_string()], Vec::new())
            }
        };
        Ok(RequestSpec { segments, query, timeout_secs: self.timeout_secs() })
    }

    /// Parameters that go into the export file name.
    pub fn file_params(&self, filter: &ReportFilter) -> Vec<String> {
        let opt = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or_default().to_string();
        match self {
            Self::CashBook | Self::Wip => {
                vec![opt(&filter.cost_center), opt(&filter.from_date), opt(&filter.to_date)]
            }
            Self::JobCard => vec![opt(&filter.cost_center), opt(&filter.job_no)],
            Self::Solar => vec![opt(&filter.cycle), opt(&filter.category)],
            Self::TrialBalance => {
                let period = match (filter.year, filter.month) {
                    (Some(y), Some(m)) => format!("{y:04}-{m:02}"),
                    _ => String::new(),
                };
                vec![opt(&filter.company), period]
            }
        }
    }

    pub fn meta(&self, filter: &ReportFilter, currency: &str) -> SheetMeta {
        SheetMeta {
            title: self.title().to_string(),
            filters: filter_summary(filter),
            currency: currency.to_string(),
        }
    }

    fn layout(&self) -> Layout {
        let (group_columns, detail_columns) = match self {
            Self::CashBook => (
                vec![Column::text("Payee", "Payee")],
                vec![
                    Column::text("Cheque Run", "ChqRun"),
                    Column::text("Cheque No", "ChqNo"),
                    Column::text("Date", "ChqDt"),
                    Column::amount("Amount", "ChqAmt"),
                ],
            ),
            Self::JobCard => (
                vec![Column::text("Document", "DocNo")],
                vec![
                    Column::text("Material", "MatCd"),
                    Column::text("Description", "MatNm"),
                    Column::text("Quantity", "Qty"),
                    Column::amount("Unit Price", "UnitPrice"),
                    Column::amount("Amount", "Amount"),
                ],
            ),
            Self::Solar => (
                vec![
                    Column::text("Division", "Division"),
                    Column::text("Province", "Province"),
                    Column::text("Area", "Area"),
                ],
                vec![
                    Column::text("Account No", "AccountNo"),
                    Column::text("Customer", "CustomerName"),
                    Column::amount("Units", "Units"),
                    Column::amount("Amount", "Amount"),
                ],
            ),
            Self::TrialBalance => (
                vec![Column::text("Category", "Category")],
                vec![
                    Column::text("Account", trial_balance::ACCOUNT_CODE),
                    Column::text("Account Name", "AccountName"),
                    Column::text("Cost Center", trial_balance::COST_CENTER),
                    Column::amount("Opening", "OpeningBalance"),
                    Column::amount("Debit", "DebitAmount"),
                    Column::amount("Credit", "CreditAmount"),
                    Column::amount("Closing", "ClosingBalance"),
                ],
            ),
            Self::Wip => (
                vec![Column::text("Cost Center", "CostCenter"), Column::text("Project", "ProjectNo")],
                vec![
                    Column::text("Resource", "ResourceCode"),
                    Column::text("Description", "Description"),
                    Column::amount("Estimated", "EstimatedCost"),
                    Column::amount("Actual", "ActualCost"),
                ],
            ),
        };
        Layout { group_columns, detail_columns, style: self.style() }
    }

    /// Summed fields; the first is the designated grand total.
    fn sum_fields(&self) -> Vec<String> {
        let fields: &[&str] = match self {
            Self::CashBook => &["ChqAmt"],
            Self::JobCard => &["Amount"],
            Self::Solar => &["Amount", "Units"],
            Self::TrialBalance => &["ClosingBalance", "OpeningBalance", "DebitAmount", "CreditAmount"],
            Self::Wip => &["EstimatedCost", "ActualCost"],
        };
        fields.iter().map(|f| f.to_string()).collect()
    }

    pub fn build(&self, rows: Vec<ReportRow>, meta: SheetMeta) -> ReportOutput {
        let layout = self.layout();
        let sum_fields = self.sum_fields();
        log::info!("building {} from {} rows", self.title(), rows.len());

        let (sheet, category_totals) = match self {
            Self::CashBook => {
                let report = grouping::build(
                    rows,
                    |r| normalize(r.text("Payee").as_deref()),
                    |r| hierarchy::label_of(r, "Payee"),
                    &GroupOptions {
                        order: GroupOrder::Alphabetical,
                        members: MemberOrder::Ascending("ChqDt".into()),
                        subtotals: SubtotalPolicy::MultipleMembers,
                        sum_fields,
                    },
                );
                log_grouped(&report);
                (Sheet::from_grouped(&report, &layout, meta), None)
            }
            Self::JobCard => {
                let report = grouping::build(
                    rows,
                    |r| hierarchy::label_of(r, "DocNo"),
                    |r| hierarchy::label_of(r, "DocNo"),
                    &GroupOptions {
                        order: GroupOrder::Insertion,
                        members: MemberOrder::Input,
                        subtotals: SubtotalPolicy::MultipleMembers,
                        sum_fields,
                    },
                );
                log_grouped(&report);
                (Sheet::from_grouped(&report, &layout, meta), None)
            }
            Self::TrialBalance => {
                let summary = category_totals(&rows, "ClosingBalance");
                let report = grouping::build(
                    trial_balance::posting_rows(rows),
                    |r| trial_balance::classify(r).label().to_string(),
                    |r| trial_balance::classify(r).label().to_string(),
                    &GroupOptions {
                        order: GroupOrder::Insertion,
                        members: MemberOrder::Input,
                        subtotals: SubtotalPolicy::Always,
                        sum_fields,
                    },
                );
                log_grouped(&report);
                (Sheet::from_grouped(&report, &layout, meta), Some(summary))
            }
            Self::Solar | Self::Wip => {
                let (levels, tie_break) = match self {
                    Self::Solar => (vec!["Division", "Province", "Area"], vec!["AccountNo"]),
                    _ => (vec!["CostCenter", "ProjectNo"], vec!["ResourceCode"]),
                };
                let h = hierarchy::aggregate(
                    rows,
                    &HierarchyOptions {
                        levels: levels.into_iter().map(String::from).collect(),
                        tie_break: tie_break.into_iter().map(String::from).collect(),
                        sum_fields,
                    },
                );
                for group in &h.top {
                    log::debug!("{}: {}", group.label, group.totals.primary());
                }
                let by_groups = h.grand_from_groups().primary();
                if (by_groups - h.grand_total()).abs() > 0.005 {
                    log::warn!("grand total {} disagrees with group totals {}", h.grand_total(), by_groups);
                }
                log::debug!(
                    "{} rows, {} subtotal lines, grand total {}",
                    h.rows().count(),
                    h.subtotals().count(),
                    h.grand_total()
                );
                (Sheet::from_hierarchy(&h, &layout, meta), None)
            }
        };

        ReportOutput { sheet, style: self.style(), category_totals }
    }
}

fn log_grouped(report: &GroupedReport) {
    if report.is_empty() {
        log::info!("no rows to group");
        return;
    }
    for group in &report.groups {
        log::debug!("{}: {} rows, subtotal {}", group.label, group.members.len(), group.subtotal());
    }
    log::debug!("{} rows, grand total {}", report.row_count(), report.grand_total());
}

fn filter_summary(filter: &ReportFilter) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut push = |name: &str, value: Option<String>| {
        if let Some(v) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            out.push((name.to_string(), v));
        }
    };
    push("Cost Center", filter.cost_center.clone());
    push("From", filter.from_date.clone());
    push("To", filter.to_date.clone());
    push("Payee", filter.payee.clone());
    push("Job No", filter.job_no.clone());
    push("Billing Cycle", filter.cycle.clone());
    push("Category", filter.category.clone());
    push("Company", filter.company.clone());
    push("Month", filter.month.map(|m| m.to_string()));
    push("Year", filter.year.map(|y| y.to_string()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{csv, html, print, text};
    use crate::sheet::RowKind;
    use serde_json::json;

    fn rows(values: serde_json::Value) -> Vec<ReportRow> {
        values.as_array().unwrap().iter().cloned().map(ReportRow::from).collect()
    }

    fn cash_filter() -> ReportFilter {
        ReportFilter {
            from_date: Some("2025-01-01".into()),
            to_date: Some("2025-01-31".into()),
            cost_center: Some("510.20".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_cash_book_request() {
        let mut filter = cash_filter();
        let spec = ReportKind::CashBook.request(&filter).unwrap();
        assert_eq!(spec.segments, vec!["cashbook", "ccreport", "2025-01-01", "2025-01-31", "510.20", "ALL"]);
        assert_eq!(spec.timeout_secs, 60);

        filter.payee = Some("ABC Ltd.".into());
        let spec = ReportKind::CashBook.request(&filter).unwrap();
        assert_eq!(spec.segments.last().map(String::as_str), Some("ABC Ltd."));

        filter.payee = Some("A;".into());
        assert!(ReportKind::CashBook.request(&filter).is_err());
    }

    #[test]
    fn test_requests_need_their_filters() {
        let empty = ReportFilter::default();
        for kind in [
            ReportKind::CashBook,
            ReportKind::JobCard,
            ReportKind::Solar,
            ReportKind::TrialBalance,
            ReportKind::Wip,
        ] {
            assert!(kind.request(&empty).is_err(), "{kind:?} accepted an empty filter");
        }

        let solar = ReportFilter { cycle: Some("445".into()), ..Default::default() };
        let spec = ReportKind::Solar.request(&solar).unwrap();
        assert_eq!(spec.query, vec![("billCycle".to_string(), "445".to_string())]);
        assert_eq!(spec.timeout_secs, 180);

        let tb = ReportFilter {
            company: Some("CEB".into()),
            month: Some(3),
            year: Some(2025),
            ..Default::default()
        };
        let spec = ReportKind::TrialBalance.request(&tb).unwrap();
        assert_eq!(spec.segments, vec!["trialbalance"]);
        assert_eq!(spec.query.len(), 3);
        assert_eq!(ReportKind::TrialBalance.file_params(&tb), vec!["CEB", "2025-03"]);
    }

    #[test]
    fn test_cash_book_totals_agree_across_outputs() {
        let data = rows(json!([
            {"Payee": "ABC Ltd.", "ChqDt": "2025-01-09", "ChqAmt": 1200.5, "ChqNo": "100"},
            {"Payee": "abc ltd", "ChqDt": "2025-01-02", "ChqAmt": "50", "ChqNo": "101"},
            {"Payee": "Smith, John \"Jr.\"", "ChqDt": "2025-01-05", "ChqAmt": -7, "ChqNo": "102"}
        ]));
        let out = ReportKind::CashBook.build(data, ReportKind::CashBook.meta(&cash_filter(), "LKR"));
        assert_eq!(out.sheet.grand_total, "1,243.50");

        let html = html::table(&out.sheet);
        let csv = csv::render(&out.sheet).unwrap();
        let doc = print::document(
            &out.sheet,
            &print::PrintHeader { company: "", printed_by: "", generated: "now" },
        );
        let term = text::render(&out.sheet);
        for (name, rendered) in [("html", &html), ("csv", &csv), ("print", &doc), ("text", &term)] {
            assert!(rendered.contains("1,250.50"), "{name} is missing the ABC subtotal");
            assert!(rendered.contains("1,243.50"), "{name} is missing the grand total");
        }
        // Absolute convention: the sign is dropped.
        assert!(csv.contains("7.00"));
        assert!(!csv.contains("(7.00)"));
        assert!(csv.contains(r#""Smith, John ""Jr.""""#));
    }

    #[test]
    fn test_solar_division_subtotals() {
        let data = rows(json!([
            {"Division": "A", "Province": "P1", "Area": "X", "AccountNo": "2", "Amount": 10, "Units": 1},
            {"Division": "B", "Province": "P2", "Area": "Y", "AccountNo": "1", "Amount": 5, "Units": 2},
            {"Division": "A", "Province": "P1", "Area": "X", "AccountNo": "1", "Amount": -2, "Units": 3}
        ]));
        let out = ReportKind::Solar.build(data, SheetMeta::default());
        let subtotals: Vec<String> = out
            .sheet
            .rows
            .iter()
            .filter(|r| matches!(r.kind, RowKind::Subtotal { .. }))
            .filter_map(|r| r.slots.iter().map(|s| s.flat_text()).find(|t| t.starts_with("Total")))
            .map(String::from)
            .collect();
        // Only Area X has more than one row; each division has a single child.
        assert_eq!(subtotals, vec!["Total X"]);
        assert_eq!(out.sheet.grand_total, "13.00");
        assert_eq!(out.sheet.data_rows().count(), 3);
        // Tie-broken by account number inside Area X.
        assert_eq!(out.sheet.rows[0].slots[3].flat_text(), "1");
    }

    #[test]
    fn test_trial_balance_skips_titles_and_orders_categories() {
        let data = rows(json!([
            {"AccountCode": "6100", "CostCenter": "510", "ClosingBalance": 30},
            {"AccountCode": "1000", "TitleFlag": "Y", "ClosingBalance": 999},
            {"AccountCode": "1100", "CostCenter": "510", "ClosingBalance": -20},
            {"AccountCode": "1200", "CostCenter": "520", "ClosingBalance": 5}
        ]));
        let out = ReportKind::TrialBalance.build(data, SheetMeta::default());
        assert_eq!(out.sheet.grand_total, "15.00");
        let Some(crate::sheet::Slot::Cell(first)) = out.sheet.rows[0].slots.first() else {
            panic!("category cell");
        };
        assert_eq!(first.text, "Assets");
        assert_eq!(first.rowspan, 2);
        let summary = out.category_totals.unwrap();
        assert_eq!(summary.total(trial_balance::Category::Assets), -15.0);
        assert_eq!(summary.get(trial_balance::Category::Expenditure, "510"), 30.0);
    }

    fn wip_rows() -> Vec<ReportRow> {
        rows(json!([
            {"CostCenter": "510", "ProjectNo": "P-2", "ResourceCode": "R1", "EstimatedCost": 100, "ActualCost": 90},
            {"CostCenter": "510", "ProjectNo": "P-10", "ResourceCode": "R2", "EstimatedCost": 50, "ActualCost": 60},
            {"CostCenter": "510", "ProjectNo": "P-2", "ResourceCode": "R0", "EstimatedCost": 20, "ActualCost": 10},
            {"CostCenter": "620", "ProjectNo": "P-1", "ResourceCode": "R1", "EstimatedCost": 5, "ActualCost": 5}
        ]))
    }

    #[test]
    fn test_wip_request() {
        let filter = ReportFilter { cost_center: Some("510".into()), ..cash_filter() };
        let spec = ReportKind::Wip.request(&filter).unwrap();
        assert_eq!(spec.segments, vec!["wip", "510", "2025-01-01", "2025-01-31"]);
        assert!(spec.query.is_empty());
        assert_eq!(spec.timeout_secs, 90);
    }

    #[test]
    fn test_wip_subtotals_sum_both_fields() {
        let out = ReportKind::Wip.build(wip_rows(), ReportKind::Wip.meta(&ReportFilter::default(), ""));
        let csv = csv::render(&out.sheet).unwrap();
        let lines: Vec<&str> = csv.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert_eq!(
            lines,
            vec![
                "Work In Progress",
                "Cost Center,Project,Resource,Description,Estimated,Actual",
                "510,P-2,R0,,20.00,10.00",
                ",,R1,,100.00,90.00",
                ",Total P-2,,,120.00,100.00",
                ",P-10,R2,,50.00,60.00",
                "Total 510,,,,170.00,160.00",
                "620,P-1,R1,,5.00,5.00",
                "Grand Total,,,,175.00,165.00",
            ]
        );
        assert_eq!(out.sheet.grand_total, "175.00");

        let Some(crate::sheet::Slot::Cell(cost_center)) = out.sheet.rows[0].slots.first() else {
            panic!("cost center cell");
        };
        assert_eq!(cost_center.rowspan, 4);
    }

    #[test]
    fn test_hierarchy_totals_agree_across_outputs() {
        let solar = rows(json!([
            {"Division": "A", "Province": "P1", "Area": "X", "AccountNo": "1", "Amount": 1500, "Units": 3},
            {"Division": "A", "Province": "P1", "Area": "X", "AccountNo": "2", "Amount": -200.25, "Units": 4},
            {"Division": "B", "Province": "P2", "Area": "Y", "AccountNo": "3", "Amount": 10, "Units": 1}
        ]));
        let cases = [
            (ReportKind::Solar, solar, vec!["1,299.75", "7.00"], vec!["1,309.75", "8.00"]),
            (ReportKind::Wip, wip_rows(), vec!["170.00", "160.00"], vec!["175.00", "165.00"]),
        ];
        for (kind, data, subtotals, grand) in cases {
            let out = kind.build(data, SheetMeta::default());
            assert_eq!(out.sheet.grand_total, grand[0]);
            let html = html::table(&out.sheet);
            let csv = csv::render(&out.sheet).unwrap();
            let doc = print::document(
                &out.sheet,
                &print::PrintHeader { company: "", printed_by: "", generated: "now" },
            );
            for (name, rendered) in [("html", &html), ("csv", &csv), ("print", &doc)] {
                for value in subtotals.iter().chain(&grand) {
                    assert!(rendered.contains(value), "{kind:?} {name} is missing {value}");
                }
            }
        }
    }

    #[test]
    fn test_empty_report() {
        let out = ReportKind::JobCard.build(Vec::new(), SheetMeta::default());
        assert_eq!(out.sheet.grand_total, "0.00");
        assert_eq!(out.sheet.rows.len(), 1);
    }

    #[test]
    fn test_filter_summary_skips_blank() {
        let filter = ReportFilter { payee: Some("  ".into()), ..cash_filter() };
        let meta = ReportKind::CashBook.meta(&filter, "LKR");
        let names: Vec<&str> = meta.filters.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["Cost Center", "From", "To"]);
    }
}
