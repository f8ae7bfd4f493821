use std::collections::BTreeMap;
use std::fmt;

use crate::collate::natural_cmp;
use crate::models::ReportRow;

pub const ACCOUNT_CODE: &str = "AccountCode";
pub const TITLE_FLAG: &str = "TitleFlag";
pub const COST_CENTER: &str = "CostCenter";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Assets,
    Liabilities,
    Revenue,
    Expenditure,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Assets,
        Category::Liabilities,
        Category::Revenue,
        Category::Expenditure,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Assets => "Assets",
            Self::Liabilities => "Liabilities",
            Self::Revenue => "Revenue",
            Self::Expenditure => "Expenditure",
            Self::Other => "Other",
        }
    }

    /// Chart-of-accounts class from the leading digit of the account code.
    pub fn of_code(code: &str) -> Self {
        match code.trim().chars().next() {
            Some('1') => Self::Assets,
            Some('2') => Self::Liabilities,
            Some('4') => Self::Revenue,
            Some('5'..='8') => Self::Expenditure,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Heading rows in the chart carry a title flag and no postings of their own.
pub fn is_title(row: &ReportRow) -> bool {
    matches!(
        row.text(TITLE_FLAG).map(|s| s.trim().to_ascii_uppercase()).as_deref(),
        Some("Y" | "T" | "1" | "TRUE")
    )
}

pub fn classify(row: &ReportRow) -> Category {
    row.text(ACCOUNT_CODE)
        .map(|code| Category::of_code(&code))
        .unwrap_or(Category::Other)
}

/// Posting rows ordered by category, then account code.
pub fn posting_rows(rows: Vec<ReportRow>) -> Vec<ReportRow> {
    let mut postings: Vec<ReportRow> = rows.into_iter().filter(|r| !is_title(r)).collect();
    postings.sort_by(|a, b| {
        classify(a).cmp(&classify(b)).then_with(|| {
            natural_cmp(&a.text_or_empty(ACCOUNT_CODE), &b.text_or_empty(ACCOUNT_CODE))
        })
    });
    postings
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals(pub BTreeMap<Category, BTreeMap<String, f64>>);

impl CategoryTotals {
    pub fn get(&self, category: Category, cost_center: &str) -> f64 {
        self.0
            .get(&category)
            .and_then(|m| m.get(cost_center))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn total(&self, category: Category) -> f64 {
        self.0.get(&category).map(|m| m.values().sum()).unwrap_or(0.0)
    }

    pub fn cost_centers(&self) -> Vec<String> {
        let mut all: Vec<String> = self.0.values().flat_map(|m| m.keys().cloned()).collect();
        all.sort_by(|a, b| natural_cmp(a, b));
        all.dedup();
        all
    }
}

/// Sum `amount_field` per category and cost center, skipping title rows.
pub fn category_totals(rows: &[ReportRow], amount_field: &str) -> CategoryTotals {
    let mut totals: BTreeMap<Category, BTreeMap<String, f64>> = BTreeMap::new();
    for row in rows.iter().filter(|r| !is_title(r)) {
        let cc = row.text(COST_CENTER).unwrap_or_else(|| "UNKNOWN".to_string());
        *totals
            .entry(classify(row))
            .or_default()
            .entry(cc)
            .or_insert(0.0) += row.amount(amount_field);
    }
    CategoryTotals(totals)
}
