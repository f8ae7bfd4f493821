use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;

use crate::collate::{caseless_cmp, natural_cmp};
use crate::models::{ReportRow, Totals};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrder {
    /// Groups appear in the order their key was first seen.
    Insertion,
    /// Groups sorted by key, ignoring case.
    Alphabetical,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberOrder {
    Input,
    /// Stable ascending sort on one field (dates compare chronologically).
    Ascending(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtotalPolicy {
    /// Subtotal row only when it adds up more than one row.
    MultipleMembers,
    Always,
}

#[derive(Debug, Clone)]
pub struct GroupOptions {
    pub order: GroupOrder,
    pub members: MemberOrder,
    pub subtotals: SubtotalPolicy,
    pub sum_fields: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Group {
    pub key: String,
    /// Raw label of the first row seen under this key.
    pub label: String,
    pub members: Vec<ReportRow>,
    pub totals: Totals,
}

#[derive(Debug, Clone)]
pub struct GroupedReport {
    pub groups: Vec<Group>,
    pub sum_fields: Vec<String>,
    pub subtotals: SubtotalPolicy,
    pub grand: Totals,
}

impl Group {
    pub fn subtotal(&self) -> f64 {
        self.totals.primary()
    }
}

impl GroupedReport {
    pub fn grand_total(&self) -> f64 {
        self.grand.primary()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.grand.rows
    }

    pub fn shows_subtotal(&self, group: &Group) -> bool {
        match self.subtotals {
            SubtotalPolicy::Always => true,
            SubtotalPolicy::MultipleMembers => group.members.len() > 1,
        }
    }
}

/// Partition rows into groups keyed by `key_of`, labelled by the first
/// member's `display_of`.
pub fn build<K, D>(rows: Vec<ReportRow>, key_of: K, display_of: D, options: &GroupOptions) -> GroupedReport
where
    K: Fn(&ReportRow) -> String,
    D: Fn(&ReportRow) -> String,
{
    let width = options.sum_fields.len();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for row in rows {
        let key = key_of(&row);
        let slot = match index.get(&key) {
            Some(&i) => i,
            None => {
                groups.push(Group {
                    key: key.clone(),
                    label: display_of(&row),
                    members: Vec::new(),
                    totals: Totals::zero(width),
                });
                index.insert(key, groups.len() - 1);
                groups.len() - 1
            }
        };
        let group = &mut groups[slot];
        group.totals.add_row(&row, &options.sum_fields);
        group.members.push(row);
    }

    if options.order == GroupOrder::Alphabetical {
        groups.sort_by(|a, b| caseless_cmp(&a.key, &b.key));
    }
    if let MemberOrder::Ascending(field) = &options.members {
        for group in &mut groups {
            group.members.sort_by(|a, b| cmp_field(a, b, field));
        }
    }

    let mut grand = Totals::zero(width);
    for group in &groups {
        grand.merge(&group.totals);
    }
    log::debug!("grouped {} rows into {} groups", grand.rows, groups.len());

    GroupedReport {
        groups,
        sum_fields: options.sum_fields.clone(),
        subtotals: options.subtotals,
        grand,
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Some(iso) = s.get(..10) {
        if let Ok(d) = NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
            return Some(d);
        }
    }
    NaiveDate::parse_from_str(s, "%d/%m/%Y").ok()
}

/// Order two rows by one field: dates chronologically, numbers numerically,
/// everything else naturally. Missing values sort first.
pub fn cmp_field(a: &ReportRow, b: &ReportRow, field: &str) -> Ordering {
    let (x, y) = match (a.text(field), b.text(field)) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        (Some(x), Some(y)) => (x, y),
    };
    if let (Some(dx), Some(dy)) = (parse_date(&x), parse_date(&y)) {
        return dx.cmp(&dy);
    }
    if let (Ok(nx), Ok(ny)) = (x.trim().parse::<f64>(), y.trim().parse::<f64>()) {
        return nx.partial_cmp(&ny).unwrap_or(Ordering::Equal);
    }
    natural_cmp(&x, &y)
}
