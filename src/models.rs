use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ReportError;
use crate::fmt::parse_number;

/// One flat record as returned by a report endpoint. Field names differ per
/// report, so the row stays an opaque JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportRow(pub Map<String, Value>);

impl ReportRow {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Display text of a field. Numbers are rendered as-is; null, missing and
    /// blank strings are `None`.
    pub fn text(&self, field: &str) -> Option<String> {
        match self.0.get(field)? {
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn text_or_empty(&self, field: &str) -> String {
        self.text(field).unwrap_or_default()
    }

    /// Numeric value of a field; anything missing or unparseable counts as 0.
    pub fn amount(&self, field: &str) -> f64 {
        self.0.get(field).and_then(parse_number).unwrap_or(0.0)
    }
}

impl From<Value> for ReportRow {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => ReportRow(map),
            _ => ReportRow::default(),
        }
    }
}

/// Running sums of a report's summed fields, aligned by position.
#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub sums: Vec<f64>,
    pub rows: usize,
}

impl Totals {
    pub fn zero(width: usize) -> Self {
        Self { sums: vec![0.0; width], rows: 0 }
    }

    pub fn add_row(&mut self, row: &ReportRow, fields: &[String]) {
        for (sum, field) in self.sums.iter_mut().zip(fields) {
            *sum += row.amount(field);
        }
        self.rows += 1;
    }

    pub fn merge(&mut self, other: &Totals) {
        for (sum, v) in self.sums.iter_mut().zip(&other.sums) {
            *sum += v;
        }
        self.rows += other.rows;
    }

    /// The designated total: the first summed field, 0 when nothing is summed.
    pub fn primary(&self) -> f64 {
        self.sums.first().copied().unwrap_or(0.0)
    }
}

/// Cost center the current user may report on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostCenter {
    #[serde(rename = "DeptId", alias = "deptId")]
    pub dept_id: String,
    #[serde(rename = "DeptName", alias = "deptName", default)]
    pub name: String,
}

impl TryFrom<ReportRow> for CostCenter {
    type Error = ReportError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        serde_json::from_value(Value::Object(row.0))
            .map_err(|e| ReportError::UnexpectedFormat(format!("cost center record: {e}")))
    }
}
