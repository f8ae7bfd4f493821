use chrono::NaiveDate;
use clap::Args;

use crate::error::{ReportError, Result};

pub const PAYEE_MIN: usize = 3;
pub const PAYEE_MAX: usize = 60;

/// Filter criteria for one report run. Which fields are required depends on
/// the report.
#[derive(Debug, Clone, Default, Args)]
pub struct ReportFilter {
    /// Start date: YYYY-MM-DD
    #[arg(long = "from")]
    pub from_date: Option<String>,
    /// End date: YYYY-MM-DD
    #[arg(long = "to")]
    pub to_date: Option<String>,
    /// Cost center / department id, e.g. 510.20
    #[arg(long = "cost-center")]
    pub cost_center: Option<String>,
    /// Payee name (cash book)
    #[arg(long)]
    pub payee: Option<String>,
    /// Job card number (job card materials)
    #[arg(long = "job-no")]
    pub job_no: Option<String>,
    /// Billing cycle (solar billing)
    #[arg(long)]
    pub cycle: Option<String>,
    /// Customer category (solar billing)
    #[arg(long)]
    pub category: Option<String>,
    /// Company id (trial balance)
    #[arg(long)]
    pub company: Option<String>,
    /// Month 1-12 (trial balance)
    #[arg(long)]
    pub month: Option<u32>,
    /// Year (trial balance)
    #[arg(long)]
    pub year: Option<i32>,
}

pub fn parse_date(raw: &str, what: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ReportError::validation(format!("{what} must be a valid date (YYYY-MM-DD), got '{raw}'")))
}

pub fn require<'a>(value: &'a Option<String>, flag: &str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ReportError::validation(format!("{flag} is required for this report"))),
    }
}

impl ReportFilter {
    /// Both dates present, valid, and in order.
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate)> {
        let from = match (&self.from_date, &self.to_date) {
            (Some(from), Some(_)) => from,
            (Some(_), None) => {
                return Err(ReportError::validation("--from requires --to (both date boundaries must be specified)"));
            }
            (None, Some(_)) => {
                return Err(ReportError::validation("--to requires --from (both date boundaries must be specified)"));
            }
            (None, None) => return Err(ReportError::validation("a date range (--from and --to) is required")),
        };
        let from = parse_date(from, "--from")?;
        let to = parse_date(self.to_date.as_deref().unwrap_or_default(), "--to")?;
        if from > to {
            return Err(ReportError::validation(format!("--from ({from}) is after --to ({to})")));
        }
        Ok((from, to))
    }

    /// Optional payee name, trimmed. Must be 3-60 characters of letters,
    /// digits, spaces and `. , & ' ( ) / -`.
    pub fn payee(&self) -> Result<Option<String>> {
        let Some(raw) = self.payee.as_deref().map(str::trim).filter(|p| !p.is_empty()) else {
            return Ok(None);
        };
        let len = raw.chars().count();
        if len < PAYEE_MIN {
            return Err(ReportError::validation(format!("payee name must be at least {PAYEE_MIN} characters")));
        }
        if len > PAYEE_MAX {
            return Err(ReportError::validation(format!("payee name must be at most {PAYEE_MAX} characters")));
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_alphanumeric() || " .,&'()/-".contains(*c)))
        {
            return Err(ReportError::validation(format!("payee name contains a disallowed character '{bad}'")));
        }
        Ok(Some(raw.to_string()))
    }

    pub fn period(&self) -> Result<(u32, i32)> {
        let month = self
            .month
            .ok_or_else(|| ReportError::validation("--month is required for this report"))?;
        let year = self
            .year
            .ok_or_else(|| ReportError::validation("--year is required for this report"))?;
        if !(1..=12).contains(&month) {
            return Err(ReportError::validation(format!("--month must be between 1 and 12, got {month}")));
        }
        if !(2000..=2100).contains(&year) {
            return Err(ReportError::validation(format!("--year out of range: {year}")));
        }
        Ok((month, year))
    }
}
