use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde_json::Value;

use crate::error::{ReportError, Result};
use crate::models::{CostCenter, ReportRow};

const COST_CENTER_TIMEOUT_SECS: u64 = 15;

/// One GET against the reporting API: path segments (percent-encoded when
/// the URL is built) plus query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub timeout_secs: u64,
}

pub struct Client {
    http: reqwest::blocking::Client,
    base: Url,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ReportError::Settings(format!("invalid API base '{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ReportError::Settings(format!("invalid API base '{base_url}'")));
        }
        let http = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| ReportError::Other(format!("HTTP client setup failed: {e}")))?;
        Ok(Client { http, base })
    }

    pub fn url_for(&self, spec: &RequestSpec) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(spec.segments.iter().map(String::as_str));
        }
        if !spec.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(spec.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        url
    }

    /// Fetch report rows. Errors on timeout, connection failure, non-2xx
    /// status and any body that is not a row envelope.
    pub fn fetch_rows(&self, spec: &RequestSpec) -> Result<Vec<ReportRow>> {
        let url = self.url_for(spec);
        log::info!("GET {url} (timeout {} s)", spec.timeout_secs);

        let response = self
            .http
            .get(url)
            .timeout(Duration::from_secs(spec.timeout_secs))
            .send()
            .map_err(|e| transport_error(e, spec.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Http(status.as_u16()));
        }
        if let Some(ct) = response.headers().get(CONTENT_TYPE) {
            let ct = ct.to_str().unwrap_or_default();
            if !ct.is_empty() && !ct.contains("json") {
                return Err(ReportError::UnexpectedFormat(format!("content type '{ct}'")));
            }
        }
        let body = response
            .text()
            .map_err(|e| transport_error(e, spec.timeout_secs))?;
        let rows = parse_envelope(&body)?;
        log::debug!("received {} rows", rows.len());
        Ok(rows)
    }

    pub fn cost_centers(&self, employee_no: &str) -> Result<Vec<CostCenter>> {
        let spec = RequestSpec {
            segments: vec!["costcenters".into(), employee_no.into()],
            query: Vec::new(),
            timeout_secs: COST_CENTER_TIMEOUT_SECS,
        };
        self.fetch_rows(&spec)?.into_iter().map(CostCenter::try_from).collect()
    }
}

fn transport_error(err: reqwest::Error, timeout_secs: u64) -> ReportError {
    if err.is_timeout() {
        ReportError::Timeout(timeout_secs)
    } else if err.is_connect() {
        ReportError::Unreachable(err.to_string())
    } else if let Some(status) = err.status() {
        ReportError::Http(status.as_u16())
    } else if err.is_decode() || err.is_body() {
        ReportError::UnexpectedFormat(err.to_string())
    } else {
        ReportError::Unreachable(err.to_string())
    }
}

/// Rows from a response body. Accepts a bare array, or an object whose
/// `data` is an array and whose `success` is not false.
pub fn parse_envelope(body: &str) -> Result<Vec<ReportRow>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ReportError::UnexpectedFormat(format!("body is not JSON: {e}")))?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => {
            if obj.get("success").and_then(Value::as_bool) == Some(false) {
                let message = obj
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("the server reported a failure")
                    .to_string();
                return Err(ReportError::Rejected(message));
            }
            match obj.remove("data") {
                Some(Value::Array(items)) => items,
                Some(_) => return Err(ReportError::UnexpectedFormat("`data` is not an array".into())),
                None => return Err(ReportError::UnexpectedFormat("missing `data` array".into())),
            }
        }
        _ => return Err(ReportError::UnexpectedFormat("expected an array or an object".into())),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(ReportRow(map)),
            _ => Err(ReportError::UnexpectedFormat(format!("row {i} is not an object"))),
        })
        .collect()
}
