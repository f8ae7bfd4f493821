use serde_json::Value;

/// How a report shows negative amounts. Reports pick one and keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegativeStyle {
    /// Sign dropped: `-1234.5` renders as `1,234.50`.
    Absolute,
    /// Accounting style: `-1234.5` renders as `(1,234.50)`.
    Parenthesized,
}

/// Group the integer part of a fixed 2-decimal string with commas: 1234567.8 -> "1,234,567.80"
fn grouped(abs: f64) -> String {
    let cents = format!("{:.2}", abs);
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();
    format!("{with_commas}.{dec_part}")
}

pub fn amount(val: f64, style: NegativeStyle) -> String {
    if !val.is_finite() {
        return "0.00".to_string();
    }
    let body = grouped(val.abs());
    // -0.001 rounds to 0.00 and must not print as (0.00)
    let negative = val < 0.0 && body != "0.00";
    match style {
        NegativeStyle::Parenthesized if negative => format!("({body})"),
        _ => body,
    }
}

pub fn amount_opt(val: Option<f64>, style: NegativeStyle) -> String {
    amount(val.unwrap_or(0.0), style)
}

/// Format a raw JSON cell: numbers, numeric strings and null.
pub fn amount_value(val: &Value, style: NegativeStyle) -> String {
    amount_opt(parse_number(val), style)
}

/// Best-effort numeric reading of a backend field. Thousands commas and a
/// parenthesized negative are accepted in strings.
pub fn parse_number(val: &Value) -> Option<f64> {
    let parsed = match val {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim().replace(',', "");
            if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
                return inner.trim().parse::<f64>().ok().map(|v| -v);
            }
            s.parse::<f64>().ok()
        }
        Value::Bool(_) | Value::Null | Value::Array(_) | Value::Object(_) => None,
    };
    parsed.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parenthesized_negatives() {
        assert_eq!(amount(-1234.5, NegativeStyle::Parenthesized), "(1,234.50)");
        assert_eq!(amount(0.0, NegativeStyle::Parenthesized), "0.00");
        assert_eq!(amount_opt(None, NegativeStyle::Parenthesized), "0.00");
        assert_eq!(amount(1000000.99, NegativeStyle::Parenthesized), "1,000,000.99");
    }

    #[test]
    fn test_absolute_drops_sign() {
        assert_eq!(amount(-1234.5, NegativeStyle::Absolute), "1,234.50");
        assert_eq!(amount(42.1, NegativeStyle::Absolute), "42.10");
        assert_eq!(amount(f64::NAN, NegativeStyle::Absolute), "0.00");
    }

    #[test]
    fn test_tiny_negative_is_not_parenthesized() {
        assert_eq!(amount(-0.001, NegativeStyle::Parenthesized), "0.00");
    }

    #[test]
    fn test_amount_value_reads_json_cells() {
        assert_eq!(amount_value(&json!(null), NegativeStyle::Parenthesized), "0.00");
        assert_eq!(amount_value(&json!("-2,500.5"), NegativeStyle::Parenthesized), "(2,500.50)");
        assert_eq!(amount_value(&json!(999.999), NegativeStyle::Absolute), "1,000.00");
        assert_eq!(amount_value(&json!("n/a"), NegativeStyle::Absolute), "0.00");
    }

    #[test]
    fn test_parse_number_parenthesized_string() {
        assert_eq!(parse_number(&json!("(50.00)")), Some(-50.0));
        assert_eq!(parse_number(&json!(true)), None);
    }
}
