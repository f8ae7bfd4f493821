use once_cell::sync::Lazy;
use regex::Regex;

pub const UNKNOWN_KEY: &str = "UNKNOWN";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static PARENTHESIZED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").unwrap());
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Z0-9 ]").unwrap());

/// Canonical grouping key for a display label.
///
/// "ABC Ltd." and " abc   ltd" both become "ABC LTD". Different labels that
/// reduce to the same key are merged by the group builder; nothing here
/// guards against that.
pub fn normalize(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return UNKNOWN_KEY.to_string();
    };
    let upper = raw.trim().to_uppercase();
    let collapsed = WHITESPACE.replace_all(&upper, " ");
    let no_punct = collapsed.replace([',', '.'], "");
    let no_parens = PARENTHESIZED.replace_all(&no_punct, "");
    let stripped = DISALLOWED.replace_all(&no_parens, "");
    // Removing "(...)" can leave doubled or edge spaces.
    let key = WHITESPACE.replace_all(stripped.trim(), " ").into_owned();
    if key.is_empty() {
        UNKNOWN_KEY.to_string()
    } else {
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_payee_different_spelling() {
        assert_eq!(normalize(Some("ABC Ltd.")), "ABC LTD");
        assert_eq!(normalize(Some("abc ltd")), "ABC LTD");
        assert_eq!(normalize(Some("  abc \t  ltd ")), "ABC LTD");
    }

    #[test]
    fn test_parenthesized_suffix_removed() {
        assert_eq!(normalize(Some("Lanka Traders (Pvt) Ltd")), "LANKA TRADERS LTD");
        assert_eq!(normalize(Some("Silva & Sons (Kandy)")), "SILVA SONS");
    }

    #[test]
    fn test_empty_and_null_map_to_unknown() {
        assert_eq!(normalize(None), UNKNOWN_KEY);
        assert_eq!(normalize(Some("")), UNKNOWN_KEY);
        assert_eq!(normalize(Some("   ")), UNKNOWN_KEY);
        assert_eq!(normalize(Some("(void)")), UNKNOWN_KEY);
        assert_eq!(normalize(Some("...")), UNKNOWN_KEY);
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "ABC Ltd.",
            "A (x) B",
            "M/s. K. Perera (Contractor)",
            "  weird\u{00A0}spacing\n here ",
            "Ünïcödé Co.",
            "(unclosed paren",
            "1,234 Holdings",
            "",
        ];
        for s in samples {
            let once = normalize(Some(s));
            assert_eq!(normalize(Some(&once)), once, "input {s:?}");
        }
    }

    #[test]
    fn test_collision_is_accepted() {
        // Distinct payees that differ only in punctuation share a key.
        assert_eq!(normalize(Some("A.B.C. Stores")), normalize(Some("ABC Stores")));
    }
}
