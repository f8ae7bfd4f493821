use std::cmp::Ordering;

/// Case-insensitive comparison that treats digit runs as numbers, so
/// "Area 2" sorts before "Area 10".
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut xs = a.chars().peekable();
    let mut ys = b.chars().peekable();
    loop {
        match (xs.peek().copied(), ys.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let left = take_digits(&mut xs);
                let right = take_digits(&mut ys);
                let ord = cmp_digit_runs(&left, &right);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = fold(x).cmp(&fold(y));
                if ord != Ordering::Equal {
                    return ord;
                }
                xs.next();
                ys.next();
            }
        }
    }
}

/// Case-insensitive ordering with natural order as the tie-break.
pub fn caseless_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| natural_cmp(a, b))
}

fn take_digits(it: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = it.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        it.next();
    }
    run
}

fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_runs() {
        assert_eq!(natural_cmp("Area 2", "Area 10"), Ordering::Less);
        assert_eq!(natural_cmp("DD1", "DD01"), Ordering::Equal);
        assert_eq!(natural_cmp("a100b", "a20b"), Ordering::Greater);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(natural_cmp("colombo", "COLOMBO"), Ordering::Equal);
        assert_eq!(natural_cmp("Galle", "kandy"), Ordering::Less);
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(natural_cmp("West", "Western"), Ordering::Less);
        assert_eq!(natural_cmp("", "A"), Ordering::Less);
    }

    #[test]
    fn test_caseless_cmp() {
        let mut keys = vec!["ZETA", "alpha", "Beta"];
        keys.sort_by(|a, b| caseless_cmp(a, b));
        assert_eq!(keys, vec!["alpha", "Beta", "ZETA"]);
    }
}
