//! Type-aware value comparison

use std::cmp::Ordering;
use std::iter::Peekable;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::model::ColumnType;
use crate::model::Value;

/// Compares two values under a column type.
///
/// Null handling is the same for every type: two nulls are equal and a null
/// sorts before any non-null value.
///
/// - number, currency, percentage: numeric order after coercion.
/// - date, datetime: order by milliseconds since the epoch.
/// - boolean: `false < true`.
/// - text, custom: [`natural_cmp`] on the rendered values.
///
/// A value that does not coerce under a typed column sorts after every value
/// that does. Two such values fall back to natural collation of their text.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use tabula_lib::engine::compare;
/// use tabula_lib::model::{ColumnType, Value};
///
/// assert_eq!(compare(&Value::Null, &Value::Int(0), ColumnType::Number), Ordering::Less);
/// assert_eq!(compare(&Value::from("9"), &Value::Int(10), ColumnType::Number), Ordering::Less);
/// assert_eq!(compare(&Value::from("item2"), &Value::from("item10"), ColumnType::Text), Ordering::Less);
/// ```
pub fn compare(a: &Value, b: &Value, kind: ColumnType) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    match kind {
        ColumnType::Number | ColumnType::Currency | ColumnType::Percentage => {
            let x = a.as_f64().filter(|v| !v.is_nan());
            let y = b.as_f64().filter(|v| !v.is_nan());
            compare_coerced(x, y, a, b, f64::total_cmp)
        }
        ColumnType::Date | ColumnType::Datetime => compare_coerced(
            a.as_timestamp_millis(),
            b.as_timestamp_millis(),
            a,
            b,
            i64::cmp,
        ),
        ColumnType::Boolean => compare_coerced(a.as_bool(), b.as_bool(), a, b, bool::cmp),
        ColumnType::Text | ColumnType::Custom => natural_cmp(&a.to_string(), &b.to_string()),
    }
}

fn compare_coerced<T>(
    x: Option<T>,
    y: Option<T>,
    a: &Value,
    b: &Value,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (x, y) {
        (Some(x), Some(y)) => cmp(&x, &y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => natural_cmp(&a.to_string(), &b.to_string()),
    }
}

/// Compares strings the way people read them.
///
/// Runs of ASCII digits compare by numeric value, so `"item2"` sorts before
/// `"item10"`. Other characters compare by their base letter, ignoring case
/// and accents, so `"éclair"` sorts between `"apple"` and `"fig"`. Strings that
/// are still equal are ordered character by character: unaccented before
/// accented, lowercase before uppercase.
///
/// # Example
///
/// ```
/// use tabula_lib::engine::natural_cmp;
///
/// let mut labels = vec!["item10", "Item2", "item1"];
/// labels.sort_by(|a, b| natural_cmp(a, b));
/// assert_eq!(labels, ["item1", "Item2", "item10"]);
/// ```
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    folded_cmp(a, b).then_with(|| exact_cmp(a, b))
}

fn folded_cmp(a: &str, b: &str) -> Ordering {
    let mut a = folded(a).peekable();
    let mut b = folded(b).peekable();

    loop {
        let (x, y) = match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => (x, y),
        };

        if x.is_ascii_digit() && y.is_ascii_digit() {
            let run_a = take_digits(&mut a);
            let run_b = take_digits(&mut b);
            let ord = compare_digit_runs(&run_a, &run_b);
            if ord != Ordering::Equal {
                return ord;
            }
        } else {
            // digit runs rank where '0' would
            let class = |c: char| if c.is_ascii_digit() { '0' } else { c };
            let ord = class(x).cmp(&class(y));
            if ord != Ordering::Equal {
                return ord;
            }
            a.next();
            b.next();
        }
    }
}

/// Base letters of `s`, lowercased, with combining marks removed.
fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase)
}

fn fold(c: char) -> char {
    let base = c.nfd().find(|m| !is_combining_mark(*m)).unwrap_or(c);
    base.to_lowercase().next().unwrap_or(base)
}

fn take_digits(chars: &mut Peekable<impl Iterator<Item = char>>) -> String {
    let mut run = String::new();
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn exact_cmp(a: &str, b: &str) -> Ordering {
    let key = |c: char| (fold(c), !c.is_lowercase(), c);
    a.chars().map(key).cmp(b.chars().map(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut items: Vec<&str>) -> Vec<&str> {
        items.sort_by(|a, b| natural_cmp(a, b));
        items
    }

    #[test]
    fn test_natural_digits() {
        assert_eq!(
            sorted(vec!["item2", "item10", "item1"]),
            vec!["item1", "item2", "item10"]
        );
        assert_eq!(sorted(vec!["a10b", "a9c", "a9b"]), vec!["a9b", "a9c", "a10b"]);
        assert_eq!(natural_cmp("x007", "x7"), Ordering::Less);
        assert_eq!(natural_cmp("x7", "x7"), Ordering::Equal);
    }

    #[test]
    fn test_natural_case() {
        assert_eq!(natural_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(natural_cmp("a", "A"), Ordering::Less);
        assert_eq!(natural_cmp("Alpha", "alpha"), Ordering::Greater);
        assert_eq!(natural_cmp("abc", "abcd"), Ordering::Less);
    }

    #[test]
    fn test_accented_labels() {
        assert_eq!(
            sorted(vec!["zebra", "Émile", "apple", "éclair", "fig"]),
            vec!["apple", "éclair", "Émile", "fig", "zebra"]
        );
        assert_eq!(natural_cmp("resume", "résumé"), Ordering::Less);
        assert_eq!(natural_cmp("Ångström", "angstrom"), Ordering::Greater);
        // precomposed and decomposed forms fold to the same letters
        assert_eq!(folded_cmp("caf\u{e9}", "cafe\u{301}"), Ordering::Equal);
    }

    #[test]
    fn test_null_ordering() {
        for kind in [ColumnType::Text, ColumnType::Number, ColumnType::Date] {
            assert_eq!(compare(&Value::Null, &Value::Null, kind), Ordering::Equal);
            assert_eq!(compare(&Value::Null, &Value::from("a"), kind), Ordering::Less);
            assert_eq!(compare(&Value::from("a"), &Value::Null, kind), Ordering::Greater);
        }
    }

    #[test]
    fn test_numeric() {
        let kind = ColumnType::Currency;
        assert_eq!(compare(&Value::Int(50), &Value::Float(150.0), kind), Ordering::Less);
        assert_eq!(compare(&Value::from("100"), &Value::Int(100), kind), Ordering::Equal);
        // non-numeric sorts after numeric
        assert_eq!(compare(&Value::from("n/a"), &Value::Int(1), kind), Ordering::Greater);
    }

    #[test]
    fn test_temporal() {
        let kind = ColumnType::Date;
        assert_eq!(
            compare(&Value::from("2024-01-02"), &Value::from("2023-12-31T23:00:00Z"), kind),
            Ordering::Greater
        );
    }

    #[test]
    fn test_boolean() {
        let kind = ColumnType::Boolean;
        assert_eq!(compare(&Value::Bool(false), &Value::Bool(true), kind), Ordering::Less);
        assert_eq!(compare(&Value::from("yes"), &Value::Bool(true), kind), Ordering::Equal);
    }
}
