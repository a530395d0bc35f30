//! Tolerant parsing for the loosely-structured source columns. Nothing in
//! here fails a row: bad input degrades to an empty result or `None`.

use jiff::civil::Date;
use serde_json::Value;

/// Keys that may carry a person's name inside a record-like element.
const NAME_KEYS: &[&str] = &["name", "actor", "original_name"];

/// Parse a cell that should hold a list of names. The cell may be empty, a
/// JSON list of strings, a JSON list of `{"name": ...}` records, or a bare
/// comma-separated string. Order is preserved as encountered.
pub fn parse_name_list(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    if raw.starts_with('[') || raw.starts_with('{') {
        if let Ok(value) = serde_json::from_str::<Value>(raw) {
            let mut names = Vec::new();
            collect_names(&value, &mut names);
            return names;
        }
    }

    split_fallback(raw)
}

fn collect_names(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::String(_) | Value::Object(_) => collect_names(item, out),
                    // numbers, nulls and nested arrays carry no name
                    _ => {},
                }
            }
        },
        Value::Object(map) => {
            if let Some(name) = NAME_KEYS.iter().find_map(|key| map.get(*key).and_then(Value::as_str)) {
                push_name(name, out);
            }
        },
        Value::String(s) => push_name(s, out),
        _ => {},
    }
}

fn push_name(name: &str, out: &mut Vec<String>) {
    let name = name.trim();
    if !name.is_empty() {
        out.push(name.to_string());
    }
}

/// Best-effort split for cells that are not valid structural literals, e.g.
/// `"Action, Drama"` or the Python-repr form `"['Action', 'Drama']"`.
fn split_fallback(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|part| {
            part.trim_matches(|c: char| c.is_whitespace() || matches!(c, '[' | ']' | '\'' | '"'))
        })
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Integer coercion tolerant of float-formatted text (`"1995.0"`).
pub fn parse_int(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<i64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
}

pub fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

/// ISO `YYYY-MM-DD`, with a `MM/DD/YYYY` fallback. `None` on anything else.
pub fn parse_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<Date>().ok().or_else(|| Date::strptime("%m/%d/%Y", raw).ok())
}
