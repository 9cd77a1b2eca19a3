//! `key=value` override expressions.
//!
//! Grammar accepted on the command line (no whitespace anywhere):
//!
//! | Form | Example | Parsed as |
//! |------|---------|-----------|
//! | scalar | `max_steps=5`, `use_local_proxy=True`, `tag=run1` | integer, float, boolean, or string |
//! | quoted scalar | `tag="42"` | always a string |
//! | list | `ids=[1,2,3]` or `ids=1,2,3` | list |
//! | tuple | `size=(640,480)` | tuple (fixed arity) |
//! | nested | `pairs=[(a,b),(c,d)]` | list of tuples |
//!
//! The key is a dotted path into the configuration tree
//! (`agents.planning_agent.max_steps`).

use std::str::FromStr;

use toml::Value;

use crate::UsageError;

/// A parsed override value.
///
/// Scalars keep their raw text so a merge into an existing string field can
/// keep the user's spelling (`tag=42` stays `"42"`).
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideValue {
    Scalar { value: Value, raw: String },
    List(Vec<OverrideValue>),
    Tuple(Vec<OverrideValue>),
}

impl OverrideValue {
    /// Converts to the TOML value stored in the configuration tree.
    ///
    /// Lists and tuples both become arrays; the tuple arity rule is applied
    /// during the merge, not afterwards.
    pub fn to_toml(&self) -> Value {
        match self {
            OverrideValue::Scalar { value, .. } => value.clone(),
            OverrideValue::List(items) | OverrideValue::Tuple(items) => {
                Value::Array(items.iter().map(OverrideValue::to_toml).collect())
            }
        }
    }
}

/// One `key=value` expression from `--cfg-options`.
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    key: String,
    path: Vec<String>,
    value: OverrideValue,
}

impl Override {
    /// The dotted key as written.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The key split into table segments.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn value(&self) -> &OverrideValue {
        &self.value
    }
}

impl FromStr for Override {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_override(s)
    }
}

/// Parses one override expression.
pub fn parse_override(expr: &str) -> Result<Override, UsageError> {
    if expr.chars().any(char::is_whitespace) {
        return Err(UsageError::Whitespace {
            expr: expr.to_string(),
        });
    }
    let (key, raw) = expr
        .split_once('=')
        .ok_or_else(|| UsageError::MissingSeparator {
            expr: expr.to_string(),
        })?;
    let path: Vec<String> = key.split('.').map(str::to_string).collect();
    if path.iter().any(String::is_empty) {
        return Err(UsageError::EmptyKey {
            expr: expr.to_string(),
        });
    }
    if strip_quotes(raw).0.is_empty() && !raw.starts_with(['"', '\'']) {
        return Err(UsageError::MissingValue {
            expr: expr.to_string(),
        });
    }

    let value = parse_literal(raw).map_err(|err| match err {
        LiteralError::Unbalanced => UsageError::Unbalanced {
            expr: expr.to_string(),
        },
        LiteralError::EmptyElement => UsageError::EmptyElement {
            expr: expr.to_string(),
        },
    })?;

    Ok(Override {
        key: key.to_string(),
        path,
        value,
    })
}

// ---------------------------------------------------------------------------
// Literal parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiteralError {
    Unbalanced,
    EmptyElement,
}

fn parse_literal(text: &str) -> Result<OverrideValue, LiteralError> {
    let (text, quoted) = strip_quotes(text);

    if let Some(inner) = enclosed(text, '(', ')')? {
        return Ok(OverrideValue::Tuple(parse_elements(inner)?));
    }
    if let Some(inner) = enclosed(text, '[', ']')? {
        return Ok(OverrideValue::List(parse_elements(inner)?));
    }

    let (parts, had_comma) = split_top_level(text)?;
    if !had_comma {
        if quoted {
            return Ok(OverrideValue::Scalar {
                value: Value::String(text.to_string()),
                raw: text.to_string(),
            });
        }
        return Ok(scalar(text));
    }
    parts
        .into_iter()
        .map(parse_literal)
        .collect::<Result<Vec<_>, _>>()
        .map(OverrideValue::List)
}

fn parse_elements(inner: &str) -> Result<Vec<OverrideValue>, LiteralError> {
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    split_top_level(inner)?
        .0
        .into_iter()
        .map(parse_literal)
        .collect()
}

/// Returns the text between `open` and `close` when the first `open` is matched
/// by the final character.
///
/// `(a,b),(c,d)` is not enclosed: its first group closes before the end.
fn enclosed(text: &str, open: char, close: char) -> Result<Option<&str>, LiteralError> {
    if !text.starts_with(open) || !text.ends_with(close) || text.len() < 2 {
        return Ok(None);
    }
    let mut stack = Vec::new();
    for (idx, ch) in text.char_indices() {
        match ch {
            '(' => stack.push(')'),
            '[' => stack.push(']'),
            ')' | ']' => {
                if stack.pop() != Some(ch) {
                    return Err(LiteralError::Unbalanced);
                }
                if stack.is_empty() {
                    return Ok((idx == text.len() - 1).then(|| &text[1..idx]));
                }
            }
            _ => {}
        }
    }
    Err(LiteralError::Unbalanced)
}

/// Splits on commas that are not inside brackets. A single trailing comma is
/// tolerated. The flag reports whether any top-level comma was seen.
fn split_top_level(text: &str) -> Result<(Vec<&str>, bool), LiteralError> {
    let mut parts = Vec::new();
    let mut stack = Vec::new();
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        match ch {
            '(' => stack.push(')'),
            '[' => stack.push(']'),
            ')' | ']' => {
                if stack.pop() != Some(ch) {
                    return Err(LiteralError::Unbalanced);
                }
            }
            ',' if stack.is_empty() => {
                parts.push(&text[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if !stack.is_empty() {
        return Err(LiteralError::Unbalanced);
    }
    parts.push(&text[start..]);

    let had_comma = parts.len() > 1;
    if had_comma {
        if parts.last().is_some_and(|last| last.is_empty()) {
            parts.pop();
        }
        if parts.iter().any(|part| part.is_empty()) {
            return Err(LiteralError::EmptyElement);
        }
    }
    Ok((parts, had_comma))
}

fn strip_quotes(text: &str) -> (&str, bool) {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return (&text[1..text.len() - 1], true);
        }
    }
    (text, false)
}

fn scalar(text: &str) -> OverrideValue {
    let value = if let Ok(int) = text.parse::<i64>() {
        Value::Integer(int)
    } else if let Some(float) = parse_float(text) {
        Value::Float(float)
    } else if text.eq_ignore_ascii_case("true") {
        Value::Boolean(true)
    } else if text.eq_ignore_ascii_case("false") {
        Value::Boolean(false)
    } else {
        Value::String(text.to_string())
    };
    OverrideValue::Scalar {
        value,
        raw: text.to_string(),
    }
}

// `inf` and `nan` parse as f64 but are meant as words here.
fn parse_float(text: &str) -> Option<f64> {
    if !text.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse::<f64>().ok().filter(|f| f.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(expr: &str) -> OverrideValue {
        parse_override(expr).expect("parse").value
    }

    fn s(text: &str) -> OverrideValue {
        OverrideValue::Scalar {
            value: Value::String(text.to_string()),
            raw: text.to_string(),
        }
    }

    fn int(n: i64) -> OverrideValue {
        OverrideValue::Scalar {
            value: Value::Integer(n),
            raw: n.to_string(),
        }
    }

    #[test]
    fn parses_scalars() {
        assert_eq!(value("a=1"), int(1));
        assert_eq!(
            value("a=0.5").to_toml(),
            Value::Float(0.5),
        );
        assert_eq!(value("a=True").to_toml(), Value::Boolean(true));
        assert_eq!(value("a=FALSE").to_toml(), Value::Boolean(false));
        assert_eq!(value("a=hello"), s("hello"));
        assert_eq!(value("a=nan"), s("nan"));
    }

    #[test]
    fn quoted_scalars_stay_strings() {
        assert_eq!(value("tag=\"42\""), s("42"));
        assert_eq!(value("tag='x'"), s("x"));
    }

    #[test]
    fn parses_key_path() {
        let ov = parse_override("agents.planning_agent.max_steps=3").expect("parse");
        assert_eq!(ov.key(), "agents.planning_agent.max_steps");
        assert_eq!(ov.path(), ["agents", "planning_agent", "max_steps"]);
    }

    #[test]
    fn parses_lists_and_tuples() {
        assert_eq!(value("a=[1,2]"), OverrideValue::List(vec![int(1), int(2)]));
        assert_eq!(value("a=1,2"), OverrideValue::List(vec![int(1), int(2)]));
        assert_eq!(value("a=(1,2)"), OverrideValue::Tuple(vec![int(1), int(2)]));
        assert_eq!(value("a=[]"), OverrideValue::List(Vec::new()));
        assert_eq!(value("a=[1,2,]"), OverrideValue::List(vec![int(1), int(2)]));
        assert_eq!(value("a=1,"), OverrideValue::List(vec![int(1)]));
    }

    #[test]
    fn parses_nested_structures() {
        assert_eq!(
            value("a=\"[(a,b),(c,d)]\""),
            OverrideValue::List(vec![
                OverrideValue::Tuple(vec![s("a"), s("b")]),
                OverrideValue::Tuple(vec![s("c"), s("d")]),
            ])
        );
        assert_eq!(
            value("a=(a,b),(c,d)"),
            OverrideValue::List(vec![
                OverrideValue::Tuple(vec![s("a"), s("b")]),
                OverrideValue::Tuple(vec![s("c"), s("d")]),
            ])
        );
        assert_eq!(
            value("a=[[1],[2,[3]]]").to_toml(),
            Value::Array(vec![
                Value::Array(vec![Value::Integer(1)]),
                Value::Array(vec![
                    Value::Integer(2),
                    Value::Array(vec![Value::Integer(3)])
                ]),
            ])
        );
    }

    #[test]
    fn rejects_malformed_expressions() {
        assert!(matches!(
            parse_override("novalue"),
            Err(UsageError::MissingSeparator { .. })
        ));
        assert!(matches!(
            parse_override("a="),
            Err(UsageError::MissingValue { .. })
        ));
        assert!(matches!(
            parse_override("a..b=1"),
            Err(UsageError::EmptyKey { .. })
        ));
        assert!(matches!(
            parse_override("=1"),
            Err(UsageError::EmptyKey { .. })
        ));
        assert!(matches!(
            parse_override("a=[1, 2]"),
            Err(UsageError::Whitespace { .. })
        ));
        assert!(matches!(
            parse_override("a=[1,2"),
            Err(UsageError::Unbalanced { .. })
        ));
        assert!(matches!(
            parse_override("a=(1,2]"),
            Err(UsageError::Unbalanced { .. })
        ));
        assert!(matches!(
            parse_override("a=1,,2"),
            Err(UsageError::EmptyElement { .. })
        ));
    }

    #[test]
    fn empty_quoted_value_is_empty_string() {
        assert_eq!(value("tag=\"\""), s(""));
    }
}
