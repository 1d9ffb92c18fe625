//! Block-style YAML emitter driven by [`StyleHints`].
//!
//! Output uses two-space indentation, nests sequences under their key and
//! never ends with a line break. Strings are written plain whenever that
//! reads back as the same string; otherwise they are double quoted unless a
//! hint asks for another style.

use lazy_static::lazy_static;
use regex::Regex;
use serde_yml::{Mapping, Value};

use crate::error::{Error, Result};
use crate::style::{KeyStyle, QuoteStyle, StyleHints};

lazy_static! {
    static ref TIMESTAMP_LIKE: Regex = Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}").unwrap();
    static ref NUMBER_LIKE: Regex =
        Regex::new(r"^[-+]?(?:0x[0-9a-fA-F_]+|0o[0-7_]+|0b[01_]+|[0-9][0-9_]*(?:\.[0-9_]*)?(?:[eE][-+]?[0-9]+)?|\.[0-9]+|\.(?:inf|Inf|INF)|\.(?:nan|NaN|NAN))$").unwrap();
}

const RESERVED_WORDS: &[&str] = &[
    "null", "~", "true", "false", "yes", "no", "on", "off", "y", "n",
];

/// Serializes a mapping as block YAML.
pub fn to_yaml(root: &Mapping, hints: &StyleHints) -> Result<String> {
    let mut lines = Vec::new();
    write_mapping(root, 0, Some(hints), &mut lines)?;
    Ok(lines.join("\n"))
}

fn write_mapping(
    mapping: &Mapping,
    indent: usize,
    hints: Option<&StyleHints>,
    lines: &mut Vec<String>,
) -> Result<()> {
    let pad = " ".repeat(indent);
    for (key, value) in mapping {
        let key_text = key_scalar(key)?;
        let (style, block) = match (hints, key.as_str()) {
            (Some(hints), Some(name)) => (hints.get(name), hints.block(name)),
            _ => (KeyStyle::default(), None),
        };
        if let Some(block) = block.filter(|block| block.holds(value)) {
            lines.extend(block.lines.iter().cloned());
            continue;
        }
        let prefix = format!("{pad}{key_text}:");

        match value {
            Value::Mapping(inner) if inner.is_empty() => lines.push(format!("{prefix} {{}}")),
            Value::Mapping(inner) => {
                lines.push(prefix);
                write_mapping(inner, indent + 2, None, lines)?;
            }
            Value::Sequence(items) if items.is_empty() => lines.push(format!("{prefix} []")),
            Value::Sequence(items) if style.flow => {
                lines.push(format!("{prefix} {}", flow_sequence(items)?));
            }
            Value::Sequence(items) => {
                lines.push(prefix);
                write_sequence(items, indent + 2, lines)?;
            }
            Value::Null => lines.push(prefix),
            Value::Tagged(tagged) => match &tagged.value {
                Value::Mapping(inner) if !inner.is_empty() => {
                    lines.push(format!("{prefix} {}", tagged.tag));
                    write_mapping(inner, indent + 2, None, lines)?;
                }
                Value::Sequence(items) if !items.is_empty() => {
                    lines.push(format!("{prefix} {}", tagged.tag));
                    write_sequence(items, indent + 2, lines)?;
                }
                inner => lines.push(format!("{prefix} {} {}", tagged.tag, block_scalar(inner, None)?)),
            },
            Value::String(text) if style.quote == Some(QuoteStyle::Folded) && use_folded_line(text) => {
                lines.push(format!("{prefix} {}", folded_header(text)));
                lines.push(format!("{pad}  {}", text.trim_end_matches('\n')));
            }
            Value::String(text) if use_literal(text, style.quote) => {
                lines.push(format!("{prefix} {}", literal_header(text)));
                push_literal_body(text, indent + 2, lines);
            }
            scalar => lines.push(format!("{prefix} {}", block_scalar(scalar, style.quote)?)),
        }
    }
    Ok(())
}

fn write_sequence(items: &[Value], indent: usize, lines: &mut Vec<String>) -> Result<()> {
    let pad = " ".repeat(indent);
    for item in items {
        match item {
            Value::Mapping(inner) if !inner.is_empty() => {
                let start = lines.len();
                write_mapping(inner, indent + 2, None, lines)?;
                mark_first_item_line(&mut lines[start], indent);
            }
            Value::Sequence(inner) if !inner.is_empty() => {
                let start = lines.len();
                write_sequence(inner, indent + 2, lines)?;
                mark_first_item_line(&mut lines[start], indent);
            }
            Value::Mapping(_) => lines.push(format!("{pad}- {{}}")),
            Value::Sequence(_) => lines.push(format!("{pad}- []")),
            Value::String(text) if use_literal(text, None) => {
                lines.push(format!("{pad}- {}", literal_header(text)));
                push_literal_body(text, indent + 2, lines);
            }
            scalar => lines.push(format!("{pad}- {}", block_scalar(scalar, None)?)),
        }
    }
    Ok(())
}

/// Turns the first line of a nested collection into a `- ` item line.
fn mark_first_item_line(line: &mut String, indent: usize) {
    let nested = indent + 2;
    let content = line.get(nested..).unwrap_or_default().to_string();
    *line = format!("{}- {content}", " ".repeat(indent));
}

fn flow_sequence(items: &[Value]) -> Result<String> {
    let rendered = items.iter().map(flow_value).collect::<Result<Vec<_>>>()?;
    Ok(format!("[{}]", rendered.join(", ")))
}

fn flow_value(value: &Value) -> Result<String> {
    match value {
        Value::Sequence(items) => flow_sequence(items),
        Value::Mapping(mapping) => {
            let entries = mapping
                .iter()
                .map(|(key, value)| Ok(format!("{}: {}", key_scalar(key)?, flow_value(value)?)))
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("{{{}}}", entries.join(", ")))
        }
        Value::String(text) if is_plain_safe(text, true) && !is_timestamp_like(text) => {
            Ok(text.clone())
        }
        Value::String(text) => Ok(double_quoted(text)),
        scalar => non_string_scalar(scalar),
    }
}

fn block_scalar(value: &Value, quote: Option<QuoteStyle>) -> Result<String> {
    match value {
        Value::String(text) => Ok(string_scalar(text, quote)),
        scalar => non_string_scalar(scalar),
    }
}

fn non_string_scalar(value: &Value) -> Result<String> {
    match value {
        Value::Null => Ok("null".to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        Value::String(text) => Ok(double_quoted(text)),
        Value::Tagged(tagged) => Ok(format!("{} {}", tagged.tag, flow_value(&tagged.value)?)),
        Value::Sequence(_) | Value::Mapping(_) => flow_value(value),
    }
}

fn key_scalar(key: &Value) -> Result<String> {
    match key {
        Value::String(text) => Ok(string_scalar(text, None)),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(Error::UnsupportedKey(format!("{other:?}"))),
    }
}

fn string_scalar(text: &str, quote: Option<QuoteStyle>) -> String {
    match quote {
        Some(QuoteStyle::Double) => double_quoted(text),
        Some(QuoteStyle::Single) if !text.chars().any(char::is_control) => single_quoted(text),
        // An unquoted source value stays unquoted as long as it still reads
        // back as a string, timestamps included.
        Some(QuoteStyle::Plain) if is_plain_safe(text, false) => text.to_string(),
        _ if is_plain_safe(text, false) && !is_timestamp_like(text) => text.to_string(),
        _ => double_quoted(text),
    }
}

/// Whether `text` can be written without quotes and still parse back as
/// the very same string.
fn is_plain_safe(text: &str, flow: bool) -> bool {
    let Some(first) = text.chars().next() else {
        return false;
    };
    if text.trim() != text || text.chars().any(char::is_control) {
        return false;
    }
    let second_is_space = text.chars().nth(1).is_none_or(char::is_whitespace);
    let bad_start = match first {
        '-' | '?' | ':' => second_is_space,
        ',' | '[' | ']' | '{' | '}' | '#' | '&' | '*' | '!' | '|' | '>' | '\'' | '"' | '%'
        | '@' | '`' => true,
        _ => false,
    };
    if bad_start || text.contains(": ") || text.contains(" #") || text.ends_with(':') {
        return false;
    }
    if flow && text.contains([',', '[', ']', '{', '}']) {
        return false;
    }
    !resolves_to_non_string(text)
}

fn resolves_to_non_string(text: &str) -> bool {
    RESERVED_WORDS.contains(&text.to_lowercase().as_str()) || NUMBER_LIKE.is_match(text)
}

fn is_timestamp_like(text: &str) -> bool {
    TIMESTAMP_LIKE.is_match(text)
}

fn double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn single_quoted(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Multi-line strings become literal blocks when their content survives the
/// block scalar rules unchanged.
fn use_literal(text: &str, quote: Option<QuoteStyle>) -> bool {
    if !text.contains('\n') || matches!(quote, Some(QuoteStyle::Double | QuoteStyle::Single)) {
        return false;
    }
    let body = text.strip_suffix('\n').unwrap_or(text);
    !body.is_empty()
        && !body.ends_with('\n')
        && !body.starts_with([' ', '\t', '\n'])
        && !body.contains('\r')
        && !body.lines().any(|line| line.ends_with([' ', '\t']))
        && !body.chars().any(|c| c.is_control() && c != '\n' && c != '\t')
}

/// A single-line string can keep a folded block style as long as folding
/// leaves it untouched.
fn use_folded_line(text: &str) -> bool {
    let body = text.strip_suffix('\n').unwrap_or(text);
    !body.is_empty()
        && !body.contains('\n')
        && !body.starts_with([' ', '\t'])
        && !body.ends_with([' ', '\t'])
        && !body.chars().any(char::is_control)
}

fn folded_header(text: &str) -> &'static str {
    if text.ends_with('\n') { ">" } else { ">-" }
}

fn literal_header(text: &str) -> &'static str {
    if text.ends_with('\n') { "|" } else { "|-" }
}

fn push_literal_body(text: &str, indent: usize, lines: &mut Vec<String>) {
    let pad = " ".repeat(indent);
    let body = text.strip_suffix('\n').unwrap_or(text);
    for line in body.split('\n') {
        if line.is_empty() {
            lines.push(String::new());
        } else {
            lines.push(format!("{pad}{line}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yml::from_str(yaml).unwrap()
    }

    fn emit(yaml: &str) -> String {
        to_yaml(&mapping(yaml), &StyleHints::scan(yaml)).unwrap()
    }

    #[test]
    fn test_emit_plain_scalars() {
        let fixture = "title: Hello world\nid: 42\ndraft: false\nratio: 1.5";
        let actual = emit(fixture);
        assert_eq!(actual, fixture);
    }

    #[test]
    fn test_emit_quotes_ambiguous_strings() {
        let mut fixture = Mapping::new();
        for text in ["true", "42", "", " padded", "a: b", "#hash", "- item", "null"] {
            fixture.insert(Value::String(format!("k{}", fixture.len())), Value::String(text.into()));
        }

        let actual = to_yaml(&fixture, &StyleHints::default()).unwrap();

        let expected = [
            "k0: \"true\"",
            "k1: \"42\"",
            "k2: \"\"",
            "k3: \" padded\"",
            "k4: \"a: b\"",
            "k5: \"#hash\"",
            "k6: \"- item\"",
            "k7: \"null\"",
        ]
        .join("\n");
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_emit_quotes_timestamps_without_hint() {
        let mut fixture = Mapping::new();
        fixture.insert("date".into(), "2024-01-15T10:00:00Z".into());

        let actual = to_yaml(&fixture, &StyleHints::default()).unwrap();

        assert_eq!(actual, "date: \"2024-01-15T10:00:00Z\"");
    }

    #[test]
    fn test_emit_keeps_unquoted_timestamp() {
        let fixture = "date: 2024-01-15T14:30:00Z";
        let actual = emit(fixture);
        assert_eq!(actual, fixture);
    }

    #[test]
    fn test_emit_keeps_quote_styles() {
        let fixture = "title: \"Hello\"\nslug: 'it''s'";
        let actual = emit(fixture);
        assert_eq!(actual, fixture);
    }

    #[test]
    fn test_emit_flow_and_block_sequences() {
        let fixture = "tags: [a, b, \"c, d\"]\ncategories:\n  - one\n  - two";
        let actual = emit(fixture);
        assert_eq!(actual, fixture);
    }

    #[test]
    fn test_emit_nested_structures() {
        let fixture = "head:\n  meta:\n    - property: twitter:title\n      content: Hello\n    - name: keywords\n      content: a, b\nfaqs:\n  - question: Why?\n    answer: Because.";
        let actual = emit(fixture);
        assert_eq!(actual, fixture);
    }

    #[test]
    fn test_emit_empty_collections() {
        let fixture = "tags: []\nextra: {}\nnothing:";
        let actual = emit(fixture);
        assert_eq!(actual, fixture);
    }

    #[test]
    fn test_emit_literal_block() {
        let fixture = "summary: |\n  Line one\n  Line two\ndescription: |-\n  First line\n\n  Third line";
        let actual = emit(fixture);
        assert_eq!(actual, fixture);
    }

    #[test]
    fn test_emit_tagged_values() {
        let fixture = "extra: !custom value\nlist: !seq\n  - a\n  - b\nnested: [!x 1]";
        let actual = emit(fixture);
        assert_eq!(actual, fixture);
    }

    #[test]
    fn test_emit_keeps_unchanged_folded_block() {
        let fixture = "description: >\n  A long folded\n  description\ntitle: Hello";
        let actual = emit(fixture);
        assert_eq!(actual, fixture);
    }

    #[test]
    fn test_emit_edited_folded_value_stays_folded() {
        let hints = StyleHints::scan("description: >-\n  Old text\n  here");
        let mut fixture = Mapping::new();
        fixture.insert("description".into(), "New folded text".into());

        let actual = to_yaml(&fixture, &hints).unwrap();

        assert_eq!(actual, "description: >-\n  New folded text");
    }

    #[test]
    fn test_emit_escapes_double_quoted() {
        let mut fixture = Mapping::new();
        fixture.insert("title".into(), "say \"hi\"\\\u{7}".into());

        let actual = to_yaml(&fixture, &StyleHints::default()).unwrap();

        assert_eq!(actual, "title: \"say \\\"hi\\\"\\\\\\u0007\"");
    }

    #[test]
    fn test_emit_rejects_collection_keys() {
        let mut fixture = Mapping::new();
        fixture.insert(Value::Sequence(vec!["a".into()]), "value".into());

        let actual = to_yaml(&fixture, &StyleHints::default());

        assert!(matches!(actual, Err(Error::UnsupportedKey(_))));
    }
}
