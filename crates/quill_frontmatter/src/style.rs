//! Formatting hints recovered from raw frontmatter text.
//!
//! A parsed YAML tree forgets how each value was written. The hints record,
//! per top-level key, the scalar quoting and collection style found in the
//! source so the emitter can reproduce it. Block scalars are also kept as
//! written so that an unchanged value is emitted with its original line
//! breaks.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde_yml::{Mapping, Value};

lazy_static! {
    static ref TOP_LEVEL_ENTRY: Regex = Regex::new(
        r##"^("(?:[^"\\]|\\.)*"|'(?:[^']|'')*'|[^\s'"#\-?:\[\]{},&*!|>%@`][^:]*?)[ \t]*:(?:[ \t]+(.*))?$"##
    )
    .unwrap();
}

/// How a scalar value was quoted in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    Plain,
    Single,
    Double,
    /// Block scalar introduced by `|`
    Literal,
    /// Block scalar introduced by `>`
    Folded,
}

/// Formatting observed for a single top-level key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyStyle {
    pub quote: Option<QuoteStyle>,
    /// Sequence written inline as `[a, b]`
    pub flow: bool,
}

/// A top-level block scalar exactly as it appears in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockScalar {
    /// Source lines from the key line to the end of the block
    pub lines: Vec<String>,
    /// The string those lines parse to
    pub value: String,
}

impl BlockScalar {
    /// Captures the block starting at the first of `lines`, each of which
    /// still carries its line break.
    fn capture(lines: &[&str]) -> Option<Self> {
        let end = lines
            .iter()
            .skip(1)
            .position(|line| {
                let line = line.trim_end();
                !line.is_empty() && !line.starts_with([' ', '\t'])
            })
            .map_or(lines.len(), |position| position + 1);
        let source = lines[..end].concat();

        let mapping: Mapping = serde_yml::from_str(&source).ok()?;
        let (_, value) = mapping.into_iter().next()?;
        let Value::String(value) = value else {
            return None;
        };
        let lines = lines[..end]
            .iter()
            .map(|line| line.trim_end_matches(['\n', '\r']).to_string())
            .collect();
        Some(Self { lines, value })
    }

    /// Whether `value` is still the string this block was written for.
    pub fn holds(&self, value: &Value) -> bool {
        value.as_str() == Some(self.value.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleHints {
    keys: HashMap<String, KeyStyle>,
    blocks: HashMap<String, BlockScalar>,
}

impl StyleHints {
    /// Scans the top-level entries of a frontmatter block.
    pub fn scan(frontmatter: &str) -> Self {
        let lines: Vec<&str> = frontmatter.split_inclusive('\n').collect();
        let mut hints = Self::default();
        for (index, line) in lines.iter().enumerate() {
            let Some(captures) = TOP_LEVEL_ENTRY.captures(line.trim_end()) else {
                continue;
            };
            let Some(key) = captures.get(1).map(|key| unquote_key(key.as_str())) else {
                continue;
            };
            let rest = captures.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
            let style = KeyStyle::from_value_text(rest);
            if matches!(style.quote, Some(QuoteStyle::Literal | QuoteStyle::Folded))
                && let Some(block) = BlockScalar::capture(&lines[index..])
            {
                hints.blocks.insert(key.clone(), block);
            }
            hints.keys.insert(key, style);
        }
        hints
    }

    pub fn get(&self, key: &str) -> KeyStyle {
        self.keys.get(key).copied().unwrap_or_default()
    }

    pub fn block(&self, key: &str) -> Option<&BlockScalar> {
        self.blocks.get(key)
    }
}

impl KeyStyle {
    fn from_value_text(value: &str) -> Self {
        match value.chars().next() {
            None => Self::default(),
            Some('"') => Self { quote: Some(QuoteStyle::Double), flow: false },
            Some('\'') => Self { quote: Some(QuoteStyle::Single), flow: false },
            Some('|') => Self { quote: Some(QuoteStyle::Literal), flow: false },
            Some('>') => Self { quote: Some(QuoteStyle::Folded), flow: false },
            Some('[') => Self { quote: None, flow: true },
            // Flow mappings, anchors, aliases and tags carry no usable hint
            Some('{' | '&' | '*' | '!') => Self::default(),
            Some(_) => Self { quote: Some(QuoteStyle::Plain), flow: false },
        }
    }
}

fn unquote_key(key: &str) -> String {
    if let Some(inner) = key.strip_prefix('"').and_then(|k| k.strip_suffix('"')) {
        inner.replace("\\\"", "\"").replace("\\\\", "\\")
    } else if let Some(inner) = key.strip_prefix('\'').and_then(|k| k.strip_suffix('\'')) {
        inner.replace("''", "'")
    } else {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_scan_scalar_styles() {
        let fixture = "title: \"Quoted\"\nslug: 'single'\ndate: 2024-01-15T14:30:00Z\ndescription: |\n  Multi\n  line";

        let actual = StyleHints::scan(fixture);

        assert_eq!(actual.get("title").quote, Some(QuoteStyle::Double));
        assert_eq!(actual.get("slug").quote, Some(QuoteStyle::Single));
        assert_eq!(actual.get("date").quote, Some(QuoteStyle::Plain));
        assert_eq!(actual.get("description").quote, Some(QuoteStyle::Literal));
    }

    #[test]
    fn test_scan_folded_block() {
        let fixture = "description: >-\n  A long folded\n\n  text\ntitle: Hi";

        let actual = StyleHints::scan(fixture);

        let expected = BlockScalar {
            lines: vec![
                "description: >-".to_string(),
                "  A long folded".to_string(),
                String::new(),
                "  text".to_string(),
            ],
            value: "A long folded\ntext".to_string(),
        };
        assert_eq!(actual.get("description").quote, Some(QuoteStyle::Folded));
        assert_eq!(actual.block("description"), Some(&expected));
        assert_eq!(actual.block("title"), None);
    }

    #[test]
    fn test_scan_flow_and_block_sequences() {
        let fixture = "tags: [a, b]\nfaqs:\n  - question: Why?\n    answer: Because.";

        let actual = StyleHints::scan(fixture);

        assert_eq!(actual.get("tags"), KeyStyle { quote: None, flow: true });
        assert_eq!(actual.get("faqs"), KeyStyle::default());
    }

    #[test]
    fn test_scan_ignores_nested_and_comment_lines() {
        let fixture = "# title: not a key\nhead:\n  meta: [x]\n- item: no";

        let actual = StyleHints::scan(fixture);

        assert_eq!(actual.get("title"), KeyStyle::default());
        assert_eq!(actual.get("meta"), KeyStyle::default());
        assert_eq!(actual.get("item"), KeyStyle::default());
        assert_eq!(actual.get("head"), KeyStyle::default());
    }

    #[test]
    fn test_scan_quoted_keys() {
        let fixture = "\"canonical_url\": https://example.com";
        let actual = StyleHints::scan(fixture).get("canonical_url").quote;
        assert_eq!(actual, Some(QuoteStyle::Plain));
    }

    #[test]
    fn test_scan_value_with_trailing_comment() {
        let fixture = "date: 2024-01-15 # published";
        let actual = StyleHints::scan(fixture).get("date").quote;
        assert_eq!(actual, Some(QuoteStyle::Plain));
    }
}
