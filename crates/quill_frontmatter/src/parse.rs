use quill_domain::{Faq, Metadata, VariantField};
use serde_yml::{Mapping, Value};

use crate::date;
use crate::error::{Error, Result};
use crate::split::{Split, split};

/// Result of reading a document: the metadata projection, the markdown
/// body and the untouched frontmatter text needed to merge edits back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    pub metadata: Metadata,
    pub body: String,
    /// YAML between the delimiters exactly as stored, empty when absent
    pub raw_frontmatter: String,
    /// Time of day stripped from the stored date, if it had one
    pub date_time: Option<String>,
}

/// Splits a document and projects its frontmatter onto [`Metadata`].
///
/// Malformed YAML never fails the read: the metadata falls back to its
/// defaults and merging later regenerates the block from scratch.
pub fn parse(document: &str) -> ParsedDocument {
    let Split { frontmatter, body } = split(document);
    let Some(raw) = frontmatter else {
        return ParsedDocument { body: body.to_string(), ..Default::default() };
    };

    let mut parsed = ParsedDocument {
        body: body.to_string(),
        raw_frontmatter: raw.to_string(),
        ..Default::default()
    };

    match parse_mapping(raw) {
        Ok(mapping) => {
            let (metadata, date_time) = project(&mapping);
            parsed.metadata = metadata;
            parsed.date_time = date_time;
        }
        Err(error) => {
            tracing::warn!(error = %error, "Ignoring malformed frontmatter");
        }
    }

    parsed
}

/// Parses frontmatter text into its top-level mapping.
pub(crate) fn parse_mapping(frontmatter: &str) -> Result<Mapping> {
    if frontmatter.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yml::from_str::<Value>(frontmatter)? {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        Value::Bool(_) => Err(Error::NotAMapping("a boolean")),
        Value::Number(_) => Err(Error::NotAMapping("a number")),
        Value::String(_) => Err(Error::NotAMapping("a string")),
        Value::Sequence(_) => Err(Error::NotAMapping("a sequence")),
        Value::Tagged(_) => Err(Error::NotAMapping("a tagged value")),
    }
}

fn project(mapping: &Mapping) -> (Metadata, Option<String>) {
    let stored_date = mapping.get("date").map(scalar_text).unwrap_or_default();
    let (date, time) = date::split_stored(&stored_date);

    let metadata = Metadata {
        title: mapping.get("title").map(scalar_text).unwrap_or_default(),
        slug: mapping.get("slug").map(scalar_text).unwrap_or_default(),
        description: mapping.get("description").map(scalar_text).unwrap_or_default(),
        date: date.to_string(),
        canonical_url: variant_text(mapping, VariantField::CanonicalUrl),
        reading_time: variant_text(mapping, VariantField::ReadingTime),
        hero_image: variant_text(mapping, VariantField::HeroImage),
        tags: mapping.get("tags").map(tags_of).unwrap_or_default(),
        faqs: mapping.get("faqs").map(faqs_of).unwrap_or_default(),
        draft: mapping.get("draft").is_some_and(flag_of),
    };

    (metadata, time.map(str::to_string))
}

/// Text of a scalar value; collections and nulls read as empty.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => String::new(),
    }
}

fn variant_text(mapping: &Mapping, field: VariantField) -> String {
    field
        .variants()
        .iter()
        .filter_map(|key| mapping.get(*key))
        .find(|value| !value.is_null())
        .map(scalar_text)
        .unwrap_or_default()
}

/// Normalized tags from either a sequence or a comma separated string.
pub(crate) fn tags_of(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => Metadata::normalize_tags(items.iter().map(scalar_text)),
        Value::String(text) => Metadata::parse_tag_list(text),
        _ => Vec::new(),
    }
}

pub(crate) fn faqs_of(value: &Value) -> Vec<Faq> {
    let Some(items) = value.as_sequence() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_mapping)
        .map(|entry| {
            Faq::new(
                entry.get("question").map(scalar_text).unwrap_or_default(),
                entry.get("answer").map(scalar_text).unwrap_or_default(),
            )
        })
        .collect()
}

pub(crate) fn flag_of(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => text.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}
