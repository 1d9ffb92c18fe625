use quill_domain::{Faq, Metadata, VariantField};
use serde_yml::{Mapping, Value};

use crate::config::ReconcileOptions;
use crate::date;
use crate::emit::to_yaml;
use crate::error::Result;
use crate::head::sync_head_meta;
use crate::parse::{faqs_of, flag_of, parse_mapping, scalar_text, tags_of};
use crate::style::StyleHints;

/// Writes `metadata` back into `original` frontmatter text using the default
/// [`ReconcileOptions`].
pub fn merge(original: &str, metadata: &Metadata) -> String {
    merge_with(original, metadata, &ReconcileOptions::default())
}

/// Writes `metadata` back into `original` frontmatter text.
///
/// Keys not owned by [`Metadata`] survive untouched, recognised keys keep
/// their position, naming variant and quoting, and empty metadata fields
/// remove their key. An empty original, or one that cannot be reconciled,
/// yields freshly generated frontmatter instead.
pub fn merge_with(original: &str, metadata: &Metadata, options: &ReconcileOptions) -> String {
    if original.trim().is_empty() {
        return generate_with(metadata, options);
    }
    match reconcile(original, metadata, options) {
        Ok(yaml) => yaml,
        Err(error) => {
            tracing::warn!(error = %error, "Regenerating frontmatter after merge failure");
            generate_with(metadata, options)
        }
    }
}

/// Generates frontmatter from `metadata` alone using the default options.
pub fn generate(metadata: &Metadata) -> String {
    generate_with(metadata, &ReconcileOptions::default())
}

fn generate_with(metadata: &Metadata, options: &ReconcileOptions) -> String {
    let mut root = Mapping::new();
    insert_text(&mut root, "title", &metadata.title);
    insert_text(&mut root, "slug", &metadata.slug);
    insert_text(&mut root, "description", &metadata.description);
    if !metadata.date.trim().is_empty() {
        let value = date::resolve(&metadata.date, None, &options.default_time);
        root.insert(Value::from("date"), Value::from(value));
    }
    insert_text(&mut root, VariantField::CanonicalUrl.default_key(), &metadata.canonical_url);
    if let Some(value) = reading_time_value(None, &metadata.reading_time) {
        root.insert(Value::from(VariantField::ReadingTime.default_key()), value);
    }
    insert_text(&mut root, VariantField::HeroImage.default_key(), &metadata.hero_image);
    if !metadata.tags.is_empty() {
        root.insert(Value::from("tags"), tag_sequence(&metadata.tags));
    }
    if !metadata.faqs.is_empty() {
        root.insert(Value::from("faqs"), faq_sequence(&metadata.faqs, &[]));
    }
    root.insert(Value::from("draft"), Value::Bool(metadata.draft));
    sync_head_meta(&mut root, metadata);

    to_yaml(&root, &StyleHints::default()).unwrap_or_else(|error| {
        tracing::warn!(error = %error, "Failed to serialize generated frontmatter");
        String::new()
    })
}

fn reconcile(original: &str, metadata: &Metadata, options: &ReconcileOptions) -> Result<String> {
    let mut root = parse_mapping(original)?;
    let hints = StyleHints::scan(original);

    apply(&mut root, metadata, options);
    // Only documents that already carry a head block get derived entries, so
    // plain frontmatter is not expanded on every save.
    if root.contains_key("head") {
        sync_head_meta(&mut root, metadata);
    }

    to_yaml(&root, &hints)
}

fn apply(root: &mut Mapping, metadata: &Metadata, options: &ReconcileOptions) {
    set_text(root, "title", &metadata.title);
    set_text(root, "slug", &metadata.slug);
    set_text(root, "description", &metadata.description);
    apply_date(root, &metadata.date, options);

    let keys: Vec<String> = root
        .iter()
        .filter_map(|(key, _)| key.as_str().map(str::to_string))
        .collect();
    let resolve = |field: VariantField| field.resolve(keys.iter().map(String::as_str));

    set_text(root, resolve(VariantField::CanonicalUrl), &metadata.canonical_url);
    let reading_key = resolve(VariantField::ReadingTime);
    match reading_time_value(root.get(reading_key), &metadata.reading_time) {
        Some(value) => {
            root.insert(Value::from(reading_key), value);
        }
        None => remove_key(root, reading_key),
    }
    set_text(root, resolve(VariantField::HeroImage), &metadata.hero_image);

    apply_tags(root, &metadata.tags);
    apply_faqs(root, &metadata.faqs);
    apply_draft(root, metadata.draft);
}

fn apply_date(root: &mut Mapping, edited: &str, options: &ReconcileOptions) {
    if edited.trim().is_empty() {
        remove_key(root, "date");
        return;
    }
    let stored = root.get("date").map(scalar_text).unwrap_or_default();
    let (_, time) = date::split_stored(&stored);
    let resolved = date::resolve(edited, time, &options.default_time);
    let value = retyped(root.get("date"), &resolved);
    root.insert(Value::from("date"), value);
}

fn apply_tags(root: &mut Mapping, tags: &[String]) {
    if tags.is_empty() {
        remove_key(root, "tags");
        return;
    }
    let value = match root.get("tags") {
        // Unchanged after normalization: keep the original spelling
        Some(existing) if tags_of(existing) == tags => return,
        Some(Value::String(_)) => Value::from(tags.join(", ")),
        _ => tag_sequence(tags),
    };
    root.insert(Value::from("tags"), value);
}

fn apply_faqs(root: &mut Mapping, faqs: &[Faq]) {
    if faqs.is_empty() {
        remove_key(root, "faqs");
        return;
    }
    let previous = match root.get("faqs") {
        Some(existing) if faqs_of(existing) == faqs => return,
        Some(existing) => existing.as_sequence().cloned().unwrap_or_default(),
        None => Vec::new(),
    };
    root.insert(Value::from("faqs"), faq_sequence(faqs, &previous));
}

fn apply_draft(root: &mut Mapping, draft: bool) {
    let value = match root.get("draft") {
        Some(existing) if flag_of(existing) == draft => return,
        Some(_) => Value::Bool(draft),
        None if draft => Value::Bool(true),
        None => return,
    };
    root.insert(Value::from("draft"), value);
}

fn tag_sequence(tags: &[String]) -> Value {
    Value::Sequence(tags.iter().map(|tag| Value::from(tag.as_str())).collect())
}

/// FAQ entries, reusing the mapping at the same index in `previous` so that
/// extra keys on an entry survive edits.
fn faq_sequence(faqs: &[Faq], previous: &[Value]) -> Value {
    let items = faqs
        .iter()
        .enumerate()
        .map(|(index, faq)| {
            let mut entry = previous
                .get(index)
                .and_then(Value::as_mapping)
                .cloned()
                .unwrap_or_default();
            let question = retyped(entry.get("question"), &faq.question);
            let answer = retyped(entry.get("answer"), &faq.answer);
            entry.insert(Value::from("question"), question);
            entry.insert(Value::from("answer"), answer);
            Value::Mapping(entry)
        })
        .collect();
    Value::Sequence(items)
}

/// Reading time is stored as a number whenever the text is one, unless the
/// original stored it as a string.
fn reading_time_value(existing: Option<&Value>, text: &str) -> Option<Value> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let value = match (existing, text.parse::<u64>()) {
        (None, Ok(minutes)) => Value::Number(minutes.into()),
        _ => retyped(existing, text),
    };
    Some(value)
}

fn insert_text(root: &mut Mapping, key: &str, text: &str) {
    if !text.trim().is_empty() {
        root.insert(Value::from(key), Value::from(text));
    }
}

fn set_text(root: &mut Mapping, key: &str, text: &str) {
    if text.trim().is_empty() {
        remove_key(root, key);
        return;
    }
    let value = retyped(root.get(key), text);
    root.insert(Value::from(key), value);
}

/// Value to store for `text`, keeping the existing value (and therefore its
/// scalar type) when it already reads as the same text.
pub(crate) fn retyped(existing: Option<&Value>, text: &str) -> Value {
    match existing {
        Some(value @ (Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Tagged(_)))
            if scalar_text(value) == text =>
        {
            value.clone()
        }
        Some(Value::Number(_)) => text
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::from(text)),
        _ => Value::from(text),
    }
}

/// Removes `key` while keeping the order of the remaining entries.
pub(crate) fn remove_key(mapping: &mut Mapping, key: &str) {
    if mapping.contains_key(key) {
        *mapping = std::mem::take(mapping)
            .into_iter()
            .filter(|(existing, _)| existing.as_str() != Some(key))
            .collect();
    }
}
