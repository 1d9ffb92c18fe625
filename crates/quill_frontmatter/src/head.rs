//! Derived `head.meta` SEO entries.

use quill_domain::Metadata;
use serde_yml::{Mapping, Value};

use crate::merge::{remove_key, retyped};

const HEAD: &str = "head";
const META: &str = "meta";
const CONTENT: &str = "content";
const PROPERTY: &str = "property";

/// Entries mirrored from metadata, keyed by their meta property name.
fn derived_entries(metadata: &Metadata) -> [(&'static str, String); 4] {
    [
        ("twitter:image", metadata.hero_image.clone()),
        ("twitter:title", metadata.title.clone()),
        ("twitter:description", metadata.description.clone()),
        ("keywords", metadata.keywords()),
    ]
}

/// Brings the derived entries of `head.meta` in line with `metadata`.
///
/// Matching entries are updated in place, missing ones appended and entries
/// whose source value is empty removed. Entries that are not derived are left
/// alone. A `head` value that is not a mapping is never touched.
pub fn sync_head_meta(root: &mut Mapping, metadata: &Metadata) {
    let head = root
        .entry(Value::from(HEAD))
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    let Some(head) = head.as_mapping_mut() else {
        return;
    };

    let meta = head
        .entry(Value::from(META))
        .or_insert_with(|| Value::Sequence(Vec::new()));
    let Some(entries) = meta.as_sequence_mut() else {
        return;
    };

    for (property, content) in derived_entries(metadata) {
        let position = entries.iter().position(|entry| names_property(entry, property));
        match (position, content.is_empty()) {
            (Some(index), true) => {
                entries.remove(index);
            }
            (Some(index), false) => {
                if let Some(entry) = entries[index].as_mapping_mut() {
                    let value = retyped(entry.get(CONTENT), &content);
                    entry.insert(Value::from(CONTENT), value);
                }
            }
            (None, true) => {}
            (None, false) => {
                let mut entry = Mapping::new();
                entry.insert(Value::from(PROPERTY), Value::from(property));
                entry.insert(Value::from(CONTENT), Value::from(content));
                entries.push(Value::Mapping(entry));
            }
        }
    }

    if entries.is_empty() {
        remove_key(head, META);
    }
    if head.is_empty() {
        remove_key(root, HEAD);
    }
}

fn names_property(entry: &Value, property: &str) -> bool {
    entry.as_mapping().is_some_and(|mapping| {
        ["property", "name"]
            .iter()
            .any(|key| mapping.get(*key).and_then(Value::as_str) == Some(property))
    })
}
