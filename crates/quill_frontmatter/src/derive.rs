//! Values derived from a document when the author left them blank.

use quill_domain::Metadata;

const WORDS_PER_MINUTE: usize = 200;

/// URL slug for a title: lowercase ASCII alphanumerics separated by single
/// dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Minutes needed to read `body`, never less than one.
pub fn estimate_reading_time(body: &str) -> usize {
    let words = body.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

/// Fills an empty slug and reading time from the title and body. Values the
/// author set are never replaced.
pub fn fill_derived(mut metadata: Metadata, body: &str) -> Metadata {
    if metadata.slug.trim().is_empty() {
        metadata.slug = slugify(&metadata.title);
    }
    if metadata.reading_time.trim().is_empty() {
        metadata.reading_time = estimate_reading_time(body).to_string();
    }
    metadata
}
