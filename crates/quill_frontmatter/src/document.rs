use quill_domain::{ContentUpdate, Document, Metadata, RemoteFile};

use crate::config::ReconcileOptions;
use crate::merge::merge_with;
use crate::parse::parse;

/// Builds the full document text persisted for `metadata` and `body`.
///
/// `original` is the frontmatter text the document was loaded with, used to
/// preserve everything the metadata does not own.
pub fn combine(metadata: &Metadata, body: &str, original: &str) -> String {
    combine_with(metadata, body, original, &ReconcileOptions::default())
}

pub fn combine_with(
    metadata: &Metadata,
    body: &str,
    original: &str,
    options: &ReconcileOptions,
) -> String {
    let frontmatter = merge_with(original, metadata, options);
    format!("---\n{frontmatter}\n---\n\n{body}")
}

/// Frontmatter-aware constructors and writers for [`Document`].
pub trait DocumentExt: Sized {
    /// Splits document text into a [`Document`] and its metadata projection.
    fn from_content(path: impl Into<String>, sha: Option<String>, content: &str) -> (Self, Metadata);

    /// Decodes a file read from the content repository.
    fn from_remote(file: &RemoteFile) -> quill_domain::Result<(Self, Metadata)>;

    /// Full text to persist after editing `metadata`.
    fn to_content(&self, metadata: &Metadata) -> String;

    /// Write request for the edited document, carrying the sha when the
    /// document already exists in storage.
    fn to_update(&self, metadata: &Metadata, message: impl Into<String>) -> ContentUpdate;
}

impl DocumentExt for Document {
    fn from_content(path: impl Into<String>, sha: Option<String>, content: &str) -> (Self, Metadata) {
        let parsed = parse(content);
        let document = Document {
            path: path.into(),
            sha,
            frontmatter: parsed.raw_frontmatter,
            body: parsed.body,
        };
        (document, parsed.metadata)
    }

    fn from_remote(file: &RemoteFile) -> quill_domain::Result<(Self, Metadata)> {
        let content = file.decode_content()?;
        Ok(Self::from_content(file.path.clone(), Some(file.sha.clone()), &content))
    }

    fn to_content(&self, metadata: &Metadata) -> String {
        combine(metadata, &self.body, &self.frontmatter)
    }

    fn to_update(&self, metadata: &Metadata, message: impl Into<String>) -> ContentUpdate {
        let update = ContentUpdate::new(self.path.clone(), self.to_content(metadata), message);
        match &self.sha {
            Some(sha) => update.sha(sha.clone()),
            None => update,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_combine_layout() {
        let fixture = Metadata::default().title("Hello");
        let actual = combine(&fixture, "Body.", "title: Old");
        assert_eq!(actual, "---\ntitle: Hello\n---\n\nBody.");
    }

    #[test]
    fn test_combine_without_original_generates() {
        let fixture = Metadata::default().title("Hello");
        let actual = combine(&fixture, "Body.", "");
        assert_eq!(actual, "---\ntitle: Hello\ndraft: false\nhead:\n  meta:\n    - property: twitter:title\n      content: Hello\n---\n\nBody.");
    }

    #[test]
    fn test_from_remote() {
        let fixture = RemoteFile::new("posts/hello.md", "abc123", "LS0tCnRpdGxlOiBIZWxs\nbwotLS0KCkJvZHku\n");

        let (document, metadata) = Document::from_remote(&fixture).unwrap();

        let expected = Document::new("posts/hello.md")
            .sha("abc123")
            .frontmatter("title: Hello")
            .body("Body.");
        assert_eq!(document, expected);
        assert_eq!(metadata, Metadata::default().title("Hello"));
    }

    #[test]
    fn test_to_update_for_existing_document() {
        let (document, metadata) = Document::from_content(
            "posts/hello.md",
            Some("abc123".to_string()),
            "---\ntitle: Hello\nid: 42\n---\n\nBody.",
        );

        let actual = document.to_update(&metadata.title("Hi"), "Update hello");

        let expected = ContentUpdate::new(
            "posts/hello.md",
            "---\ntitle: Hi\nid: 42\n---\n\nBody.",
            "Update hello",
        )
        .sha("abc123");
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_to_update_for_new_document() {
        let (document, metadata) = Document::from_content("posts/new.md", None, "Just a body.");

        let actual = document.to_update(&metadata.title("New"), "Create new");

        assert_eq!(actual.sha, None);
        assert!(actual.content.starts_with("---\ntitle: New\n"));
        assert!(actual.content.ends_with("\n---\n\nJust a body."));
    }
}
