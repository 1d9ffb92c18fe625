use derive_setters::Setters;
use serde::{Deserialize, Serialize};

/// A markdown document as persisted in the content repository.
///
/// The frontmatter is kept as the raw YAML text found between the `---`
/// delimiters so that saving can reproduce its original layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[setters(strip_option, into)]
pub struct Document {
    /// Repository-relative path of the file
    pub path: String,

    /// Blob sha returned by the storage read, `None` for unsaved documents
    pub sha: Option<String>,

    /// Raw YAML between the delimiters, empty when the file has none
    pub frontmatter: String,

    /// Markdown following the frontmatter block
    pub body: String,
}

impl Document {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), ..Default::default() }
    }

    /// Whether the document has already been written to storage.
    pub fn is_persisted(&self) -> bool {
        self.sha.is_some()
    }
}
