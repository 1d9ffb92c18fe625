use derive_setters::Setters;
use serde::{Deserialize, Serialize};

/// A single question/answer pair shown in an article's FAQ section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[setters(into)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

impl Faq {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self { question: question.into(), answer: answer.into() }
    }
}

/// Canonical, editor-facing projection of a document's frontmatter.
///
/// Empty strings and empty lists mean "not set": when merged back into the
/// original frontmatter such fields remove their key instead of writing an
/// empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[serde(rename_all = "camelCase")]
#[setters(into)]
pub struct Metadata {
    pub title: String,
    pub slug: String,
    pub description: String,
    /// Calendar date (`YYYY-MM-DD`). Any stored time of day is kept out of
    /// this field and restored when merging.
    pub date: String,
    pub canonical_url: String,
    pub reading_time: String,
    pub hero_image: String,
    pub tags: Vec<String>,
    pub faqs: Vec<Faq>,
    pub draft: bool,
}

impl Metadata {
    /// Lowercases and trims every tag, dropping the ones left empty.
    pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tags.into_iter()
            .map(|tag| tag.as_ref().trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect()
    }

    /// Splits a comma separated tag string and normalizes each entry.
    pub fn parse_tag_list(tags: &str) -> Vec<String> {
        Self::normalize_tags(tags.split(','))
    }

    /// Replaces the tag list, normalizing the supplied values.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = Self::normalize_tags(tags);
        self
    }

    /// Tags joined the way they appear in a `keywords` meta entry.
    pub fn keywords(&self) -> String {
        self.tags.join(", ")
    }
}
