use strum_macros::{Display, EnumIter};

/// Metadata fields that can be stored under more than one frontmatter key.
///
/// Different authoring tools write the same field using different naming
/// conventions. Reads accept every spelling; writes reuse whichever spelling
/// the original frontmatter already used so that saving never introduces a
/// second key for the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum VariantField {
    CanonicalUrl,
    ReadingTime,
    HeroImage,
}

impl VariantField {
    /// Every accepted key for this field, in lookup order.
    pub fn variants(self) -> &'static [&'static str] {
        match self {
            Self::CanonicalUrl => &["canonicalUrl", "canonical_url"],
            Self::ReadingTime => &["readingTime", "reading_time"],
            Self::HeroImage => &["heroImage", "hero_image", "image"],
        }
    }

    /// Key written when the original frontmatter used none of the variants.
    pub fn default_key(self) -> &'static str {
        match self {
            Self::CanonicalUrl => "canonical_url",
            Self::ReadingTime => "reading_time",
            Self::HeroImage => "image",
        }
    }

    /// Picks the key to write back given the keys present in the original
    /// frontmatter.
    pub fn resolve<'a, I>(self, existing: I) -> &'static str
    where
        I: IntoIterator<Item = &'a str>,
    {
        let existing: Vec<&str> = existing.into_iter().collect();
        self.variants()
            .iter()
            .copied()
            .find(|variant| existing.contains(variant))
            .unwrap_or_else(|| self.default_key())
    }
}
