use derive_setters::Setters;

/// Tunables for writing metadata back into frontmatter.
#[derive(Debug, Clone, PartialEq, Eq, Setters)]
#[setters(into)]
pub struct ReconcileOptions {
    /// Time of day attached to a bare calendar date when the original
    /// frontmatter carried no time of its own.
    pub default_time: String,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self { default_time: "10:00:00Z".to_string() }
    }
}
