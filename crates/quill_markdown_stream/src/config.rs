use derive_setters::Setters;

/// Break policy for splitting buffered markdown into segments.
///
/// All values are counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Setters)]
pub struct StreamConfig {
    /// Sentence and word breaks are only taken past this offset
    pub min_break_offset: usize,
    /// Buffered text longer than this may be cut at a sentence end
    pub sentence_threshold: usize,
    /// Buffered text longer than this may be cut at a word boundary
    pub word_threshold: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self { min_break_offset: 50, sentence_threshold: 150, word_threshold: 300 }
    }
}

impl StreamConfig {
    /// Defaults overridden by `QUILL_STREAM_*` environment variables. Values
    /// that do not parse are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(parsed) = parse_env("QUILL_STREAM_MIN_BREAK_OFFSET") {
            config.min_break_offset = parsed;
        }
        if let Some(parsed) = parse_env("QUILL_STREAM_SENTENCE_THRESHOLD") {
            config.sentence_threshold = parsed;
        }
        if let Some(parsed) = parse_env("QUILL_STREAM_WORD_THRESHOLD") {
            config.word_threshold = parsed;
        }
        config
    }
}

fn parse_env(name: &str) -> Option<usize> {
    std::env::var(name).ok().and_then(|value| parse_count(&value))
}

fn parse_count(value: &str) -> Option<usize> {
    value.trim().parse().ok()
}
