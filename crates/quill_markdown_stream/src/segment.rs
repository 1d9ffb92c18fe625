//! Splitting of buffered markdown into segments that are safe to convert on
//! their own.
//!
//! Boundaries are tried in a fixed order: a complete fenced code block, the
//! text before a code fence, a blank line, a sentence end in long text and
//! finally a word boundary in very long text. Anything else stays buffered
//! until more input arrives.

use crate::config::StreamConfig;

/// An opening code fence: its marker character and run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    /// Parses a line that opens a fenced code block.
    fn open(line: &str) -> Option<Self> {
        let line = line.trim_end_matches('\r');
        let rest = line.trim_start_matches(' ');
        if line.len() - rest.len() > 3 {
            return None;
        }
        let marker = rest.chars().next().filter(|c| matches!(c, '`' | '~'))?;
        let len = rest.chars().take_while(|c| *c == marker).count();
        if len < 3 || (marker == '`' && rest[len..].contains('`')) {
            return None;
        }
        Some(Self { marker, len })
    }

    fn closes(&self, line: &str) -> bool {
        let trimmed = line.trim();
        let len = trimmed.chars().take_while(|c| *c == self.marker).count();
        len >= self.len && len == trimmed.len()
    }

    /// Code preceding a closing fence glued to the end of a line, as in
    /// `}```` `.
    fn split_embedded<'a>(&self, line: &'a str) -> Option<&'a str> {
        let stripped = line.trim_end().strip_suffix(self.text().as_str())?;
        (!stripped.trim().is_empty()).then_some(stripped)
    }

    fn text(&self) -> String {
        std::iter::repeat_n(self.marker, self.len).collect()
    }
}

/// Buffers streamed markdown and hands out complete segments.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    config: StreamConfig,
    buffer: String,
}

impl Segmenter {
    pub fn new(config: StreamConfig) -> Self {
        Self { config, buffer: String::new() }
    }

    /// Text received but not yet emitted.
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// Appends `text` and returns every segment that became safe to emit.
    pub fn push(&mut self, text: &str) -> Vec<String> {
        self.buffer.push_str(text);
        let mut segments = Vec::new();
        while let Some(segment) = self.next_segment() {
            if !segment.trim().is_empty() {
                segments.push(segment);
            }
        }
        segments
    }

    /// Drains the buffer at end of input, returning the final segment if any
    /// text is left.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        let rest = rest.trim_matches(|c| c == '\n' || c == '\r');
        if rest.trim().is_empty() {
            return None;
        }
        Some(close_embedded_fence(rest))
    }

    fn next_segment(&mut self) -> Option<String> {
        let skip = self.buffer.len() - self.buffer.trim_start_matches(['\n', '\r']).len();
        self.buffer.drain(..skip);
        if self.buffer.is_empty() {
            return None;
        }

        let first_line = self.buffer.split('\n').next().unwrap_or_default();
        if let Some(fence) = Fence::open(first_line) {
            return self.take_code_block(fence);
        }

        let text_end = fence_line_start(&self.buffer).unwrap_or(self.buffer.len());
        if let Some(pos) = self.buffer[..text_end].find("\n\n") {
            return Some(self.take(pos, 2));
        }
        if text_end < self.buffer.len() {
            return Some(self.take(text_end, 0));
        }
        self.take_long_text()
    }

    /// Emits the code block opening the buffer once its closing fence line is
    /// complete. Code blocks are never split.
    fn take_code_block(&mut self, fence: Fence) -> Option<String> {
        let mut offset = self.buffer.find('\n')? + 1;
        loop {
            let rest = &self.buffer[offset..];
            let line_len = rest.find('\n')?;
            if fence.closes(rest[..line_len].trim_end_matches('\r')) {
                return Some(self.take(offset + line_len, 0));
            }
            offset += line_len + 1;
        }
    }

    fn take_long_text(&mut self) -> Option<String> {
        let chars = self.buffer.chars().count();
        if chars <= self.config.sentence_threshold {
            return None;
        }
        let min_offset = self.config.min_break_offset;
        if let Some(period) = sentence_break(&self.buffer, min_offset) {
            return Some(self.take(period + 1, 1));
        }
        if chars <= self.config.word_threshold {
            return None;
        }
        let space = word_break(&self.buffer, min_offset)?;
        Some(self.take(space, 1))
    }

    /// Removes `end + skip` bytes from the buffer and returns the first `end`
    /// of them without trailing line breaks.
    fn take(&mut self, end: usize, skip: usize) -> String {
        let segment = self.buffer[..end].trim_end_matches(['\n', '\r']).to_string();
        self.buffer.drain(..end + skip);
        segment
    }
}

/// Byte offset of the first line after the first one that opens a fence.
fn fence_line_start(text: &str) -> Option<usize> {
    text.match_indices('\n').map(|(index, _)| index + 1).find(|&start| {
        let line = text[start..].split('\n').next().unwrap_or_default();
        Fence::open(line).is_some()
    })
}

/// Byte offset of the period of the last `". "` past `min_offset` chars.
fn sentence_break(text: &str, min_offset: usize) -> Option<usize> {
    text.rmatch_indices(". ")
        .map(|(index, _)| index)
        .next()
        .filter(|&index| char_offset(text, index) > min_offset)
}

fn word_break(text: &str, min_offset: usize) -> Option<usize> {
    text.rfind(' ')
        .filter(|&index| char_offset(text, index) > min_offset)
}

fn char_offset(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}

/// Repairs a code block that never got a closing fence line by moving a
/// fence glued to the end of its last such line, as in `}```` `, onto a line
/// of its own. Text after that line is kept after the block.
fn close_embedded_fence(text: &str) -> String {
    let mut lines = text.split('\n');
    let Some(fence) = lines.next().and_then(Fence::open) else {
        return text.to_string();
    };
    if lines.any(|line| fence.closes(line)) {
        return text.to_string();
    }

    let glued = text
        .match_indices('\n')
        .map(|(index, _)| index + 1)
        .filter_map(|start| {
            let line = text[start..].split('\n').next().unwrap_or_default();
            fence.split_embedded(line).map(|code| (start, line.len(), code))
        })
        .last();
    let Some((start, len, code)) = glued else {
        return text.to_string();
    };

    let mut repaired = format!("{}{code}\n{}", &text[..start], fence.text());
    repaired.push_str(&text[start + len..]);
    repaired
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn segmenter() -> Segmenter {
        Segmenter::new(StreamConfig::default())
    }

    fn push_all(pieces: &[&str]) -> (Vec<String>, Segmenter) {
        let mut segmenter = segmenter();
        let segments = pieces.iter().flat_map(|piece| segmenter.push(piece)).collect();
        (segments, segmenter)
    }

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        let (actual, segmenter) = push_all(&["First para", "graph.\n\nSecond.\n", "\nThird"]);

        let expected = vec!["First paragraph.", "Second."];
        assert_eq!(actual, expected);
        assert_eq!(segmenter.buffered(), "Third");
    }

    #[test]
    fn test_code_block_is_never_split() {
        let fixture = ["```rust\nfn a() {}\n", "\n\nfn b() {}\n", "``", "`\nAfter"];

        let (actual, segmenter) = push_all(&fixture);

        let expected = vec!["```rust\nfn a() {}\n\n\nfn b() {}\n```"];
        assert_eq!(actual, expected);
        assert_eq!(segmenter.buffered(), "After");
    }

    #[test]
    fn test_open_code_block_holds_long_content() {
        let fixture = format!("```\n{}", "word. ".repeat(100));
        let (actual, _) = push_all(&[&fixture]);
        assert!(actual.is_empty());
    }

    #[test]
    fn test_incomplete_opening_fence_holds() {
        let (actual, segmenter) = push_all(&["```ru"]);
        assert!(actual.is_empty());
        assert_eq!(segmenter.buffered(), "```ru");
    }

    #[test]
    fn test_text_before_fence_is_emitted() {
        let (actual, _) = push_all(&["Intro:\n```js\nx\n```\n"]);
        let expected = vec!["Intro:", "```js\nx\n```"];
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_tilde_fence_needs_matching_marker() {
        let (actual, _) = push_all(&["~~~~\n```\nstill code\n~~~~\n"]);
        let expected = vec!["~~~~\n```\nstill code\n~~~~"];
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_code_line_ending_in_fence_text_stays_code() {
        let (actual, segmenter) = push_all(&["```sh\necho ```\nmore", " code\n```\n"]);

        let expected = vec!["```sh\necho ```\nmore code\n```"];
        assert_eq!(actual, expected);
        assert_eq!(segmenter.buffered(), "");
    }

    #[test]
    fn test_glued_fence_waits_for_end_of_input() {
        let mut fixture = segmenter();

        let pushed = fixture.push("```rust\nfn main() {}```\nAfter");
        let actual = fixture.finish();

        assert!(pushed.is_empty());
        assert_eq!(actual.as_deref(), Some("```rust\nfn main() {}\n```\nAfter"));
    }

    #[test]
    fn test_long_text_breaks_after_sentence() {
        let fixture = format!("{}. {}", "word ".repeat(12).trim_end(), "more ".repeat(20));

        let (actual, segmenter) = push_all(&[&fixture]);

        let expected = vec![format!("{}.", "word ".repeat(12).trim_end())];
        assert_eq!(actual, expected);
        assert_eq!(segmenter.buffered(), "more ".repeat(20));
    }

    #[test]
    fn test_sentence_before_min_offset_is_ignored() {
        let fixture = format!("Hi. {}", "word ".repeat(30));
        let (actual, _) = push_all(&[&fixture]);
        assert!(actual.is_empty());
    }

    #[test]
    fn test_very_long_text_breaks_at_word() {
        let fixture = format!("{}tail", "abcd ".repeat(63));

        let (actual, segmenter) = push_all(&[&fixture]);

        let expected = vec!["abcd ".repeat(63).trim_end().to_string()];
        assert_eq!(actual, expected);
        assert_eq!(segmenter.buffered(), "tail");
    }

    #[test]
    fn test_thresholds_count_chars_not_bytes() {
        let fixture = format!("{}. {}", "é".repeat(60), "é".repeat(78));
        let (actual, _) = push_all(&[&fixture]);
        assert!(actual.is_empty());
    }

    #[test]
    fn test_custom_thresholds() {
        let config = StreamConfig::default()
            .min_break_offset(5usize)
            .sentence_threshold(20usize);
        let mut segmenter = Segmenter::new(config);

        let actual = segmenter.push("One sentence here. And another one");

        assert_eq!(actual, vec!["One sentence here."]);
    }

    #[test]
    fn test_finish_returns_remainder() {
        let mut fixture = segmenter();
        fixture.push("\n\nTrailing text\n");

        let actual = fixture.finish();

        assert_eq!(actual.as_deref(), Some("Trailing text"));
        assert_eq!(fixture.finish(), None);
    }

    #[test]
    fn test_finish_closes_embedded_fence() {
        let mut fixture = segmenter();
        fixture.push("```rust\nlet x = 1;\nx```");

        let actual = fixture.finish();

        assert_eq!(actual.as_deref(), Some("```rust\nlet x = 1;\nx\n```"));
    }

    #[test]
    fn test_finish_keeps_block_with_real_closing_fence() {
        let mut fixture = segmenter();
        fixture.push("```\nx```\n```");

        let actual = fixture.finish();

        assert_eq!(actual.as_deref(), Some("```\nx```\n```"));
    }

    #[test]
    fn test_fence_detection() {
        assert_eq!(Fence::open("```rust"), Some(Fence { marker: '`', len: 3 }));
        assert_eq!(Fence::open("   ~~~~"), Some(Fence { marker: '~', len: 4 }));
        assert_eq!(Fence::open("    ```"), None);
        assert_eq!(Fence::open("``"), None);
        assert_eq!(Fence::open("``` a`b"), None);
    }
}
