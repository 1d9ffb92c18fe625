const DELIMITER: &str = "---";

/// A document separated into its raw frontmatter block and markdown body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    /// YAML between the delimiters, without the delimiter lines. `None` when
    /// the document has no complete frontmatter block.
    pub frontmatter: Option<&'a str>,
    pub body: &'a str,
}

/// Splits a document on its leading `---` delimited frontmatter block.
///
/// The block must open on the very first line and close on the next line
/// consisting only of `---`. A single line break following the closing
/// delimiter belongs to the layout, not to the body.
pub fn split(document: &str) -> Split<'_> {
    let document = document.strip_prefix('\u{feff}').unwrap_or(document);
    let no_frontmatter = Split { frontmatter: None, body: document };

    let Some(first_line) = document.split_inclusive('\n').next() else {
        return no_frontmatter;
    };
    if !first_line.ends_with('\n') || !is_delimiter(first_line) {
        return no_frontmatter;
    }

    let rest = &document[first_line.len()..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if is_delimiter(line) {
            let frontmatter = strip_line_break_end(&rest[..offset]);
            let body = strip_line_break_start(&rest[offset + line.len()..]);
            return Split { frontmatter: Some(frontmatter), body };
        }
        offset += line.len();
    }

    no_frontmatter
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

fn strip_line_break_end(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}

fn strip_line_break_start(text: &str) -> &str {
    text.strip_prefix("\r\n")
        .or_else(|| text.strip_prefix('\n'))
        .unwrap_or(text)
}
