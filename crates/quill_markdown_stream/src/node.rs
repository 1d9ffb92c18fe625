//! Structured rich content inserted into the document.
//!
//! Sizes follow the position model of tree-structured rich-text editors:
//! text counts its characters, leaf nodes count one and every other node adds
//! two for its opening and closing boundary.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Mark {
    Bold,
    Italic,
    Code,
    Strike,
    Link { href: String, title: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Inline {
    Text { text: String, marks: Vec<Mark> },
    HardBreak,
    Image { src: String, alt: String, title: Option<String> },
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into(), marks: Vec::new() }
    }

    pub fn marked(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Self::Text { text: text.into(), marks }
    }

    pub fn size(&self) -> usize {
        match self {
            Self::Text { text, .. } => text.chars().count(),
            Self::HardBreak | Self::Image { .. } => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Bullet,
    Ordered { start: u64 },
    Task,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Set for task list items
    pub checked: Option<bool>,
    pub children: Vec<Node>,
}

impl ListItem {
    pub fn size(&self) -> usize {
        2 + self.children.iter().map(Node::size).sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Node {
    Paragraph { content: Vec<Inline> },
    Heading { level: u8, content: Vec<Inline> },
    CodeBlock { language: Option<String>, code: String },
    Blockquote { children: Vec<Node> },
    List { kind: ListKind, items: Vec<ListItem> },
    HorizontalRule,
}

impl Node {
    pub fn paragraph(content: Vec<Inline>) -> Self {
        Self::Paragraph { content }
    }

    /// Markdown kept verbatim as plain text: one paragraph per blank-line
    /// separated block, with single line breaks kept as hard breaks.
    pub fn plain_text(markdown: &str) -> Vec<Node> {
        markdown
            .split("\n\n")
            .filter(|block| !block.trim().is_empty())
            .map(|block| {
                let mut content = Vec::new();
                for (index, line) in block.trim_matches('\n').split('\n').enumerate() {
                    if index > 0 {
                        content.push(Inline::HardBreak);
                    }
                    if !line.is_empty() {
                        content.push(Inline::text(line));
                    }
                }
                Node::paragraph(content)
            })
            .collect()
    }

    pub fn size(&self) -> usize {
        match self {
            Self::Paragraph { content } | Self::Heading { content, .. } => {
                2 + content.iter().map(Inline::size).sum::<usize>()
            }
            Self::CodeBlock { code, .. } => 2 + code.chars().count(),
            Self::Blockquote { children } => 2 + children.iter().map(Node::size).sum::<usize>(),
            Self::List { items, .. } => 2 + items.iter().map(ListItem::size).sum::<usize>(),
            Self::HorizontalRule => 1,
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_node(self, &mut out);
        out
    }
}

/// Total size of a node sequence.
pub fn size_of(nodes: &[Node]) -> usize {
    nodes.iter().map(Node::size).sum()
}

pub fn render_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Paragraph { content } => {
            out.push_str("<p>");
            write_inlines(content, out);
            out.push_str("</p>");
        }
        Node::Heading { level, content } => {
            out.push_str(&format!("<h{level}>"));
            write_inlines(content, out);
            out.push_str(&format!("</h{level}>"));
        }
        Node::CodeBlock { language, code } => {
            match language {
                Some(language) => {
                    out.push_str(&format!("<pre><code class=\"language-{}\">", escape(language)))
                }
                None => out.push_str("<pre><code>"),
            }
            out.push_str(&escape(code));
            out.push_str("</code></pre>");
        }
        Node::Blockquote { children } => {
            out.push_str("<blockquote>");
            children.iter().for_each(|child| write_node(child, out));
            out.push_str("</blockquote>");
        }
        Node::List { kind, items } => {
            let (open, close) = match kind {
                ListKind::Bullet => ("<ul>".to_string(), "</ul>"),
                ListKind::Ordered { start: 1 } => ("<ol>".to_string(), "</ol>"),
                ListKind::Ordered { start } => (format!("<ol start=\"{start}\">"), "</ol>"),
                ListKind::Task => ("<ul data-type=\"taskList\">".to_string(), "</ul>"),
            };
            out.push_str(&open);
            for item in items {
                match item.checked {
                    Some(checked) => out.push_str(&format!(
                        "<li data-type=\"taskItem\" data-checked=\"{checked}\">"
                    )),
                    None => out.push_str("<li>"),
                }
                item.children.iter().for_each(|child| write_node(child, out));
                out.push_str("</li>");
            }
            out.push_str(close);
        }
        Node::HorizontalRule => out.push_str("<hr>"),
    }
}

fn write_inlines(content: &[Inline], out: &mut String) {
    for inline in content {
        match inline {
            Inline::Text { text, marks } => {
                marks.iter().for_each(|mark| out.push_str(&open_mark(mark)));
                out.push_str(&escape(text));
                marks.iter().rev().for_each(|mark| out.push_str(close_mark(mark)));
            }
            Inline::HardBreak => out.push_str("<br>"),
            Inline::Image { src, alt, title } => {
                out.push_str(&format!("<img src=\"{}\" alt=\"{}\"", escape(src), escape(alt)));
                if let Some(title) = title {
                    out.push_str(&format!(" title=\"{}\"", escape(title)));
                }
                out.push('>');
            }
        }
    }
}

fn open_mark(mark: &Mark) -> String {
    match mark {
        Mark::Bold => "<strong>".to_string(),
        Mark::Italic => "<em>".to_string(),
        Mark::Code => "<code>".to_string(),
        Mark::Strike => "<s>".to_string(),
        Mark::Link { href, title: Some(title) } => {
            format!("<a href=\"{}\" title=\"{}\">", escape(href), escape(title))
        }
        Mark::Link { href, title: None } => format!("<a href=\"{}\">", escape(href)),
    }
}

fn close_mark(mark: &Mark) -> &'static str {
    match mark {
        Mark::Bold => "</strong>",
        Mark::Italic => "</em>",
        Mark::Code => "</code>",
        Mark::Strike => "</s>",
        Mark::Link { .. } => "</a>",
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
