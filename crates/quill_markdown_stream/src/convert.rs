use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::error::{Error, Result};
use crate::node::{Inline, ListItem, ListKind, Mark, Node};

/// Turns a markdown segment into rich content nodes.
pub trait Converter {
    fn convert(&self, markdown: &str) -> Result<Vec<Node>>;
}

/// CommonMark converter with strikethrough and task lists enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownConverter;

impl Converter for MarkdownConverter {
    fn convert(&self, markdown: &str) -> Result<Vec<Node>> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut builder = TreeBuilder::default();
        for event in Parser::new_ext(markdown, options) {
            builder.event(event)?;
        }
        let nodes = builder.finish();

        if nodes.is_empty() && !markdown.trim().is_empty() {
            return Err(Error::EmptyConversion);
        }
        Ok(nodes)
    }
}

/// A container still being filled by parser events.
enum Frame {
    Paragraph(Vec<Inline>),
    Heading(u8, Vec<Inline>),
    Code(Option<String>, String),
    Blockquote(Vec<Node>),
    List(Option<u64>, Vec<ListItem>),
    Item(ListItem, Vec<Inline>),
}

struct PendingImage {
    src: String,
    title: Option<String>,
    alt: String,
}

#[derive(Default)]
struct TreeBuilder {
    frames: Vec<Frame>,
    marks: Vec<Mark>,
    image: Option<PendingImage>,
    root: Vec<Node>,
}

impl TreeBuilder {
    fn event(&mut self, event: Event<'_>) -> Result<()> {
        match event {
            Event::Start(tag) => self.start(tag)?,
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                let mut marks = self.marks.clone();
                marks.push(Mark::Code);
                self.push_inline(Inline::marked(code.to_string(), marks));
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                return Err(Error::UnsupportedHtml(html.trim().to_string()));
            }
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => self.push_inline(Inline::HardBreak),
            Event::Rule => self.push_node(Node::HorizontalRule),
            Event::TaskListMarker(checked) => {
                // Loose items carry the marker inside their paragraph
                let item = self.frames.iter_mut().rev().find_map(|frame| match frame {
                    Frame::Item(item, _) => Some(item),
                    _ => None,
                });
                if let Some(item) = item {
                    item.checked = Some(checked);
                }
            }
            Event::FootnoteReference(text) | Event::InlineMath(text) | Event::DisplayMath(text) => {
                self.text(&text)
            }
        }
        Ok(())
    }

    fn start(&mut self, tag: Tag<'_>) -> Result<()> {
        match tag {
            Tag::Paragraph => self.frames.push(Frame::Paragraph(Vec::new())),
            Tag::Heading { level, .. } => {
                self.frames.push(Frame::Heading(heading_level(level), Vec::new()))
            }
            Tag::BlockQuote(_) => self.frames.push(Frame::Blockquote(Vec::new())),
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.frames.push(Frame::Code(language, String::new()));
            }
            Tag::List(start) => self.frames.push(Frame::List(start, Vec::new())),
            Tag::Item => self.frames.push(Frame::Item(ListItem::default(), Vec::new())),
            Tag::Emphasis => self.marks.push(Mark::Italic),
            Tag::Strong => self.marks.push(Mark::Bold),
            Tag::Strikethrough => self.marks.push(Mark::Strike),
            Tag::Link { dest_url, title, .. } => self.marks.push(Mark::Link {
                href: dest_url.to_string(),
                title: (!title.is_empty()).then(|| title.to_string()),
            }),
            Tag::Image { dest_url, title, .. } => {
                self.image = Some(PendingImage {
                    src: dest_url.to_string(),
                    title: (!title.is_empty()).then(|| title.to_string()),
                    alt: String::new(),
                });
            }
            Tag::HtmlBlock => return Err(Error::UnsupportedHtml("block".to_string())),
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::BlockQuote(_) | TagEnd::CodeBlock => {
                if let Some(node) = self.frames.pop().and_then(close_block) {
                    self.push_node(node);
                }
            }
            TagEnd::List(_) => {
                if let Some(Frame::List(start, items)) = self.frames.pop() {
                    let kind = if items.iter().any(|item| item.checked.is_some()) {
                        ListKind::Task
                    } else {
                        start.map_or(ListKind::Bullet, |start| ListKind::Ordered { start })
                    };
                    self.push_node(Node::List { kind, items });
                }
            }
            TagEnd::Item => {
                if let Some(Frame::Item(mut item, loose)) = self.frames.pop() {
                    if !loose.is_empty() {
                        item.children.push(Node::paragraph(loose));
                    }
                    if let Some(Frame::List(_, items)) = self.frames.last_mut() {
                        items.push(item);
                    }
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.marks.pop();
            }
            TagEnd::Image => {
                if let Some(image) = self.image.take() {
                    self.push_inline(Inline::Image {
                        src: image.src,
                        alt: image.alt,
                        title: image.title,
                    });
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(image) = self.image.as_mut() {
            image.alt.push_str(text);
            return;
        }
        if let Some(Frame::Code(_, code)) = self.frames.last_mut() {
            code.push_str(text);
            return;
        }
        self.push_inline(Inline::marked(text, self.marks.clone()));
    }

    /// Adds inline content to the innermost text container, joining it with
    /// a preceding text run that carries the same marks.
    fn push_inline(&mut self, inline: Inline) {
        let content = match self.frames.last_mut() {
            Some(Frame::Paragraph(content) | Frame::Heading(_, content) | Frame::Item(_, content)) => {
                content
            }
            _ => {
                self.push_node(Node::paragraph(vec![inline]));
                return;
            }
        };
        if let (Some(Inline::Text { text, marks }), Inline::Text { text: next, marks: next_marks }) =
            (content.last_mut(), &inline)
            && marks == next_marks
        {
            text.push_str(next);
            return;
        }
        content.push(inline);
    }

    fn push_node(&mut self, node: Node) {
        match self.frames.last_mut() {
            Some(Frame::Blockquote(children)) => children.push(node),
            Some(Frame::Item(item, loose)) => {
                if !loose.is_empty() {
                    item.children.push(Node::paragraph(std::mem::take(loose)));
                }
                item.children.push(node);
            }
            _ => self.root.push(node),
        }
    }

    fn finish(self) -> Vec<Node> {
        self.root
    }
}

fn close_block(frame: Frame) -> Option<Node> {
    match frame {
        Frame::Paragraph(content) => Some(Node::Paragraph { content }),
        Frame::Heading(level, content) => Some(Node::Heading { level, content }),
        Frame::Code(language, code) => {
            let code = code.strip_suffix('\n').map(str::to_string).unwrap_or(code);
            Some(Node::CodeBlock { language, code })
        }
        Frame::Blockquote(children) => Some(Node::Blockquote { children }),
        Frame::List(..) | Frame::Item(..) => None,
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
