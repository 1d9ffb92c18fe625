//! Incremental markdown to rich content streaming.
//!
//! Markdown arrives in arbitrary chunks (typically from a model response).
//! A [`StreamSession`] buffers the text, cuts it into segments that can be
//! converted on their own without breaking constructs such as fenced code
//! blocks, converts each segment to [`Node`]s and inserts them into a
//! [`RichDocument`] at an insertion cursor that advances by the exact size
//! each insertion added.
//!
//! ```
//! use quill_markdown_stream::{InsertMode, NodeDocument, StreamSession};
//!
//! let mut session = StreamSession::new(NodeDocument::new(), InsertMode::ReplaceAll);
//! session.process_chunk("# Hello\n\nWor").unwrap();
//! session.process_chunk("ld").unwrap();
//! session.flush().unwrap();
//!
//! assert_eq!(session.document().to_html(), "<h1>Hello</h1><p>World</p>");
//! ```

mod config;
mod convert;
mod document;
mod drive;
mod error;
mod event;
mod node;
mod segment;
mod session;

pub use config::StreamConfig;
pub use convert::{Converter, MarkdownConverter};
pub use document::{NodeDocument, RichDocument};
pub use drive::drive;
pub use error::{Error, Result};
pub use event::{StreamEvent, chunk_text, decode_events};
pub use node::{Inline, ListItem, ListKind, Mark, Node, render_html, size_of};
pub use segment::Segmenter;
pub use session::{InsertMode, Insertion, StreamSession, StreamStatus};
