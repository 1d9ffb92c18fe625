use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tokio_util::sync::CancellationToken;

use crate::config::StreamConfig;
use crate::convert::{Converter, MarkdownConverter};
use crate::document::RichDocument;
use crate::error::Result;
use crate::node::Node;
use crate::segment::Segmenter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StreamStatus {
    Idle,
    Streaming,
    Completed,
    Aborted,
    Errored,
}

impl StreamStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted | Self::Errored)
    }
}

/// Where streamed content goes when the first chunk arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertMode {
    /// Clear the document and write from the start
    #[default]
    ReplaceAll,
    /// Delete the selection and write where it started
    ReplaceSelection { from: usize, to: usize },
    /// Write after the existing content
    Append,
}

/// One converted segment written into the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub position: usize,
    pub size: usize,
    /// The segment was inserted as plain text after conversion failed
    pub plain_text: bool,
}

/// Streams markdown chunks into a [`RichDocument`].
///
/// Chunks are buffered until a segment is safe to convert, then each segment
/// is converted and inserted at the insertion cursor, which advances by
/// exactly the size the document grew by.
pub struct StreamSession<D, C = MarkdownConverter> {
    document: D,
    converter: C,
    segmenter: Segmenter,
    mode: InsertMode,
    status: StreamStatus,
    cursor: usize,
    insertions: Vec<Insertion>,
    cancel: CancellationToken,
    error: Option<String>,
}

impl<D: RichDocument> StreamSession<D> {
    pub fn new(document: D, mode: InsertMode) -> Self {
        Self::with_converter(document, MarkdownConverter, mode, StreamConfig::default())
    }
}

impl<D: RichDocument, C: Converter> StreamSession<D, C> {
    pub fn with_converter(document: D, converter: C, mode: InsertMode, config: StreamConfig) -> Self {
        Self {
            document,
            converter,
            segmenter: Segmenter::new(config),
            mode,
            status: StreamStatus::Idle,
            cursor: 0,
            insertions: Vec::new(),
            cancel: CancellationToken::new(),
            error: None,
        }
    }

    pub fn status(&self) -> StreamStatus {
        self.status
    }

    /// Position the next segment will be inserted at.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insertions(&self) -> &[Insertion] {
        &self.insertions
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn into_document(self) -> D {
        self.document
    }

    /// Message of the error event that ended the stream, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Token that aborts the session when cancelled, usable from other tasks.
    pub fn abort_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Buffers `text` and inserts every segment that became complete.
    pub fn process_chunk(&mut self, text: &str) -> Result<()> {
        if !self.accepts_input() {
            tracing::warn!(status = %self.status, "Ignoring chunk after stream ended");
            return Ok(());
        }
        if self.status == StreamStatus::Idle {
            self.begin()?;
        }
        for segment in self.segmenter.push(text) {
            if !self.accepts_input() {
                break;
            }
            self.insert_segment(&segment)?;
        }
        Ok(())
    }

    /// Inserts whatever is still buffered and completes the stream.
    pub fn flush(&mut self) -> Result<()> {
        if !self.accepts_input() {
            return Ok(());
        }
        self.drain()?;
        self.status = StreamStatus::Completed;
        tracing::debug!(cursor = self.cursor, "Stream completed");
        Ok(())
    }

    /// Stops the stream. Buffered and future chunks are discarded.
    pub fn abort(&mut self) {
        self.cancel.cancel();
        if !self.status.is_finished() {
            tracing::debug!(cursor = self.cursor, "Stream aborted");
            self.status = StreamStatus::Aborted;
        }
    }

    /// Ends the stream after a remote failure, keeping what was received.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<()> {
        if !self.accepts_input() {
            return Ok(());
        }
        let message = message.into();
        tracing::warn!(error = %message, "Stream failed");
        self.drain()?;
        self.status = StreamStatus::Errored;
        self.error = Some(message);
        Ok(())
    }

    fn accepts_input(&mut self) -> bool {
        if self.cancel.is_cancelled() && !self.status.is_finished() {
            self.status = StreamStatus::Aborted;
        }
        !self.status.is_finished()
    }

    fn drain(&mut self) -> Result<()> {
        if self.status == StreamStatus::Idle {
            return Ok(());
        }
        if let Some(segment) = self.segmenter.finish() {
            self.insert_segment(&segment)?;
        }
        Ok(())
    }

    fn begin(&mut self) -> Result<()> {
        self.cursor = match self.mode {
            InsertMode::ReplaceAll => {
                self.document.clear();
                0
            }
            InsertMode::ReplaceSelection { from, to } => {
                self.document.delete_range(from, to).inspect_err(|_| {
                    self.status = StreamStatus::Errored;
                })?;
                from
            }
            InsertMode::Append => self.document.current_size(),
        };
        self.status = StreamStatus::Streaming;
        Ok(())
    }

    fn insert_segment(&mut self, markdown: &str) -> Result<()> {
        let before = self.document.current_size();
        let (nodes, mut plain_text) = match self.converter.convert(markdown) {
            Ok(nodes) => (nodes, false),
            Err(error) => {
                tracing::warn!(error = %error, "Inserting segment as plain text");
                (Node::plain_text(markdown), true)
            }
        };

        let after = match self.document.insert_at(self.cursor, nodes) {
            Ok(size) => size,
            Err(error) if !plain_text => {
                tracing::warn!(error = %error, "Document rejected converted segment");
                plain_text = true;
                self.insert_plain(markdown)?
            }
            Err(error) => {
                self.status = StreamStatus::Errored;
                return Err(error);
            }
        };

        let size = after.saturating_sub(before);
        tracing::debug!(position = self.cursor, size, plain_text, "Inserted segment");
        self.insertions.push(Insertion { position: self.cursor, size, plain_text });
        self.cursor += size;
        Ok(())
    }

    fn insert_plain(&mut self, markdown: &str) -> Result<usize> {
        self.document
            .insert_at(self.cursor, Node::plain_text(markdown))
            .inspect_err(|_| self.status = StreamStatus::Errored)
    }
}
