use std::convert::Infallible;

use eventsource_stream::{Event, EventStreamError, Eventsource};
use futures::{Stream, StreamExt, stream};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Sentinel some providers send after the last frame.
const DONE_SENTINEL: &str = "[DONE]";

/// A frame of a streamed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Chunk { content: String },
    Done,
    Error { message: String },
}

impl StreamEvent {
    pub fn chunk(content: impl Into<String>) -> Self {
        Self::Chunk { content: content.into() }
    }
}

/// Splits `text` into pieces of at most `size` characters, the way a network
/// transport hands over a response in arbitrary slices.
pub fn chunk_text(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(size.max(1)).map(|piece| piece.iter().collect()).collect()
}

/// Decodes server-sent event text, arriving in arbitrary pieces, into events.
///
/// Each frame's `data` is decoded as JSON. Comments, frames without data and
/// `[DONE]` sentinels produce nothing. A final frame that is not terminated
/// by a blank line is still decoded once the input ends. Frames that fail to
/// decode become [`StreamEvent::Error`] so that the consumer can end the
/// stream.
pub fn decode_events<S>(pieces: S) -> impl Stream<Item = StreamEvent>
where
    S: Stream<Item = String>,
{
    pieces
        .chain(stream::once(async { "\n\n".to_string() }))
        .map(Ok::<_, Infallible>)
        .eventsource()
        .filter_map(|frame| async move { decode_frame(frame) })
}

fn decode_frame(frame: Result<Event, EventStreamError<Infallible>>) -> Option<StreamEvent> {
    let event = match frame {
        Ok(event) => event,
        Err(error) => return Some(failed(error.to_string())),
    };
    let data = event.data.trim();
    if data.is_empty() || data == DONE_SENTINEL {
        return None;
    }
    let decoded = serde_json::from_str(data).unwrap_or_else(|error| failed(Error::from(error).to_string()));
    Some(decoded)
}

fn failed(message: String) -> StreamEvent {
    tracing::warn!(error = %message, "Failed to decode stream frame");
    StreamEvent::Error { message }
}
