use futures::{Stream, StreamExt};

use crate::convert::Converter;
use crate::document::RichDocument;
use crate::error::Result;
use crate::event::StreamEvent;
use crate::session::{StreamSession, StreamStatus};

/// Feeds `events` into `session` in order until the stream ends.
///
/// A `done` event or the end of the stream flushes the session. An `error`
/// event keeps what was received and marks the session errored. Cancelling
/// the session's abort handle stops consumption immediately.
pub async fn drive<D, C, S>(session: &mut StreamSession<D, C>, events: S) -> Result<StreamStatus>
where
    D: RichDocument,
    C: Converter,
    S: Stream<Item = StreamEvent>,
{
    let cancel = session.abort_handle();
    let mut events = std::pin::pin!(events);

    loop {
        let event = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                session.abort();
                break;
            }
            event = events.next() => event,
        };

        match event {
            Some(StreamEvent::Chunk { content }) => session.process_chunk(&content)?,
            Some(StreamEvent::Done) | None => {
                session.flush()?;
                break;
            }
            Some(StreamEvent::Error { message }) => {
                session.fail(message)?;
                break;
            }
        }
    }

    Ok(session.status())
}
