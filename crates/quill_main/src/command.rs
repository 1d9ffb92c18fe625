use std::path::Path;

use anyhow::{Context, Result};
use futures::stream;
use quill_domain::{Document, Metadata};
use quill_frontmatter::{DocumentExt, ReconcileOptions, combine_with, derive};
use quill_markdown_stream::{
    Converter, MarkdownConverter, NodeDocument, StreamConfig, StreamEvent, StreamSession,
    StreamStatus, chunk_text, decode_events, drive,
};

use crate::cli::{Cli, SetCommand, StreamCommand, TopLevelCommand};

/// Runs a parsed command and returns what should be printed.
pub async fn run(cli: Cli) -> Result<String> {
    match cli.command {
        TopLevelCommand::Frontmatter { file } => {
            let content = read(&file).await?;
            frontmatter_json(&file, &content)
        }
        TopLevelCommand::Set(command) => {
            let content = read(&command.file).await?;
            let updated = apply_set(&command, &content);
            if command.write {
                tokio::fs::write(&command.file, &updated)
                    .await
                    .with_context(|| format!("Failed to write {}", command.file.display()))?;
                tracing::info!(path = %command.file.display(), "Updated document");
                Ok(String::new())
            } else {
                Ok(updated)
            }
        }
        TopLevelCommand::Stream(command) => {
            let content = read(&command.file).await?;
            let base = match &command.base {
                Some(path) => Some(read(path).await?),
                None => None,
            };
            stream_html(&command, &content, base.as_deref()).await
        }
    }
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn frontmatter_json(path: &Path, content: &str) -> Result<String> {
    let (_, metadata) = Document::from_content(path.display().to_string(), None, content);
    serde_json::to_string_pretty(&metadata).context("Failed to serialize metadata")
}

/// Applies the requested edits and returns the full document text.
pub fn apply_set(command: &SetCommand, content: &str) -> String {
    let (document, metadata) =
        Document::from_content(command.file.display().to_string(), None, content);
    let mut metadata = edit_metadata(metadata, command);
    if command.derive {
        metadata = derive::fill_derived(metadata, &document.body);
    }

    let mut options = ReconcileOptions::default();
    if let Some(time) = &command.default_time {
        options = options.default_time(time.clone());
    }
    combine_with(&metadata, &document.body, &document.frontmatter, &options)
}

fn edit_metadata(mut metadata: Metadata, command: &SetCommand) -> Metadata {
    let fields = [
        (&command.title, &mut metadata.title),
        (&command.slug, &mut metadata.slug),
        (&command.description, &mut metadata.description),
        (&command.date, &mut metadata.date),
        (&command.canonical_url, &mut metadata.canonical_url),
        (&command.reading_time, &mut metadata.reading_time),
        (&command.image, &mut metadata.hero_image),
    ];
    for (edit, field) in fields {
        if let Some(value) = edit {
            *field = value.clone();
        }
    }
    if command.clear_tags {
        metadata.tags.clear();
    } else if !command.tags.is_empty() {
        metadata = metadata.with_tags(&command.tags);
    }
    if let Some(draft) = command.draft {
        metadata.draft = draft;
    }
    metadata
}

/// Streams `content` through a session and renders the resulting document.
pub async fn stream_html(command: &StreamCommand, content: &str, base: Option<&str>) -> Result<String> {
    let nodes = match base {
        Some(markdown) => MarkdownConverter
            .convert(markdown)
            .context("Failed to convert base document")?,
        None => Vec::new(),
    };
    let mut session = StreamSession::with_converter(
        NodeDocument::with_nodes(nodes),
        MarkdownConverter,
        command.mode.into(),
        StreamConfig::from_env(),
    );

    let status = if command.sse {
        let pieces = stream::iter(chunk_text(content, command.chunk_size));
        drive(&mut session, decode_events(pieces)).await?
    } else {
        let events = chunk_text(content, command.chunk_size)
            .into_iter()
            .map(StreamEvent::chunk)
            .chain([StreamEvent::Done]);
        drive(&mut session, stream::iter(events)).await?
    };

    if status == StreamStatus::Errored {
        tracing::warn!(error = session.error().unwrap_or_default(), "Stream ended with an error");
    }
    Ok(session.document().to_html())
}
