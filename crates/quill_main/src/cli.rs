use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use quill_markdown_stream::InsertMode;

#[derive(Parser, Debug)]
#[command(name = "quill", version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: TopLevelCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TopLevelCommand {
    /// Print the metadata of a markdown document as JSON.
    Frontmatter {
        /// Markdown document to read.
        file: PathBuf,
    },

    /// Edit the metadata of a markdown document.
    ///
    /// Only the given fields change; everything else in the frontmatter is
    /// kept as written. Passing an empty value removes the field.
    Set(SetCommand),

    /// Stream a markdown file into a rich document and print it as HTML.
    Stream(StreamCommand),
}

#[derive(Args, Debug, Clone, Default)]
pub struct SetCommand {
    /// Markdown document to edit.
    pub file: PathBuf,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub slug: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Publication date as YYYY-MM-DD.
    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub canonical_url: Option<String>,

    /// Reading time in minutes.
    #[arg(long)]
    pub reading_time: Option<String>,

    #[arg(long)]
    pub image: Option<String>,

    /// Replace the tag list. Repeat for several tags.
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Remove every tag.
    #[arg(long, conflicts_with = "tags")]
    pub clear_tags: bool,

    #[arg(long)]
    pub draft: Option<bool>,

    /// Fill an empty slug and reading time from the title and body.
    #[arg(long, default_value_t = false)]
    pub derive: bool,

    /// Time of day attached to bare dates when the document has none.
    #[arg(long)]
    pub default_time: Option<String>,

    /// Write the result back to the file instead of printing it.
    #[arg(long, short = 'w', default_value_t = false)]
    pub write: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StreamCommand {
    /// Markdown file, or a server-sent event transcript with `--sse`.
    pub file: PathBuf,

    /// Characters handed to the streamer per chunk.
    #[arg(long, default_value_t = 16)]
    pub chunk_size: usize,

    /// How streamed content is placed relative to the base document.
    #[arg(long, value_enum, default_value_t = StreamMode::Replace)]
    pub mode: StreamMode,

    /// Markdown file converted into the document before streaming starts.
    #[arg(long)]
    pub base: Option<PathBuf>,

    /// Read `file` as a server-sent event transcript.
    #[arg(long, default_value_t = false)]
    pub sse: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    Append,
    Replace,
}

impl From<StreamMode> for InsertMode {
    fn from(mode: StreamMode) -> Self {
        match mode {
            StreamMode::Append => InsertMode::Append,
            StreamMode::Replace => InsertMode::ReplaceAll,
        }
    }
}
