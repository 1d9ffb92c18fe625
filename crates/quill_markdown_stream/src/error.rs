use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Markdown produced no content")]
    EmptyConversion,

    #[error("Raw HTML cannot be represented: {0}")]
    UnsupportedHtml(String),

    #[error("Position {position} is not a block boundary (document size {size})")]
    InvalidPosition { position: usize, size: usize },

    #[error("Range {from}..{to} does not span whole blocks (document size {size})")]
    InvalidRange { from: usize, to: usize, size: usize },

    #[error("Invalid stream event: {0}")]
    Event(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
