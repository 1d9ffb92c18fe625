use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid base64 content for {path}: {error}")]
    Base64 { path: String, error: base64::DecodeError },

    #[error("Content of {path} is not valid UTF-8: {error}")]
    Utf8 { path: String, error: std::string::FromUtf8Error },
}

pub type Result<T> = std::result::Result<T, Error>;
