use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File payload as returned by the repository content API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub path: String,
    pub sha: String,
    /// Base64 content, possibly wrapped across several lines
    pub content: String,
}

impl RemoteFile {
    pub fn new(path: impl Into<String>, sha: impl Into<String>, content: impl Into<String>) -> Self {
        Self { path: path.into(), sha: sha.into(), content: content.into() }
    }

    /// Decodes the wrapped base64 payload into document text.
    pub fn decode_content(&self) -> Result<String> {
        let compact: String = self.content.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD
            .decode(compact)
            .map_err(|error| Error::Base64 { path: self.path.clone(), error })?;
        String::from_utf8(bytes).map_err(|error| Error::Utf8 { path: self.path.clone(), error })
    }
}

/// Request body for creating or updating a file in the content repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[setters(strip_option, into)]
pub struct ContentUpdate {
    pub path: String,
    /// Full document text
    pub content: String,
    /// Sha of the blob being replaced; required by the API for updates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    pub message: String,
}

impl ContentUpdate {
    pub fn new(
        path: impl Into<String>,
        content: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self { path: path.into(), content: content.into(), sha: None, message: message.into() }
    }

    /// Content encoded the way the repository write API expects it.
    pub fn encoded_content(&self) -> String {
        STANDARD.encode(self.content.as_bytes())
    }
}
