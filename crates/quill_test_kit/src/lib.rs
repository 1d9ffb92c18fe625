//! Shared helpers for quill tests: fixture documents.

/// Reads a fixture document, panicking with the path when it is missing.
///
/// ```ignore
/// let content = fixture("src/fixtures/post.md").await;
/// ```
pub async fn fixture(path: &str) -> String {
    tokio::fs::read_to_string(path)
        .await
        .unwrap_or_else(|e| panic!("Failed to load fixture at {path}: {e}"))
}

/// Loads a fixture relative to the calling crate's manifest directory.
///
/// ```ignore
/// let content = fixture!("src/fixtures/post.md").await;
/// ```
#[macro_export]
macro_rules! fixture {
    ($path:expr) => {
        $crate::fixture(&format!("{}/{}", env!("CARGO_MANIFEST_DIR"), $path))
    };
}

/// Reads a fixture and deserializes it as JSON.
#[cfg(feature = "json")]
pub async fn json_fixture<T: serde::de::DeserializeOwned>(path: &str) -> T {
    let content = fixture(path).await;
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse JSON fixture at {path}: {e}"))
}

#[cfg(feature = "json")]
#[macro_export]
macro_rules! json_fixture {
    ($path:expr) => {
        $crate::json_fixture(&format!("{}/{}", env!("CARGO_MANIFEST_DIR"), $path))
    };
}
