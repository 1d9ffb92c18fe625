mod document;
mod error;
mod keys;
mod metadata;
mod storage;

pub use document::*;
pub use error::*;
pub use keys::*;
pub use metadata::*;
pub use storage::*;
