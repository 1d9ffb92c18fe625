//! Frontmatter reconciliation for markdown documents.
//!
//! Parsing projects a document's YAML frontmatter onto [`Metadata`]. Merging
//! writes edited metadata back into the *original* frontmatter: unknown keys,
//! nested structures, key order, key naming variants and scalar/array
//! formatting are preserved so that saving produces the smallest possible
//! diff.
//!
//! ```
//! use quill_frontmatter::{combine, parse};
//!
//! let source = "---\ntitle: Old\ntags: [a, b]\n---\n\nBody.";
//! let parsed = parse(source);
//! let metadata = parsed.metadata.clone().title("New").with_tags(["a", "b", "c"]);
//!
//! let saved = combine(&metadata, &parsed.body, &parsed.raw_frontmatter);
//! assert_eq!(saved, "---\ntitle: New\ntags: [a, b, c]\n---\n\nBody.");
//! ```

mod config;
mod date;
pub mod derive;
mod document;
mod emit;
mod error;
mod head;
mod merge;
mod parse;
mod split;
mod style;

pub use config::ReconcileOptions;
pub use document::{DocumentExt, combine, combine_with};
pub use error::{Error, Result};
pub use merge::{generate, merge, merge_with};
pub use parse::{ParsedDocument, parse};
pub use quill_domain::{Faq, Metadata};
pub use split::{Split, split};
