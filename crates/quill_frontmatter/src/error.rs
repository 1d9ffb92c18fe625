use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid frontmatter YAML: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("Frontmatter must be a mapping, found {0}")]
    NotAMapping(&'static str),

    #[error("Unsupported mapping key: {0}")]
    UnsupportedKey(String),
}

pub type Result<T> = std::result::Result<T, Error>;
