use thiserror::Error;

/// Errors surfaced by the catalog-book pipeline.
#[derive(Debug, Error)]
pub enum BookError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog document: {0}")]
    InvalidCatalog(#[from] toml::de::Error),

    #[error("Render surface failure: {0}")]
    Surface(String),

    #[error("{0}")]
    Other(String),
}

impl From<String> for BookError {
    fn from(value: String) -> Self {
        Self::Other(value)
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, BookError>;
