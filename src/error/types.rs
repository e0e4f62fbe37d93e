use thiserror::Error;

/// Unified result type for the masonry crate.
pub type Result<T> = std::result::Result<T, MasonryError>;

/// Errors surfaced by the masonry layout engine.
#[derive(Debug, Error)]
pub enum MasonryError {
    #[error("masonry container element not found or detached")]
    ContainerNotFound,
    #[error("column count must be at least 1, got {0}")]
    InvalidColumns(usize),
    #[error("gutter must be a finite, non-negative number, got {0}")]
    InvalidGutter(f64),
    #[error("layout session has been disposed")]
    Disposed,
    #[error("invalid masonry options: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(
            MasonryError::InvalidColumns(0).to_string(),
            "column count must be at least 1, got 0"
        );
        assert_eq!(
            MasonryError::InvalidGutter(-2.5).to_string(),
            "gutter must be a finite, non-negative number, got -2.5"
        );
    }

    #[test]
    fn json_errors_convert() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: MasonryError = err.into();
        assert!(matches!(err, MasonryError::Config(_)));
    }
}
