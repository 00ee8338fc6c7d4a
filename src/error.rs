//! Application-wide error types.
//!
//! Library modules use specific error variants via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! Note that the engine's pure derivations never produce errors: a raw
//! record that matches no recognized shape is an ignorable rejection,
//! not a fault. Errors here belong to the boundaries around the engine
//! (file I/O, the persisted blob, configuration).

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Blob store error
    #[error("Store error: {0}")]
    Store(String),

    /// A batch file that could not be loaded
    #[error("Failed to load {path}: {message}")]
    Load { path: PathBuf, message: String },

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Create a load error for a batch file.
    pub fn load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, serde_json::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Json(e).context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::load("/exports/history.json", "not a JSON array");
        let msg = err.to_string();
        assert!(msg.contains("history.json"));
        assert!(msg.contains("not a JSON array"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::store("slot missing").context("while loading dataset");
        let msg = err.to_string();
        assert!(msg.contains("while loading dataset"));
    }

    #[test]
    fn test_result_ext() {
        let result: Result<()> = Err(Error::store("test"));
        let with_ctx = result.with_context("additional context");
        assert!(with_ctx.unwrap_err().to_string().contains("additional context"));
    }
}
