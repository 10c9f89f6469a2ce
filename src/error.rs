//! Error types for loading, storing and calculating production plans

use thiserror::Error;

/// Convenience alias used across the library
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Machine selection needs at least one machine to fall back on
    #[error("no machines available in the recipe database")]
    EmptyMachineDatabase,

    #[error("cyclic recipe: {}", .path.join(" -> "))]
    CyclicRecipe { path: Vec<String> },

    #[error("belt color '{0}' not found")]
    UnknownBelt(String),

    #[error("invalid recipe '{name}': {reason}")]
    InvalidRecipe { name: String, reason: String },

    #[error("catalogue is empty - run 'import' or 'load-sample' first")]
    EmptyCatalog,

    #[error("failed to initialize logging: {0}")]
    Logging(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}
