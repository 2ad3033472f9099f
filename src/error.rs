use std::path::PathBuf;

use thiserror::Error;

/// Failures at the edges of the crate: reading input, loading settings,
/// naming a framework. The parser itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown framework '{0}' (expected one of: ife, efe, space, bcg, porter)")]
    UnknownFramework(String),
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("failed to serialise output: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
