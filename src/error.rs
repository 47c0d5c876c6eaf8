//! Error types shared by the loaders and the resolver

use std::path::PathBuf;
use thiserror::Error;

use crate::geometry::Rect;

pub type Result<T, E = MfdError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum MfdError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid path pattern '{pattern}': {reason}")]
    Path { pattern: String, reason: &'static str },

    #[error("{reason}: inner={inner:?}, outer={outer:?}")]
    Geometry {
        outer: Rect,
        inner: Rect,
        reason: &'static str,
    },
}

impl MfdError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse { path: path.into(), source }
    }

    /// True for malformed data, false for anything that failed before parsing
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
