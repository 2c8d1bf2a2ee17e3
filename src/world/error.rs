//! Error types for level data loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading a level or one of its referenced files.
#[derive(Debug, Error)]
pub enum LevelError {
    /// File could not be found.
    #[error("File not found: {0:?}")]
    FileNotFound(PathBuf),

    /// File could not be read.
    #[error("Failed to read file {path:?}: {details}")]
    Read { path: PathBuf, details: String },

    /// A data line was malformed. `line` is 1-based.
    #[error("Parse error in {path:?} at line {line}: {details}")]
    Parse {
        path: PathBuf,
        line: usize,
        details: String,
    },
}

impl LevelError {
    /// Build from an io error, mapping `NotFound` to [`LevelError::FileNotFound`].
    pub fn from_io(path: PathBuf, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            LevelError::FileNotFound(path)
        } else {
            LevelError::Read {
                path,
                details: err.to_string(),
            }
        }
    }

    /// Line number for parse errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            LevelError::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }
}
