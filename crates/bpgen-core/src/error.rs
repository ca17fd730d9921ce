//! Error types for bpgen
//!
//! All fallible operations return `Result<T, Error>`.
//! Parse errors carry the source line and the field they were found in so a
//! problem author can fix the document without guessing.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::emitter::Language;

/// bpgen error types
#[derive(Debug, Error)]
pub enum Error {
    /// A required artifact (structure document, problem directory) is missing
    #[error("Structural error: {what} not found at {}", .path.display())]
    Structural { what: String, path: PathBuf },

    /// The structure document is present but malformed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A definition cannot be expressed in a target language
    #[error("Emission error: {0}")]
    Emission(#[from] EmissionError),

    /// Filesystem read or write failure
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// A malformed structure document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based source line, when the problem is tied to one
    pub line: Option<usize>,
    /// Label of the field being parsed (e.g. `Function Name`)
    pub field: String,
    pub message: String,
}

impl ParseError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            line: None,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn at(line: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {} ({}): {}", line, self.field, self.message),
            None => write!(f, "{}: {}", self.field, self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// A definition that cannot be expressed in one target language
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{language}: cannot emit {item} for {context}")]
pub struct EmissionError {
    pub language: Language,
    /// What could not be emitted, e.g. `type 'quaternion'`
    pub item: String,
    /// Where the type was used, e.g. `parameter 'x'` or `return value`
    pub context: String,
}

/// Result type alias for bpgen operations
pub type Result<T> = std::result::Result<T, Error>;
