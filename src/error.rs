//! Error types for loading, reading and writing configuration documents.
//!
//! Parse failures abort a whole load, type mismatches only affect the single
//! read that triggered them, and write failures name the entry that could not
//! be expressed in the file format.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Parse Errors (syntax)
// ============================================================================

/// Whether a key was declared as `key = v` or `key[] = v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Scalar,
    List,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.write_str("scalar"),
            Self::List => f.write_str("list"),
        }
    }
}

/// What went wrong on a malformed line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("expected `[section]` or `key = value`")]
    Malformed,

    #[error("entry appears before any section header")]
    EntryOutsideSection,

    #[error("invalid name '{0}'")]
    InvalidName(String),

    #[error("unterminated quoted value")]
    UnterminatedQuote,

    #[error("unexpected text '{0}' after value")]
    TrailingText(String),

    #[error("key '{key}' was first declared as a {declared}")]
    KindConflict { key: String, declared: EntryKind },
}

/// A syntax error, located by its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}: `{content}`")]
pub struct ParseError {
    /// 1-based line number.
    pub line: usize,
    /// The offending line as it appeared in the input.
    pub content: String,
    /// The reason the line was rejected.
    #[source]
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: usize, content: &str, kind: ParseErrorKind) -> Self {
        Self {
            line,
            content: content.trim_end().to_owned(),
            kind,
        }
    }
}

/// Errors that can occur while loading a configuration file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file was read but is not valid.
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: ParseError,
    },
}

impl LoadError {
    /// The syntax error behind this failure, if any.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse { source, .. } => Some(source),
            Self::Io { .. } => None,
        }
    }
}

// ============================================================================
// Type Errors (typed reads)
// ============================================================================

/// The type a typed accessor asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedType {
    String,
    Integer,
    Float,
    Boolean,
    Port,
    List,
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean (0/1/true/false)",
            Self::Port => "port number (0-65535)",
            Self::List => "list",
        };
        f.write_str(name)
    }
}

/// A present value that cannot be read as the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{section}] {key}: expected {expected}, found {found}")]
pub struct TypeMismatch {
    pub section: String,
    pub key: String,
    pub expected: ExpectedType,
    /// Short description of the stored value.
    pub found: String,
}

// ============================================================================
// Write Errors (serialization)
// ============================================================================

/// Errors raised while serializing a document back to text.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("[{section}] {key}: value cannot be written: {reason}")]
    Unrepresentable {
        section: String,
        key: String,
        reason: &'static str,
    },

    #[error("invalid name '{0}'")]
    InvalidName(String),

    #[error("formatting failed")]
    Fmt(#[from] fmt::Error),

    #[error("failed to write config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
