//! Application log settings.

use serde::Serialize;
use tracing::Level;

use super::defaults;
use crate::document::ConfigDocument;
use crate::error::TypeMismatch;

/// `[log]` settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogSettings {
    /// Where log records go: `screen`, `file`, `database`.
    pub log_writers: Vec<String>,
    /// One of `ERROR`, `WARN`, `INFO`, `DEBUG`, `VERBOSE` (default: `WARN`).
    pub log_level: String,
    pub logger_file_path: String,
}

impl LogSettings {
    pub fn from_document(doc: &ConfigDocument) -> Result<Self, TypeMismatch> {
        let log_writers = if doc.get("log", "log_writers").is_some() {
            doc.get_list("log", "log_writers")?
        } else {
            defaults::log_writers()
        };
        Ok(Self {
            log_writers,
            log_level: doc.get_string("log", "log_level", defaults::LOG_LEVEL)?,
            logger_file_path: doc.get_string("log", "logger_file_path", defaults::LOG_FILE_PATH)?,
        })
    }

    /// Map `log_level` onto a tracing level; `None` for unrecognized names.
    pub fn tracing_level(&self) -> Option<Level> {
        match self.log_level.to_ascii_uppercase().as_str() {
            "ERROR" => Some(Level::ERROR),
            "WARN" | "WARNING" => Some(Level::WARN),
            "INFO" => Some(Level::INFO),
            "DEBUG" => Some(Level::DEBUG),
            "VERBOSE" => Some(Level::TRACE),
            _ => None,
        }
    }

    pub fn writes_to(&self, writer: &str) -> bool {
        self.log_writers.iter().any(|w| w == writer)
    }
}
