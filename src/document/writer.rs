//! Serialization of documents back to the INI dialect.
//!
//! Output always starts with the guard line so the file is safe to keep in a
//! web-served directory. Strings that would read back as another type (or
//! lose whitespace, or be cut at a `;`) are quoted, so that parsing the
//! output yields an equal document. Empty lists have no textual form and are
//! dropped.

use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::parser::{is_valid_key, is_valid_name};
use super::{ConfigDocument, Entry, Value};
use crate::error::WriteError;

/// First line of every written file.
pub const GUARD_LINE: &str = "; <?php exit; ?> DO NOT REMOVE THIS LINE";

/// Serialize a document to a string.
pub fn write(doc: &ConfigDocument) -> Result<String, WriteError> {
    let mut out = String::new();
    write_to(doc, &mut out)?;
    Ok(out)
}

/// Serialize a document into any [`std::fmt::Write`] sink.
pub fn write_to<W: Write>(doc: &ConfigDocument, out: &mut W) -> Result<(), WriteError> {
    writeln!(out, "{GUARD_LINE}")?;
    for (name, section) in doc.sections() {
        if !is_valid_name(name) {
            return Err(WriteError::InvalidName(name.to_owned()));
        }
        writeln!(out)?;
        writeln!(out, "[{name}]")?;
        for (key, entry) in section.iter() {
            if !is_valid_key(key) {
                return Err(WriteError::InvalidName(key.to_owned()));
            }
            match entry {
                Entry::Scalar(value) => write_line(out, name, key, "", value)?,
                Entry::List(items) => {
                    for value in items {
                        write_line(out, name, key, "[]", value)?;
                    }
                }
            }
        }
    }
    Ok(())
}

/// Serialize a document and write it to `path`.
///
/// The text goes to a sibling `<name>.tmp` file which is then renamed over
/// `path`, so readers see either the old file or the new one.
pub fn save<P: AsRef<Path>>(doc: &ConfigDocument, path: P) -> Result<(), WriteError> {
    let path = path.as_ref();
    let text = write(doc)?;

    let mut temp_path = path.as_os_str().to_owned();
    temp_path.push(".tmp");
    let temp_path = PathBuf::from(temp_path);

    let result = fs::write(&temp_path, text).and_then(|()| fs::rename(&temp_path, path));
    if let Err(source) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(WriteError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    debug!(path = %path.display(), sections = doc.len(), "Wrote config file");
    Ok(())
}

fn write_line<W: Write>(
    out: &mut W,
    section: &str,
    key: &str,
    suffix: &str,
    value: &Value,
) -> Result<(), WriteError> {
    let unrepresentable = |reason| WriteError::Unrepresentable {
        section: section.to_owned(),
        key: key.to_owned(),
        reason,
    };

    match value {
        Value::Str(s) if s.is_empty() => writeln!(out, "{key}{suffix} =")?,
        Value::Str(s) => {
            if s.contains(['\n', '\r']) {
                return Err(unrepresentable("contains a line break"));
            }
            if needs_quotes(s) {
                let quote = if !s.contains('"') {
                    '"'
                } else if !s.contains('\'') {
                    '\''
                } else {
                    return Err(unrepresentable("needs quoting but contains both quote characters"));
                };
                writeln!(out, "{key}{suffix} = {quote}{s}{quote}")?;
            } else {
                writeln!(out, "{key}{suffix} = {s}")?;
            }
        }
        Value::Float(x) if !x.is_finite() => return Err(unrepresentable("non-finite float")),
        other => writeln!(out, "{key}{suffix} = {other}")?,
    }
    Ok(())
}

fn needs_quotes(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_digit() || c == '"' || c == '\'')
        || s.trim() != s
        || s.contains(';')
        || !matches!(Value::infer(s), Value::Str(_))
}
