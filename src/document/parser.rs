//! Line-oriented parser for the INI dialect.
//!
//! Each non-blank line is one of:
//! - a comment starting with `;` (this includes the `; <?php exit; ?>` guard line)
//! - a section header `[name]`, optionally followed by `; comment`
//! - a scalar assignment `key = value`
//! - a list append `key[] = value`
//!
//! The first malformed line aborts the parse; no partial document is returned.

use std::path::Path;
use tracing::debug;

use super::{ConfigDocument, Entry, Section, Value};
use crate::error::{LoadError, ParseError, ParseErrorKind};

/// A classified, non-comment line.
enum Line<'a> {
    Header(&'a str),
    Assign {
        key: &'a str,
        list: bool,
        value: Value,
    },
}

/// Read and parse a configuration file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<ConfigDocument, LoadError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc = parse(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), sections = doc.len(), "Parsed config file");
    Ok(doc)
}

/// Parse configuration text into a document.
pub fn parse(text: &str) -> Result<ConfigDocument, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut doc = ConfigDocument::new();
    let mut current: Option<String> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        let fail = |kind| ParseError::new(line_no, raw, kind);
        match classify(line).map_err(fail)? {
            Line::Header(name) => {
                // Re-opening a section merges into the existing one.
                doc.section_or_insert(name);
                current = Some(name.to_owned());
            }
            Line::Assign { key, list, value } => {
                let name = current
                    .as_deref()
                    .ok_or_else(|| fail(ParseErrorKind::EntryOutsideSection))?;
                apply(doc.section_or_insert(name), key, list, value).map_err(fail)?;
            }
        }
    }

    Ok(doc)
}

fn classify(line: &str) -> Result<Line<'_>, ParseErrorKind> {
    if let Some(rest) = line.strip_prefix('[') {
        let (name, tail) = rest.split_once(']').ok_or(ParseErrorKind::Malformed)?;
        let name = name.trim();
        if !is_valid_name(name) {
            return Err(ParseErrorKind::InvalidName(name.to_owned()));
        }
        expect_comment_or_end(tail)?;
        return Ok(Line::Header(name));
    }

    let (lhs, rhs) = line.split_once('=').ok_or(ParseErrorKind::Malformed)?;
    let lhs = lhs.trim();
    let (key, list) = match lhs.strip_suffix("[]") {
        Some(key) => (key.trim_end(), true),
        None => (lhs, false),
    };
    if !is_valid_key(key) {
        return Err(ParseErrorKind::InvalidName(key.to_owned()));
    }

    Ok(Line::Assign {
        key,
        list,
        value: parse_value(rhs.trim())?,
    })
}

fn parse_value(rhs: &str) -> Result<Value, ParseErrorKind> {
    match rhs.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let body = &rhs[1..];
            let end = body.find(quote).ok_or(ParseErrorKind::UnterminatedQuote)?;
            expect_comment_or_end(&body[end + 1..])?;
            Ok(Value::Str(body[..end].to_owned()))
        }
        _ => {
            // Unquoted values run up to the first `;`.
            let text = rhs.split_once(';').map_or(rhs, |(value, _)| value).trim_end();
            if text.is_empty() {
                Ok(Value::Str(String::new()))
            } else {
                Ok(Value::infer(text))
            }
        }
    }
}

fn apply(section: &mut Section, key: &str, list: bool, value: Value) -> Result<(), ParseErrorKind> {
    if let Some(existing) = section.get_mut(key) {
        match (existing, list) {
            (Entry::Scalar(slot), false) => *slot = value,
            (Entry::List(items), true) => items.push(value),
            (existing, _) => {
                return Err(ParseErrorKind::KindConflict {
                    key: key.to_owned(),
                    declared: existing.kind(),
                });
            }
        }
        return Ok(());
    }

    let entry = if list {
        Entry::List(vec![value])
    } else {
        Entry::Scalar(value)
    };
    section.insert(key, entry);
    Ok(())
}

fn expect_comment_or_end(tail: &str) -> Result<(), ParseErrorKind> {
    let tail = tail.trim();
    if tail.is_empty() || tail.starts_with(';') {
        Ok(())
    } else {
        Err(ParseErrorKind::TrailingText(tail.to_owned()))
    }
}

/// Section and key names: ASCII letters, digits, `_`, `.` and `-`.
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-'))
}

/// Keys are names with an optional `[subkey]`, e.g. `currencies[BTC]`.
///
/// A subscripted key is an ordinary scalar key; the subscript is part of
/// its name.
pub(crate) fn is_valid_key(key: &str) -> bool {
    match key.strip_suffix(']').and_then(|k| k.split_once('[')) {
        Some((name, subkey)) => is_valid_name(name) && is_valid_name(subkey),
        None => is_valid_name(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntryKind;

    fn scalar(doc: &ConfigDocument, section: &str, key: &str) -> Value {
        doc.get(section, key)
            .and_then(Entry::as_scalar)
            .cloned()
            .unwrap()
    }

    #[test]
    fn parses_sections_scalars_and_lists() {
        let doc = parse(
            "; <?php exit; ?> DO NOT REMOVE THIS LINE\n\
             \n\
             [database]\n\
             host =\n\
             port = 3306\n\
             [ChainedCache]\n\
             backends[] = array\n\
             backends[] = file\n",
        )
        .unwrap();

        assert_eq!(scalar(&doc, "database", "host"), Value::Str(String::new()));
        assert_eq!(scalar(&doc, "database", "port"), Value::Int(3306));
        assert_eq!(
            doc.get("ChainedCache", "backends"),
            Some(&Entry::List(vec![Value::from("array"), Value::from("file")]))
        );
    }

    #[test]
    fn later_scalar_wins() {
        let doc = parse("[s]\na = 1\na = 2\n").unwrap();
        assert_eq!(scalar(&doc, "s", "a"), Value::Int(2));
    }

    #[test]
    fn repeated_header_merges_into_existing_section() {
        let doc = parse("[s]\na = 1\nl[] = x\n[t]\nb = 2\n[s]\na = 3\nl[] = y\n").unwrap();
        let names: Vec<_> = doc.section_names().collect();
        assert_eq!(names, ["s", "t"]);
        assert_eq!(scalar(&doc, "s", "a"), Value::Int(3));
        assert_eq!(
            doc.get("s", "l"),
            Some(&Entry::List(vec![Value::from("x"), Value::from("y")]))
        );
    }

    #[test]
    fn quotes_are_stripped() {
        let doc = parse("[data]\nvalue=\"Tea pot\"\nempty     = ''\nport = \"3306\"\n").unwrap();
        assert_eq!(scalar(&doc, "data", "value"), Value::from("Tea pot"));
        assert_eq!(scalar(&doc, "data", "empty"), Value::from(""));
        assert_eq!(scalar(&doc, "data", "port"), Value::from("3306"));
    }

    #[test]
    fn inline_comments_are_ignored() {
        let doc = parse(
            "[data] ; Comments here too\n\
             value2  =  Electric Boogaloo\n\
             missing = ; With comment\n\
             quoted = \"a;b\" ; trailing\n",
        )
        .unwrap();
        assert_eq!(scalar(&doc, "data", "value2"), Value::from("Electric Boogaloo"));
        assert_eq!(scalar(&doc, "data", "missing"), Value::from(""));
        assert_eq!(scalar(&doc, "data", "quoted"), Value::from("a;b"));
    }

    #[test]
    fn list_items_keep_file_order_including_empty() {
        let doc = parse("[arrays]\narray[] = 10\narray[] = 'coffee'\narray[] =\narray[] = Plugins\n")
            .unwrap();
        assert_eq!(
            doc.get("arrays", "array"),
            Some(&Entry::List(vec![
                Value::Int(10),
                Value::from("coffee"),
                Value::from(""),
                Value::from("Plugins"),
            ]))
        );
    }

    #[test]
    fn missing_equals_reports_exact_line() {
        let err = parse("[database]\nhost =\nenable_ssl 0\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.content, "enable_ssl 0");
        assert_eq!(err.kind, ParseErrorKind::Malformed);
    }

    #[test]
    fn entry_before_header_fails() {
        let err = parse("; header comment\nkey = value\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.kind, ParseErrorKind::EntryOutsideSection);
    }

    #[test]
    fn kind_conflict_fails() {
        let err = parse("[s]\nk = 1\nk[] = 2\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert!(matches!(
            err.kind,
            ParseErrorKind::KindConflict { declared: EntryKind::Scalar, .. }
        ));

        let err = parse("[s]\nk[] = 1\nk = 2\n").unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::KindConflict { declared: EntryKind::List, .. }
        ));
    }

    #[test]
    fn bad_names_and_quotes_fail() {
        assert!(matches!(
            parse("[bad name]\n").unwrap_err().kind,
            ParseErrorKind::InvalidName(_)
        ));
        assert!(matches!(
            parse("[s]\nbad key = 1\n").unwrap_err().kind,
            ParseErrorKind::InvalidName(_)
        ));
        assert!(matches!(
            parse("[s]\n = 1\n").unwrap_err().kind,
            ParseErrorKind::InvalidName(_)
        ));
        assert_eq!(
            parse("[s]\nk = \"open\n").unwrap_err().kind,
            ParseErrorKind::UnterminatedQuote
        );
        assert!(matches!(
            parse("[s]\nk = \"a\" b\n").unwrap_err().kind,
            ParseErrorKind::TrailingText(_)
        ));
        assert_eq!(parse("[unclosed\n").unwrap_err().kind, ParseErrorKind::Malformed);
    }

    #[test]
    fn subscripted_keys_are_literal_scalars() {
        let doc = parse("[General]\ncurrencies[BTC] = Bitcoin\ncurrencies[XAU] = Gold\n").unwrap();
        assert_eq!(scalar(&doc, "General", "currencies[BTC]"), Value::from("Bitcoin"));
        assert_eq!(scalar(&doc, "General", "currencies[XAU]"), Value::from("Gold"));
        assert!(doc.get("General", "currencies").is_none());

        let doc = parse("[s]\nmap[a][] = 1\nmap[a][] = 2\n").unwrap();
        assert_eq!(
            doc.get("s", "map[a]"),
            Some(&Entry::List(vec![Value::Int(1), Value::Int(2)]))
        );

        for bad in ["k[ = 1", "k] = 1", "k[a b] = 1", "[x] = 1", "k[a][b] = 1"] {
            assert!(
                parse(&format!("[s]\n{bad}\n")).is_err(),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn crlf_and_bom_are_tolerated() {
        let doc = parse("\u{feff}[s]\r\na = 1\r\n").unwrap();
        assert_eq!(scalar(&doc, "s", "a"), Value::Int(1));
    }

    #[test]
    fn empty_input_is_empty_document() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("; only a comment\n\n").unwrap().is_empty());
    }

    #[test]
    fn load_attaches_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ini.php");
        std::fs::write(&path, "[s]\nnope\n").unwrap();
        let err = load(&path).unwrap_err();
        assert_eq!(err.parse_error().map(|e| e.line), Some(2));
        assert!(err.to_string().contains("broken.ini.php"));

        let missing = load(dir.path().join("missing.ini.php")).unwrap_err();
        assert!(matches!(missing, LoadError::Io { .. }));
    }
}
