//! Configuration validation.
//!
//! Runs every structural check against a parsed document and reports all
//! problems at once, in discovery order. Each violation carries a
//! [`Severity`]; the caller decides whether warnings are fatal.

use std::collections::HashSet;
use thiserror::Error;

use crate::document::ConfigDocument;
use crate::error::TypeMismatch;
use crate::settings::DatabaseTls;

/// Sections shipped in the stock `global.ini.php`.
pub const KNOWN_SECTIONS: &[&str] = &[
    "database",
    "database_tests",
    "tests",
    "log",
    "Cache",
    "ChainedCache",
    "RedisCache",
    "Debug",
    "DebugTests",
    "Development",
    "General",
    "Tracker",
    "Segments",
    "Deletelogs",
    "Deletereports",
    "mail",
    "proxy",
    "Plugins",
    "PluginsInstalled",
    "APISettings",
];

/// Keys that must be `key[] = ...` lists without repeated entries.
const UNIQUE_LISTS: &[(&str, &str)] = &[("Plugins", "Plugins"), ("PluginsInstalled", "PluginsInstalled")];

const DATABASE_SECTIONS: &[&str] = &["database", "database_tests"];

/// Integer-valued keys that may also be left empty.
const PORT_KEYS: &[(&str, &str)] = &[
    ("database", "port"),
    ("database_tests", "port"),
    ("tests", "port"),
    ("RedisCache", "port"),
    ("mail", "port"),
    ("proxy", "port"),
];

/// How serious a violation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// A structural problem found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("unknown section [{0}]")]
    UnknownSection(String),
    #[error("[{section}] {key} lists '{entry}' more than once")]
    DuplicateListEntry {
        section: String,
        key: String,
        entry: String,
    },
    #[error("[{section}] {key} must be a list (`{key}[] = ...`)")]
    ExpectedList { section: String, key: String },
    #[error("[{0}] enable_ssl is on but neither ssl_ca nor ssl_ca_path is set")]
    SslWithoutCa(String),
    #[error("[{0}] ssl_cert and ssl_key must be set together")]
    SslCertWithoutKey(String),
    #[error(transparent)]
    Type(#[from] TypeMismatch),
}

impl Violation {
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnknownSection(_) | Self::SslWithoutCa(_) | Self::SslCertWithoutKey(_) => {
                Severity::Warning
            }
            Self::DuplicateListEntry { .. } | Self::ExpectedList { .. } | Self::Type(_) => {
                Severity::Error
            }
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

/// Validate a document, returning all violations found.
pub fn validate(doc: &ConfigDocument) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    // Unknown sections are tolerated, e.g. settings of third-party plugins.
    for name in doc.section_names() {
        if !KNOWN_SECTIONS.contains(&name) {
            violations.push(Violation::UnknownSection(name.to_owned()));
        }
    }

    for &(section, key) in UNIQUE_LISTS {
        check_unique_list(doc, section, key, &mut violations);
    }

    for &(section, key) in PORT_KEYS {
        if let Err(e) = doc.get_port(section, key) {
            violations.push(e.into());
        }
    }

    for &section in DATABASE_SECTIONS {
        if !doc.contains_section(section) {
            continue;
        }
        let tls = read_tls(doc, section, &mut violations);
        if tls.enable_ssl {
            if !tls.has_ca() {
                violations.push(Violation::SslWithoutCa(section.to_owned()));
            }
            if !tls.client_cert_consistent() {
                violations.push(Violation::SslCertWithoutKey(section.to_owned()));
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Read the TLS keys one by one so that every bad key is reported.
/// Unreadable keys count as unset.
fn read_tls(doc: &ConfigDocument, section: &str, violations: &mut Vec<Violation>) -> DatabaseTls {
    let bool_key = |key, violations: &mut Vec<Violation>| {
        or_report(doc.get_optional_bool(section, key), violations).unwrap_or(false)
    };
    let string_key = |key, violations: &mut Vec<Violation>| {
        or_report(doc.get_optional_string(section, key), violations)
    };
    DatabaseTls {
        enable_ssl: bool_key("enable_ssl", violations),
        ssl_ca: string_key("ssl_ca", violations),
        ssl_cert: string_key("ssl_cert", violations),
        ssl_key: string_key("ssl_key", violations),
        ssl_ca_path: string_key("ssl_ca_path", violations),
        ssl_cipher: string_key("ssl_cipher", violations),
        ssl_no_verify: bool_key("ssl_no_verify", violations),
    }
}

fn or_report<T>(result: Result<Option<T>, TypeMismatch>, violations: &mut Vec<Violation>) -> Option<T> {
    result.unwrap_or_else(|e| {
        violations.push(e.into());
        None
    })
}

fn check_unique_list(doc: &ConfigDocument, section: &str, key: &str, violations: &mut Vec<Violation>) {
    let items = match doc.get_list(section, key) {
        Ok(items) => items,
        Err(_) => {
            violations.push(Violation::ExpectedList {
                section: section.to_owned(),
                key: key.to_owned(),
            });
            return;
        }
    };

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for item in &items {
        if !seen.insert(item.as_str()) && reported.insert(item.as_str()) {
            violations.push(Violation::DuplicateListEntry {
                section: section.to_owned(),
                key: key.to_owned(),
                entry: item.clone(),
            });
        }
    }
}
