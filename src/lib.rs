//! # matomo-config
//!
//! Reader, writer and validator for the INI dialect used by Matomo's
//! `config/global.ini.php` and `config/config.ini.php`.
//!
//! ## Features
//!
//! - Order-preserving parse of sections, scalar keys and `key[] =` lists
//! - Typed accessors with defaults and typed views of well-known sections
//! - Override merging (`config.ini.php` over `global.ini.php`)
//! - Validation with per-violation severity
//! - A reloadable, lock-free shared store
//! - Plugin list reconciliation against a plugins directory
//!
//! ## Quick Start
//!
//! ```rust
//! use matomo_config::parse;
//!
//! let doc = parse("; <?php exit; ?> DO NOT REMOVE THIS LINE\n[database]\nhost =\nport = 3306\n")
//!     .expect("valid config");
//!
//! assert_eq!(doc.get_string("database", "host", "localhost").unwrap(), "");
//! assert_eq!(doc.get_int("database", "port", 0).unwrap(), 3306);
//! ```
//!
//! ### Layering and validation
//!
//! ```rust
//! use matomo_config::{merge, parse, validate};
//!
//! let base = parse("[General]\nx = 1\n").unwrap();
//! let local = parse("[General]\nx = 2\ny = 3\n").unwrap();
//! let merged = merge(&base, &local);
//!
//! assert_eq!(merged.get_int("General", "x", 0).unwrap(), 2);
//! assert!(validate(&merged).is_ok());
//! ```

pub mod document;
pub mod error;
pub mod plugins;
pub mod settings;
pub mod store;
pub mod validation;

pub use document::{
    ConfigDocument, Entry, GUARD_LINE, Section, Value, load, merge, parse, save, write, write_to,
};
pub use error::{EntryKind, ExpectedType, LoadError, ParseError, ParseErrorKind, TypeMismatch, WriteError};
pub use plugins::{PluginReport, reconcile_plugins};
pub use store::{ConfigSources, ConfigStore};
pub use validation::{Severity, Violation, validate};
