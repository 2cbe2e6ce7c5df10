//! Typed access to configuration documents.
//!
//! The accessors on [`ConfigDocument`] fall back to a caller-supplied default
//! when a key is absent, and fail with [`TypeMismatch`] when the stored value
//! cannot be read as the requested type. The submodules build typed views of
//! the well-known sections on top of them:
//! - [`database`]: `[database]` and `[database_tests]` (DatabaseSettings)
//! - [`cache`]: `[Cache]`, `[ChainedCache]`, `[RedisCache]` (CacheSettings)
//! - [`network`]: `[mail]` and `[proxy]` (MailSettings, ProxySettings)
//! - [`log`]: `[log]` (LogSettings)
//! - [`plugins`]: `[Plugins]` and `[PluginsInstalled]` (PluginSettings)

mod cache;
mod database;
mod defaults;
mod log;
mod network;
mod plugins;

pub use cache::{CacheBackend, CacheSettings, RedisSettings};
pub use database::{DatabaseSettings, DatabaseTls};
pub use log::LogSettings;
pub use network::{MailSettings, ProxySettings};
pub use plugins::PluginSettings;

pub(crate) use plugins::{INSTALLED_KEY, INSTALLED_SECTION, PLUGINS_KEY, PLUGINS_SECTION};

use crate::document::{ConfigDocument, Entry, Value, is_float_literal, is_int_literal};
use crate::error::{ExpectedType, TypeMismatch};

impl ConfigDocument {
    /// Read a scalar as text. Numbers and booleans are rendered.
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> Result<String, TypeMismatch> {
        match self.scalar(section, key, ExpectedType::String)? {
            Some(value) => Ok(value.to_string()),
            None => Ok(default.to_owned()),
        }
    }

    /// Read a scalar as an integer. Strings holding an integer are accepted.
    pub fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, TypeMismatch> {
        match self.scalar(section, key, ExpectedType::Integer)? {
            Some(value) => coerce_int(value).ok_or_else(|| mismatch(section, key, ExpectedType::Integer, value)),
            None => Ok(default),
        }
    }

    /// Read a scalar as a float. Integers and numeric strings are accepted.
    pub fn get_float(&self, section: &str, key: &str, default: f64) -> Result<f64, TypeMismatch> {
        match self.scalar(section, key, ExpectedType::Float)? {
            Some(value) => coerce_float(value).ok_or_else(|| mismatch(section, key, ExpectedType::Float, value)),
            None => Ok(default),
        }
    }

    /// Read a scalar as a boolean. Only `0`, `1`, `true` and `false` are accepted.
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, TypeMismatch> {
        match self.scalar(section, key, ExpectedType::Boolean)? {
            Some(value) => coerce_bool(value).ok_or_else(|| mismatch(section, key, ExpectedType::Boolean, value)),
            None => Ok(default),
        }
    }

    /// Read a list key as text items, in file order.
    ///
    /// An absent key yields an empty list; a scalar under that key is a mismatch.
    pub fn get_list(&self, section: &str, key: &str) -> Result<Vec<String>, TypeMismatch> {
        match self.get(section, key) {
            None => Ok(Vec::new()),
            Some(Entry::List(items)) => Ok(items.iter().map(Value::to_string).collect()),
            Some(Entry::Scalar(value)) => Err(mismatch(section, key, ExpectedType::List, value)),
        }
    }

    /// Like [`get_string`](Self::get_string), but an absent or empty value is `None`.
    pub fn get_optional_string(&self, section: &str, key: &str) -> Result<Option<String>, TypeMismatch> {
        Ok(self
            .non_empty(section, key, ExpectedType::String)?
            .map(Value::to_string))
    }

    /// Like [`get_int`](Self::get_int), but an absent or empty value is `None`.
    pub fn get_optional_int(&self, section: &str, key: &str) -> Result<Option<i64>, TypeMismatch> {
        self.non_empty(section, key, ExpectedType::Integer)?
            .map(|value| coerce_int(value).ok_or_else(|| mismatch(section, key, ExpectedType::Integer, value)))
            .transpose()
    }

    /// Like [`get_bool`](Self::get_bool), but an absent or empty value is `None`.
    pub fn get_optional_bool(&self, section: &str, key: &str) -> Result<Option<bool>, TypeMismatch> {
        self.non_empty(section, key, ExpectedType::Boolean)?
            .map(|value| coerce_bool(value).ok_or_else(|| mismatch(section, key, ExpectedType::Boolean, value)))
            .transpose()
    }

    /// Read a TCP port; an absent or empty value is `None`.
    pub fn get_port(&self, section: &str, key: &str) -> Result<Option<u16>, TypeMismatch> {
        self.non_empty(section, key, ExpectedType::Port)?
            .map(|value| {
                coerce_int(value)
                    .and_then(|n| u16::try_from(n).ok())
                    .ok_or_else(|| mismatch(section, key, ExpectedType::Port, value))
            })
            .transpose()
    }

    fn scalar(&self, section: &str, key: &str, expected: ExpectedType) -> Result<Option<&Value>, TypeMismatch> {
        match self.get(section, key) {
            None => Ok(None),
            Some(Entry::Scalar(value)) => Ok(Some(value)),
            Some(Entry::List(_)) => Err(TypeMismatch {
                section: section.to_owned(),
                key: key.to_owned(),
                expected,
                found: "list".to_owned(),
            }),
        }
    }

    fn non_empty(&self, section: &str, key: &str, expected: ExpectedType) -> Result<Option<&Value>, TypeMismatch> {
        Ok(self
            .scalar(section, key, expected)?
            .filter(|value| !value.is_empty_str()))
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Int(n) => Some(*n),
        Value::Str(s) => s.trim().parse().ok(),
        Value::Float(_) | Value::Bool(_) => None,
    }
}

fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Float(x) => Some(*x),
        #[allow(clippy::cast_precision_loss)]
        Value::Int(n) => Some(*n as f64),
        Value::Str(s) => {
            let s = s.trim();
            if is_int_literal(s) || is_float_literal(s) {
                s.parse().ok()
            } else {
                None
            }
        }
        Value::Bool(_) => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Int(0) => Some(false),
        Value::Int(1) => Some(true),
        Value::Str(s) => match s.as_str() {
            "0" | "false" => Some(false),
            "1" | "true" => Some(true),
            _ => None,
        },
        Value::Int(_) | Value::Float(_) => None,
    }
}

fn mismatch(section: &str, key: &str, expected: ExpectedType, value: &Value) -> TypeMismatch {
    TypeMismatch {
        section: section.to_owned(),
        key: key.to_owned(),
        expected,
        found: value.describe(),
    }
}
