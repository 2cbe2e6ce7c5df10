//! Scalar values and section entries.

use serde::Serialize;
use std::fmt;

use crate::error::EntryKind;

/// A single configuration value.
///
/// The variant is inferred from unquoted text when parsing; quoted text is
/// always a string. Typed accessors coerce between variants on read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Infer a value from unquoted text.
    ///
    /// Integers without leading zeros become [`Value::Int`], decimal literals
    /// with a fraction or exponent become [`Value::Float`], `true`/`false`
    /// become [`Value::Bool`]; anything else stays a string.
    pub fn infer(text: &str) -> Self {
        match text {
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            _ => {}
        }
        if is_int_literal(text)
            && let Ok(n) = text.parse::<i64>()
        {
            return Self::Int(n);
        }
        if is_float_literal(text)
            && let Ok(f) = text.parse::<f64>()
            && f.is_finite()
        {
            return Self::Float(f);
        }
        Self::Str(text.to_owned())
    }

    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// True for the empty string, which is what `key =` parses to.
    pub fn is_empty_str(&self) -> bool {
        matches!(self, Self::Str(s) if s.is_empty())
    }

    /// Short description used in type mismatch reports.
    pub fn describe(&self) -> String {
        match self {
            Self::Bool(b) => format!("boolean {b}"),
            Self::Int(n) => format!("integer {n}"),
            Self::Float(f) => format!("float {f:?}"),
            Self::Str(s) => format!("string {s:?}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            // Debug keeps a `.0` on whole numbers so the text reads back as a float.
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// The value bound to a key: one scalar, or the ordered items of a list key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Scalar(Value),
    List(Vec<Value>),
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Scalar(_) => EntryKind::Scalar,
            Self::List(_) => EntryKind::List,
        }
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            Self::Scalar(_) => None,
        }
    }
}

/// `-?(0|[1-9][0-9]*)`
pub(crate) fn is_int_literal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    match digits.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        bytes => bytes.iter().all(u8::is_ascii_digit),
    }
}

/// `-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?`, with a fraction or an exponent.
pub(crate) fn is_float_literal(text: &str) -> bool {
    let body = text.strip_prefix('-').unwrap_or(text);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
        None => (body, None),
    };
    let (whole, fraction) = match mantissa.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (mantissa, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) {
        return false;
    }
    if let Some(fraction) = fraction
        && !all_digits(fraction)
    {
        return false;
    }
    if let Some(exponent) = exponent {
        let exp_digits = exponent
            .strip_prefix(['+', '-'])
            .unwrap_or(exponent);
        if !all_digits(exp_digits) {
            return false;
        }
    }
    fraction.is_some() || exponent.is_some()
}
