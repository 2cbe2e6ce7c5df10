//! Cache backend selection.

use serde::Serialize;

use super::defaults;
use crate::document::ConfigDocument;
use crate::error::TypeMismatch;

/// A cache backend name as used by `[Cache] backend` and `[ChainedCache] backends[]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Array,
    File,
    Chained,
    Redis,
    Null,
    /// A backend this crate does not know about, kept verbatim.
    Other(String),
}

impl From<&str> for CacheBackend {
    fn from(name: &str) -> Self {
        match name {
            "array" => Self::Array,
            "file" => Self::File,
            "chained" => Self::Chained,
            "redis" => Self::Redis,
            "null" => Self::Null,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// `[RedisCache]` connection settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub unix_socket: Option<String>,
    /// Connect timeout in seconds; 0 means no timeout.
    pub timeout: f64,
    pub password: Option<String>,
    pub database: i64,
}

/// Cache configuration across `[Cache]`, `[ChainedCache]` and `[RedisCache]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheSettings {
    pub backend: CacheBackend,
    /// Backends tried in order when `backend` is `chained`.
    pub chained: Vec<CacheBackend>,
    pub redis: RedisSettings,
}

impl CacheSettings {
    pub fn from_document(doc: &ConfigDocument) -> Result<Self, TypeMismatch> {
        let backend = doc.get_string("Cache", "backend", defaults::CACHE_BACKEND)?;

        let chained = if doc.get("ChainedCache", "backends").is_some() {
            doc.get_list("ChainedCache", "backends")?
        } else {
            defaults::chained_backends()
        };

        Ok(Self {
            backend: CacheBackend::from(backend.as_str()),
            chained: chained.iter().map(|name| CacheBackend::from(name.as_str())).collect(),
            redis: RedisSettings {
                host: doc.get_string("RedisCache", "host", defaults::REDIS_HOST)?,
                port: doc
                    .get_port("RedisCache", "port")?
                    .unwrap_or(defaults::REDIS_PORT),
                unix_socket: doc.get_optional_string("RedisCache", "unix_socket")?,
                timeout: doc.get_float("RedisCache", "timeout", defaults::REDIS_TIMEOUT)?,
                password: doc.get_optional_string("RedisCache", "password")?,
                database: doc.get_int("RedisCache", "database", defaults::REDIS_DATABASE)?,
            },
        })
    }

    /// The backends actually consulted, in order.
    pub fn effective_backends(&self) -> Vec<&CacheBackend> {
        match self.backend {
            CacheBackend::Chained => self.chained.iter().collect(),
            ref single => vec![single],
        }
    }
}
