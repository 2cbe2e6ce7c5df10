//! Default values for the typed section views.
//!
//! These mirror what the shipped `global.ini.php` sets, so a view built from
//! an empty document matches one built from the stock file.

// =============================================================================
// Database Defaults
// =============================================================================

pub const DATABASE_PORT: u16 = 3306;
pub const DATABASE_ADAPTER: &str = "PDO\\MYSQL";
pub const DATABASE_TYPE: &str = "InnoDB";
pub const DATABASE_SCHEMA: &str = "Mysql";
pub const DATABASE_CHARSET: &str = "utf8";

// =============================================================================
// Cache Defaults
// =============================================================================

pub const CACHE_BACKEND: &str = "chained";

pub fn chained_backends() -> Vec<String> {
    vec!["array".to_owned(), "file".to_owned()]
}

pub const REDIS_HOST: &str = "127.0.0.1";
pub const REDIS_PORT: u16 = 6379;
pub const REDIS_TIMEOUT: f64 = 0.0;
pub const REDIS_DATABASE: i64 = 14;

// =============================================================================
// Mail / Proxy Defaults
// =============================================================================

pub const MAIL_DEFAULT_HOSTNAME: &str = "defaultHostnameIfEmpty.example.org";
pub const PROXY_TYPE: &str = "BASIC";

// =============================================================================
// Log Defaults
// =============================================================================

pub fn log_writers() -> Vec<String> {
    vec!["screen".to_owned()]
}

pub const LOG_LEVEL: &str = "WARN";
pub const LOG_FILE_PATH: &str = "tmp/logs/piwik.log";
