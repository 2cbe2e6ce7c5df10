//! Database connection settings.

use serde::Serialize;

use super::defaults;
use crate::document::ConfigDocument;
use crate::error::TypeMismatch;

/// Connection parameters from `[database]` (or `[database_tests]`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseSettings {
    /// Server host name; `None` when left empty.
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub dbname: Option<String>,
    pub tables_prefix: String,
    /// TCP port (default: 3306).
    pub port: u16,
    /// Client adapter (default: `PDO\MYSQL`).
    pub adapter: String,
    /// Storage engine, the `type` key (default: `InnoDB`).
    pub engine: String,
    pub schema: String,
    pub charset: String,
    pub tls: DatabaseTls,
}

/// TLS options for the database connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatabaseTls {
    pub enable_ssl: bool,
    pub ssl_ca: Option<String>,
    pub ssl_cert: Option<String>,
    pub ssl_key: Option<String>,
    pub ssl_ca_path: Option<String>,
    pub ssl_cipher: Option<String>,
    pub ssl_no_verify: bool,
}

impl DatabaseTls {
    /// A CA bundle or CA directory is configured.
    pub fn has_ca(&self) -> bool {
        self.ssl_ca.is_some() || self.ssl_ca_path.is_some()
    }

    /// Client certificate and key are either both set or both unset.
    pub fn client_cert_consistent(&self) -> bool {
        self.ssl_cert.is_some() == self.ssl_key.is_some()
    }

    /// Read the TLS keys of the named database section.
    pub fn from_document(doc: &ConfigDocument, section: &str) -> Result<Self, TypeMismatch> {
        Ok(Self {
            enable_ssl: doc.get_optional_bool(section, "enable_ssl")?.unwrap_or(false),
            ssl_ca: doc.get_optional_string(section, "ssl_ca")?,
            ssl_cert: doc.get_optional_string(section, "ssl_cert")?,
            ssl_key: doc.get_optional_string(section, "ssl_key")?,
            ssl_ca_path: doc.get_optional_string(section, "ssl_ca_path")?,
            ssl_cipher: doc.get_optional_string(section, "ssl_cipher")?,
            ssl_no_verify: doc.get_optional_bool(section, "ssl_no_verify")?.unwrap_or(false),
        })
    }
}

impl DatabaseSettings {
    /// Read the named database section, applying defaults for missing keys.
    pub fn from_document(doc: &ConfigDocument, section: &str) -> Result<Self, TypeMismatch> {
        Ok(Self {
            host: doc.get_optional_string(section, "host")?,
            username: doc.get_optional_string(section, "username")?,
            password: doc.get_optional_string(section, "password")?,
            dbname: doc.get_optional_string(section, "dbname")?,
            tables_prefix: doc.get_string(section, "tables_prefix", "")?,
            port: doc.get_port(section, "port")?.unwrap_or(defaults::DATABASE_PORT),
            adapter: doc.get_string(section, "adapter", defaults::DATABASE_ADAPTER)?,
            engine: doc.get_string(section, "type", defaults::DATABASE_TYPE)?,
            schema: doc.get_string(section, "schema", defaults::DATABASE_SCHEMA)?,
            charset: doc.get_string(section, "charset", defaults::DATABASE_CHARSET)?,
            tls: DatabaseTls::from_document(doc, section)?,
        })
    }
}
