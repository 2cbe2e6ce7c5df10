//! Outbound mail and HTTP proxy settings.

use serde::Serialize;

use super::defaults;
use crate::document::ConfigDocument;
use crate::error::TypeMismatch;

/// `[mail]` settings. Empty keys read as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailSettings {
    /// Host name used in sender addresses when none is known.
    pub default_hostname_if_empty: String,
    /// `smtp` or empty for the local mailer.
    pub transport: Option<String>,
    pub port: Option<u16>,
    pub host: Option<String>,
    /// SMTP authentication type, the `type` key.
    pub auth_type: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub encryption: Option<String>,
}

impl MailSettings {
    pub fn from_document(doc: &ConfigDocument) -> Result<Self, TypeMismatch> {
        Ok(Self {
            default_hostname_if_empty: doc.get_string(
                "mail",
                "defaultHostnameIfEmpty",
                defaults::MAIL_DEFAULT_HOSTNAME,
            )?,
            transport: doc.get_optional_string("mail", "transport")?,
            port: doc.get_port("mail", "port")?,
            host: doc.get_optional_string("mail", "host")?,
            auth_type: doc.get_optional_string("mail", "type")?,
            username: doc.get_optional_string("mail", "username")?,
            password: doc.get_optional_string("mail", "password")?,
            encryption: doc.get_optional_string("mail", "encryption")?,
        })
    }

    pub fn uses_smtp(&self) -> bool {
        self.transport.as_deref() == Some("smtp")
    }
}

/// `[proxy]` settings for outgoing HTTP requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxySettings {
    /// Authentication scheme (default: `BASIC`).
    pub proxy_type: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxySettings {
    pub fn from_document(doc: &ConfigDocument) -> Result<Self, TypeMismatch> {
        Ok(Self {
            proxy_type: doc.get_string("proxy", "type", defaults::PROXY_TYPE)?,
            host: doc.get_optional_string("proxy", "host")?,
            port: doc.get_port("proxy", "port")?,
            username: doc.get_optional_string("proxy", "username")?,
            password: doc.get_optional_string("proxy", "password")?,
        })
    }

    /// A proxy is only used when both host and port are set.
    pub fn is_enabled(&self) -> bool {
        self.host.is_some() && self.port.is_some()
    }
}
