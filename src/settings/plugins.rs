//! Plugin activation lists.

use serde::Serialize;

use crate::document::ConfigDocument;
use crate::error::TypeMismatch;

pub(crate) const PLUGINS_SECTION: &str = "Plugins";
pub(crate) const PLUGINS_KEY: &str = "Plugins";
pub(crate) const INSTALLED_SECTION: &str = "PluginsInstalled";
pub(crate) const INSTALLED_KEY: &str = "PluginsInstalled";

/// `Plugins[]` (activated) and `PluginsInstalled[]` (installed) in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PluginSettings {
    pub activated: Vec<String>,
    pub installed: Vec<String>,
}

impl PluginSettings {
    pub fn from_document(doc: &ConfigDocument) -> Result<Self, TypeMismatch> {
        Ok(Self {
            activated: doc.get_list(PLUGINS_SECTION, PLUGINS_KEY)?,
            installed: doc.get_list(INSTALLED_SECTION, INSTALLED_KEY)?,
        })
    }

    pub fn is_activated(&self, name: &str) -> bool {
        self.activated.iter().any(|p| p == name)
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.installed.iter().any(|p| p == name)
    }

    /// Activated plugins that are not recorded as installed.
    pub fn activated_not_installed(&self) -> impl Iterator<Item = &str> {
        self.activated
            .iter()
            .filter(|p| !self.is_installed(p))
            .map(String::as_str)
    }
}
