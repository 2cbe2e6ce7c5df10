//! Reconcile plugin lists with the plugins shipped on disk.
//!
//! A distribution may drop plugin folders (e.g. the example plugins) after
//! `global.ini.php` was generated. Reconciling:
//! - removes plugins without a folder from `Plugins[]` and `PluginsInstalled[]`
//! - adds core plugins (a folder without `plugin.json`) to `PluginsInstalled[]`

use std::path::Path;
use tracing::debug;

use crate::document::{ConfigDocument, Entry, Value};
use crate::error::TypeMismatch;
use crate::settings::{INSTALLED_KEY, INSTALLED_SECTION, PLUGINS_KEY, PLUGINS_SECTION};

/// What [`reconcile_plugins`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginReport {
    /// Plugins dropped because their folder is missing.
    pub removed: Vec<String>,
    /// Core plugins newly recorded as installed.
    pub registered: Vec<String>,
}

impl PluginReport {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.registered.is_empty()
    }
}

/// Bring the plugin lists of `doc` in line with the folders in `plugins_dir`.
///
/// Fails without touching `doc` if either plugin key holds a scalar instead
/// of a list.
pub fn reconcile_plugins(doc: &mut ConfigDocument, plugins_dir: &Path) -> Result<PluginReport, TypeMismatch> {
    let activated = doc.get_list(PLUGINS_SECTION, PLUGINS_KEY)?;
    let installed = doc.get_list(INSTALLED_SECTION, INSTALLED_KEY)?;

    let mut report = PluginReport::default();
    let mut core = Vec::new();
    for name in &activated {
        if report.removed.contains(name) || core.contains(name) {
            continue;
        }
        let folder = plugins_dir.join(name);
        if !folder.is_dir() {
            debug!(plugin = %name, folder = %folder.display(), "Removing plugin, folder not found");
            report.removed.push(name.clone());
        } else if !folder.join("plugin.json").exists() {
            debug!(plugin = %name, "Core plugin, loading by default (no plugin.json)");
            core.push(name.clone());
        }
    }

    if !report.removed.is_empty() {
        retain_list(doc, PLUGINS_SECTION, PLUGINS_KEY, |item| !report.removed.contains(item));
        retain_list(doc, INSTALLED_SECTION, INSTALLED_KEY, |item| !report.removed.contains(item));
    }

    report.registered = core.into_iter().filter(|name| !installed.contains(name)).collect();
    if report.registered.is_empty() {
        return Ok(report);
    }

    let section = doc.section_or_insert(INSTALLED_SECTION);
    let added = report.registered.iter().map(|name| Value::Str(name.clone()));
    match section.get_mut(INSTALLED_KEY) {
        Some(Entry::List(items)) => items.extend(added),
        // get_list above rules out a scalar here.
        _ => {
            section.insert(INSTALLED_KEY, Entry::List(added.collect()));
        }
    }

    Ok(report)
}

fn retain_list(doc: &mut ConfigDocument, section: &str, key: &str, keep: impl Fn(&String) -> bool) {
    if let Some(Entry::List(items)) = doc.section_mut(section).and_then(|s| s.get_mut(key)) {
        items.retain(|v| keep(&v.to_string()));
    }
}
