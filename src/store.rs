//! Shared, reloadable configuration.
//!
//! A [`ConfigStore`] owns the paths a document was loaded from and publishes
//! the current document behind a single atomic pointer. Readers take a cheap
//! [`Arc`] snapshot and keep it as long as they like; [`ConfigStore::reload`]
//! builds the replacement off to the side and swaps it in with one store, so
//! no reader ever sees a half-updated document.

use arc_swap::ArcSwap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::document::{self, ConfigDocument};
use crate::error::LoadError;

/// Where a store's document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSources {
    /// The shipped defaults, e.g. `config/global.ini.php`.
    pub base: PathBuf,
    /// Local settings layered on top, e.g. `config/config.ini.php`.
    pub overlay: Option<PathBuf>,
}

impl ConfigSources {
    /// Load the base file and, if configured, merge the overlay over it.
    pub fn load(&self) -> Result<ConfigDocument, LoadError> {
        let base = document::load(&self.base)?;
        match &self.overlay {
            Some(path) => {
                let overlay = document::load(path)?;
                debug!(
                    base = %self.base.display(),
                    overlay = %path.display(),
                    "Merging override config"
                );
                Ok(base.merged_with(&overlay))
            }
            None => Ok(base),
        }
    }
}

/// The current configuration document, shared between threads.
#[derive(Debug)]
pub struct ConfigStore {
    sources: ConfigSources,
    current: ArcSwap<ConfigDocument>,
}

impl ConfigStore {
    /// Load a single configuration file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        Self::from_sources(ConfigSources {
            base: path.as_ref().to_path_buf(),
            overlay: None,
        })
    }

    /// Load `base` with `overlay` merged over it.
    pub fn open_layered<P: AsRef<Path>, Q: AsRef<Path>>(base: P, overlay: Q) -> Result<Self, LoadError> {
        Self::from_sources(ConfigSources {
            base: base.as_ref().to_path_buf(),
            overlay: Some(overlay.as_ref().to_path_buf()),
        })
    }

    pub fn from_sources(sources: ConfigSources) -> Result<Self, LoadError> {
        let doc = sources.load()?;
        info!(
            path = %sources.base.display(),
            sections = doc.len(),
            "Loaded configuration"
        );
        Ok(Self {
            sources,
            current: ArcSwap::from_pointee(doc),
        })
    }

    /// Snapshot of the current document.
    pub fn current(&self) -> Arc<ConfigDocument> {
        self.current.load_full()
    }

    pub fn sources(&self) -> &ConfigSources {
        &self.sources
    }

    /// Re-read the source files and publish the result.
    ///
    /// On failure the previously published document stays in place.
    pub fn reload(&self) -> Result<Arc<ConfigDocument>, LoadError> {
        let doc = match self.sources.load() {
            Ok(doc) => Arc::new(doc),
            Err(e) => {
                warn!(error = %e, "Config reload failed, keeping previous configuration");
                return Err(e);
            }
        };
        self.current.store(Arc::clone(&doc));
        info!(
            path = %self.sources.base.display(),
            sections = doc.len(),
            "Configuration reloaded"
        );
        Ok(doc)
    }

    /// Publish a document built elsewhere, e.g. after a programmatic edit.
    pub fn replace(&self, doc: ConfigDocument) -> Arc<ConfigDocument> {
        let doc = Arc::new(doc);
        self.current.store(Arc::clone(&doc));
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn open_reads_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "global.ini.php", "[General]\nx = 1\n");
        let store = ConfigStore::open(&path).unwrap();
        assert_eq!(store.current().get_int("General", "x", 0).unwrap(), 1);
        assert_eq!(store.sources().overlay, None);
    }

    #[test]
    fn open_layered_applies_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let base = write(dir.path(), "global.ini.php", "[General]\nx = 1\n[database]\nport = 3306\n");
        let overlay = write(dir.path(), "config.ini.php", "[General]\nx = 2\ny = 3\n");
        let store = ConfigStore::open_layered(&base, &overlay).unwrap();
        let doc = store.current();
        assert_eq!(doc.get_int("General", "x", 0).unwrap(), 2);
        assert_eq!(doc.get_int("General", "y", 0).unwrap(), 3);
        assert_eq!(doc.get_int("database", "port", 0).unwrap(), 3306);
    }

    #[test]
    fn missing_overlay_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let base = write(dir.path(), "global.ini.php", "[General]\n");
        let err = ConfigStore::open_layered(&base, dir.path().join("config.ini.php")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn reload_swaps_document_and_old_snapshots_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "global.ini.php", "[General]\nx = 1\n");
        let store = ConfigStore::open(&path).unwrap();
        let before = store.current();

        write(dir.path(), "global.ini.php", "[General]\nx = 2\n");
        let after = store.reload().unwrap();

        assert_eq!(before.get_int("General", "x", 0).unwrap(), 1);
        assert_eq!(after.get_int("General", "x", 0).unwrap(), 2);
        assert_eq!(store.current().get_int("General", "x", 0).unwrap(), 2);
    }

    #[test]
    fn failed_reload_keeps_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "global.ini.php", "[General]\nx = 1\n");
        let store = ConfigStore::open(&path).unwrap();

        write(dir.path(), "global.ini.php", "[General]\nx 2\n");
        let err = store.reload().unwrap_err();
        assert_eq!(err.parse_error().map(|e| e.line), Some(2));
        assert_eq!(store.current().get_int("General", "x", 0).unwrap(), 1);
    }

    #[test]
    fn concurrent_readers_see_whole_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "global.ini.php", "[General]\na = 0\nb = 0\n");
        let store = Arc::new(ConfigStore::open(&path).unwrap());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let doc = store.current();
                        let a = doc.get_int("General", "a", -1).unwrap();
                        let b = doc.get_int("General", "b", -1).unwrap();
                        assert_eq!(a, b);
                    }
                })
            })
            .collect();

        for generation in 1..=20 {
            let doc = document::parse(&format!("[General]\na = {generation}\nb = {generation}\n")).unwrap();
            store.replace(doc);
        }

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(store.current().get_int("General", "a", 0).unwrap(), 20);
    }
}
