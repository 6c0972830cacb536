// Persisted "already cached" markers, keyed by room scope

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct MarkerFile {
    markers: HashMap<String, String>,
}

/// Small file-backed key-value store for preload skip markers
///
/// A scope (typically a room id) maps to the key `<scope>-cached`; the
/// value `"true"` means that scope's sprites were fully preloaded once and
/// the next pass may be skipped. The check is best-effort: two sessions
/// racing on the same scope both preload, which the cache dedups anyway.
/// Persistence failures degrade to "not cached" and never block the session.
pub struct MarkerStore {
    path: PathBuf,
    file: MarkerFile,
}

impl MarkerStore {
    /// Open a marker store, starting empty if the file is missing or unreadable
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let file = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!("ignoring corrupt marker file {}: {}", path.display(), e);
                MarkerFile::default()
            }),
            Err(_) => MarkerFile::default(),
        };

        Self { path, file }
    }

    fn key(scope: &str) -> String {
        format!("{}-cached", scope)
    }

    /// Check whether a scope was marked as fully cached
    pub fn is_cached(&self, scope: &str) -> bool {
        self.file
            .markers
            .get(&Self::key(scope))
            .is_some_and(|value| value == "true")
    }

    /// Mark a scope as fully cached and persist
    pub fn mark_cached(&mut self, scope: &str) {
        self.file.markers.insert(Self::key(scope), "true".to_string());
        self.save();
    }

    /// Remove a scope's marker and persist
    pub fn clear(&mut self, scope: &str) {
        self.file.markers.remove(&Self::key(scope));
        self.save();
    }

    fn save(&self) {
        let text = match serde_json::to_string_pretty(&self.file) {
            Ok(text) => text,
            Err(e) => {
                warn!("failed to serialize markers: {}", e);
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, text) {
            warn!("failed to persist markers to {}: {}", self.path.display(), e);
        }
    }
}
