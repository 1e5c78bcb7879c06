// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-diagram node coordinates, keyed by graph fingerprint.
//!
//! Entries live under `layout:<fingerprint>` in the backing [`ConfigStore`].
//! The exported bundle is the same mapping serialized as one JSON object, so
//! export followed by import reproduces the store's key set exactly.

use crate::config::{ConfigError, ConfigService, ConfigStore};
use lts_graph::{ElementId, GraphFingerprint, Position, LAYOUT_KEY_PREFIX};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Node coordinates of one diagram.
pub type PersistedLayout = BTreeMap<ElementId, Position>;

/// Every persisted layout, keyed by `layout:<fingerprint>`.
pub type LayoutBundle = BTreeMap<String, PersistedLayout>;

/// Errors surfaced by layout export/import.
#[derive(Debug, Error)]
pub enum LayoutStoreError {
    /// Nothing has been saved yet.
    #[error("no saved layouts to export")]
    EmptyStore,
    /// Imported bundle is not a well-formed layout bundle.
    #[error("malformed layout bundle: {0}")]
    Parse(#[from] serde_json::Error),
    /// The backing store failed.
    #[error("layout store error: {0}")]
    Store(#[from] ConfigError),
}

/// Persistence of node coordinates keyed by [`GraphFingerprint`].
pub struct LayoutStore<S> {
    service: ConfigService<S>,
    seed_attempted: bool,
}

impl<S: ConfigStore> LayoutStore<S> {
    /// Wrap a backing store.
    pub fn new(store: S) -> Self {
        Self {
            service: ConfigService::new(store),
            seed_attempted: false,
        }
    }

    /// Borrow the backing store.
    pub fn store(&self) -> &S {
        self.service.store()
    }

    /// Overwrite the layout saved for `fp`.
    pub fn save(
        &self,
        fp: &GraphFingerprint,
        positions: &PersistedLayout,
    ) -> Result<(), LayoutStoreError> {
        self.service.save(&fp.layout_key(), positions)?;
        debug!(fingerprint = %fp, nodes = positions.len(), "layout saved");
        Ok(())
    }

    /// Layout saved for `fp`. Corrupt entries are discarded and reported as absent.
    pub fn load(&self, fp: &GraphFingerprint) -> Option<PersistedLayout> {
        let key = fp.layout_key();
        match self.service.load::<PersistedLayout>(&key) {
            Ok(found) => found,
            Err(ConfigError::Serde(err)) => {
                warn!(fingerprint = %fp, %err, "discarding corrupt layout entry");
                if let Err(err) = self.service.remove(&key) {
                    warn!(fingerprint = %fp, %err, "failed to discard corrupt layout entry");
                }
                None
            }
            Err(err) => {
                warn!(fingerprint = %fp, %err, "layout load failed");
                None
            }
        }
    }

    /// Number of stored layout entries.
    pub fn len(&self) -> Result<usize, LayoutStoreError> {
        Ok(self.service.keys_with_prefix(LAYOUT_KEY_PREFIX)?.len())
    }

    /// True when no layout is stored.
    pub fn is_empty(&self) -> Result<bool, LayoutStoreError> {
        Ok(self.len()? == 0)
    }

    /// Collect every readable entry into a bundle.
    pub fn export_all(&self) -> Result<LayoutBundle, LayoutStoreError> {
        let mut bundle = LayoutBundle::new();
        for key in self.service.keys_with_prefix(LAYOUT_KEY_PREFIX)? {
            let Some(fp) = GraphFingerprint::from_layout_key(&key) else {
                continue;
            };
            if let Some(layout) = self.load(&fp) {
                bundle.insert(key, layout);
            }
        }
        if bundle.is_empty() {
            return Err(LayoutStoreError::EmptyStore);
        }
        Ok(bundle)
    }

    /// [`export_all`](Self::export_all) serialized for download.
    pub fn export_json(&self) -> Result<String, LayoutStoreError> {
        Ok(serde_json::to_string_pretty(&self.export_all()?)?)
    }

    /// Merge a serialized bundle into the store, overwriting same-key entries.
    ///
    /// The whole bundle is parsed before anything is written, so a malformed
    /// bundle leaves the store untouched. Keys outside the `layout:` namespace
    /// are ignored whatever their value. Returns the number of entries imported.
    pub fn import_all(&self, bundle_json: &str) -> Result<usize, LayoutStoreError> {
        Ok(self.import_fingerprints(bundle_json)?.len())
    }

    /// [`import_all`](Self::import_all), returning the fingerprints written.
    pub fn import_fingerprints(
        &self,
        bundle_json: &str,
    ) -> Result<Vec<GraphFingerprint>, LayoutStoreError> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(bundle_json)?;
        let mut decoded = Vec::new();
        for (key, value) in raw {
            let Some(fp) = GraphFingerprint::from_layout_key(&key) else {
                debug!(%key, "ignoring unrecognized bundle key");
                continue;
            };
            let layout: PersistedLayout = serde_json::from_value(value)?;
            decoded.push((fp, layout));
        }
        for (fp, layout) in &decoded {
            self.save(fp, layout)?;
        }
        info!(imported = decoded.len(), "layout bundle imported");
        Ok(decoded.into_iter().map(|(fp, _)| fp).collect())
    }

    /// Import the bundle at `path` if the store holds no layouts.
    ///
    /// Runs at most once per store; later calls return 0 without touching the
    /// file. Read and parse failures are logged and leave the store empty.
    #[allow(clippy::future_not_send)]
    pub async fn seed_from_file_if_empty(&mut self, path: &Path) -> usize {
        if self.seed_attempted {
            return 0;
        }
        self.seed_attempted = true;

        match self.is_empty() {
            Ok(true) => {}
            Ok(false) => return 0,
            Err(err) => {
                warn!(%err, "cannot inspect layout store; skipping seed");
                return 0;
            }
        }

        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path.display(), %err, "layout seed bundle unavailable");
                return 0;
            }
        };
        match self.import_all(&text) {
            Ok(n) => {
                info!(path = %path.display(), imported = n, "layout store seeded");
                n
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "layout seed bundle rejected");
                0
            }
        }
    }
}
