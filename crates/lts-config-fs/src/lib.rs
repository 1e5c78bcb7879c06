// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed `ConfigStore` for the LTS explorer (uses platform config dir).
//!
//! Plain keys map to `<base>/<key>.json`; namespaced keys such as
//! `layout:1a2b3c4d` map to `<base>/layout/1a2b3c4d.json`.

use directories::ProjectDirs;
use lts_app_core::config::{ConfigError, ConfigStore};
use std::fs;
use std::path::{Path, PathBuf};

/// Store blobs as JSON files under a base directory.
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// Create a store rooted at the user config directory (e.g., `~/.config/lts-explorer`).
    pub fn new() -> Result<Self, ConfigError> {
        let proj = ProjectDirs::from("dev", "lts", "lts-explorer")
            .ok_or_else(|| ConfigError::Other("could not resolve config dir".into()))?;
        Self::with_base(proj.config_dir())
    }

    /// Create a store rooted at `base`, creating the directory if needed.
    pub fn with_base(base: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let base = base.as_ref().to_path_buf();
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    /// Root directory of the store.
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, ConfigError> {
        let (dir, name) = match key.split_once(':') {
            Some((ns, rest)) => (Some(ns), rest),
            None => (None, key),
        };
        for part in dir.iter().chain(std::iter::once(&name)) {
            if part.is_empty() || part.contains(['/', '\\', ':']) || part.starts_with('.') {
                return Err(ConfigError::Other(format!("unsupported key: {key}")));
            }
        }
        let filename = format!("{name}.json");
        Ok(match dir {
            Some(ns) => self.base.join(ns).join(filename),
            None => self.base.join(filename),
        })
    }
}

fn json_stems(dir: &Path) -> Result<Vec<String>, ConfigError> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                out.push(stem.to_string());
            }
        }
    }
    Ok(out)
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let path = self.path_for(key)?;
        match fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        Ok(())
    }

    fn remove_raw(&self, key: &str) -> Result<(), ConfigError> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn keys(&self) -> Result<Vec<String>, ConfigError> {
        let mut keys = json_stems(&self.base)?;
        for entry in fs::read_dir(&self.base)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            let Some(ns) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };
            keys.extend(
                json_stems(&path)?
                    .into_iter()
                    .map(|stem| format!("{ns}:{stem}")),
            );
        }
        keys.sort();
        Ok(keys)
    }
}
