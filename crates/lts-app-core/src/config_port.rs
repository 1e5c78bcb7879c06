// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config port for loading/saving explorer preferences.

use crate::config::{ConfigService, ConfigStore};
use crate::prefs::ExplorerPrefs;
use tracing::warn;

/// Key under which preferences are stored.
pub const PREFS_KEY: &str = "prefs";

/// Config-facing port for explorer preferences.
pub trait ConfigPort {
    /// Load preferences (returns None if missing or unreadable).
    fn load_prefs(&self) -> Option<ExplorerPrefs>;
    /// Persist preferences (best-effort; failures are logged).
    fn save_prefs(&self, prefs: &ExplorerPrefs);
}

impl<S: ConfigStore> ConfigPort for ConfigService<S> {
    fn load_prefs(&self) -> Option<ExplorerPrefs> {
        match self.load(PREFS_KEY) {
            Ok(prefs) => prefs,
            Err(err) => {
                warn!(%err, "ignoring unreadable prefs");
                None
            }
        }
    }

    fn save_prefs(&self, prefs: &ExplorerPrefs) {
        if let Err(err) = self.save(PREFS_KEY, prefs) {
            warn!(%err, "failed to save prefs");
        }
    }
}
