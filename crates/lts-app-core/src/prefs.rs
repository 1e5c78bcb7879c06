// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Explorer preferences (timing constants + layout defaults).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Smallest auto-advance period accepted, in seconds.
pub const MIN_AUTO_ADVANCE_SECS: f64 = 0.1;

/// Largest auto-advance period accepted, in seconds (one day).
pub const MAX_AUTO_ADVANCE_SECS: f64 = 86_400.0;

/// Clamp a user-supplied auto-advance delay into
/// [`MIN_AUTO_ADVANCE_SECS`]..=[`MAX_AUTO_ADVANCE_SECS`].
/// Non-finite input falls back to the minimum.
pub fn clamp_auto_advance(delay_secs: f64) -> f64 {
    if delay_secs.is_finite() {
        delay_secs.clamp(MIN_AUTO_ADVANCE_SECS, MAX_AUTO_ADVANCE_SECS)
    } else {
        MIN_AUTO_ADVANCE_SECS
    }
}

/// Saved preferences for the explorer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExplorerPrefs {
    /// Seconds of model time per auto-advance tick.
    pub auto_advance_secs: f64,
    /// How long the last transition stays highlighted.
    pub flash_ms: u64,
    /// How long the first render waits for the position oracle.
    pub oracle_timeout_ms: u64,
    /// Layout used when the position oracle provides nothing.
    pub layout: String,
    /// Bundle imported into an empty layout store on first render.
    pub seed_bundle: Option<PathBuf>,
}

impl Default for ExplorerPrefs {
    fn default() -> Self {
        Self {
            auto_advance_secs: 1.0,
            flash_ms: 1000,
            oracle_timeout_ms: 5000,
            layout: "dagre".into(),
            seed_bundle: None,
        }
    }
}

impl ExplorerPrefs {
    /// Flash duration clamped to 500–1000 ms.
    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.flash_ms.clamp(500, 1000))
    }

    /// Oracle wait budget.
    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle_timeout_ms)
    }

    /// Auto-advance period, clamped.
    pub fn auto_advance_delay(&self) -> f64 {
        clamp_auto_advance(self.auto_advance_secs)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn delay_is_clamped() {
        assert!((clamp_auto_advance(0.01) - 0.1).abs() < f64::EPSILON);
        assert!((clamp_auto_advance(-3.0) - 0.1).abs() < f64::EPSILON);
        assert!((clamp_auto_advance(f64::NAN) - 0.1).abs() < f64::EPSILON);
        assert!((clamp_auto_advance(2.5) - 2.5).abs() < f64::EPSILON);
        assert!((clamp_auto_advance(1e20) - MAX_AUTO_ADVANCE_SECS).abs() < f64::EPSILON);
        assert!((clamp_auto_advance(f64::INFINITY) - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn flash_duration_stays_in_range() {
        let mut prefs = ExplorerPrefs::default();
        assert_eq!(prefs.flash_duration(), Duration::from_millis(1000));
        prefs.flash_ms = 50;
        assert_eq!(prefs.flash_duration(), Duration::from_millis(500));
        prefs.flash_ms = 5000;
        assert_eq!(prefs.flash_duration(), Duration::from_millis(1000));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let prefs: ExplorerPrefs = serde_json::from_str(r#"{"layout": "cose"}"#).unwrap();
        assert_eq!(prefs.layout, "cose");
        assert_eq!(prefs.flash_ms, 1000);
    }
}
