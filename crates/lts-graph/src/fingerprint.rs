// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Content fingerprint of a diagram, used as the namespace for saved layouts.
//!
//! A 31-multiplier polynomial hash over the UTF-16 code units of the JSON
//! serialization of the ordered element list, with 32-bit wraparound. Collisions
//! only cause a wrong layout to be restored.

use crate::model::Element;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key prefix under which layouts are stored.
pub const LAYOUT_KEY_PREFIX: &str = "layout:";

/// Deterministic short identity of an element list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphFingerprint(String);

impl GraphFingerprint {
    /// Fingerprint an ordered element list.
    pub fn of(elements: &[Element]) -> Self {
        let serialized = serde_json::to_string(elements).unwrap_or_default();
        Self(format!("{:08x}", rolling_hash(&serialized)))
    }

    /// Wrap an already computed fingerprint string.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Recover the fingerprint from a `layout:<fp>` store key.
    pub fn from_layout_key(key: &str) -> Option<Self> {
        key.strip_prefix(LAYOUT_KEY_PREFIX)
            .filter(|fp| !fp.is_empty())
            .map(Self::from_raw)
    }

    /// `layout:<fp>`
    pub fn layout_key(&self) -> String {
        format!("{LAYOUT_KEY_PREFIX}{}", self.0)
    }

    /// Raw fingerprint text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GraphFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn rolling_hash(text: &str) -> u32 {
    text.encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(u32::from(unit)))
}

/// Shorthand for [`GraphFingerprint::of`].
pub fn fingerprint(elements: &[Element]) -> GraphFingerprint {
    GraphFingerprint::of(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementKind;

    fn node(id: &str) -> Element {
        Element {
            id: id.into(),
            kind: ElementKind::StateNode,
            label: id.into(),
            classes: std::iter::once("state-node".to_string()).collect(),
            source: None,
            target: None,
            position: None,
        }
    }

    #[test]
    fn rolling_hash_matches_reference_values() {
        assert_eq!(rolling_hash(""), 0);
        assert_eq!(rolling_hash("a"), 97);
        assert_eq!(rolling_hash("ab"), 97 * 31 + 98);
    }

    #[test]
    fn fingerprint_is_order_sensitive() {
        let ab = [node("a"), node("b")];
        let ba = [node("b"), node("a")];
        assert_eq!(fingerprint(&ab), fingerprint(&ab));
        assert_ne!(fingerprint(&ab), fingerprint(&ba));
    }

    #[test]
    fn layout_key_round_trips() {
        let fp = fingerprint(&[node("a")]);
        let key = fp.layout_key();
        assert!(key.starts_with("layout:"));
        assert_eq!(GraphFingerprint::from_layout_key(&key), Some(fp));
        assert_eq!(GraphFingerprint::from_layout_key("prefs"), None);
        assert_eq!(GraphFingerprint::from_layout_key("layout:"), None);
    }
}
