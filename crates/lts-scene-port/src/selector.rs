// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Element selectors for surface lookups.

use lts_graph::{classes, Element, ElementId};

/// Which loaded elements a lookup targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Every element.
    All,
    /// A single id.
    Id(ElementId),
    /// Any of the listed ids.
    AnyOf(Vec<ElementId>),
    /// Elements carrying every listed class.
    Classes(Vec<String>),
}

impl Selector {
    /// Action nodes the user may tap.
    pub fn enabled_actions() -> Self {
        Self::Classes(vec![classes::EVENT_NODE.into(), classes::ENABLED.into()])
    }

    /// True when `el` is selected.
    pub fn matches(&self, el: &Element) -> bool {
        match self {
            Self::All => true,
            Self::Id(id) => el.id == *id,
            Self::AnyOf(ids) => ids.iter().any(|id| el.id == *id),
            Self::Classes(cls) => cls.iter().all(|c| el.has_class(c)),
        }
    }
}
