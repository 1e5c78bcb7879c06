// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Keeps one graph surface in step with successive snapshots.
//!
//! The first snapshot builds the diagram (oracle placement, automatic layout
//! or a restored layout). Every later snapshot replaces the element set
//! declaratively so surviving nodes keep their coordinates, and highlights the
//! transition that produced it for a bounded time.

use crate::error::ExplorerError;
use crate::oracle::{await_oracle, OracleReceiver};
use crate::placement::place_from_oracle;
use lts_app_core::config::ConfigStore;
use lts_app_core::layout_store::{LayoutStore, PersistedLayout};
use lts_app_core::prefs::ExplorerPrefs;
use lts_graph::{
    classes, flash_set, ElementId, GraphFingerprint, Position, Snapshot, Transition,
    TransitionIndex,
};
use lts_scene_port::{GraphSurface, LayoutKind, LayoutSpec, Selector};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Tunables for one synchronizer.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOptions {
    /// How long `transition-flash` stays on.
    pub flash_duration: Duration,
    /// Layout run when the oracle placed nothing.
    pub fallback_layout: LayoutKind,
    /// How long the first render waits for the oracle.
    pub oracle_timeout: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::from(&ExplorerPrefs::default())
    }
}

impl From<&ExplorerPrefs> for SyncOptions {
    fn from(prefs: &ExplorerPrefs) -> Self {
        let fallback_layout = prefs.layout.parse().unwrap_or_else(|err| {
            warn!(%err, "unknown layout preference; using dagre");
            LayoutKind::Dagre
        });
        Self {
            flash_duration: prefs.flash_duration(),
            fallback_layout,
            oracle_timeout: prefs.oracle_timeout(),
        }
    }
}

#[derive(Debug)]
struct Flash {
    ids: Vec<ElementId>,
    expires_at: Instant,
}

/// Owner of one rendered diagram.
pub struct DiagramSynchronizer<S> {
    surface: S,
    fingerprint: GraphFingerprint,
    index: TransitionIndex,
    layout: LayoutKind,
    flash: Option<Flash>,
    options: SyncOptions,
}

impl<S: GraphSurface> DiagramSynchronizer<S> {
    /// Build the diagram for the first snapshot.
    ///
    /// Waits for the oracle (bounded by `options.oracle_timeout`), places
    /// nodes from it when it knows any, otherwise runs the fallback layout.
    /// A layout previously saved under the same fingerprint then overrides
    /// whatever placement was computed.
    #[allow(clippy::future_not_send)]
    #[instrument(skip_all, fields(elements = snapshot.graph_elements.len()))]
    pub async fn initialize<C: ConfigStore>(
        mut surface: S,
        snapshot: &Snapshot,
        oracle: Option<OracleReceiver>,
        layouts: &LayoutStore<C>,
        options: SyncOptions,
    ) -> Result<Self, ExplorerError> {
        let fingerprint = GraphFingerprint::of(&snapshot.graph_elements);
        let mut elements = snapshot.graph_elements.clone();

        let placed = match await_oracle(oracle, options.oracle_timeout).await {
            Some(oracle) if !oracle.is_empty() => {
                place_from_oracle(&mut elements, &oracle).any_placed()
            }
            _ => false,
        };
        let layout = if placed {
            LayoutKind::Preset
        } else {
            options.fallback_layout
        };

        surface.set_elements(&elements)?;
        surface.run_layout(&LayoutSpec::for_kind(layout));

        let mut sync = Self {
            surface,
            fingerprint,
            index: TransitionIndex::build(snapshot),
            layout,
            flash: None,
            options,
        };
        let restored = sync.reapply_saved_layout(layouts);
        info!(
            fingerprint = %sync.fingerprint,
            layout = %layout,
            restored,
            tappable = sync.tappable().len(),
            "diagram initialized"
        );
        Ok(sync)
    }

    /// Apply a non-initial snapshot.
    ///
    /// Returns the ids highlighted for `snapshot.last_transition`. On error
    /// the previously rendered diagram is left as it was.
    pub fn apply_update(
        &mut self,
        snapshot: &Snapshot,
        now: Instant,
    ) -> Result<Vec<ElementId>, ExplorerError> {
        self.surface.set_elements(&snapshot.graph_elements)?;
        // A fresh element set carries no flash class.
        self.flash = None;
        self.index = TransitionIndex::build(snapshot);

        let ids = match &snapshot.last_transition {
            Some(transition) => self.flash_transition(transition, now),
            None => Vec::new(),
        };
        debug!(
            flashed = ids.len(),
            tappable = self.tappable().len(),
            "diagram updated"
        );
        Ok(ids)
    }

    fn flash_transition(&mut self, transition: &Transition, now: Instant) -> Vec<ElementId> {
        let ids: Vec<ElementId> = flash_set(transition)
            .into_iter()
            .filter(|id| self.surface.contains(id))
            .collect();
        if ids.is_empty() {
            warn!(from = %transition.from, to = %transition.to, "last transition not on diagram");
            return ids;
        }
        self.surface.add_class(&ids, classes::TRANSITION_FLASH);
        self.flash = Some(Flash {
            ids: ids.clone(),
            expires_at: now + self.options.flash_duration,
        });
        ids
    }

    /// Remove the highlight once its deadline has passed. Returns true when
    /// something was removed.
    pub fn expire_flash(&mut self, now: Instant) -> bool {
        match &self.flash {
            Some(flash) if flash.expires_at <= now => {}
            _ => return false,
        }
        if let Some(flash) = self.flash.take() {
            self.surface.remove_class(&flash.ids, classes::TRANSITION_FLASH);
        }
        true
    }

    /// When the current highlight ends.
    pub fn flash_deadline(&self) -> Option<Instant> {
        self.flash.as_ref().map(|f| f.expires_at)
    }

    /// Ids currently highlighted.
    pub fn flashed(&self) -> &[ElementId] {
        match &self.flash {
            Some(flash) => &flash.ids,
            None => &[],
        }
    }

    /// Loaded elements that accept taps (enabled action nodes). Hosts attach
    /// their tap handlers to these after every load.
    pub fn tappable(&self) -> Vec<ElementId> {
        self.surface.select(&Selector::enabled_actions())
    }

    /// Transition fired by tapping `element_id`, if it is an enabled action.
    pub fn resolve_tap(&self, element_id: &str) -> Option<&Transition> {
        let el = self.surface.element(element_id)?;
        if !el.is_enabled_action() {
            debug!(%element_id, "tap on non-actionable element");
            return None;
        }
        self.index.resolve(element_id)
    }

    /// Record a user drag and persist the resulting layout.
    pub fn on_node_moved<C: ConfigStore>(
        &mut self,
        element_id: &str,
        position: Position,
        layouts: &LayoutStore<C>,
    ) -> Result<(), ExplorerError> {
        self.surface.set_position(element_id, position)?;
        self.save_layout(layouts)
    }

    /// Persist every node's coordinate under this diagram's fingerprint.
    pub fn save_layout<C: ConfigStore>(&self, layouts: &LayoutStore<C>) -> Result<(), ExplorerError> {
        layouts.save(&self.fingerprint, &self.surface.node_positions())?;
        Ok(())
    }

    /// Apply the layout stored for this fingerprint, if any, and fit the view.
    pub fn reapply_saved_layout<C: ConfigStore>(&mut self, layouts: &LayoutStore<C>) -> bool {
        let Some(saved) = layouts.load(&self.fingerprint) else {
            return false;
        };
        let applied = self.apply_positions(&saved);
        self.surface.fit();
        debug!(fingerprint = %self.fingerprint, applied, "saved layout applied");
        true
    }

    fn apply_positions(&mut self, positions: &PersistedLayout) -> usize {
        let mut applied = 0;
        for (id, pos) in positions {
            match self.surface.set_position(id, *pos) {
                Ok(()) => applied += 1,
                Err(err) => debug!(%id, %err, "saved position skipped"),
            }
        }
        applied
    }

    /// Re-run placement with another algorithm.
    pub fn select_layout(&mut self, kind: LayoutKind) {
        self.surface.run_layout(&LayoutSpec::for_kind(kind));
        self.layout = kind;
        info!(layout = %kind, "layout selected");
    }

    /// Algorithm used for the current placement.
    pub fn layout(&self) -> LayoutKind {
        self.layout
    }

    /// Fingerprint computed at initialization.
    pub fn fingerprint(&self) -> &GraphFingerprint {
        &self.fingerprint
    }

    /// Enabled transitions of the latest snapshot, by element id.
    pub fn index(&self) -> &TransitionIndex {
        &self.index
    }

    /// The surface being driven.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Release the surface's resources and hand it back.
    pub fn dispose(mut self) -> S {
        self.surface.dispose();
        self.surface
    }
}
