// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Turns user gestures into model-engine calls.

use crate::auto_advance::AutoAdvance;
use crate::engine::ModelEngine;
use crate::error::ExplorerError;
use crate::sync::DiagramSynchronizer;
use lts_app_core::config::ConfigStore;
use lts_app_core::layout_store::LayoutStore;
use lts_graph::Transition;
use lts_scene_port::{GraphSurface, LayoutKind};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Per-diagram interaction state: the engine handle plus the auto-advance timer.
///
/// Any manual step or undo cancels auto-advance before reaching the engine.
pub struct InteractionController<E> {
    engine: Arc<E>,
    auto: AutoAdvance,
}

impl<E> InteractionController<E>
where
    E: ModelEngine + Send + Sync + 'static,
{
    /// Wrap an engine handle.
    pub fn new(engine: Arc<E>) -> Self {
        Self {
            engine,
            auto: AutoAdvance::new(),
        }
    }

    /// Tap on a diagram element. Fires the transition behind an enabled
    /// action node; anything else is ignored. Returns the fired transition.
    pub fn on_tap<S: GraphSurface>(
        &mut self,
        sync: &DiagramSynchronizer<S>,
        element_id: &str,
    ) -> Option<Transition> {
        let transition = sync.resolve_tap(element_id)?.clone();
        debug!(%element_id, "action tapped");
        self.fire(&transition);
        Some(transition)
    }

    /// Side-panel transition button.
    pub fn on_panel_click(&mut self, transition: &Transition) {
        self.fire(transition);
    }

    /// Undo button.
    pub fn on_undo(&mut self) {
        self.auto.stop();
        self.engine.undo_step();
    }

    /// Auto-advance toggle. Returns whether the timer runs afterwards.
    pub fn set_auto_advance(&mut self, enabled: bool, delay_secs: f64) -> bool {
        if enabled {
            self.auto.start(Arc::clone(&self.engine), delay_secs);
        } else {
            self.auto.stop();
        }
        self.auto.is_running()
    }

    /// True while auto-advance is on.
    pub fn auto_advance_running(&self) -> bool {
        self.auto.is_running()
    }

    /// Layout selector.
    pub fn on_layout_selected<S: GraphSurface>(
        &self,
        sync: &mut DiagramSynchronizer<S>,
        name: &str,
    ) -> Result<LayoutKind, ExplorerError> {
        let kind: LayoutKind = name.parse()?;
        sync.select_layout(kind);
        Ok(kind)
    }

    /// "Save layouts" button: every stored layout as one JSON bundle.
    pub fn export_layouts<C: ConfigStore>(
        &self,
        layouts: &LayoutStore<C>,
    ) -> Result<String, ExplorerError> {
        Ok(layouts.export_json()?)
    }

    /// "Load layouts" button: merge a bundle, then re-apply the entry for the
    /// current diagram if the bundle had one. Returns the number imported.
    pub fn import_layouts<S: GraphSurface, C: ConfigStore>(
        &self,
        sync: &mut DiagramSynchronizer<S>,
        layouts: &LayoutStore<C>,
        bundle_json: &str,
    ) -> Result<usize, ExplorerError> {
        let written = layouts.import_fingerprints(bundle_json)?;
        let reapplied =
            written.contains(sync.fingerprint()) && sync.reapply_saved_layout(layouts);
        info!(imported = written.len(), reapplied, "layouts loaded");
        Ok(written.len())
    }

    fn fire(&mut self, transition: &Transition) {
        self.auto.stop();
        match transition.to_json() {
            Ok(json) => self.engine.take_step(&json),
            Err(err) => error!(%err, "transition payload could not be encoded"),
        }
    }
}
