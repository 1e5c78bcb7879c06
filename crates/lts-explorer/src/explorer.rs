// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Render boundary: one entry point per host event, one diagram per container.
//!
//! Nothing raised below this layer escapes it. Failures are logged, pushed to
//! the notice queue and recorded on the diagram, whose last good state stays
//! on screen.

use crate::controller::InteractionController;
use crate::engine::ModelEngine;
use crate::error::ExplorerError;
use crate::oracle::OracleReceiver;
use crate::panel::PanelView;
use crate::sync::{DiagramSynchronizer, SyncOptions};
use crate::trace::TraceTracker;
use lts_app_core::config::ConfigStore;
use lts_app_core::layout_store::{LayoutStore, LayoutStoreError};
use lts_app_core::notice::{NoticeKind, NoticeScope, NoticeService};
use lts_app_core::prefs::ExplorerPrefs;
use lts_graph::{Position, Snapshot, Transition};
use lts_scene_port::{GraphSurface, LayoutKind};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

const ERROR_TTL: Duration = Duration::from_secs(8);
const INFO_TTL: Duration = Duration::from_secs(4);
const MAX_NOTICES: usize = 16;

/// Creates a graph surface for a host container.
pub trait SurfaceFactory<S> {
    /// Surface bound to `container_id`.
    fn create(&mut self, container_id: &str) -> S;
}

impl<S, F> SurfaceFactory<S> for F
where
    F: FnMut(&str) -> S,
{
    fn create(&mut self, container_id: &str) -> S {
        self(container_id)
    }
}

/// Everything owned by one rendered diagram.
pub struct Diagram<S, E> {
    sync: DiagramSynchronizer<S>,
    trace: TraceTracker,
    panel: PanelView,
    controller: InteractionController<E>,
    last_error: Option<String>,
}

impl<S: GraphSurface, E> Diagram<S, E> {
    /// Synchronizer (and through it, the surface).
    pub fn sync(&self) -> &DiagramSynchronizer<S> {
        &self.sync
    }

    /// History trace.
    pub fn trace(&self) -> &TraceTracker {
        &self.trace
    }

    /// Side-panel view model for the latest snapshot.
    pub fn panel(&self) -> &PanelView {
        &self.panel
    }

    /// Message of the most recent rejected update, cleared by the next good one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// Host-facing explorer: routes renders and gestures to per-container diagrams.
pub struct Explorer<S, E, C, F> {
    factory: F,
    engine: Arc<E>,
    layouts: LayoutStore<C>,
    prefs: ExplorerPrefs,
    notices: NoticeService,
    diagrams: HashMap<String, Diagram<S, E>>,
    pending_oracles: HashMap<String, OracleReceiver>,
}

impl<S, E, C, F> Explorer<S, E, C, F>
where
    S: GraphSurface,
    E: ModelEngine + Send + Sync + 'static,
    C: ConfigStore,
    F: SurfaceFactory<S>,
{
    /// Wire the explorer to its collaborators.
    pub fn new(factory: F, engine: Arc<E>, layouts: LayoutStore<C>, prefs: ExplorerPrefs) -> Self {
        Self {
            factory,
            engine,
            layouts,
            prefs,
            notices: NoticeService::new(MAX_NOTICES),
            diagrams: HashMap::new(),
            pending_oracles: HashMap::new(),
        }
    }

    /// Register the position-oracle channel consumed by the next first render
    /// of `container_id`.
    pub fn attach_oracle(&mut self, container_id: impl Into<String>, rx: OracleReceiver) {
        self.pending_oracles.insert(container_id.into(), rx);
    }

    /// Render a snapshot into `container_id`.
    #[allow(clippy::future_not_send)]
    pub async fn render(
        &mut self,
        container_id: &str,
        snapshot_json: &str,
        is_first_render: bool,
    ) -> Result<(), ExplorerError> {
        self.render_at(container_id, snapshot_json, is_first_render, Instant::now())
            .await
    }

    /// [`render`](Self::render) with an explicit clock reading for the flash deadline.
    #[allow(clippy::future_not_send)]
    pub async fn render_at(
        &mut self,
        container_id: &str,
        snapshot_json: &str,
        is_first_render: bool,
        now: Instant,
    ) -> Result<(), ExplorerError> {
        let result = if is_first_render {
            self.initialize(container_id, snapshot_json).await
        } else {
            self.update(container_id, snapshot_json, now)
        };
        if let Err(err) = &result {
            error!(container = %container_id, is_first_render, %err, "render failed");
            if let Some(diagram) = self.diagrams.get_mut(container_id) {
                diagram.last_error = Some(err.to_string());
            }
            self.notify(
                NoticeKind::Error,
                NoticeScope::Diagram(container_id.to_string()),
                "Diagram update rejected",
                Some(err.to_string()),
                now,
            );
        }
        result
    }

    #[allow(clippy::future_not_send)]
    async fn initialize(&mut self, container_id: &str, json: &str) -> Result<(), ExplorerError> {
        let snapshot = Snapshot::from_json(json)?;
        if let Some(path) = self.prefs.seed_bundle.clone() {
            self.layouts.seed_from_file_if_empty(&path).await;
        }

        let surface = self.factory.create(container_id);
        let oracle = self.pending_oracles.remove(container_id);
        let sync = DiagramSynchronizer::initialize(
            surface,
            &snapshot,
            oracle,
            &self.layouts,
            SyncOptions::from(&self.prefs),
        )
        .await?;

        let mut trace = TraceTracker::new();
        match snapshot.current_state() {
            Some(state) => trace.reset(state.id.clone()),
            None => warn!(container = %container_id, "no current state marked; trace empty"),
        }
        let panel = PanelView::build(&snapshot.panel_data, &trace);
        let diagram = Diagram {
            sync,
            trace,
            panel,
            controller: InteractionController::new(Arc::clone(&self.engine)),
            last_error: None,
        };
        if let Some(old) = self.diagrams.insert(container_id.to_string(), diagram) {
            debug!(container = %container_id, "replacing existing diagram");
            old.sync.dispose();
        }
        info!(container = %container_id, "diagram rendered");
        Ok(())
    }

    fn update(&mut self, container_id: &str, json: &str, now: Instant) -> Result<(), ExplorerError> {
        let diagram = self
            .diagrams
            .get_mut(container_id)
            .ok_or_else(|| ExplorerError::NoDiagram(container_id.to_string()))?;
        let snapshot = Snapshot::from_json(json)?;
        diagram.sync.apply_update(&snapshot, now)?;
        diagram.trace.observe(&snapshot);
        diagram.panel = PanelView::build(&snapshot.panel_data, &diagram.trace);
        diagram.last_error = None;
        Ok(())
    }

    /// Tap on a diagram element. Returns the transition sent to the engine.
    pub fn tap(&mut self, container_id: &str, element_id: &str) -> Option<Transition> {
        let diagram = self.diagrams.get_mut(container_id)?;
        diagram.controller.on_tap(&diagram.sync, element_id)
    }

    /// Side-panel button. Ignored unless `transition` is currently enabled.
    pub fn click(&mut self, container_id: &str, transition: &Transition) -> bool {
        let Some(diagram) = self.diagrams.get_mut(container_id) else {
            return false;
        };
        if diagram.panel.button_for(transition).is_none() {
            warn!(container = %container_id, from = %transition.from, to = %transition.to, "transition not enabled");
            return false;
        }
        diagram.controller.on_panel_click(transition);
        true
    }

    /// Undo button. Ignored while the panel has undo disabled.
    pub fn undo(&mut self, container_id: &str) -> bool {
        let Some(diagram) = self.diagrams.get_mut(container_id) else {
            return false;
        };
        if !diagram.panel.undo_enabled {
            debug!(container = %container_id, "undo unavailable");
            return false;
        }
        diagram.controller.on_undo();
        true
    }

    /// Auto-advance toggle. `delay_secs` falls back to the preference.
    pub fn set_auto_advance(
        &mut self,
        container_id: &str,
        enabled: bool,
        delay_secs: Option<f64>,
    ) -> bool {
        let delay = delay_secs.unwrap_or_else(|| self.prefs.auto_advance_delay());
        self.diagrams
            .get_mut(container_id)
            .is_some_and(|d| d.controller.set_auto_advance(enabled, delay))
    }

    /// True while `container_id` auto-advances.
    pub fn auto_advance_running(&self, container_id: &str) -> bool {
        self.diagrams
            .get(container_id)
            .is_some_and(|d| d.controller.auto_advance_running())
    }

    /// A node was dragged; its new layout is saved straight away.
    pub fn node_moved(&mut self, container_id: &str, element_id: &str, position: Position) {
        let Some(diagram) = self.diagrams.get_mut(container_id) else {
            return;
        };
        if let Err(err) = diagram.sync.on_node_moved(element_id, position, &self.layouts) {
            warn!(container = %container_id, %element_id, %err, "layout not saved");
            self.notify(
                NoticeKind::Warn,
                NoticeScope::Diagram(container_id.to_string()),
                "Layout not saved",
                Some(err.to_string()),
                Instant::now(),
            );
        }
    }

    /// Layout selector.
    pub fn select_layout(&mut self, container_id: &str, name: &str) -> Option<LayoutKind> {
        let diagram = self.diagrams.get_mut(container_id)?;
        match diagram.controller.on_layout_selected(&mut diagram.sync, name) {
            Ok(kind) => Some(kind),
            Err(err) => {
                self.notify(
                    NoticeKind::Error,
                    NoticeScope::Diagram(container_id.to_string()),
                    "Unknown layout",
                    Some(err.to_string()),
                    Instant::now(),
                );
                None
            }
        }
    }

    /// "Save layouts" button. `None` (with a notice) when nothing is stored.
    pub fn export_layouts(&mut self, container_id: &str) -> Option<String> {
        let diagram = self.diagrams.get(container_id)?;
        let result = diagram.controller.export_layouts(&self.layouts);
        match result {
            Ok(bundle) => Some(bundle),
            Err(ExplorerError::Layout(LayoutStoreError::EmptyStore)) => {
                self.notify(
                    NoticeKind::Info,
                    NoticeScope::Global,
                    "No saved layouts to export",
                    None,
                    Instant::now(),
                );
                None
            }
            Err(err) => {
                error!(%err, "layout export failed");
                self.notify(
                    NoticeKind::Error,
                    NoticeScope::Global,
                    "Layout export failed",
                    Some(err.to_string()),
                    Instant::now(),
                );
                None
            }
        }
    }

    /// "Load layouts" button. Returns the number of entries imported.
    pub fn import_layouts(&mut self, container_id: &str, bundle_json: &str) -> Option<usize> {
        let diagram = self.diagrams.get_mut(container_id)?;
        let result = diagram
            .controller
            .import_layouts(&mut diagram.sync, &self.layouts, bundle_json);
        let now = Instant::now();
        match result {
            Ok(0) => {
                self.notify(
                    NoticeKind::Warn,
                    NoticeScope::Global,
                    "No layouts found in file",
                    None,
                    now,
                );
                Some(0)
            }
            Ok(n) => {
                self.notify(
                    NoticeKind::Info,
                    NoticeScope::Global,
                    format!("{n} layouts loaded"),
                    None,
                    now,
                );
                Some(n)
            }
            Err(err) => {
                warn!(%err, "layout import rejected");
                self.notify(
                    NoticeKind::Error,
                    NoticeScope::Global,
                    "Layout import failed",
                    Some(err.to_string()),
                    now,
                );
                None
            }
        }
    }

    /// Drive time-based effects: flash expiry and notice TTLs.
    pub fn tick(&mut self, now: Instant) {
        for diagram in self.diagrams.values_mut() {
            diagram.sync.expire_flash(now);
        }
        self.notices.retain_visible(now);
    }

    /// Earliest pending flash deadline, for hosts that schedule ticks.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.diagrams
            .values()
            .filter_map(|d| d.sync.flash_deadline())
            .min()
    }

    /// Tear down the diagram in `container_id`, stopping its timer.
    pub fn dispose(&mut self, container_id: &str) -> bool {
        let Some(diagram) = self.diagrams.remove(container_id) else {
            return false;
        };
        diagram.sync.dispose();
        info!(container = %container_id, "diagram disposed");
        true
    }

    /// Diagram rendered in `container_id`.
    pub fn diagram(&self, container_id: &str) -> Option<&Diagram<S, E>> {
        self.diagrams.get(container_id)
    }

    /// Notice queue.
    pub fn notices(&self) -> &NoticeService {
        &self.notices
    }

    /// Layout persistence.
    pub fn layouts(&self) -> &LayoutStore<C> {
        &self.layouts
    }

    fn notify(
        &mut self,
        kind: NoticeKind,
        scope: NoticeScope,
        title: impl Into<String>,
        body: Option<String>,
        now: Instant,
    ) {
        let ttl = match kind {
            NoticeKind::Info => INFO_TTL,
            NoticeKind::Warn | NoticeKind::Error => ERROR_TTL,
        };
        self.notices.push(kind, scope, title, body, ttl, now);
    }
}
