// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless core of the LTS explorer.
//!
//! Receives snapshots of a labelled transition system from a model engine,
//! keeps a [`GraphSurface`](lts_scene_port::GraphSurface) in step with them,
//! tracks the visited-state trace and turns user gestures back into engine
//! calls. Hosts talk to the [`Explorer`]; the other modules are exposed for
//! embedding and testing.

mod auto_advance;
mod controller;
mod engine;
mod error;
mod explorer;
mod oracle;
mod panel;
mod placement;
mod sync;
mod trace;

pub use auto_advance::AutoAdvance;
pub use controller::InteractionController;
pub use engine::{EngineCall, ModelEngine, RecordingEngine};
pub use error::ExplorerError;
pub use explorer::{Diagram, Explorer, SurfaceFactory};
pub use oracle::{
    await_oracle, oracle_channel, parse_translate, OracleReceiver, OracleSender, PositionOracle,
};
pub use panel::{PanelButton, PanelView, DEADLOCK_TEXT};
pub use placement::{place_from_oracle, Placement};
pub use sync::{DiagramSynchronizer, SyncOptions};
pub use trace::TraceTracker;
