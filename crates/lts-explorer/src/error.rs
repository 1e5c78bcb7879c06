// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Errors raised inside the explorer; the render boundary turns them into
//! log records and notices.

use lts_app_core::layout_store::LayoutStoreError;
use lts_graph::SnapshotError;
use lts_scene_port::{SurfaceError, UnknownLayout};
use thiserror::Error;

/// Anything that can go wrong while rendering or interacting with a diagram.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// The snapshot payload was rejected.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    /// The graph surface refused an operation.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    /// Layout persistence failed.
    #[error(transparent)]
    Layout(#[from] LayoutStoreError),
    /// Layout selector named an unknown algorithm.
    #[error(transparent)]
    UnknownLayout(#[from] UnknownLayout),
    /// An update arrived for a container that was never initialized.
    #[error("no diagram rendered in container {0}")]
    NoDiagram(String),
}
