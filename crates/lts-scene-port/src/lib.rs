// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Graph surface port contract for LTS explorer renderers.
//!
//! This crate defines the contract between the diagram synchronizer and the
//! graph-drawing component that actually puts nodes on screen.
//!
//! # Design Principles
//!
//! - **Surfaces are dumb**: They load elements, run layouts, toggle classes. No domain logic.
//! - **No time ownership**: Flash expiry and auto-advance timing live in the explorer.
//! - **Stable identities**: Reloading an element set keeps the coordinates of ids that survive.

use thiserror::Error;

/// Error type for surface operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The referenced element is not loaded.
    #[error("unknown element: {0}")]
    UnknownElement(String),
    /// An invariant was violated (e.g., edge to a missing node).
    #[error("invariant violation: {0}")]
    Invariant(String),
    /// A backend-specific error occurred.
    #[error("backend error: {0}")]
    Backend(String),
}

mod layout;
mod mock;
mod port;
mod selector;

pub use layout::{LayoutKind, LayoutSpec, RankDir, UnknownLayout};
pub use mock::MockSurface;
pub use port::GraphSurface;
pub use selector::Selector;
