// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Graph surface trait defining the renderer contract.

use crate::{LayoutSpec, Selector, SurfaceError};
use lts_graph::{Element, ElementId, Position};
use std::collections::BTreeMap;

/// Graph rendering port.
///
/// Adapters (a browser graph library, a native canvas, the headless
/// [`MockSurface`](crate::MockSurface)) implement this to draw a diagram.
///
/// # Element Identity
///
/// [`set_elements`](GraphSurface::set_elements) is declarative: after the call
/// the surface holds exactly the given elements. Ids already loaded keep their
/// coordinates unless the incoming element carries its own `position`.
pub trait GraphSurface {
    /// Replace the loaded element set.
    fn set_elements(&mut self, elements: &[Element]) -> Result<(), SurfaceError>;

    /// Run a named layout over the loaded nodes.
    fn run_layout(&mut self, layout: &LayoutSpec);

    /// True when `id` is loaded.
    fn contains(&self, id: &str) -> bool;

    /// Loaded element by id.
    fn element(&self, id: &str) -> Option<&Element>;

    /// Ids of loaded elements matching `selector`, in load order.
    fn select(&self, selector: &Selector) -> Vec<ElementId>;

    /// Add `class` to every loaded element in `ids`; unknown ids are skipped.
    fn add_class(&mut self, ids: &[ElementId], class: &str);

    /// Remove `class` from every loaded element in `ids`; unknown ids are skipped.
    fn remove_class(&mut self, ids: &[ElementId], class: &str);

    /// Current coordinate of a node.
    fn position(&self, id: &str) -> Option<Position>;

    /// Move a node.
    fn set_position(&mut self, id: &str, position: Position) -> Result<(), SurfaceError>;

    /// Coordinates of every positioned node.
    fn node_positions(&self) -> BTreeMap<ElementId, Position>;

    /// Fit the viewport around the loaded elements.
    fn fit(&mut self);

    /// Dispose all resources.
    fn dispose(&mut self);
}
