// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Mock surface for headless testing of the synchronizer and controller.
//!
//! MockSurface tracks loaded elements, classes and coordinates without drawing
//! anything. Automatic layouts place nodes on a deterministic line so tests can
//! tell laid-out nodes from preset ones.

use std::collections::{BTreeMap, HashSet};

use lts_graph::{Element, ElementId, Position};

use crate::{GraphSurface, LayoutKind, LayoutSpec, Selector, SurfaceError};

/// Node footprint used to space automatic layouts.
const NODE_EXTENT: f64 = 50.0;

/// Mock graph surface for testing.
#[derive(Debug, Default)]
pub struct MockSurface {
    /// Loaded elements in load order.
    pub elements: Vec<Element>,
    /// Every layout run, oldest first.
    pub layouts: Vec<LayoutKind>,
    /// Number of `set_elements` calls.
    pub load_count: u32,
    /// Number of viewport fits.
    pub fit_count: u32,
    /// Whether dispose has been called.
    pub disposed: bool,
}

impl MockSurface {
    /// Create an empty mock surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of loaded elements.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// True when `id` is loaded and carries `class`.
    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    /// Last layout run, if any.
    pub fn last_layout(&self) -> Option<LayoutKind> {
        self.layouts.last().copied()
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| el.id == id)
    }
}

impl GraphSurface for MockSurface {
    fn set_elements(&mut self, elements: &[Element]) -> Result<(), SurfaceError> {
        let nodes: HashSet<&str> = elements
            .iter()
            .filter(|el| el.is_node())
            .map(|el| el.id.as_str())
            .collect();
        for edge in elements.iter().filter(|el| !el.is_node()) {
            for end in [&edge.source, &edge.target] {
                match end {
                    Some(id) if nodes.contains(id.as_str()) => {}
                    _ => {
                        return Err(SurfaceError::Invariant(format!(
                            "edge {} has a missing endpoint",
                            edge.id
                        )))
                    }
                }
            }
        }

        let mut next = elements.to_vec();
        for el in next.iter_mut().filter(|el| el.is_node()) {
            if el.position.is_none() {
                el.position = self.position(&el.id);
            }
        }
        self.elements = next;
        self.load_count += 1;
        Ok(())
    }

    fn run_layout(&mut self, layout: &LayoutSpec) {
        let step = (NODE_EXTENT + layout.node_sep.max(layout.ideal_edge_length))
            * layout.spacing_factor;
        let mut i = 0.0;
        for el in self.elements.iter_mut().filter(|el| el.is_node()) {
            match layout.kind {
                LayoutKind::Preset => {
                    el.position.get_or_insert_with(Position::default);
                }
                LayoutKind::Dagre => el.position = Some(Position::new(i * step, 0.0)),
                LayoutKind::Cose => el.position = Some(Position::new(0.0, i * step)),
            }
            i += 1.0;
        }
        self.layouts.push(layout.kind);
        if layout.fit {
            self.fit();
        }
    }

    fn contains(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    fn select(&self, selector: &Selector) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|el| selector.matches(el))
            .map(|el| el.id.clone())
            .collect()
    }

    fn add_class(&mut self, ids: &[ElementId], class: &str) {
        for id in ids {
            if let Some(el) = self.get_mut(id) {
                el.classes.insert(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, ids: &[ElementId], class: &str) {
        for id in ids {
            if let Some(el) = self.get_mut(id) {
                el.classes.remove(class);
            }
        }
    }

    fn position(&self, id: &str) -> Option<Position> {
        self.element(id).and_then(|el| el.position)
    }

    fn set_position(&mut self, id: &str, position: Position) -> Result<(), SurfaceError> {
        match self.get_mut(id) {
            Some(el) if el.is_node() => {
                el.position = Some(position);
                Ok(())
            }
            Some(_) => Err(SurfaceError::Invariant(format!("{id} is not a node"))),
            None => Err(SurfaceError::UnknownElement(id.to_string())),
        }
    }

    fn node_positions(&self) -> BTreeMap<ElementId, Position> {
        self.elements
            .iter()
            .filter_map(|el| el.position.map(|p| (el.id.clone(), p)))
            .collect()
    }

    fn fit(&mut self) {
        self.fit_count += 1;
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.elements.clear();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use lts_graph::ElementKind;

    fn node(id: &str, pos: Option<Position>) -> Element {
        Element {
            id: id.into(),
            kind: ElementKind::StateNode,
            label: id.into(),
            classes: std::iter::once("state-node".to_string()).collect(),
            source: None,
            target: None,
            position: pos,
        }
    }

    fn edge(id: &str, a: &str, b: &str) -> Element {
        Element {
            id: id.into(),
            kind: ElementKind::ConnectorEdge,
            label: String::new(),
            classes: Default::default(),
            source: Some(a.into()),
            target: Some(b.into()),
            position: None,
        }
    }

    #[test]
    fn reload_keeps_positions_of_surviving_ids() {
        let mut s = MockSurface::new();
        s.set_elements(&[node("a", Some(Position::new(1.0, 2.0))), node("b", None)])
            .unwrap();
        s.set_position("b", Position::new(5.0, 5.0)).unwrap();

        s.set_elements(&[node("a", None), node("b", Some(Position::new(9.0, 9.0)))])
            .unwrap();
        assert_eq!(s.position("a"), Some(Position::new(1.0, 2.0)));
        assert_eq!(s.position("b"), Some(Position::new(9.0, 9.0)));
        assert_eq!(s.load_count, 2);
    }

    #[test]
    fn reload_drops_missing_ids() {
        let mut s = MockSurface::new();
        s.set_elements(&[node("a", None), node("b", None), edge("e", "a", "b")])
            .unwrap();
        s.set_elements(&[node("a", None)]).unwrap();
        assert!(!s.contains("b"));
        assert!(!s.contains("e"));
        assert_eq!(s.element_count(), 1);
    }

    #[test]
    fn rejects_dangling_edges() {
        let mut s = MockSurface::new();
        let err = s.set_elements(&[node("a", None), edge("e", "a", "z")]);
        assert!(matches!(err, Err(SurfaceError::Invariant(_))));
    }

    #[test]
    fn classes_toggle_and_select() {
        let mut s = MockSurface::new();
        s.set_elements(&[node("a", None), node("b", None)]).unwrap();
        s.add_class(&["a".into(), "ghost".into()], "transition-flash");
        assert!(s.has_class("a", "transition-flash"));
        assert_eq!(
            s.select(&Selector::Classes(vec!["transition-flash".into()])),
            vec!["a".to_string()]
        );
        s.remove_class(&["a".into()], "transition-flash");
        assert!(!s.has_class("a", "transition-flash"));
    }

    #[test]
    fn automatic_layout_positions_every_node() {
        let mut s = MockSurface::new();
        s.set_elements(&[node("a", None), node("b", None), edge("e", "a", "b")])
            .unwrap();
        s.run_layout(&LayoutSpec::for_kind(LayoutKind::Dagre));
        let positions = s.node_positions();
        assert_eq!(positions.len(), 2);
        assert_ne!(positions["a"], positions["b"]);
        assert_eq!(s.last_layout(), Some(LayoutKind::Dagre));
        assert_eq!(s.fit_count, 1);
    }

    #[test]
    fn set_position_rejects_edges_and_unknown_ids() {
        let mut s = MockSurface::new();
        s.set_elements(&[node("a", None), node("b", None), edge("e", "a", "b")])
            .unwrap();
        assert!(matches!(
            s.set_position("e", Position::default()),
            Err(SurfaceError::Invariant(_))
        ));
        assert!(matches!(
            s.set_position("zz", Position::default()),
            Err(SurfaceError::UnknownElement(_))
        ));
    }
}
