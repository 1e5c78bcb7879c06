// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Side-panel view model.

use crate::trace::TraceTracker;
use lts_graph::{PanelData, Transition};

/// Text shown in place of buttons when nothing is enabled.
pub const DEADLOCK_TEXT: &str = "- Deadlock -";

/// One "fire this transition" button.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelButton {
    /// Button caption.
    pub label: String,
    /// Transition fired on click.
    pub transition: Transition,
}

/// Everything the host needs to draw the side panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelView {
    /// Undo button state.
    pub undo_enabled: bool,
    /// History trace, `None` when no state has been visited yet.
    pub trace: Option<String>,
    /// Enabled transitions in engine order.
    pub buttons: Vec<PanelButton>,
    /// Clock valuations, sorted by name.
    pub clocks: Vec<(String, f64)>,
    /// Variable valuations rendered as text, sorted by name.
    pub variables: Vec<(String, String)>,
}

impl PanelView {
    /// Derive the view from panel data and the current trace.
    pub fn build(panel: &PanelData, trace: &TraceTracker) -> Self {
        let buttons = panel
            .enabled
            .iter()
            .map(|e| PanelButton {
                label: button_label(&e.label, &e.transition),
                transition: e.transition.clone(),
            })
            .collect();
        let variables = panel
            .variables
            .iter()
            .map(|(name, value)| {
                let text = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (name.clone(), text)
            })
            .collect();
        Self {
            undo_enabled: panel.can_undo,
            trace: (!trace.is_empty()).then(|| trace.to_text()),
            buttons,
            clocks: panel.clocks.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            variables,
        }
    }

    /// True when no transition can fire.
    pub fn is_deadlocked(&self) -> bool {
        self.buttons.is_empty()
    }

    /// [`DEADLOCK_TEXT`] when deadlocked.
    pub fn deadlock_text(&self) -> Option<&'static str> {
        self.is_deadlocked().then_some(DEADLOCK_TEXT)
    }

    /// Button that fires `transition`, if it is enabled.
    pub fn button_for(&self, transition: &Transition) -> Option<&PanelButton> {
        self.buttons.iter().find(|b| &b.transition == transition)
    }
}

fn button_label(label: &str, t: &Transition) -> String {
    if !label.is_empty() {
        label.to_string()
    } else if !t.lbl.is_empty() {
        t.lbl.clone()
    } else {
        format!("{} -> {}", t.from, t.to)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use lts_graph::EnabledTransition;

    #[test]
    fn builds_buttons_trace_and_values() {
        let mut trace = TraceTracker::new();
        trace.reset("s0");
        trace.on_forward_transition("s1");
        let panel: PanelData = serde_json::from_str(
            r#"{
                "canUndo": true,
                "enabled": [
                    {"from": "s1", "to": "s2", "lbl": "go", "label": "go!"},
                    {"from": "s1", "to": "s3", "lbl": ""}
                ],
                "clocks": {"x": 1.5},
                "variables": {"n": 3, "mode": "idle"}
            }"#,
        )
        .unwrap();
        let view = PanelView::build(&panel, &trace);
        assert!(view.undo_enabled);
        assert_eq!(view.trace.as_deref(), Some("s0 -> s1"));
        assert_eq!(view.buttons[0].label, "go!");
        assert_eq!(view.buttons[1].label, "s1 -> s3");
        assert_eq!(view.clocks, vec![("x".to_string(), 1.5)]);
        assert_eq!(
            view.variables,
            vec![("mode".into(), "idle".into()), ("n".into(), "3".into())]
        );
        assert!(view.deadlock_text().is_none());
    }

    #[test]
    fn empty_enabled_list_is_a_deadlock() {
        let view = PanelView::build(&PanelData::default(), &TraceTracker::new());
        assert!(!view.undo_enabled);
        assert!(view.trace.is_none());
        assert_eq!(view.deadlock_text(), Some(DEADLOCK_TEXT));
    }

    #[test]
    fn finds_button_by_transition() {
        let t = Transition::new("a", "b", "x");
        let panel = PanelData {
            enabled: vec![EnabledTransition {
                transition: t.clone(),
                label: String::new(),
            }],
            ..PanelData::default()
        };
        let view = PanelView::build(&panel, &TraceTracker::new());
        assert_eq!(view.button_for(&t).unwrap().label, "x");
    }
}
