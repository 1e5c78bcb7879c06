// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Outbound port to the model engine.

use lts_graph::Transition;
use std::sync::Mutex;

/// The simulation driving the diagram.
///
/// Calls are fire-and-forget: the engine acknowledges by re-rendering with a
/// fresh snapshot, never through a return value.
pub trait ModelEngine {
    /// Fire a transition, given as its JSON wire payload.
    fn take_step(&self, transition_json: &str);
    /// Step back once.
    fn undo_step(&self);
    /// Let `seconds` of model time elapse.
    fn advance_time(&self, seconds: f64);
}

/// One call received by a [`RecordingEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    /// `take_step` with its payload.
    TakeStep(String),
    /// `undo_step`.
    Undo,
    /// `advance_time` with its amount.
    AdvanceTime(f64),
}

/// Engine double that records every call, for headless tests and tooling.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    calls: Mutex<Vec<EngineCall>>,
}

impl RecordingEngine {
    /// Create an engine with an empty call log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the call log, oldest first.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Transitions received through `take_step`, decoded.
    pub fn steps(&self) -> Vec<Transition> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EngineCall::TakeStep(json) => serde_json::from_str(&json).ok(),
                _ => None,
            })
            .collect()
    }

    /// Number of `advance_time` calls.
    pub fn advance_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, EngineCall::AdvanceTime(_)))
            .count()
    }

    fn record(&self, call: EngineCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl ModelEngine for RecordingEngine {
    fn take_step(&self, transition_json: &str) {
        self.record(EngineCall::TakeStep(transition_json.to_string()));
    }

    fn undo_step(&self) {
        self.record(EngineCall::Undo);
    }

    fn advance_time(&self, seconds: f64) {
        self.record(EngineCall::AdvanceTime(seconds));
    }
}
