// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Repeating time advance on a background task.

use crate::engine::ModelEngine;
use lts_app_core::prefs::clamp_auto_advance;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Single owned auto-advance task for one diagram.
///
/// Starting while running is a no-op, so there is never more than one timer.
#[derive(Debug, Default)]
pub struct AutoAdvance {
    task: Option<JoinHandle<()>>,
    delay_secs: f64,
}

impl AutoAdvance {
    /// Create a stopped timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance `delay_secs` immediately, then again every `delay_secs`.
    ///
    /// The delay is clamped to 0.1 s..=1 day. Returns false when a task is
    /// already running or no tokio runtime is available.
    pub fn start<E>(&mut self, engine: Arc<E>, delay_secs: f64) -> bool
    where
        E: ModelEngine + Send + Sync + 'static,
    {
        if self.is_running() {
            debug!("auto-advance already running");
            return false;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("auto-advance needs a tokio runtime");
            return false;
        };
        let delay = clamp_auto_advance(delay_secs);
        let period = match Duration::try_from_secs_f64(delay) {
            Ok(period) => period,
            Err(err) => {
                warn!(delay_secs, %err, "auto-advance delay out of range");
                return false;
            }
        };
        engine.advance_time(delay);

        self.task = Some(runtime.spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval() ticks immediately; the first advance already happened.
            interval.tick().await;
            loop {
                interval.tick().await;
                engine.advance_time(delay);
            }
        }));
        self.delay_secs = delay;
        info!(delay_secs = delay, "auto-advance started");
        true
    }

    /// Cancel the timer. Returns true when a task was running.
    pub fn stop(&mut self) -> bool {
        let Some(task) = self.task.take() else {
            return false;
        };
        task.abort();
        info!("auto-advance stopped");
        true
    }

    /// True while the background task is alive.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Period of the current (or last) run, in seconds.
    pub fn delay_secs(&self) -> f64 {
        self.delay_secs
    }
}

impl Drop for AutoAdvance {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineCall, RecordingEngine};
    use lts_app_core::prefs::MAX_AUTO_ADVANCE_SECS;

    #[tokio::test(start_paused = true)]
    async fn advances_immediately_then_periodically() {
        let engine = Arc::new(RecordingEngine::new());
        let mut auto = AutoAdvance::new();
        assert!(auto.start(Arc::clone(&engine), 1.0));
        assert_eq!(engine.advance_count(), 1);

        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(engine.advance_count(), 4);

        assert!(auto.stop());
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(engine.advance_count(), 4);
        assert!(!auto.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn second_start_is_ignored() {
        let engine = Arc::new(RecordingEngine::new());
        let mut auto = AutoAdvance::new();
        assert!(auto.start(Arc::clone(&engine), 0.5));
        assert!(!auto.start(Arc::clone(&engine), 0.5));
        time::sleep(Duration::from_millis(1200)).await;
        // One immediate call plus ticks at 0.5 s and 1.0 s.
        assert_eq!(engine.advance_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_is_clamped_to_minimum() {
        let engine = Arc::new(RecordingEngine::new());
        let mut auto = AutoAdvance::new();
        assert!(auto.start(Arc::clone(&engine), 0.0));
        assert!((auto.delay_secs() - 0.1).abs() < f64::EPSILON);
        time::sleep(Duration::from_millis(250)).await;
        assert_eq!(engine.advance_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn huge_delay_is_clamped_to_maximum() {
        let engine = Arc::new(RecordingEngine::new());
        let mut auto = AutoAdvance::new();
        assert!(auto.start(Arc::clone(&engine), 1e20));
        assert!((auto.delay_secs() - MAX_AUTO_ADVANCE_SECS).abs() < f64::EPSILON);
        assert_eq!(engine.calls(), vec![EngineCall::AdvanceTime(MAX_AUTO_ADVANCE_SECS)]);
        assert!(auto.is_running());
        assert!(auto.stop());
    }

    #[test]
    fn start_without_runtime_fails_quietly() {
        let engine = Arc::new(RecordingEngine::new());
        let mut auto = AutoAdvance::new();
        assert!(!auto.start(Arc::clone(&engine), 1.0));
        assert_eq!(engine.advance_count(), 0);
    }
}
