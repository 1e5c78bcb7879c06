// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! User-visible notice queue with TTL + dedupe.
//!
//! Errors caught at the render and import boundaries end up here instead of
//! propagating; the host draws whatever [`NoticeService::visible`] returns.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Informational note (e.g. "3 layouts imported").
    Info,
    /// Something degraded but the diagram still works.
    Warn,
    /// Input was rejected.
    Error,
}

/// Who should see a notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeScope {
    /// Every diagram.
    Global,
    /// The diagram rendered into the named container.
    Diagram(String),
}

/// Identifier for a notice entry.
pub type NoticeId = u64;

#[derive(Debug, Clone)]
struct Notice {
    id: NoticeId,
    kind: NoticeKind,
    scope: NoticeScope,
    title: String,
    body: Option<String>,
    ttl: Duration,
    created: Instant,
}

/// Rendering-friendly view of a notice.
#[derive(Debug, Clone, PartialEq)]
pub struct NoticeRender {
    /// Stable identifier.
    pub id: NoticeId,
    /// Severity.
    pub kind: NoticeKind,
    /// Scope.
    pub scope: NoticeScope,
    /// Short title line.
    pub title: String,
    /// Optional body text.
    pub body: Option<String>,
    /// 1.0 -> just created, 0.0 -> expired.
    pub progress: f32,
}

/// In-memory notice queue with TTL and dedupe window.
pub struct NoticeService {
    queue: VecDeque<Notice>,
    max: usize,
    dedupe_window: Duration,
    next_id: NoticeId,
}

impl NoticeService {
    /// Create a new queue holding at most `max` notices.
    pub fn new(max: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            max: max.max(1),
            dedupe_window: Duration::from_millis(500),
            next_id: 1,
        }
    }

    /// Push a notice. An identical notice pushed within the dedupe window is
    /// refreshed instead of duplicated.
    pub fn push<S, B>(
        &mut self,
        kind: NoticeKind,
        scope: NoticeScope,
        title: S,
        body: B,
        ttl: Duration,
        now: Instant,
    ) -> NoticeId
    where
        S: Into<String>,
        B: Into<Option<String>>,
    {
        let title = title.into();
        let body = body.into();

        if let Some(existing) = self.queue.iter_mut().find(|n| {
            n.kind == kind
                && n.scope == scope
                && n.title == title
                && n.body == body
                && now.saturating_duration_since(n.created) <= self.dedupe_window
        }) {
            existing.created = now;
            existing.ttl = ttl;
            return existing.id;
        }

        let id = self.next_id;
        self.next_id += 1;
        if self.queue.len() == self.max {
            self.queue.pop_front();
        }
        self.queue.push_back(Notice {
            id,
            kind,
            scope,
            title,
            body,
            ttl,
            created: now,
        });
        id
    }

    /// Drop expired notices (call once per tick).
    pub fn retain_visible(&mut self, now: Instant) {
        self.queue
            .retain(|n| now.saturating_duration_since(n.created) < n.ttl);
    }

    /// Render-ready notices with progress ratios.
    pub fn visible(&self, now: Instant) -> Vec<NoticeRender> {
        self.queue
            .iter()
            .filter(|n| now.saturating_duration_since(n.created) < n.ttl)
            .map(|n| NoticeRender {
                id: n.id,
                kind: n.kind,
                scope: n.scope.clone(),
                title: n.title.clone(),
                body: n.body.clone(),
                progress: 1.0
                    - (now.saturating_duration_since(n.created).as_secs_f32()
                        / n.ttl.as_secs_f32()),
            })
            .collect()
    }

    /// Visible notices for one diagram, global ones included.
    pub fn visible_for(&self, container: &str, now: Instant) -> Vec<NoticeRender> {
        self.visible(now)
            .into_iter()
            .filter(|n| match &n.scope {
                NoticeScope::Global => true,
                NoticeScope::Diagram(c) => c == container,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_inside_window_are_merged() {
        let mut svc = NoticeService::new(8);
        let t0 = Instant::now();
        let scope = NoticeScope::Diagram("box".into());
        let a = svc.push(
            NoticeKind::Error,
            scope.clone(),
            "bad snapshot",
            None,
            Duration::from_secs(5),
            t0,
        );
        let b = svc.push(
            NoticeKind::Error,
            scope,
            "bad snapshot",
            None,
            Duration::from_secs(5),
            t0 + Duration::from_millis(100),
        );
        assert_eq!(a, b);
        assert_eq!(svc.visible(t0).len(), 1);
    }

    #[test]
    fn expired_notices_disappear() {
        let mut svc = NoticeService::new(8);
        let t0 = Instant::now();
        svc.push(
            NoticeKind::Info,
            NoticeScope::Global,
            "imported",
            Some("3 layouts".to_string()),
            Duration::from_secs(1),
            t0,
        );
        assert_eq!(svc.visible(t0 + Duration::from_millis(500)).len(), 1);
        svc.retain_visible(t0 + Duration::from_secs(2));
        assert!(svc.visible(t0 + Duration::from_secs(2)).is_empty());
    }

    #[test]
    fn scoped_notices_stay_with_their_diagram() {
        let mut svc = NoticeService::new(8);
        let t0 = Instant::now();
        let ttl = Duration::from_secs(5);
        svc.push(NoticeKind::Error, NoticeScope::Diagram("a".into()), "x", None, ttl, t0);
        svc.push(NoticeKind::Warn, NoticeScope::Global, "y", None, ttl, t0);
        assert_eq!(svc.visible_for("a", t0).len(), 2);
        assert_eq!(svc.visible_for("b", t0).len(), 1);
    }

    #[test]
    fn queue_is_bounded() {
        let mut svc = NoticeService::new(2);
        let t0 = Instant::now();
        let ttl = Duration::from_secs(5);
        for title in ["one", "two", "three"] {
            svc.push(NoticeKind::Info, NoticeScope::Global, title, None, ttl, t0);
        }
        let titles: Vec<_> = svc.visible(t0).into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["two", "three"]);
    }
}
