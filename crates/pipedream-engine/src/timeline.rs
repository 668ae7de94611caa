//! Timed cues.
//!
//! A [`Timeline`] keeps its events sorted by timestamp. Events sharing a
//! timestamp keep their insertion order. An event leaves the timeline when it
//! is handed out for firing.

use std::collections::VecDeque;
use std::fmt;

use crate::stage::SharedStage;

/// What a cue does when it fires.
pub type TimelineAction = Box<dyn FnOnce(&SharedStage) + Send>;

/// A cue at a whole-second position of the soundtrack.
pub struct TimelineEvent {
    /// Seconds into the show
    pub timestamp: u32,
    /// Short label for logs
    pub label: &'static str,
    action: TimelineAction,
}

impl TimelineEvent {
    /// Runs the cue.
    pub fn fire(self, stage: &SharedStage) {
        (self.action)(stage);
    }
}

impl fmt::Debug for TimelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelineEvent")
            .field("timestamp", &self.timestamp)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Ordered list of pending cues.
#[derive(Debug, Default)]
pub struct Timeline {
    events: VecDeque<TimelineEvent>,
}

impl Timeline {
    /// Empty timeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `action` at `timestamp` seconds.
    pub fn add_event(
        &mut self,
        timestamp: u32,
        label: &'static str,
        action: impl FnOnce(&SharedStage) + Send + 'static,
    ) {
        let index = self.events.partition_point(|e| e.timestamp <= timestamp);
        self.events.insert(
            index,
            TimelineEvent {
                timestamp,
                label,
                action: Box::new(action),
            },
        );
    }

    /// Pending cues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether every cue fired.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Timestamp of the next cue.
    #[must_use]
    pub fn next_timestamp(&self) -> Option<u32> {
        self.events.front().map(|e| e.timestamp)
    }

    /// Pending timestamps in firing order.
    pub fn timestamps(&self) -> impl Iterator<Item = u32> + '_ {
        self.events.iter().map(|e| e.timestamp)
    }

    /// Removes and returns the next cue if `now` reached it.
    pub fn pop_due(&mut self, now: u32) -> Option<TimelineEvent> {
        if self.next_timestamp()? <= now {
            self.events.pop_front()
        } else {
            None
        }
    }

    /// Drops every pending cue.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::Stage;
    use crate::trace_canvas::TraceCanvas;
    use crate::tween::TweenAnimator;
    use parking_lot::Mutex;
    use pipedream_common::Rect;
    use std::sync::Arc;
    use std::time::Duration;

    fn stage() -> SharedStage {
        Stage::new(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Box::new(TraceCanvas::new()),
            Box::new(TweenAnimator::new()),
            Duration::from_millis(20),
        )
        .into_shared()
    }

    #[test]
    fn test_sorted_with_stable_ties() {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let mut timeline = Timeline::new();
        for (ts, tag) in [(50, "c"), (3, "a"), (50, "d"), (5, "b"), (3, "a2")] {
            let fired = Arc::clone(&fired);
            timeline.add_event(ts, tag, move |_| fired.lock().push(tag));
        }
        assert_eq!(timeline.timestamps().collect::<Vec<_>>(), vec![3, 3, 5, 50, 50]);

        let stage = stage();
        while let Some(event) = timeline.pop_due(u32::MAX) {
            event.fire(&stage);
        }
        assert_eq!(*fired.lock(), vec!["a", "a2", "b", "c", "d"]);
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_pop_due_respects_clock() {
        let mut timeline = Timeline::new();
        timeline.add_event(5, "five", |_| {});
        timeline.add_event(10, "ten", |_| {});

        assert!(timeline.pop_due(4).is_none());
        assert_eq!(timeline.pop_due(5).map(|e| e.timestamp), Some(5));
        assert!(timeline.pop_due(9).is_none());
        assert_eq!(timeline.next_timestamp(), Some(10));
        assert_eq!(timeline.pop_due(11).map(|e| e.label), Some("ten"));
        assert!(timeline.pop_due(100).is_none());
    }
}
