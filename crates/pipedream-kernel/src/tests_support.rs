//! Animator doubles for act tests.

use std::collections::HashMap;
use std::time::Duration;

use pipedream_common::ItemId;

use crate::animation::{Animation, Animator, Pose};

/// Finishes every animation immediately.
pub struct NullAnimator;

impl Animator for NullAnimator {
    fn animate(&mut self, _item: ItemId, _animation: Animation) {}

    fn pose(&self, _item: ItemId) -> Option<Pose> {
        None
    }

    fn is_running(&self, _item: ItemId) -> bool {
        false
    }

    fn cancel(&mut self, _item: ItemId) {}

    fn advance(&mut self, _elapsed: Duration) {}
}

/// Tracks elapsed time per item; poses snap from start to end on completion.
#[derive(Default)]
pub struct SteppedAnimator {
    pub running: HashMap<ItemId, (Animation, Duration)>,
}

impl Animator for SteppedAnimator {
    fn animate(&mut self, item: ItemId, animation: Animation) {
        self.running.insert(item, (animation, Duration::ZERO));
    }

    fn pose(&self, item: ItemId) -> Option<Pose> {
        self.running.get(&item).map(|(animation, elapsed)| {
            if *elapsed >= animation.duration {
                animation.end
            } else {
                animation.start
            }
        })
    }

    fn is_running(&self, item: ItemId) -> bool {
        self.running
            .get(&item)
            .is_some_and(|(animation, elapsed)| *elapsed < animation.duration)
    }

    fn cancel(&mut self, item: ItemId) {
        self.running.remove(&item);
    }

    fn advance(&mut self, elapsed: Duration) {
        for (_, spent) in self.running.values_mut() {
            *spent += elapsed;
        }
    }
}
