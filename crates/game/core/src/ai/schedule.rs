use crate::ai::patterns::Shot;
use crate::pool::Handle;
use crate::types::Millis;

/// Delayed shot owned by an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledAction {
    pub fire_at: Millis,
    pub owner: Handle,
    pub shot: Shot,
}

/// Queue of delayed AI actions, drained once per tick.
///
/// There is no cancellation: when an action comes due the battle checks that
/// its owner is still active and alive, and silently drops it otherwise.
#[derive(Clone, Debug, Default)]
pub struct ActionSchedule {
    queue: Vec<ScheduledAction>,
}

impl ActionSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fire_at: Millis, owner: Handle, shot: Shot) {
        self.queue.push(ScheduledAction {
            fire_at,
            owner,
            shot,
        });
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Removes and returns every action due at or before `now`, ordered by
    /// due time and then by insertion order.
    pub fn drain_due(&mut self, now: Millis) -> Vec<ScheduledAction> {
        let mut due = Vec::new();
        self.queue.retain(|action| {
            if action.fire_at <= now {
                due.push(*action);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|a| a.fire_at);
        due
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
