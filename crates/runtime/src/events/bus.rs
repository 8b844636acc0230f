//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

use combat_core::{CombatEvent, Millis};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Hits and kills
    Combat,
    /// Member HP, shield, skills, switching
    Party,
    /// Waves, areas and the battle outcome
    Progression,
    /// Boss spawn, break gauge and phases
    Boss,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Combat, Topic::Party, Topic::Progression, Topic::Boss];

    pub fn of(event: &CombatEvent) -> Self {
        match event {
            CombatEvent::DamageDealt { .. } | CombatEvent::EnemyDefeated { .. } => Topic::Combat,
            CombatEvent::HpChanged { .. }
            | CombatEvent::ShieldChanged { .. }
            | CombatEvent::SkillUsed { .. }
            | CombatEvent::UltUsed { .. }
            | CombatEvent::CharSwitched { .. }
            | CombatEvent::MemberDown { .. } => Topic::Party,
            CombatEvent::WaveStarted { .. }
            | CombatEvent::WaveCleared { .. }
            | CombatEvent::AreaCleared { .. }
            | CombatEvent::AreaStarted { .. }
            | CombatEvent::StageCleared { .. }
            | CombatEvent::GameOver { .. } => Topic::Progression,
            CombatEvent::BossSpawned { .. }
            | CombatEvent::BreakChanged { .. }
            | CombatEvent::BossBroken { .. }
            | CombatEvent::BossPhaseChanged { .. } => Topic::Boss,
        }
    }
}

/// Combat event stamped with the battle clock at which it was emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub at: Millis,
    pub payload: CombatEvent,
}

impl Event {
    pub fn topic(&self) -> Topic {
        Topic::of(&self.payload)
    }
}

/// Topic-based event bus
///
/// One broadcast channel per topic. Publishing never blocks; a topic without
/// subscribers simply drops the event.
pub struct EventBus {
    channels: Arc<RwLock<HashMap<Topic, broadcast::Sender<Event>>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity).0))
            .collect();

        Self {
            channels: Arc::new(RwLock::new(channels)),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();

        // try_read keeps publishing non-blocking; events are best-effort
        match self.channels.try_read() {
            Ok(channels) => {
                if let Some(tx) = channels.get(&topic)
                    && tx.send(event).is_err()
                {
                    tracing::trace!("No subscribers for topic {:?}", topic);
                }
            }
            Err(_) => {
                tracing::debug!("Failed to acquire event bus lock for topic {:?}", topic);
            }
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns `None` only while another task holds the channel map for
    /// writing, which this bus never does after construction.
    pub fn subscribe(&self, topic: Topic) -> Option<broadcast::Receiver<Event>> {
        let channels = self.channels.try_read().ok()?;
        channels.get(&topic).map(broadcast::Sender::subscribe)
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        let Ok(channels) = self.channels.try_read() else {
            return HashMap::new();
        };
        topics
            .iter()
            .filter_map(|&topic| channels.get(&topic).map(|tx| (topic, tx.subscribe())))
            .collect()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamped(payload: CombatEvent) -> Event {
        Event {
            at: Millis(1_000),
            payload,
        }
    }

    #[test]
    fn routes_by_topic() {
        let bus = EventBus::with_capacity(8);
        let mut progression = bus.subscribe(Topic::Progression).unwrap();
        let mut boss = bus.subscribe(Topic::Boss).unwrap();

        bus.publish(stamped(CombatEvent::StageCleared { elapsed_ms: 42_000 }));

        let event = progression.try_recv().unwrap();
        assert_eq!(event.payload, CombatEvent::StageCleared { elapsed_ms: 42_000 });
        assert!(boss.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(stamped(CombatEvent::MemberDown { member: 0 }));
    }

    #[test]
    fn clones_share_channels() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe(Topic::Party).unwrap();
        bus.clone()
            .publish(stamped(CombatEvent::MemberDown { member: 2 }));
        assert_eq!(rx.try_recv().unwrap().topic(), Topic::Party);
    }

    #[test]
    fn subscribe_multiple_returns_each_topic() {
        let bus = EventBus::new();
        let receivers = bus.subscribe_multiple(&[Topic::Combat, Topic::Boss]);
        assert_eq!(receivers.len(), 2);
        assert!(receivers.contains_key(&Topic::Boss));
    }
}
