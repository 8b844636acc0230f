//! Signals emitted by a battle for presentation and progression consumers.
//!
//! The battle owns an [`EventQueue`]; hosts drain it once per tick. Payloads
//! are plain data and never reference live entities except through pool
//! handles, which may already be stale when the event is read.

use crate::pool::Handle;
use crate::skills::SkillSlot;
use crate::types::Vec2;

/// Who took a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DamageTarget {
    Enemy(Handle),
    Member(usize),
}

/// Everything observable that happens during a battle.
#[derive(Clone, Debug, PartialEq, strum::AsRefStr, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum CombatEvent {
    // ===== combat =====
    /// HP damage after shield absorption. `amount` is the resolved hit.
    DamageDealt {
        target: DamageTarget,
        amount: u32,
        is_crit: bool,
        position: Vec2,
    },
    EnemyDefeated {
        enemy: Handle,
        remaining: u32,
        total_defeated: u32,
    },

    // ===== party =====
    HpChanged {
        member: usize,
        current: u32,
        max: u32,
    },
    ShieldChanged {
        current: u32,
        max: u32,
    },
    SkillUsed {
        member: usize,
        slot: SkillSlot,
    },
    UltUsed {
        member: usize,
        name: String,
    },
    CharSwitched {
        member: usize,
        id: String,
    },
    MemberDown {
        member: usize,
    },

    // ===== progression =====
    WaveStarted {
        area_index: usize,
        wave_index: usize,
        total_waves: usize,
        total_areas: usize,
    },
    WaveCleared {
        wave_index: usize,
        total_waves: usize,
    },
    AreaCleared {
        area_index: usize,
        total_areas: usize,
    },
    AreaStarted {
        area_index: usize,
        total_areas: usize,
        name: String,
        theme: String,
        layout: String,
    },
    StageCleared {
        elapsed_ms: u64,
    },
    GameOver {
        elapsed_ms: u64,
    },

    // ===== boss =====
    BossSpawned {
        boss: Handle,
        name: String,
        max_hp: u32,
        break_gauge: u32,
    },
    BreakChanged {
        boss: Handle,
        current: u32,
        max: u32,
        is_broken: bool,
    },
    BossBroken {
        boss: Handle,
        is_broken: bool,
    },
    BossPhaseChanged {
        boss: Handle,
        phase: u8,
    },
}

impl CombatEvent {
    /// Stable snake_case name of the variant.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Whether the event ends the battle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::StageCleared { .. } | Self::GameOver { .. })
    }
}

/// FIFO buffer of events produced during ticks.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: Vec<CombatEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events emitted since the last drain, oldest first.
    pub fn drain(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }
}
