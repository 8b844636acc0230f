//! Fixed-step battle driver.
//!
//! [`BattleRuntime`] owns a [`Battle`] plus its collaborators and advances it
//! in fixed ticks: gather overlaps, tick, drain events, publish them.

use combat_content::ContentBundle;
use combat_core::{Battle, BattleReport, BattleSetup, BattleStatus, EnemyOracle, Overlap, PcgRng};

use crate::api::{InputPolicy, OverlapProvider, Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::providers::{Autopilot, RadiusOverlapProvider};

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Simulated milliseconds per tick.
    pub tick_ms: u32,
    pub seed: u64,
    /// `run_to_completion` gives up after this many ticks.
    pub max_ticks: u64,
    /// Per-topic broadcast capacity.
    pub event_capacity: usize,
    /// Drive the party with [`Autopilot`] unless another policy is set.
    pub autopilot: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            seed: 0x5EED,
            max_ticks: 100_000,
            event_capacity: 256,
            autopilot: true,
        }
    }
}

impl RuntimeConfig {
    pub const TICK_MS_VAR: &'static str = "BATTLE_TICK_MS";
    pub const SEED_VAR: &'static str = "BATTLE_SEED";
    pub const MAX_TICKS_VAR: &'static str = "BATTLE_MAX_TICKS";
    pub const EVENT_CAPACITY_VAR: &'static str = "BATTLE_EVENT_CAPACITY";
    pub const AUTOPILOT_VAR: &'static str = "BATTLE_AUTOPILOT";

    /// Reads overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from a key lookup. Absent keys keep their defaults;
    /// unparsable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = parse_var(&lookup, Self::TICK_MS_VAR, |v| v.parse().ok()) {
            config.tick_ms = value;
        }
        if let Some(value) = parse_var(&lookup, Self::SEED_VAR, parse_seed) {
            config.seed = value;
        }
        if let Some(value) = parse_var(&lookup, Self::MAX_TICKS_VAR, |v| v.parse().ok()) {
            config.max_ticks = value;
        }
        if let Some(value) = parse_var(&lookup, Self::EVENT_CAPACITY_VAR, |v| v.parse().ok()) {
            config.event_capacity = value;
        }
        if let Some(value) = parse_var(&lookup, Self::AUTOPILOT_VAR, parse_flag) {
            config.autopilot = value;
        }

        config
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = lookup(key)?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        tracing::warn!(key, value = %raw, "ignoring unparsable runtime setting");
    }
    parsed
}

fn parse_seed(value: &str) -> Option<u64> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Headless battle loop.
pub struct BattleRuntime {
    config: RuntimeConfig,
    battle: Battle,
    bus: EventBus,
    overlaps: Box<dyn OverlapProvider>,
    input: Option<Box<dyn InputPolicy>>,
    ticks: u64,
    scratch: Vec<Overlap>,
}

impl std::fmt::Debug for BattleRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleRuntime")
            .field("config", &self.config)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

impl BattleRuntime {
    pub fn builder(setup: BattleSetup) -> BattleRuntimeBuilder {
        BattleRuntimeBuilder::new(setup)
    }

    /// Runtime over a loaded content bundle.
    pub fn from_bundle(bundle: ContentBundle, config: RuntimeConfig) -> Result<Self> {
        let (setup, catalog) = bundle.into_setup();
        Self::builder(setup).config(config).build(&catalog)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    /// Direct access for hosts that issue their own commands.
    pub fn battle_mut(&mut self) -> &mut Battle {
        &mut self.battle
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn status(&self) -> BattleStatus {
        self.battle.status()
    }

    /// Advances one tick. A finished battle is left untouched.
    pub fn step(&mut self) -> BattleStatus {
        if !self.battle.is_running() {
            return self.battle.status();
        }

        if let Some(input) = self.input.as_mut() {
            input.drive(&mut self.battle);
        }

        self.scratch.clear();
        self.overlaps.collect(&self.battle, &mut self.scratch);
        self.battle.tick(self.config.tick_ms, &self.scratch);
        self.ticks += 1;

        let at = self.battle.clock();
        for payload in self.battle.drain_events() {
            if payload.is_terminal() {
                tracing::info!(event = payload.name(), clock_ms = at.0, "battle finished");
            } else if Topic::of(&payload) == Topic::Progression {
                tracing::debug!(event = payload.name(), clock_ms = at.0, "progression");
            }
            self.bus.publish(Event { at, payload });
        }

        self.battle.status()
    }

    /// Steps until the battle ends or the tick budget runs out.
    pub fn run_to_completion(&mut self) -> Result<BattleReport> {
        while self.battle.is_running() {
            if self.ticks >= self.config.max_ticks {
                tracing::warn!(ticks = self.ticks, "tick budget exhausted");
                return Err(RuntimeError::TickBudgetExhausted { ticks: self.ticks });
            }
            self.step();
        }

        self.battle
            .report()
            .ok_or(RuntimeError::TickBudgetExhausted { ticks: self.ticks })
    }
}

/// Builder for [`BattleRuntime`].
pub struct BattleRuntimeBuilder {
    setup: BattleSetup,
    config: RuntimeConfig,
    bus: Option<EventBus>,
    overlaps: Option<Box<dyn OverlapProvider>>,
    input: Option<Box<dyn InputPolicy>>,
}

impl BattleRuntimeBuilder {
    fn new(setup: BattleSetup) -> Self {
        Self {
            setup,
            config: RuntimeConfig::default(),
            bus: None,
            overlaps: None,
            input: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Publish into an existing bus instead of a fresh one
    pub fn bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Replace the reference [`RadiusOverlapProvider`]
    pub fn overlaps(mut self, provider: impl OverlapProvider + 'static) -> Self {
        self.overlaps = Some(Box::new(provider));
        self
    }

    /// Set the input policy; takes precedence over the autopilot flag
    pub fn input(mut self, policy: impl InputPolicy + 'static) -> Self {
        self.input = Some(Box::new(policy));
        self
    }

    /// Assemble the battle against `enemies` and wire up collaborators
    pub fn build(self, enemies: &impl EnemyOracle) -> Result<BattleRuntime> {
        if self.config.tick_ms == 0 {
            return Err(RuntimeError::ZeroTickInterval);
        }

        let battle = Battle::new(self.setup, enemies, PcgRng::seeded(self.config.seed))?;
        let bus = self
            .bus
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_capacity));
        let overlaps = self
            .overlaps
            .unwrap_or_else(|| Box::new(RadiusOverlapProvider::default()));
        let input = match self.input {
            Some(policy) => Some(policy),
            None if self.config.autopilot => {
                Some(Box::new(Autopilot::default()) as Box<dyn InputPolicy>)
            }
            None => None,
        };

        tracing::debug!(
            tick_ms = self.config.tick_ms,
            seed = self.config.seed,
            input = input.is_some(),
            "battle runtime built"
        );

        Ok(BattleRuntime {
            config: self.config,
            battle,
            bus,
            overlaps,
            input,
            ticks: 0,
            scratch: Vec::new(),
        })
    }
}
