use crate::config::CombatConfig;
use crate::stage::{ResolvedArea, ResolvedStage, ResolvedWave};
use crate::types::Millis;

/// Lifecycle of the stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DirectorPhase {
    /// Waiting for the first wave of the current area.
    #[default]
    Idle,
    WaveActive,
    WaveCleared,
    AreaCleared,
    /// Terminal.
    StageCleared,
}

/// A step the director has scheduled for later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectorStep {
    StartWave,
    AdvanceArea,
}

/// Delays between progression steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectorTiming {
    pub first_wave_delay_ms: u32,
    pub next_wave_delay_ms: u32,
    pub area_transition_delay_ms: u32,
}

impl From<&CombatConfig> for DirectorTiming {
    fn from(config: &CombatConfig) -> Self {
        Self {
            first_wave_delay_ms: config.first_wave_delay_ms,
            next_wave_delay_ms: config.next_wave_delay_ms,
            area_transition_delay_ms: config.area_transition_delay_ms,
        }
    }
}

/// A wave that just became active.
#[derive(Clone, Copy, Debug)]
pub struct WaveStart<'a> {
    pub area_index: usize,
    pub wave_index: usize,
    pub total_waves: usize,
    pub total_areas: usize,
    pub wave: &'a ResolvedWave,
}

/// Signal produced when a wave's last enemy falls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    WaveCleared {
        wave_index: usize,
        total_waves: usize,
    },
    AreaCleared {
        area_index: usize,
        total_areas: usize,
    },
}

/// Bookkeeping after one enemy defeat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefeatReport {
    pub remaining: u32,
    pub total_defeated: u32,
    pub progress: Option<Progress>,
}

/// Result of moving past a cleared area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AreaAdvance {
    Started {
        area_index: usize,
        total_areas: usize,
    },
    StageCleared,
}

/// Stage-level progression state machine.
///
/// `Idle → WaveActive → WaveCleared → WaveActive …` within an area, then
/// `AreaCleared`, then either the next area's `Idle` or `StageCleared`.
/// The wave-cleared and area-cleared signals fire exactly once per wave:
/// they are only produced while a wave is active, and producing one ends
/// the wave.
#[derive(Clone, Debug)]
pub struct WaveAreaDirector {
    stage: ResolvedStage,
    timing: DirectorTiming,
    phase: DirectorPhase,
    area_index: usize,
    /// Index of the next wave to start in the current area.
    wave_cursor: usize,
    enemies_alive: u32,
    total_defeated: u32,
    pending: Option<(Millis, DirectorStep)>,
}

impl WaveAreaDirector {
    pub fn new(stage: ResolvedStage, timing: DirectorTiming) -> Self {
        Self {
            stage,
            timing,
            phase: DirectorPhase::Idle,
            area_index: 0,
            wave_cursor: 0,
            enemies_alive: 0,
            total_defeated: 0,
            pending: None,
        }
    }

    // ===== queries =====

    pub fn stage(&self) -> &ResolvedStage {
        &self.stage
    }

    pub fn phase(&self) -> DirectorPhase {
        self.phase
    }

    pub fn area_index(&self) -> usize {
        self.area_index
    }

    pub fn total_areas(&self) -> usize {
        self.stage.areas.len()
    }

    pub fn current_area(&self) -> Option<&ResolvedArea> {
        self.stage.areas.get(self.area_index)
    }

    pub fn total_waves_in_area(&self) -> usize {
        self.current_area().map_or(0, |a| a.waves.len())
    }

    /// Number of waves of the current area started so far.
    pub fn waves_started(&self) -> usize {
        self.wave_cursor
    }

    pub fn enemies_alive(&self) -> u32 {
        self.enemies_alive
    }

    pub fn total_defeated(&self) -> u32 {
        self.total_defeated
    }

    pub fn is_wave_active(&self) -> bool {
        self.phase == DirectorPhase::WaveActive
    }

    pub fn is_complete(&self) -> bool {
        self.phase == DirectorPhase::StageCleared
    }

    pub fn pending(&self) -> Option<(Millis, DirectorStep)> {
        self.pending
    }

    // ===== scheduling =====

    /// Schedules the first wave of the stage.
    pub fn begin(&mut self, now: Millis) {
        self.schedule(now.after(self.timing.first_wave_delay_ms), DirectorStep::StartWave);
    }

    /// Replaces any pending step.
    pub fn schedule(&mut self, at: Millis, step: DirectorStep) {
        self.pending = Some((at, step));
    }

    /// Takes the pending step if it is due.
    pub fn poll(&mut self, now: Millis) -> Option<DirectorStep> {
        match self.pending {
            Some((at, step)) if at <= now => {
                self.pending = None;
                Some(step)
            }
            _ => None,
        }
    }

    // ===== transitions =====

    /// Activates the next wave of the current area.
    ///
    /// Returns `None` while another wave is active, once the stage is
    /// cleared, or when the area has no waves left.
    pub fn start_next_wave(&mut self) -> Option<WaveStart<'_>> {
        if matches!(
            self.phase,
            DirectorPhase::WaveActive | DirectorPhase::StageCleared
        ) {
            return None;
        }
        let total_areas = self.stage.areas.len();
        let area = self.stage.areas.get(self.area_index)?;
        let wave = area.waves.get(self.wave_cursor)?;

        let wave_index = self.wave_cursor;
        self.wave_cursor += 1;
        self.enemies_alive = wave.enemy_count();
        self.phase = DirectorPhase::WaveActive;

        tracing::debug!(
            area = self.area_index,
            wave = wave_index,
            enemies = self.enemies_alive,
            "wave started"
        );

        Some(WaveStart {
            area_index: self.area_index,
            wave_index,
            total_waves: area.waves.len(),
            total_areas,
            wave,
        })
    }

    /// Records one defeated enemy and schedules the follow-up step when the
    /// wave ends. A no-op (`None`) once the stage is cleared.
    pub fn on_enemy_defeated(&mut self, now: Millis) -> Option<DefeatReport> {
        if self.is_complete() {
            return None;
        }

        self.enemies_alive = self.enemies_alive.saturating_sub(1);
        self.total_defeated += 1;

        let mut report = DefeatReport {
            remaining: self.enemies_alive,
            total_defeated: self.total_defeated,
            progress: None,
        };
        if self.enemies_alive > 0 || self.phase != DirectorPhase::WaveActive {
            return Some(report);
        }

        let total_waves = self.total_waves_in_area();
        let progress = if self.wave_cursor >= total_waves {
            self.phase = DirectorPhase::AreaCleared;
            let is_last = self.area_index + 1 >= self.total_areas();
            let delay = if is_last {
                0
            } else {
                self.timing.area_transition_delay_ms
            };
            self.schedule(now.after(delay), DirectorStep::AdvanceArea);
            Progress::AreaCleared {
                area_index: self.area_index,
                total_areas: self.total_areas(),
            }
        } else {
            self.phase = DirectorPhase::WaveCleared;
            self.schedule(now.after(self.timing.next_wave_delay_ms), DirectorStep::StartWave);
            Progress::WaveCleared {
                wave_index: self.wave_cursor - 1,
                total_waves,
            }
        };

        tracing::debug!(?progress, "wave ended");
        report.progress = Some(progress);
        Some(report)
    }

    /// Leaves a cleared area. Starting the next area schedules its first
    /// wave; running out of areas clears the stage.
    ///
    /// Returns `None` unless the current area has been cleared.
    pub fn advance_to_next_area(&mut self, now: Millis) -> Option<AreaAdvance> {
        if self.phase != DirectorPhase::AreaCleared {
            return None;
        }

        self.area_index += 1;
        self.wave_cursor = 0;
        self.enemies_alive = 0;

        if self.area_index >= self.total_areas() {
            self.phase = DirectorPhase::StageCleared;
            self.pending = None;
            tracing::debug!(stage = %self.stage.id, "stage cleared");
            return Some(AreaAdvance::StageCleared);
        }

        self.phase = DirectorPhase::Idle;
        self.schedule(now.after(self.timing.first_wave_delay_ms), DirectorStep::StartWave);
        tracing::debug!(area = self.area_index, "area started");
        Some(AreaAdvance::Started {
            area_index: self.area_index,
            total_areas: self.total_areas(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EnemyTemplate;
    use crate::stage::SpawnEntry;

    fn wave(count: u32) -> ResolvedWave {
        ResolvedWave {
            spawns: vec![SpawnEntry {
                template: EnemyTemplate::new("drone", 10, 1.0, 0.0, 10.0),
                count,
            }],
        }
    }

    fn director(areas: Vec<Vec<u32>>) -> WaveAreaDirector {
        let stage = ResolvedStage {
            id: "test".into(),
            areas: areas
                .into_iter()
                .map(|waves| ResolvedArea {
                    waves: waves.into_iter().map(wave).collect(),
                    ..ResolvedArea::default()
                })
                .collect(),
            ..ResolvedStage::default()
        };
        WaveAreaDirector::new(stage, DirectorTiming::from(&CombatConfig::default()))
    }

    #[test]
    fn first_wave_waits_for_delay() {
        let mut d = director(vec![vec![1]]);
        d.begin(Millis::ZERO);
        assert_eq!(d.poll(Millis(999)), None);
        assert_eq!(d.poll(Millis(1000)), Some(DirectorStep::StartWave));
        assert_eq!(d.poll(Millis(1000)), None);
    }

    #[test]
    fn only_one_wave_active_at_a_time() {
        let mut d = director(vec![vec![2, 2]]);
        assert!(d.start_next_wave().is_some());
        assert!(d.start_next_wave().is_none());
        assert_eq!(d.waves_started(), 1);
    }

    #[test]
    fn wave_clear_fires_exactly_once() {
        let mut d = director(vec![vec![2, 1]]);
        d.start_next_wave();

        let now = Millis(5_000);
        assert_eq!(d.on_enemy_defeated(now).unwrap().progress, None);
        let report = d.on_enemy_defeated(now).unwrap();
        assert_eq!(
            report.progress,
            Some(Progress::WaveCleared {
                wave_index: 0,
                total_waves: 2
            })
        );
        // redundant defeat after the count hit zero
        let report = d.on_enemy_defeated(now).unwrap();
        assert_eq!(report.progress, None);
        assert_eq!(report.remaining, 0);
        assert_eq!(d.phase(), DirectorPhase::WaveCleared);
        assert_eq!(d.pending(), Some((Millis(7_000), DirectorStep::StartWave)));
    }

    #[test]
    fn area_clear_schedules_transition() {
        let mut d = director(vec![vec![1], vec![1]]);
        d.start_next_wave();
        let report = d.on_enemy_defeated(Millis(100)).unwrap();
        assert_eq!(
            report.progress,
            Some(Progress::AreaCleared {
                area_index: 0,
                total_areas: 2
            })
        );
        assert_eq!(d.pending(), Some((Millis(2_100), DirectorStep::AdvanceArea)));

        assert_eq!(
            d.advance_to_next_area(Millis(2_100)),
            Some(AreaAdvance::Started {
                area_index: 1,
                total_areas: 2
            })
        );
        assert_eq!(d.phase(), DirectorPhase::Idle);
        assert_eq!(d.waves_started(), 0);
        assert_eq!(d.pending(), Some((Millis(3_100), DirectorStep::StartWave)));
    }

    #[test]
    fn advance_requires_cleared_area() {
        let mut d = director(vec![vec![1], vec![1]]);
        assert_eq!(d.advance_to_next_area(Millis::ZERO), None);
        d.start_next_wave();
        assert_eq!(d.advance_to_next_area(Millis::ZERO), None);
        assert_eq!(d.area_index(), 0);
    }

    #[test]
    fn stage_clear_is_terminal() {
        let mut d = director(vec![vec![1]]);
        d.start_next_wave();
        d.on_enemy_defeated(Millis(10));
        assert_eq!(d.poll(Millis(10)), Some(DirectorStep::AdvanceArea));
        assert_eq!(d.advance_to_next_area(Millis(10)), Some(AreaAdvance::StageCleared));
        assert!(d.is_complete());

        assert_eq!(d.on_enemy_defeated(Millis(20)), None);
        assert_eq!(d.advance_to_next_area(Millis(20)), None);
        assert!(d.start_next_wave().is_none());
        assert_eq!(d.total_defeated(), 1);
    }
}
