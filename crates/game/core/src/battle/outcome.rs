/// Where the battle stands. Anything but `Running` is terminal.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum BattleStatus {
    #[default]
    Running,
    Cleared,
    Defeated,
}

impl BattleStatus {
    pub fn is_finished(self) -> bool {
        self != Self::Running
    }
}

/// Running totals kept while the battle is in progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct BattleStats {
    pub total_damage_dealt: u64,
    pub party_deaths: u32,
}

/// Summary of a finished battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleReport {
    pub stage_id: String,
    pub status: BattleStatus,
    /// 0 to 3.
    pub stars: u8,
    pub elapsed_ms: u64,
    /// HP damage dealt to enemies.
    pub total_damage_dealt: u64,
    pub party_deaths: u32,
    pub enemies_defeated: u32,
}

/// Star grade of a battle.
///
/// A defeat earns nothing. A clear earns one star, two without any member
/// going down, and three if additionally the clear took no more whole
/// seconds than the time limit. A zero limit places no time requirement.
pub fn grade(status: BattleStatus, party_deaths: u32, elapsed_ms: u64, time_limit_secs: u32) -> u8 {
    match status {
        BattleStatus::Running | BattleStatus::Defeated => 0,
        BattleStatus::Cleared => {
            let in_time = time_limit_secs == 0 || elapsed_ms / 1000 <= u64::from(time_limit_secs);
            match (party_deaths, in_time) {
                (0, true) => 3,
                (0, false) => 2,
                _ => 1,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defeat_earns_no_stars() {
        assert_eq!(grade(BattleStatus::Defeated, 0, 1_000, 60), 0);
    }

    #[test]
    fn stars_require_no_deaths_then_time() {
        assert_eq!(grade(BattleStatus::Cleared, 1, 1_000, 60), 1);
        assert_eq!(grade(BattleStatus::Cleared, 0, 61_000, 60), 2);
        assert_eq!(grade(BattleStatus::Cleared, 0, 60_999, 60), 3);
        assert_eq!(grade(BattleStatus::Cleared, 0, 600_000, 0), 3);
    }
}
