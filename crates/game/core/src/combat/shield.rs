//! Party-wide shield pool.

/// Single absorption pool shared by the whole party.
///
/// `max` is the sum of every member's shield stat at formation time. Damage
/// aimed at any member is drained from here before that member's HP.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShieldLedger {
    current: u32,
    max: u32,
}

/// Outcome of routing one hit through the shield.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShieldAbsorb {
    /// Amount drained from the shield.
    pub absorbed: u32,
    /// Damage left over for HP.
    pub remaining: u32,
}

impl ShieldLedger {
    /// Creates a full shield with the given capacity.
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Drains `min(current, amount)` and returns the unabsorbed remainder.
    ///
    /// Callers emit a shield-changed signal only when `absorbed > 0`.
    pub fn apply_damage(&mut self, amount: u32) -> ShieldAbsorb {
        let absorbed = self.current.min(amount);
        self.current -= absorbed;
        ShieldAbsorb {
            absorbed,
            remaining: amount - absorbed,
        }
    }

    /// Refills the shield, capped at `max`. Returns the amount actually added.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_add(amount).min(self.max);
        self.current - before
    }
}
