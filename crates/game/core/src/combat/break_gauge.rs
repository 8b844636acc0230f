//! Boss stun meter.

/// Break gauge state machine: `Active → Broken → Active`.
///
/// The gauge only reports whether the boss is broken. The damage bonus while
/// broken and the suspension of movement and patterns are applied by the
/// caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BreakGauge {
    current: u32,
    max: u32,
    /// Remaining stun time; `Some` exactly while broken.
    broken_remaining_ms: Option<u32>,
}

/// Transition reported by [`BreakGauge::apply_break_damage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreakOutcome {
    /// Gauge is broken or the boss is unbreakable; nothing changed.
    Ignored,
    /// Gauge drained but not empty.
    Drained { current: u32 },
    /// Gauge reached zero and the stun started.
    Broke,
}

impl BreakGauge {
    /// Creates a full gauge. A `max` of zero makes the boss unbreakable.
    pub fn new(max: u32) -> Self {
        Self {
            current: max,
            max,
            broken_remaining_ms: None,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_broken(&self) -> bool {
        self.broken_remaining_ms.is_some()
    }

    pub fn is_breakable(&self) -> bool {
        self.max > 0
    }

    /// Drains the gauge. Reaching zero enters `Broken` for `duration_ms`.
    pub fn apply_break_damage(&mut self, amount: u32, duration_ms: u32) -> BreakOutcome {
        if self.is_broken() || !self.is_breakable() {
            return BreakOutcome::Ignored;
        }

        self.current = self.current.saturating_sub(amount);
        if self.current == 0 {
            self.broken_remaining_ms = Some(duration_ms);
            BreakOutcome::Broke
        } else {
            BreakOutcome::Drained {
                current: self.current,
            }
        }
    }

    /// Advances the stun timer. Returns true when the break ends this call,
    /// in which case the gauge has been refilled.
    pub fn tick(&mut self, dt_ms: u32) -> bool {
        let Some(remaining) = self.broken_remaining_ms else {
            return false;
        };

        let remaining = remaining.saturating_sub(dt_ms);
        if remaining == 0 {
            self.end_break();
            true
        } else {
            self.broken_remaining_ms = Some(remaining);
            false
        }
    }

    fn end_break(&mut self) {
        self.broken_remaining_ms = None;
        self.current = self.max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draining_to_zero_breaks() {
        let mut gauge = BreakGauge::new(100);
        assert_eq!(
            gauge.apply_break_damage(60, 5000),
            BreakOutcome::Drained { current: 40 }
        );
        assert_eq!(gauge.apply_break_damage(60, 5000), BreakOutcome::Broke);
        assert!(gauge.is_broken());
        assert_eq!(gauge.current(), 0);
    }

    #[test]
    fn break_damage_while_broken_is_ignored() {
        let mut gauge = BreakGauge::new(10);
        gauge.apply_break_damage(10, 5000);
        let snapshot = gauge;

        for _ in 0..5 {
            assert_eq!(gauge.apply_break_damage(999, 5000), BreakOutcome::Ignored);
        }
        assert_eq!(gauge, snapshot);
    }

    #[test]
    fn unbreakable_gauge_never_breaks() {
        let mut gauge = BreakGauge::new(0);
        assert_eq!(gauge.apply_break_damage(1_000, 5000), BreakOutcome::Ignored);
        assert!(!gauge.is_broken());
    }

    #[test]
    fn timer_expiry_refills_gauge() {
        let mut gauge = BreakGauge::new(50);
        gauge.apply_break_damage(50, 5000);

        assert!(!gauge.tick(4_000));
        assert!(gauge.is_broken());
        assert!(gauge.tick(1_000));
        assert!(!gauge.is_broken());
        assert_eq!(gauge.current(), 50);
        assert!(!gauge.tick(1_000));
    }
}
