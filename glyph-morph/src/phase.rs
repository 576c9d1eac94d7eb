use std::time::Duration;

/// Ticks per morph cycle.
pub const TICKS_PER_CYCLE: u64 = 100;

pub const MIN_SPEED: u32 = 1;
pub const MAX_SPEED: u32 = 500;

/// Looping phase driver. One tick per frame; the caller owns the timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseClock {
    tick: u64,
    pub pingpong: bool,
}

impl PhaseClock {
    pub fn new(pingpong: bool) -> Self {
        Self { tick: 0, pingpong }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn advance(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// `[0, 1)` sawtooth, or a `[0, 1]` triangle wave when ping-ponging.
    pub fn phase(&self) -> f64 {
        if self.pingpong {
            let folded = (self.tick % (2 * TICKS_PER_CYCLE)) as f64 - TICKS_PER_CYCLE as f64;
            folded.abs() / TICKS_PER_CYCLE as f64
        } else {
            (self.tick % TICKS_PER_CYCLE) as f64 / TICKS_PER_CYCLE as f64
        }
    }

    /// True on the last tick of a cycle.
    pub fn cycle_ending(&self) -> bool {
        self.tick % TICKS_PER_CYCLE == TICKS_PER_CYCLE - 1
    }
}

/// Holds the phase at 0 for the first `stay_start` and at 1 for the last
/// `stay_end` of the cycle, stretching the rest to fill `[0, 1]`.
pub fn apply_stay(value: f64, stay_start: f64, stay_end: f64) -> f64 {
    if value < stay_start {
        return 0.0;
    }

    if value > 1.0 - stay_end {
        return 1.0;
    }

    (value - stay_start) / (1.0 - stay_start - stay_end)
}

/// Delay between ticks for a speed in ticks per second.
pub fn tick_interval(speed: u32) -> Duration {
    Duration::from_secs(1) / speed.clamp(MIN_SPEED, MAX_SPEED)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_at(tick: u64, pingpong: bool) -> PhaseClock {
        PhaseClock { tick, pingpong }
    }

    #[test]
    fn sawtooth_wraps_each_cycle() {
        assert_eq!(clock_at(0, false).phase(), 0.0);
        assert_eq!(clock_at(25, false).phase(), 0.25);
        assert_eq!(clock_at(99, false).phase(), 0.99);
        assert_eq!(clock_at(100, false).phase(), 0.0);
        assert_eq!(clock_at(250, false).phase(), 0.5);
    }

    #[test]
    fn pingpong_folds() {
        assert_eq!(clock_at(0, true).phase(), 1.0);
        assert_eq!(clock_at(50, true).phase(), 0.5);
        assert_eq!(clock_at(100, true).phase(), 0.0);
        assert_eq!(clock_at(150, true).phase(), 0.5);
        assert_eq!(clock_at(199, true).phase(), 0.99);
        assert_eq!(clock_at(200, true).phase(), 1.0);
    }

    #[test]
    fn advance_and_cycle_end() {
        let mut clock = PhaseClock::new(false);

        for _ in 0..99 {
            assert!(!clock.cycle_ending());
            clock.advance();
        }

        assert!(clock.cycle_ending());
        clock.advance();
        assert_eq!(clock.tick(), 100);
        assert!(!clock.cycle_ending());
    }

    #[test]
    fn stay_holds_ends() {
        assert_eq!(apply_stay(0.1, 0.2, 0.2), 0.0);
        assert_eq!(apply_stay(0.9, 0.2, 0.2), 1.0);
        assert!((apply_stay(0.5, 0.2, 0.2) - 0.5).abs() < 1e-12);
        assert!((apply_stay(0.4, 0.2, 0.2) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn zero_stay_is_identity() {
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            assert!((apply_stay(t, 0.0, 0.0) - t).abs() < 1e-12);
        }
    }

    #[test]
    fn tick_interval_clamps_speed() {
        assert_eq!(tick_interval(10), Duration::from_millis(100));
        assert_eq!(tick_interval(0), Duration::from_secs(1));
        assert_eq!(tick_interval(10_000), Duration::from_millis(2));
    }
}
