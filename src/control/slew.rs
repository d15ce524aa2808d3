use crate::control::pid::{DRIVE_MAX, DRIVE_MIN};
use crate::core::math::sign;

/// Bounds the per-tick change of a drive command, capping current draw and
/// mechanical jerk on direction reversals and large setpoint jumps.
pub struct SlewLimiter {
    last_output: i32,
    max_step: i32,
    running: bool,
}

impl SlewLimiter {
    pub fn new(max_step: i32) -> Self {
        Self {
            last_output: 0,
            max_step: max_step.abs(),
            running: true,
        }
    }

    /// When `running` is false, `limit` is a clamp-and-latch passthrough.
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn last_output(&self) -> i32 {
        self.last_output
    }

    pub fn reset(&mut self) {
        self.last_output = 0;
    }

    /// Returns the command actually allowed this tick. Whenever `running` is
    /// true, `|limit(t) - limit(t-1)| <= max_step` holds.
    pub fn limit(&mut self, desired: i32) -> i32 {
        let desired = desired.clamp(DRIVE_MIN, DRIVE_MAX);

        let actual = if self.running {
            let delta = desired - self.last_output;
            if delta.abs() > self.max_step {
                self.last_output + sign(delta) * self.max_step
            } else {
                desired
            }
        } else {
            desired
        };

        self.last_output = actual;
        actual
    }
}

#[cfg(test)]
mod slew_tests {
    use super::*;

    #[test]
    fn test_step_bound_holds_over_consecutive_ticks() {
        let mut slew = SlewLimiter::new(15);
        let mut previous = 0;

        for desired in [127, -127, 90, 90, -30, 0, 127, 5] {
            let actual = slew.limit(desired);
            assert!(
                (actual - previous).abs() <= 15,
                "step from {} to {} exceeds max_step",
                previous,
                actual
            );
            previous = actual;
        }
    }

    #[test]
    fn test_full_throttle_jump_climbs_monotonically() {
        let mut slew = SlewLimiter::new(20);

        assert_eq!(slew.limit(127), 20, "first tick steps by max_step");
        assert_eq!(slew.limit(127), 40);
        assert_eq!(slew.limit(127), 60);
        assert_eq!(slew.limit(127), 80);
        assert_eq!(slew.limit(127), 100);
        assert_eq!(slew.limit(127), 120);
        assert_eq!(slew.limit(127), 127, "last step is partial");
        assert_eq!(slew.limit(127), 127, "holds once reached");
    }

    #[test]
    fn test_passthrough_when_not_running() {
        let mut slew = SlewLimiter::new(10);
        slew.set_running(false);

        assert_eq!(slew.limit(127), 127, "no step bound while disabled");
        assert_eq!(slew.limit(-127), -127);
        assert_eq!(slew.last_output(), -127, "passthrough still latches");

        assert_eq!(slew.limit(500), 127, "out-of-range input is clamped");
    }

    #[test]
    fn test_reenabling_slews_from_latched_output() {
        let mut slew = SlewLimiter::new(10);
        slew.set_running(false);
        slew.limit(100);

        slew.set_running(true);
        assert_eq!(slew.limit(0), 90, "slews down from the latched value");
    }

    #[test]
    fn test_small_changes_pass_unmodified() {
        let mut slew = SlewLimiter::new(20);
        assert_eq!(slew.limit(12), 12);
        assert_eq!(slew.limit(-5), -5, "17-step reversal is within bound");
    }
}
