/// Drive command range of an 8-bit signed motor controller.
pub const DRIVE_MAX: i32 = 127;
pub const DRIVE_MIN: i32 = -127;

pub const DEFAULT_INTEGRAL_LIMIT: i32 = 50;

#[derive(Clone, Copy, Debug)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl PidGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }
}

/// Fixed-period position loop over raw sensor units. The integral term is
/// clamped every tick (anti-windup) and the output is clamped to the drive
/// range, so the loop never produces an out-of-range command.
pub struct PositionPid {
    gains: PidGains,
    integral_limit: i32,
    threshold: i32,
    inverted: bool,
    running: bool,
    goal_is_set: bool,
    current_position: i32,
    requested_value: i32,
    error: i32,
    last_error: i32,
    integral: i32,
    derivative: i32,
}

impl PositionPid {
    pub fn new(gains: PidGains, threshold: i32) -> Self {
        Self {
            gains,
            integral_limit: DEFAULT_INTEGRAL_LIMIT,
            threshold,
            inverted: false,
            running: false,
            goal_is_set: false,
            current_position: 0,
            requested_value: 0,
            error: 0,
            last_error: 0,
            integral: 0,
            derivative: 0,
        }
    }

    pub fn set_integral_limit(&mut self, limit: i32) {
        self.integral_limit = limit.abs();
    }

    /// Flips output polarity to match motor wiring.
    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    /// Latches a new goal and clears the loop working state, so stale
    /// integral/derivative terms from a previous approach cannot leak into
    /// this one. A goal set mid-approach supersedes the old one.
    pub fn set_goal(&mut self, target: i32) {
        self.requested_value = target;
        self.integral = 0;
        self.last_error = 0;
        self.derivative = 0;
        self.goal_is_set = true;
        self.running = true;
    }

    pub fn reset(&mut self) {
        self.integral = 0;
        self.last_error = 0;
        self.derivative = 0;
        self.error = 0;
        self.running = false;
        self.goal_is_set = false;
    }

    /// One control tick: updates the loop state from `measured` and returns
    /// a drive command in [DRIVE_MIN, DRIVE_MAX].
    pub fn tick(&mut self, measured: i32) -> i32 {
        self.current_position = measured;
        self.error = self.requested_value - measured;

        self.integral =
            (self.integral + self.error).clamp(-self.integral_limit, self.integral_limit);
        self.derivative = self.error - self.last_error;
        self.last_error = self.error;

        if self.running && self.error.abs() <= self.threshold {
            self.running = false;
        }

        let raw = self.gains.kp * self.error as f64
            + self.gains.ki * self.integral as f64
            + self.gains.kd * self.derivative as f64;

        let command = raw.clamp(DRIVE_MIN as f64, DRIVE_MAX as f64) as i32;

        if self.inverted { -command } else { command }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn goal_is_set(&self) -> bool {
        self.goal_is_set
    }

    pub fn requested_value(&self) -> i32 {
        self.requested_value
    }

    pub fn current_position(&self) -> i32 {
        self.current_position
    }

    pub fn error(&self) -> i32 {
        self.error
    }

    pub fn get_integral(&self) -> i32 {
        self.integral
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }
}

#[cfg(test)]
mod pid_tests {
    use super::*;

    #[test]
    fn test_integral_stays_clamped_during_stall() {
        let mut pid = PositionPid::new(PidGains::new(0.0, 1.0, 0.0), 5);
        pid.set_goal(1000);

        // Mechanism never moves; integral would grow without bound.
        for _ in 0..500 {
            pid.tick(0);
            assert!(
                pid.get_integral().abs() <= DEFAULT_INTEGRAL_LIMIT,
                "integral must stay within the anti-windup clamp"
            );
        }
        assert_eq!(pid.get_integral(), DEFAULT_INTEGRAL_LIMIT);
    }

    #[test]
    fn test_output_stays_in_drive_range() {
        let mut pid = PositionPid::new(PidGains::new(3.0, 0.5, 1.5), 5);
        pid.set_goal(0);

        for measured in [-4000, -100, -3, 0, 3, 250, 4000] {
            let command = pid.tick(measured);
            assert!(
                (DRIVE_MIN..=DRIVE_MAX).contains(&command),
                "command {} out of drive range for measured {}",
                command,
                measured
            );
        }
    }

    #[test]
    fn test_zero_error_is_idempotent() {
        let mut pid = PositionPid::new(PidGains::new(1.0, 0.2, 0.3), 5);
        pid.set_goal(200);

        assert_eq!(pid.tick(200), 0, "no error, no drive");
        assert!(!pid.is_running(), "running drops after one in-tolerance tick");

        for _ in 0..10 {
            assert_eq!(pid.tick(200), 0, "error stays zero while on target");
            assert_eq!(pid.error(), 0);
            assert!(!pid.is_running());
        }
    }

    #[test]
    fn test_set_goal_resets_loop_state() {
        let mut pid = PositionPid::new(PidGains::new(1.0, 1.0, 0.0), 5);
        pid.set_goal(500);
        for _ in 0..20 {
            pid.tick(0);
        }
        assert!(pid.get_integral() != 0, "stall accumulated some integral");

        pid.set_goal(100);
        assert_eq!(pid.get_integral(), 0, "set_goal zeroes the integral");
        assert!(pid.is_running(), "set_goal marks the loop running");
        assert!(pid.goal_is_set());
        assert_eq!(pid.requested_value(), 100);
    }

    #[test]
    fn test_running_drops_exactly_when_within_threshold() {
        let mut pid = PositionPid::new(PidGains::new(1.0, 0.0, 0.0), 5);
        pid.set_goal(100);

        for measured in [0, 40, 80, 94] {
            pid.tick(measured);
            assert!(
                pid.is_running(),
                "still out of tolerance at measured {}",
                measured
            );
        }

        pid.tick(101);
        assert!(!pid.is_running(), "|error| = 1 <= 5, goal reached");
    }

    #[test]
    fn test_running_transitions_false_only_once_per_goal() {
        let mut pid = PositionPid::new(PidGains::new(1.0, 0.0, 0.0), 5);
        pid.set_goal(100);

        pid.tick(100);
        assert!(!pid.is_running());

        // Disturbance pushes the mechanism out of tolerance again; the
        // completion flag stays latched until the next goal.
        pid.tick(50);
        assert!(!pid.is_running(), "completion is latched per goal");

        pid.set_goal(100);
        assert!(pid.is_running(), "new goal re-arms the loop");
    }

    #[test]
    fn test_inverted_output_polarity() {
        let mut plain = PositionPid::new(PidGains::new(1.0, 0.0, 0.0), 5);
        let mut flipped = PositionPid::new(PidGains::new(1.0, 0.0, 0.0), 5);
        flipped.set_inverted(true);

        plain.set_goal(50);
        flipped.set_goal(50);

        assert_eq!(plain.tick(0), 50);
        assert_eq!(flipped.tick(0), -50, "inversion negates the command");
    }

    #[test]
    fn test_proportional_command_tracks_error() {
        let mut pid = PositionPid::new(PidGains::new(0.5, 0.0, 0.0), 5);
        pid.set_goal(100);

        assert_eq!(pid.tick(0), 50);
        assert_eq!(pid.tick(60), 20);
        assert_eq!(pid.tick(120), -10, "overshoot drives backwards");
    }
}
