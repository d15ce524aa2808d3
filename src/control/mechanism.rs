use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};

use crate::control::pid::{PidGains, PositionPid};
use crate::control::slew::SlewLimiter;
use crate::core::hardware::{Motor, PositionSensor};

pub trait MechanismController {
    fn move_to(&mut self, target: i32);
    fn tick(&mut self) -> i32;
    fn is_running(&self) -> bool;
    fn at_goal(&self) -> bool;
}

/// Calibration for one physical subsystem (lift, four-bar, mobile-goal lift).
#[derive(Clone, Copy, Debug)]
pub struct MechanismConfig {
    pub name: &'static str,
    pub gains: PidGains,
    pub threshold: i32,
    /// Calibrated travel window in raw sensor units.
    pub travel_min: i32,
    pub travel_max: i32,
    /// Maximum drive-command change per tick.
    pub max_step: i32,
    /// Output polarity, set once to match motor wiring.
    pub inverted: bool,
}

/// One mechanism = one PID loop + one slew limiter + a travel window.
/// Owns its loop state exclusively; goals arrive through `move_to` and each
/// periodic `tick` chains sample -> PID -> slew -> motor write.
pub struct PidMechanismController<'a> {
    sensor: Rc<RefCell<dyn PositionSensor + 'a>>,
    motor: Rc<RefCell<dyn Motor + 'a>>,
    pid: PositionPid,
    slew: SlewLimiter,
    name: &'static str,
    travel_min: i32,
    travel_max: i32,
    last_command: i32,
}

impl<'a> PidMechanismController<'a> {
    pub fn new(
        config: MechanismConfig,
        sensor: Rc<RefCell<impl PositionSensor + 'a>>,
        motor: Rc<RefCell<impl Motor + 'a>>,
    ) -> Self {
        let mut pid = PositionPid::new(config.gains, config.threshold);
        pid.set_inverted(config.inverted);

        PidMechanismController {
            sensor,
            motor,
            pid,
            slew: SlewLimiter::new(config.max_step),
            name: config.name,
            travel_min: config.travel_min,
            travel_max: config.travel_max,
            last_command: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn goal(&self) -> i32 {
        self.pid.requested_value()
    }

    pub fn current_position(&self) -> i32 {
        self.pid.current_position()
    }

    pub fn last_command(&self) -> i32 {
        self.last_command
    }

    pub fn error(&self) -> i32 {
        self.pid.error()
    }
}

impl MechanismController for PidMechanismController<'_> {
    fn move_to(&mut self, target: i32) {
        let clamped = target.clamp(self.travel_min, self.travel_max);
        if clamped != target {
            debug!(
                "{}: target {} outside travel window [{}, {}], clamped to {}",
                self.name, target, self.travel_min, self.travel_max, clamped
            );
        }

        self.pid.set_goal(clamped);
        debug!("{}: goal latched at {}", self.name, clamped);
    }

    fn tick(&mut self) -> i32 {
        let was_running = self.pid.is_running();

        let measured = self.sensor.borrow().read();
        let desired = self.pid.tick(measured);
        let command = self.slew.limit(desired);

        self.motor.borrow_mut().set_command(command);
        self.last_command = command;

        if was_running && !self.pid.is_running() {
            info!(
                "{}: reached goal {} (measured {})",
                self.name,
                self.pid.requested_value(),
                measured
            );
        }

        command
    }

    fn is_running(&self) -> bool {
        self.pid.is_running()
    }

    fn at_goal(&self) -> bool {
        self.pid.goal_is_set() && !self.pid.is_running()
    }
}
