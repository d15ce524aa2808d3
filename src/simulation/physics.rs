use crate::control::pid::DRIVE_MAX;

/// First-order plant model of a motorized mechanism: the drive command maps
/// to a commanded velocity in sensor units per second, the actual velocity
/// lags behind it, and travel is bounded by hard stops.
pub struct MechanismPhysics {
    // Physical parameters
    max_speed: f64,     // sensor units/s at full command
    time_constant: f64, // s, velocity lag

    // State variables
    position: f64, // sensor units
    velocity: f64, // sensor units/s

    // Hard stops
    min_stop: f64,
    max_stop: f64,

    // Input
    command: i32, // [-127, 127]
}

impl MechanismPhysics {
    pub fn new(position: f64, min_stop: f64, max_stop: f64, max_speed: f64) -> Self {
        Self {
            max_speed,
            time_constant: 0.1,
            position,
            velocity: 0.0,
            min_stop,
            max_stop,
            command: 0,
        }
    }

    pub fn update(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }

        let commanded_velocity = self.command as f64 / DRIVE_MAX as f64 * self.max_speed;

        let blend = (dt / self.time_constant).min(1.0);
        self.velocity += (commanded_velocity - self.velocity) * blend;

        self.position += self.velocity * dt;

        if self.position <= self.min_stop {
            self.position = self.min_stop;
            self.velocity = 0.0;
        } else if self.position >= self.max_stop {
            self.position = self.max_stop;
            self.velocity = 0.0;
        }
    }

    pub fn set_command(&mut self, command: i32) {
        self.command = command;
    }

    pub fn get_position(&self) -> f64 {
        self.position
    }

    /// Position rounded to raw sensor units, as a potentiometer would report.
    pub fn raw_position(&self) -> i32 {
        self.position.round() as i32
    }

    pub fn get_velocity(&self) -> f64 {
        self.velocity
    }
}
