use crate::core::hardware::{Motor, PositionSensor};

pub struct SimulatedPotentiometer {
    value: i32,
}

impl SimulatedPotentiometer {
    pub fn new(initial_value: i32) -> Self {
        Self {
            value: initial_value,
        }
    }

    /// Written back by the physics loop each tick.
    pub fn set_raw(&mut self, value: i32) {
        self.value = value;
    }
}

impl PositionSensor for SimulatedPotentiometer {
    fn read(&self) -> i32 {
        self.value
    }
}

pub struct SimulatedMotor {
    command: i32,
}

impl Default for SimulatedMotor {
    fn default() -> Self {
        SimulatedMotor::new()
    }
}

impl SimulatedMotor {
    pub fn new() -> Self {
        Self { command: 0 }
    }

    pub fn get_command(&self) -> i32 {
        self.command
    }
}

impl Motor for SimulatedMotor {
    fn set_command(&mut self, command: i32) {
        self.command = command;
    }
}
