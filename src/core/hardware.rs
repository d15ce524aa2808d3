pub trait PositionSensor {
    /// Raw reading in sensor units (potentiometer / encoder counts).
    fn read(&self) -> i32;
}

pub trait Motor {
    /// Applies a drive command in [-127, 127].
    fn set_command(&mut self, command: i32);
}
