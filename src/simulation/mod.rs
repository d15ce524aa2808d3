pub mod physics;
pub mod simulated_hardware;

pub use self::physics::*;
pub use self::simulated_hardware::*;
