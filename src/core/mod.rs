pub mod hardware;
pub mod math;
pub mod pose;

pub use self::hardware::*;
pub use self::math::*;
pub use self::pose::*;
