pub mod mechanism;
pub mod pid;
pub mod slew;

pub use self::mechanism::*;
pub use self::pid::*;
pub use self::slew::*;
