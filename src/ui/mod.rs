pub mod terminal_ui;

pub use self::terminal_ui::*;
