pub mod actions;
pub mod commands;
pub mod dispatch;
pub mod logging;

mod start;
pub use self::start::start;
