//! Logging abstraction
//!
//! The host application decides where diagnostics go; the core only talks to
//! the `Logger` trait.

mod traits;
mod console;
mod noop;

pub use traits::{Logger, SharedLogger};
pub use console::ConsoleLogger;
pub use noop::NoOpLogger;
