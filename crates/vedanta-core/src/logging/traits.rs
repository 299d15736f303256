//! Logger trait definition

use std::sync::Arc;

/// Host-agnostic logger
///
/// Implementations:
/// - `NoOpLogger`: silent, for tests
/// - `ConsoleLogger`: stdout/stderr
/// - host adapters (browser console, native log file) live outside this crate
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Shared logger handle
pub type SharedLogger = Arc<dyn Logger>;
