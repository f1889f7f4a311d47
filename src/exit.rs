//! Process exit handling
//!
//! Exit work must be synchronous and bounded: the process may be gone as soon
//! as the handler returns.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::Result;

pub const SIGINT: &str = "SIGINT";

/// Why the process is going away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitReason {
    pub code: i32,
    pub signal: Option<String>,
}

impl ExitReason {
    pub fn code(code: i32) -> Self {
        Self { code, signal: None }
    }

    pub fn signal(name: impl Into<String>) -> Self {
        Self {
            code: 0,
            signal: Some(name.into()),
        }
    }

    pub fn interrupt() -> Self {
        Self::signal(SIGINT)
    }

    /// Ctrl+C while a build is on screen should leave the output alone.
    pub fn is_interrupt(&self) -> bool {
        self.signal.as_deref() == Some(SIGINT)
    }
}

/// Register a Ctrl+C handler that runs `on_interrupt` once and exits with 130.
///
/// Only one handler can be installed per process.
pub fn install_interrupt_handler<F>(mut on_interrupt: F) -> Result<()>
where
    F: FnMut(ExitReason) + Send + 'static,
{
    let fired = AtomicBool::new(false);
    ctrlc::set_handler(move || {
        if !fired.swap(true, Ordering::SeqCst) {
            on_interrupt(ExitReason::interrupt());
        }
        std::process::exit(130);
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_detection() {
        assert!(ExitReason::interrupt().is_interrupt());
        assert!(!ExitReason::signal("SIGTERM").is_interrupt());
        assert!(!ExitReason::code(2).is_interrupt());
    }

    #[test]
    fn test_handler_installs_once() {
        assert!(install_interrupt_handler(|_| {}).is_ok());
        assert!(install_interrupt_handler(|_| {}).is_err());
    }
}
