//! Telemetry utilities for operation timing and tracing spans.

use std::time::Instant;

/// Guard for timing operation execution and recording metrics.
///
/// Records the operation's latency when dropped, so early returns and error
/// paths are timed the same as successes.
pub struct CommandTimer {
    command: String,
    start: Instant,
}

impl CommandTimer {
    /// Start timing an operation.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_command(&self.command, duration);
    }
}

/// Standardized span constructors for observability.
#[allow(dead_code)]
pub mod spans {
    use parlor_proto::UserId;
    use tracing::{Span, info_span};

    /// Create a span for a client session.
    pub fn session(user_id: UserId, addr: &str) -> Span {
        info_span!("session", user = %user_id, addr = %addr)
    }

    /// Create a span for an operation execution.
    pub fn command(tag: &str, user_id: UserId) -> Span {
        info_span!("command", name = %tag, user = %user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_records_on_drop() {
        crate::metrics::init();
        {
            let _timer = CommandTimer::new("timer-test");
        }
        let output = crate::metrics::gather_metrics();
        assert!(output.contains("chat_command_duration_seconds"));
    }
}
