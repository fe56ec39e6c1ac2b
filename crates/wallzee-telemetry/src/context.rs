//! Command-level span helpers.
//!
//! # Design
//! - Each CLI invocation runs inside one `command` span carrying the build SHA.
//! - The guard keeps the span entered until the command returns.

use tracing::Span;
use tracing::span::EnteredSpan;

use crate::init::build_sha;

/// Span describing one front-end command.
#[must_use]
pub fn command_span(command: &str) -> Span {
    tracing::info_span!("command", name = %command, build_sha = %build_sha())
}

/// Keeps a command span entered for the guard's lifetime.
pub struct CommandContextGuard {
    _entered: EnteredSpan,
}

impl CommandContextGuard {
    /// Enter the span for `command`.
    #[must_use]
    pub fn enter(command: &str) -> Self {
        Self {
            _entered: command_span(command).entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_can_be_entered_and_dropped() {
        let guard = CommandContextGuard::enter("browse");
        drop(guard);
        let _span = command_span("stats");
    }
}
