use std::fmt;

/// Errors raised by clock operations.
///
/// The only failure mode is asking a clock for a capability it deliberately
/// does not offer; every time value and start/stop sequence is valid input.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ClockError {
    /// The operation exists on the generic interface but this clock refuses it.
    Unsupported {
        operation: &'static str,
    },
}

impl ClockError {
    pub(crate) fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported { operation } => {
                write!(f, "clock operation `{operation}` is not supported")
            }
        }
    }
}

impl std::error::Error for ClockError {}
