//! Error types for the actionplug registry.

use thiserror::Error;

use crate::id::{HandlerId, PlugId};

/// Failure of a single handler invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The handler returned an error.
    #[error("Handler failed: {0}")]
    Failed(String),

    /// The handler panicked and the panic was isolated.
    #[error("Handler panicked: {0}")]
    Panicked(String),
}

/// One isolated failure recorded during a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure {
    /// The handler that failed.
    pub handler: HandlerId,

    /// What went wrong.
    pub error: HandlerError,
}

/// Dispatch errors - surfaced to the host.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A host call needed an enclosing scope but none was entered.
    #[error("No active scope: the call was made outside of any entered scope")]
    NoActiveScope,

    /// One or more handlers failed while delivering a trigger.
    #[error("{} handler(s) failed for {plug}", .failures.len())]
    HandlersFailed {
        plug: PlugId,
        failures: Vec<HandlerFailure>,
    },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handlers_failed_message() {
        let plug = PlugId::new();
        let err = DispatchError::HandlersFailed {
            plug,
            failures: vec![HandlerFailure {
                handler: crate::Handler::new(|_: &()| {}).id(),
                error: HandlerError::Failed("boom".to_string()),
            }],
        };
        assert_eq!(err.to_string(), format!("1 handler(s) failed for {}", plug));
    }
}
