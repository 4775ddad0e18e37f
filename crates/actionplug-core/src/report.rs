//! Trigger outcome reporting.

use crate::error::{DispatchError, HandlerFailure};
use crate::id::{PlugId, ScopeId};

/// Outcome of a single trigger.
///
/// Delivery never stops at a failing handler; every failure in the snapshot
/// is collected here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerReport {
    /// The plug that was triggered.
    pub plug: PlugId,

    /// The scope the plug resolved to.
    pub scope: ScopeId,

    /// Number of handlers invoked (successfully or not).
    pub invoked: usize,

    /// Handlers that failed.
    pub failures: Vec<HandlerFailure>,
}

impl TriggerReport {
    /// True when every invoked handler succeeded.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of handlers that ran without failing.
    pub fn delivered(&self) -> usize {
        self.invoked - self.failures.len()
    }

    /// Convert into a `Result`, aggregating failures into one error.
    pub fn into_result(self) -> Result<usize, DispatchError> {
        if self.failures.is_empty() {
            Ok(self.invoked)
        } else {
            Err(DispatchError::HandlersFailed {
                plug: self.plug,
                failures: self.failures,
            })
        }
    }
}
