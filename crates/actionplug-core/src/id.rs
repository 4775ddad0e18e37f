//! Identity types.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Unique identity of an action plug.
///
/// Equality on this id is the only comparison that matters for routing.
/// Labels are never used to tell two plugs apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlugId(Uuid);

impl PlugId {
    /// Allocate a fresh, globally unique plug id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PlugId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlugId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plug:{}", self.0)
    }
}

/// Unique identity of a scope manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(Uuid);

impl ScopeId {
    /// Allocate a fresh scope id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScopeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope:{}", self.0)
    }
}

/// Global counter for generating unique handler IDs.
static HANDLER_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Identity of a handler.
///
/// Every call to [`Handler::new`](crate::Handler::new) allocates a new id;
/// clones of a handler share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl HandlerId {
    pub(crate) fn next() -> Self {
        Self(HANDLER_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plug_ids_are_unique() {
        let a = PlugId::new();
        let b = PlugId::new();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("plug:"));
    }

    #[test]
    fn test_handler_ids_increase() {
        let id1 = HandlerId::next();
        let id2 = HandlerId::next();
        assert_ne!(id1, id2);
        assert!(id2 > id1);
        assert!(id1.to_string().starts_with("handler:"));
    }
}
