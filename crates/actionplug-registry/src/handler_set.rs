//! Type-erased handler storage for one plug.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use actionplug_core::{Handler, HandlerId};

/// A handler with its payload type erased.
///
/// The registry only ever stores a `Handler<T>` under a plug of type
/// `ActionPlug<T>`, so downcasting back to `Handler<T>` succeeds for every
/// entry reached through a typed plug.
#[derive(Clone)]
pub(crate) struct ErasedHandler {
    inner: Arc<dyn Any + Send + Sync>,
}

impl ErasedHandler {
    fn new<T: 'static>(handler: Handler<T>) -> Self {
        Self {
            inner: Arc::new(handler),
        }
    }

    fn downcast<T: 'static>(&self) -> Option<Handler<T>> {
        self.inner.downcast_ref::<Handler<T>>().cloned()
    }
}

/// The set of handlers registered for one plug, keyed by handler identity.
#[derive(Default)]
pub(crate) struct HandlerSet {
    entries: HashMap<HandlerId, ErasedHandler>,
}

impl HandlerSet {
    /// Insert a handler. Returns false if the same handler is already present.
    pub(crate) fn insert<T: 'static>(&mut self, handler: &Handler<T>) -> bool {
        if self.entries.contains_key(&handler.id()) {
            return false;
        }
        self.entries
            .insert(handler.id(), ErasedHandler::new(handler.clone()));
        true
    }

    /// Remove a handler by identity, handing it back to the caller.
    ///
    /// The caller decides where it is dropped; dropping a handler can run
    /// arbitrary code, so it must not happen under the registry lock.
    pub(crate) fn remove(&mut self, id: HandlerId) -> Option<ErasedHandler> {
        self.entries.remove(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy out the current handlers for dispatch.
    pub(crate) fn snapshot<T: 'static>(&self) -> Vec<Handler<T>> {
        self.entries
            .iter()
            .filter_map(|(id, entry)| {
                let handler = entry.downcast::<T>();
                if handler.is_none() {
                    tracing::warn!(
                        "Skipping {}: payload type does not match {}",
                        id,
                        std::any::type_name::<T>()
                    );
                }
                handler
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_idempotent() {
        let mut set = HandlerSet::default();
        let handler = Handler::new(|_: &i32| {});

        assert!(set.insert(&handler));
        assert!(!set.insert(&handler));
        assert!(!set.insert(&handler.clone()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove_by_identity() {
        let mut set = HandlerSet::default();
        let handler = Handler::new(|_: &i32| {});
        let other = Handler::new(|_: &i32| {});

        set.insert(&handler);
        assert!(set.remove(other.id()).is_none());
        assert!(set.remove(handler.id()).is_some());
        assert!(set.remove(handler.id()).is_none());
        assert!(set.is_empty());
    }

    #[test]
    fn test_snapshot_skips_mismatched_types() {
        let mut set = HandlerSet::default();
        set.insert(&Handler::new(|_: &i32| {}));
        set.insert(&Handler::new(|_: &String| {}));

        assert_eq!(set.snapshot::<i32>().len(), 1);
        assert_eq!(set.snapshot::<String>().len(), 1);
        assert!(set.snapshot::<u8>().is_empty());
    }
}
