//! RAII handler registration.

use std::fmt;
use std::sync::Arc;

use actionplug_core::{ActionPlug, Handler, HandlerId, PlugId};

use crate::scope::{Scope, ScopeManager};

/// A registered handler that unregisters itself when dropped.
///
/// This is how a host consumer subscribes for its own lifetime: create the
/// subscription when the consumer mounts, drop it when it unmounts.
#[must_use = "dropping a Subscription unregisters its handler"]
pub struct Subscription {
    scope: Scope,
    plug: PlugId,
    handler: HandlerId,
    active: bool,
}

impl Subscription {
    /// Register `handler` for `plug`, resolving from `scope`.
    pub fn new<T: 'static>(scope: &Scope, plug: &ActionPlug<T>, handler: Handler<T>) -> Self {
        scope.add_handler(plug, &handler);
        Self {
            scope: Arc::clone(scope),
            plug: plug.id(),
            handler: handler.id(),
            active: true,
        }
    }

    /// The plug the handler was registered for.
    pub fn plug(&self) -> PlugId {
        self.plug
    }

    /// Identity of the registered handler.
    pub fn handler_id(&self) -> HandlerId {
        self.handler
    }

    /// The scope the subscription was made from (not necessarily the owner).
    pub fn scope(&self) -> &ScopeManager {
        &self.scope
    }

    /// Unregister now instead of on drop.
    pub fn unsubscribe(mut self) -> bool {
        self.release()
    }

    fn release(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.scope.remove_by_id(self.plug, self.handler)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("scope", &self.scope.id())
            .field("plug", &self.plug)
            .field("handler", &self.handler)
            .field("active", &self.active)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter_handler(calls: &Arc<AtomicUsize>) -> Handler<u32> {
        let calls = Arc::clone(calls);
        Handler::new(move |_: &u32| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_drop_unregisters() {
        let plug = ActionPlug::<u32>::new();
        let scope = ScopeManager::root().child([plug.id()]);
        let calls = Arc::new(AtomicUsize::new(0));

        {
            let _subscription = scope.subscribe(&plug, counter_handler(&calls));
            assert_eq!(scope.handler_count(&plug), 1);
            scope.trigger(&plug, &1);
        }

        assert_eq!(scope.handler_count(&plug), 0);
        scope.trigger(&plug, &1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_from_child_scope() {
        let plug = ActionPlug::<u32>::new();
        let owner = ScopeManager::root().child([plug.id()]);
        let consumer = owner.child([]);
        let calls = Arc::new(AtomicUsize::new(0));

        let subscription = Subscription::new(&consumer, &plug, counter_handler(&calls));
        assert_eq!(subscription.scope().id(), consumer.id());
        assert_eq!(owner.handler_count(&plug), 1);

        assert!(subscription.unsubscribe());
        assert_eq!(owner.handler_count(&plug), 0);
    }

    #[test]
    fn test_drop_after_teardown_is_noop() {
        let plug = ActionPlug::<u32>::new();
        let scope = ScopeManager::root().child([plug.id()]);
        let calls = Arc::new(AtomicUsize::new(0));

        let subscription = scope.subscribe(&plug, counter_handler(&calls));
        scope.clear();
        assert!(!subscription.unsubscribe());
    }

    #[test]
    fn test_two_subscriptions_same_handler() {
        let plug = ActionPlug::<u32>::new();
        let scope = ScopeManager::root().child([plug.id()]);
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = counter_handler(&calls);

        let first = scope.subscribe(&plug, handler.clone());
        let second = scope.subscribe(&plug, handler);
        assert_eq!(scope.handler_count(&plug), 1);

        // Identity-based removal: the first drop removes the shared entry.
        drop(first);
        assert_eq!(scope.handler_count(&plug), 0);
        assert!(!second.unsubscribe());
    }
}
