//! Host scope context.
//!
//! Hosts with implicit nesting (a view tree, a call stack of components)
//! need "the scope I am currently inside" without passing it around.
//! `ScopeContext` is an explicit stack of entered scopes that mirrors that
//! nesting. Calls made while the stack is empty are host bugs and fail with
//! [`DispatchError::NoActiveScope`].

use parking_lot::Mutex;
use std::sync::Arc;

use actionplug_core::{ActionPlug, DispatchError, Handler, TriggerReport};

use crate::scope::Scope;
use crate::subscription::Subscription;
use crate::trigger::Trigger;

/// Stack of scopes the host has entered.
#[derive(Debug, Default)]
pub struct ScopeContext {
    stack: Mutex<Vec<Scope>>,
}

impl ScopeContext {
    /// Create a context with no scope entered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `scope`. It stays current until the guard is dropped.
    pub fn enter(&self, scope: &Scope) -> ContextGuard<'_> {
        self.stack.lock().push(Arc::clone(scope));
        ContextGuard {
            context: self,
            scope: Arc::clone(scope),
        }
    }

    /// The innermost entered scope.
    pub fn current(&self) -> Result<Scope, DispatchError> {
        match self.stack.lock().last() {
            Some(scope) => Ok(Arc::clone(scope)),
            None => {
                tracing::error!("Scope context used with no scope entered");
                Err(DispatchError::NoActiveScope)
            }
        }
    }

    /// Number of entered scopes.
    pub fn depth(&self) -> usize {
        self.stack.lock().len()
    }

    /// Subscribe `handler` from the current scope.
    pub fn subscribe<T: 'static>(
        &self,
        plug: &ActionPlug<T>,
        handler: Handler<T>,
    ) -> Result<Subscription, DispatchError> {
        Ok(Subscription::new(&self.current()?, plug, handler))
    }

    /// Trigger `plug` from the current scope.
    pub fn trigger<T: 'static>(
        &self,
        plug: &ActionPlug<T>,
        payload: &T,
    ) -> Result<TriggerReport, DispatchError> {
        // The lock is released before dispatch; handlers may enter scopes.
        let scope = self.current()?;
        Ok(scope.trigger(plug, payload))
    }

    /// A producer handle for the current scope.
    pub fn trigger_handle(&self) -> Result<Trigger, DispatchError> {
        Ok(self.current()?.trigger_handle())
    }

    fn leave(&self, scope: &Scope) {
        let mut stack = self.stack.lock();
        if let Some(pos) = stack.iter().rposition(|s| Arc::ptr_eq(s, scope)) {
            stack.remove(pos);
        }
    }
}

/// Keeps a scope entered in a [`ScopeContext`].
#[must_use = "dropping a ContextGuard leaves the scope immediately"]
#[derive(Debug)]
pub struct ContextGuard<'a> {
    context: &'a ScopeContext,
    scope: Scope,
}

impl ContextGuard<'_> {
    /// The scope this guard entered.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        self.context.leave(&self.scope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::ScopeManager;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_missing_scope_fails_loudly() {
        let context = ScopeContext::new();
        let plug = ActionPlug::<i32>::new();

        assert!(matches!(context.current(), Err(DispatchError::NoActiveScope)));
        assert!(matches!(
            context.trigger(&plug, &1),
            Err(DispatchError::NoActiveScope)
        ));
        assert!(matches!(
            context.subscribe(&plug, Handler::new(|_: &i32| {})),
            Err(DispatchError::NoActiveScope)
        ));
        assert!(context.trigger_handle().is_err());
    }

    #[test]
    fn test_nesting_follows_guards() {
        let context = ScopeContext::new();
        let root = ScopeManager::root();
        let outer = root.child([]);
        let inner = outer.child([]);

        let _root_guard = context.enter(&root);
        {
            let _outer_guard = context.enter(&outer);
            {
                let guard = context.enter(&inner);
                assert_eq!(guard.scope().id(), inner.id());
                assert_eq!(context.current().unwrap().id(), inner.id());
                assert_eq!(context.depth(), 3);
            }
            assert_eq!(context.current().unwrap().id(), outer.id());
        }
        assert_eq!(context.current().unwrap().id(), root.id());
    }

    #[test]
    fn test_out_of_order_guard_drop() {
        let context = ScopeContext::new();
        let root = ScopeManager::root();
        let child = root.child([]);

        let root_guard = context.enter(&root);
        let child_guard = context.enter(&child);
        drop(root_guard);
        assert_eq!(context.current().unwrap().id(), child.id());
        drop(child_guard);
        assert_eq!(context.depth(), 0);
    }

    #[test]
    fn test_subscribe_and_trigger_through_context() {
        let plug = ActionPlug::<i32>::new();
        let context = ScopeContext::new();
        let owner = ScopeManager::root().child([plug.id()]);
        let consumer = owner.child([]);
        let calls = Arc::new(AtomicUsize::new(0));

        let _owner_guard = context.enter(&owner);
        let _consumer_guard = context.enter(&consumer);

        let sink = Arc::clone(&calls);
        let _subscription = context
            .subscribe(
                &plug,
                Handler::new(move |_: &i32| {
                    sink.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();
        assert_eq!(owner.handler_count(&plug), 1);

        let report = context.trigger(&plug, &1).unwrap();
        assert_eq!(report.scope, owner.id());
        context.trigger_handle().unwrap().fire(&plug, &2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
