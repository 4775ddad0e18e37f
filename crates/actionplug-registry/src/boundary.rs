//! Boundaries: reusable scope declarations that mount and unmount.
//!
//! A [`Boundary`] names the plugs one kind of host subtree owns. Each
//! [`Boundary::mount`] creates a fresh scope for a new instance of that
//! subtree; the returned [`MountedScope`] clears the scope when dropped.
//!
//! ```ignore
//! let counter = create_boundary([increment.id(), set.id()]).with_label("counter");
//!
//! let first = counter.mount(&registry.root());
//! let second = counter.mount(&registry.root());
//! // `first` and `second` keep separate handler sets.
//! ```

use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;

use actionplug_core::PlugId;

use crate::scope::{Scope, ScopeManager};

/// A declaration of the plugs owned by every scope mounted from it.
#[derive(Debug, Clone)]
pub struct Boundary {
    label: Option<String>,
    plugs: Arc<HashSet<PlugId>>,
}

/// Declare a boundary owning `plugs`.
pub fn create_boundary(plugs: impl IntoIterator<Item = PlugId>) -> Boundary {
    Boundary {
        label: None,
        plugs: Arc::new(plugs.into_iter().collect()),
    }
}

impl Boundary {
    /// Label every scope mounted from this boundary.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Diagnostic label given to mounted scopes, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// True if scopes mounted from this boundary own `plug`.
    pub fn owns(&self, plug: impl Into<PlugId>) -> bool {
        self.plugs.contains(&plug.into())
    }

    /// The plugs every mounted scope owns.
    pub fn plugs(&self) -> impl Iterator<Item = PlugId> + '_ {
        self.plugs.iter().copied()
    }

    /// Enter a new instance of this boundary beneath `parent`.
    pub fn mount(&self, parent: &Scope) -> MountedScope {
        let owned = self.plugs.iter().copied();
        let scope = match &self.label {
            Some(label) => ScopeManager::labeled(label.clone(), owned, Some(parent)),
            None => ScopeManager::new(owned, Some(parent)),
        };
        MountedScope { scope }
    }
}

/// A mounted boundary instance. Dropping it tears the scope down.
#[must_use = "dropping a MountedScope immediately tears the scope down"]
#[derive(Debug)]
pub struct MountedScope {
    scope: Scope,
}

impl MountedScope {
    /// The mounted scope.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Tear the scope down now. Equivalent to dropping the handle.
    pub fn unmount(self) {
        drop(self);
    }
}

impl Deref for MountedScope {
    type Target = Scope;

    fn deref(&self) -> &Scope {
        &self.scope
    }
}

impl Drop for MountedScope {
    fn drop(&mut self) {
        tracing::debug!("Unmounting {}", self.scope.id());
        self.scope.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actionplug_core::{ActionPlug, Handler};
    use std::sync::atomic::{AtomicI64, Ordering};

    fn adder(total: &Arc<AtomicI64>) -> Handler<i64> {
        let total = Arc::clone(total);
        Handler::new(move |n: &i64| {
            total.fetch_add(*n, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_mount_creates_owning_child() {
        let increment = ActionPlug::<i64>::new();
        let boundary = create_boundary([increment.id()]).with_label("counter");
        let root = ScopeManager::root();

        let mounted = boundary.mount(&root);
        assert!(mounted.owns(&increment));
        assert_eq!(mounted.label(), Some("counter"));
        assert_eq!(mounted.parent().map(|p| p.id()), Some(root.id()));
        assert!(boundary.owns(&increment));
        assert_eq!(boundary.plugs().count(), 1);
    }

    #[test]
    fn test_two_mounts_are_isolated() {
        let increment = ActionPlug::<i64>::new();
        let boundary = create_boundary([increment.id()]);
        let root = ScopeManager::root();

        let first = boundary.mount(&root);
        let second = boundary.mount(&root);
        let first_total = Arc::new(AtomicI64::new(0));
        let second_total = Arc::new(AtomicI64::new(0));
        let _a = first.subscribe(&increment, adder(&first_total));
        let _b = second.subscribe(&increment, adder(&second_total));

        first.trigger(&increment, &1);
        second.trigger(&increment, &-1);
        second.trigger(&increment, &-1);

        assert_eq!(first_total.load(Ordering::SeqCst), 1);
        assert_eq!(second_total.load(Ordering::SeqCst), -2);
    }

    #[test]
    fn test_unmount_clears_handlers() {
        let increment = ActionPlug::<i64>::new();
        let boundary = create_boundary([increment.id()]);
        let root = ScopeManager::root();
        let total = Arc::new(AtomicI64::new(0));

        let mounted = boundary.mount(&root);
        let scope = Arc::clone(mounted.scope());
        scope.add_handler(&increment, &adder(&total));
        scope.trigger(&increment, &5);

        mounted.unmount();
        let report = scope.trigger(&increment, &5);
        assert_eq!(report.invoked, 0);
        assert_eq!(total.load(Ordering::SeqCst), 5);
    }
}
