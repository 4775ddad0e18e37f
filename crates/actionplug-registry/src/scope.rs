//! Scope managers and ownership resolution.
//!
//! A [`ScopeManager`] owns a fixed set of plugs and the handler sets for
//! them. Managers are linked into a chain through their parent reference,
//! ending at a root manager that owns nothing and has no parent.
//!
//! ## Resolution
//!
//! Every operation first walks outward from the starting scope to the
//! nearest manager that owns the plug:
//!
//! ```text
//! leaf (owns {})  ──►  counter (owns {increment})  ──►  root (owns {})
//!      │                        ▲
//!      └── trigger(increment) ──┘
//! ```
//!
//! A plug nobody owns resolves to the root manager itself. This is not an
//! error: the root's handler set for that plug is used like any other.
//!
//! ## Thread Safety
//!
//! Handler sets are guarded by a `parking_lot::RwLock`. `trigger` copies the
//! handler set under a read lock and releases it before invoking anything,
//! so handlers may register, unregister or trigger on the same scope.

use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use actionplug_core::{
    ActionPlug, DispatchConfig, Handler, HandlerId, PlugId, ScopeId, TriggerReport,
    UnownedPolicy,
};

use crate::dispatch;
use crate::handler_set::HandlerSet;
use crate::subscription::Subscription;
use crate::trigger::Trigger;

/// Shared handle to a scope manager.
pub type Scope = Arc<ScopeManager>;

/// A registry node owning the handler sets for a declared subset of plugs.
pub struct ScopeManager {
    id: ScopeId,
    label: Option<String>,

    /// Fixed at construction.
    owned: HashSet<PlugId>,

    /// Only ever holds entries for plugs in `owned`, or for unowned plugs
    /// when this is the root.
    handlers: RwLock<HashMap<PlugId, HandlerSet>>,

    parent: Option<Scope>,
    config: Arc<DispatchConfig>,
}

impl ScopeManager {
    /// Create a root manager with the default configuration.
    pub fn root() -> Scope {
        Self::root_with_config(Arc::new(DispatchConfig::default()))
    }

    /// Create a root manager. Every scope created beneath it shares `config`.
    pub fn root_with_config(config: Arc<DispatchConfig>) -> Scope {
        let scope = Arc::new(Self {
            id: ScopeId::new(),
            label: Some("root".to_string()),
            owned: HashSet::new(),
            handlers: RwLock::new(HashMap::new()),
            parent: None,
            config,
        });
        tracing::debug!("Created root manager {}", scope.id);
        scope
    }

    /// Create a manager owning `owned`, linked to `parent`.
    ///
    /// The configuration is inherited from the parent. A manager without a
    /// parent is a top-level scope; it is only a root if it also owns nothing.
    pub fn new(owned: impl IntoIterator<Item = PlugId>, parent: Option<&Scope>) -> Scope {
        Self::build(None, owned.into_iter().collect(), parent)
    }

    /// Same as [`ScopeManager::new`], with a diagnostic label.
    pub fn labeled(
        label: impl Into<String>,
        owned: impl IntoIterator<Item = PlugId>,
        parent: Option<&Scope>,
    ) -> Scope {
        Self::build(Some(label.into()), owned.into_iter().collect(), parent)
    }

    fn build(label: Option<String>, owned: HashSet<PlugId>, parent: Option<&Scope>) -> Scope {
        let config = parent
            .map(|p| Arc::clone(&p.config))
            .unwrap_or_default();
        let scope = Arc::new(Self {
            id: ScopeId::new(),
            label,
            owned,
            handlers: RwLock::new(HashMap::new()),
            parent: parent.cloned(),
            config,
        });
        tracing::debug!(
            "Created scope {} ({}) owning {} plug(s), parent: {}",
            scope.id,
            scope.label.as_deref().unwrap_or("unlabeled"),
            scope.owned.len(),
            scope
                .parent
                .as_ref()
                .map(|p| p.id.to_string())
                .unwrap_or_else(|| "none".to_string())
        );
        scope
    }

    /// Create a child of this scope.
    pub fn child(self: &Arc<Self>, owned: impl IntoIterator<Item = PlugId>) -> Scope {
        Self::new(owned, Some(self))
    }

    /// Unique identity of this manager.
    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// Diagnostic label, if the scope was created with one.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The enclosing manager. `None` for the root and top-level scopes.
    pub fn parent(&self) -> Option<&Scope> {
        self.parent.as_ref()
    }

    /// Dispatch settings shared with the rest of the chain.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// True iff this manager owns no plugs and has no parent.
    pub fn is_root(&self) -> bool {
        self.owned.is_empty() && self.parent.is_none()
    }

    /// True if `plug` is in this manager's own owned set (no chain walk).
    pub fn owns(&self, plug: impl Into<PlugId>) -> bool {
        self.owned.contains(&plug.into())
    }

    /// The plugs this manager owns directly.
    pub fn owned_plugs(&self) -> impl Iterator<Item = PlugId> + '_ {
        self.owned.iter().copied()
    }

    /// Number of ancestors between this manager and the top of its chain.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let Some(parent) = current.parent.as_deref() {
            depth += 1;
            current = parent;
        }
        depth
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Find the nearest manager, starting from this one, that owns `plug`.
    ///
    /// The walk stops at the root manager even though it owns nothing, and at
    /// a parentless top-level scope if the plug is still unclaimed there.
    pub fn resolve(&self, plug: impl Into<PlugId>) -> &ScopeManager {
        let plug = plug.into();
        let mut current = self;
        let mut hops = 0usize;
        loop {
            if current.is_root() || current.owned.contains(&plug) {
                break;
            }
            match current.parent.as_deref() {
                Some(parent) => {
                    current = parent;
                    hops += 1;
                }
                None => break,
            }
        }
        tracing::trace!(
            "Resolved {} from {} to {} after {} hop(s)",
            plug,
            self.id,
            current.id,
            hops
        );
        current
    }

    /// Report a plug that reached a manager which does not own it.
    fn note_unowned<T>(&self, plug: &ActionPlug<T>, operation: &str) {
        if self.owned.contains(&plug.id()) {
            return;
        }
        match self.config.unowned {
            UnownedPolicy::Silent => tracing::trace!(
                "{} of unowned {} resolved to {}",
                operation,
                plug,
                self.id
            ),
            UnownedPolicy::Warn => tracing::warn!(
                "{} of {} reached {} which does not own it",
                operation,
                plug,
                self.id
            ),
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register `handler` on the manager that owns `plug`.
    ///
    /// Returns false if that exact handler was already registered there.
    pub fn add_handler<T: 'static>(&self, plug: &ActionPlug<T>, handler: &Handler<T>) -> bool {
        let owner = self.resolve(plug);
        owner.note_unowned(plug, "add_handler");

        let inserted = owner
            .handlers
            .write()
            .entry(plug.id())
            .or_default()
            .insert(handler);
        if inserted {
            tracing::debug!("Added {} for {} on {}", handler.id(), plug, owner.id);
        }
        inserted
    }

    /// Unregister `handler` from the manager that owns `plug`.
    ///
    /// Returns true if the handler was found and removed.
    pub fn remove_handler<T>(&self, plug: &ActionPlug<T>, handler: &Handler<T>) -> bool {
        self.remove_by_id(plug.id(), handler.id())
    }

    pub(crate) fn remove_by_id(&self, plug: PlugId, handler: HandlerId) -> bool {
        let owner = self.resolve(plug);

        let mut handlers = owner.handlers.write();
        let Some(set) = handlers.get_mut(&plug) else {
            return false;
        };
        let entry = set.remove(handler);
        let emptied = if set.is_empty() {
            handlers.remove(&plug)
        } else {
            None
        };
        drop(handlers);

        // The closure may own guards that call back into this scope.
        let removed = entry.is_some();
        drop(entry);
        drop(emptied);

        if removed {
            tracing::debug!("Removed {} for {} on {}", handler, plug, owner.id);
        }
        removed
    }

    /// Register `handler` and return a guard that unregisters it on drop.
    pub fn subscribe<T: 'static>(
        self: &Arc<Self>,
        plug: &ActionPlug<T>,
        handler: Handler<T>,
    ) -> Subscription {
        Subscription::new(self, plug, handler)
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Deliver `payload` to every handler registered for `plug` at its owner.
    ///
    /// The handler set is snapshotted first; registrations made while the
    /// trigger is in flight only affect later triggers. A failing handler
    /// does not stop delivery to the others. With `catch_panics` off, the
    /// first handler panic is re-raised after every handler has run.
    pub fn trigger<T: 'static>(&self, plug: &ActionPlug<T>, payload: &T) -> TriggerReport {
        let owner = self.resolve(plug);
        owner.note_unowned(plug, "trigger");

        let snapshot = owner.snapshot(plug);
        tracing::trace!(
            "Triggering {} on {} with {} handler(s)",
            plug,
            owner.id,
            snapshot.len()
        );

        let failures = dispatch::deliver(plug, &snapshot, payload, &owner.config);

        TriggerReport {
            plug: plug.id(),
            scope: owner.id,
            invoked: snapshot.len(),
            failures,
        }
    }

    /// A producer handle that triggers starting from this scope.
    pub fn trigger_handle(self: &Arc<Self>) -> Trigger {
        Trigger::new(Arc::clone(self))
    }

    fn snapshot<T: 'static>(&self, plug: &ActionPlug<T>) -> Vec<Handler<T>> {
        self.handlers
            .read()
            .get(&plug.id())
            .map(|set| set.snapshot::<T>())
            .unwrap_or_default()
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Number of handlers registered for `plug` at the manager it resolves to.
    pub fn handler_count(&self, plug: impl Into<PlugId>) -> usize {
        let plug = plug.into();
        let owner = self.resolve(plug);
        let handlers = owner.handlers.read();
        handlers.get(&plug).map(HandlerSet::len).unwrap_or(0)
    }

    pub fn has_handlers(&self, plug: impl Into<PlugId>) -> bool {
        self.handler_count(plug) > 0
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Drop every handler held by this manager.
    ///
    /// Triggers already in flight finish against their snapshot; later
    /// triggers resolved here see no handlers.
    pub fn clear(&self) {
        let removed = std::mem::take(&mut *self.handlers.write());
        let count: usize = removed.values().map(HandlerSet::len).sum();
        // Handlers are dropped after the lock is released.
        drop(removed);
        tracing::debug!("Cleared {} handler(s) from {}", count, self.id);
    }
}

impl fmt::Debug for ScopeManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeManager")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("owned", &self.owned.len())
            .field("parent", &self.parent.as_ref().map(|p| p.id))
            .field("is_root", &self.is_root())
            .finish_non_exhaustive()
    }
}
