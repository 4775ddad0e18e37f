//! Action Plug Registry
//!
//! Owns the root manager and the dispatch configuration, and exposes the
//! operations a host calls: create and tear down scopes, register handlers,
//! trigger plugs.

use std::sync::Arc;

use actionplug_core::{ActionPlug, DispatchConfig, Handler, PlugId, TriggerReport};

use crate::scope::{Scope, ScopeManager};

/// The registry: the single construction point of a root manager.
pub struct ActionPlugRegistry {
    /// Root manager terminating every chain created through this registry.
    root: Scope,

    config: Arc<DispatchConfig>,
}

impl ActionPlugRegistry {
    /// Create a registry with its own root manager.
    pub fn new(config: DispatchConfig) -> Self {
        let config = Arc::new(config);
        let root = ScopeManager::root_with_config(Arc::clone(&config));
        tracing::debug!("Created registry with root {}", root.id());
        Self { root, config }
    }

    /// Get the root manager (shared Arc).
    pub fn root(&self) -> Scope {
        Arc::clone(&self.root)
    }

    /// Dispatch settings inherited by every scope of this registry.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Create a scope owning `owned`. Without a parent it becomes a child of
    /// the root.
    pub fn create_scope(
        &self,
        owned: impl IntoIterator<Item = PlugId>,
        parent: Option<&Scope>,
    ) -> Scope {
        ScopeManager::new(owned, Some(parent.unwrap_or(&self.root)))
    }

    /// Same as [`ActionPlugRegistry::create_scope`], with a diagnostic label.
    pub fn create_labeled_scope(
        &self,
        label: impl Into<String>,
        owned: impl IntoIterator<Item = PlugId>,
        parent: Option<&Scope>,
    ) -> Scope {
        ScopeManager::labeled(label, owned, Some(parent.unwrap_or(&self.root)))
    }

    /// End a scope's lifetime, releasing all of its handlers.
    pub fn teardown_scope(&self, scope: &Scope) {
        scope.clear();
    }

    /// Register `handler` for `plug`, resolving from `scope`.
    pub fn add_handler<T: 'static>(
        &self,
        scope: &Scope,
        plug: &ActionPlug<T>,
        handler: &Handler<T>,
    ) -> bool {
        scope.add_handler(plug, handler)
    }

    /// Unregister `handler` for `plug`, resolving from `scope`.
    pub fn remove_handler<T>(
        &self,
        scope: &Scope,
        plug: &ActionPlug<T>,
        handler: &Handler<T>,
    ) -> bool {
        scope.remove_handler(plug, handler)
    }

    /// Trigger `plug` with `payload`, resolving from `scope`.
    pub fn trigger<T: 'static>(
        &self,
        scope: &Scope,
        plug: &ActionPlug<T>,
        payload: &T,
    ) -> TriggerReport {
        scope.trigger(plug, payload)
    }
}

impl Default for ActionPlugRegistry {
    fn default() -> Self {
        Self::new(DispatchConfig::default())
    }
}

impl std::fmt::Debug for ActionPlugRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionPlugRegistry")
            .field("root", &self.root.id())
            .field("config", &self.config)
            .finish()
    }
}
