//! Producer handles.

use actionplug_core::{ActionPlug, TriggerReport};

use crate::scope::Scope;

/// A cloneable producer bound to the scope it was taken from.
///
/// Each `fire` resolves the plug from that scope, so the same handle can
/// reach plugs owned anywhere up the chain.
#[derive(Debug, Clone)]
pub struct Trigger {
    scope: Scope,
}

impl Trigger {
    pub(crate) fn new(scope: Scope) -> Self {
        Self { scope }
    }

    /// Deliver `payload` to the handlers of `plug`.
    pub fn fire<T: 'static>(&self, plug: &ActionPlug<T>, payload: &T) -> TriggerReport {
        self.scope.trigger(plug, payload)
    }

    /// The scope resolution starts from.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}
