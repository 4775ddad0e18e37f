//! Scope-aware action dispatch.
//!
//! This crate provides the registry and its host binding layer:
//! - `ScopeManager` - Registry nodes linked into parent chains
//! - Ownership resolution from any scope to the nearest owner of a plug
//! - Snapshot dispatch with per-handler failure isolation
//! - `Boundary` / `Subscription` / `Trigger` - RAII mount, subscribe and produce
//! - `ScopeContext` - Explicit stack of entered scopes for hosts
//!
//! ## Example
//!
//! ```
//! use std::sync::atomic::{AtomicI32, Ordering};
//! use std::sync::Arc;
//!
//! use actionplug_registry::{create_boundary, ActionPlug, ActionPlugRegistry, Handler};
//!
//! let increment = ActionPlug::<i32>::with_label("increment");
//! let registry = ActionPlugRegistry::default();
//! let counter = create_boundary([increment.id()]).mount(&registry.root());
//!
//! let total = Arc::new(AtomicI32::new(0));
//! let sink = Arc::clone(&total);
//! let _subscription = counter.subscribe(
//!     &increment,
//!     Handler::new(move |n: &i32| {
//!         sink.fetch_add(*n, Ordering::SeqCst);
//!     }),
//! );
//!
//! counter.trigger_handle().fire(&increment, &5);
//! assert_eq!(total.load(Ordering::SeqCst), 5);
//! ```

pub mod boundary;
pub mod context;
mod dispatch;
mod handler_set;
pub mod registry;
pub mod scope;
pub mod subscription;
pub mod trigger;

// Re-export commonly used types
pub use boundary::{create_boundary, Boundary, MountedScope};
pub use context::{ContextGuard, ScopeContext};
pub use registry::ActionPlugRegistry;
pub use scope::{Scope, ScopeManager};
pub use subscription::Subscription;
pub use trigger::Trigger;

// Re-export actionplug_core types for convenience
pub use actionplug_core::{
    create_action_plug, ActionPlug, DispatchConfig, DispatchError, Handler, HandlerError,
    HandlerFailure, HandlerId, HandlerResult, PlugId, ScopeId, TriggerReport, UnownedPolicy,
};
