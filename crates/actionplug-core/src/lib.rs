//! Core types for the actionplug dispatch registry.
//!
//! This crate contains the data structures shared by the registry and its hosts:
//! - Action plugs (typed channel identities)
//! - Handlers and their identities
//! - Trigger reports
//! - Configuration types
//! - Error types

mod config;
mod error;
mod handler;
mod id;
mod plug;
mod report;

pub use config::{DispatchConfig, UnownedPolicy};
pub use error::{ConfigError, DispatchError, HandlerError, HandlerFailure};
pub use handler::{Handler, HandlerResult};
pub use id::{HandlerId, PlugId, ScopeId};
pub use plug::{create_action_plug, ActionPlug};
pub use report::TriggerReport;
