//! Action plugs: typed, identity-based channel descriptors.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::id::PlugId;

/// A message channel carrying payloads of type `T`.
///
/// A plug is an immutable identity token. Clones refer to the same channel;
/// two plugs created separately are always distinct channels, even when they
/// share a label.
pub struct ActionPlug<T> {
    id: PlugId,
    label: Option<Arc<str>>,
    _payload: PhantomData<fn(&T)>,
}

impl<T> ActionPlug<T> {
    /// Create an unlabeled plug.
    pub fn new() -> Self {
        Self {
            id: PlugId::new(),
            label: None,
            _payload: PhantomData,
        }
    }

    /// Create a plug with a diagnostic label.
    pub fn with_label(label: impl Into<Arc<str>>) -> Self {
        Self {
            id: PlugId::new(),
            label: Some(label.into()),
            _payload: PhantomData,
        }
    }

    /// Identity used for ownership and handler lookup.
    pub fn id(&self) -> PlugId {
        self.id
    }

    /// Diagnostic label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Name of the payload type, for diagnostics.
    pub fn payload_type(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Create a fresh action plug, optionally labeled.
pub fn create_action_plug<T>(label: Option<&str>) -> ActionPlug<T> {
    match label {
        Some(label) => ActionPlug::with_label(label),
        None => ActionPlug::new(),
    }
}

impl<T> Default for ActionPlug<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ActionPlug<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            label: self.label.clone(),
            _payload: PhantomData,
        }
    }
}

impl<T> PartialEq for ActionPlug<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for ActionPlug<T> {}

impl<T> Hash for ActionPlug<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> From<&ActionPlug<T>> for PlugId {
    fn from(plug: &ActionPlug<T>) -> Self {
        plug.id
    }
}

impl<T> fmt::Debug for ActionPlug<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionPlug")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("payload", &self.payload_type())
            .finish()
    }
}

impl<T> fmt::Display for ActionPlug<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} ({})", label, self.id),
            None => write!(f, "{}", self.id),
        }
    }
}
