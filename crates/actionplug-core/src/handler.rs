//! Handlers bound to an action plug's payload type.

use std::fmt;
use std::sync::Arc;

use crate::error::HandlerError;
use crate::id::HandlerId;

/// Result of a single handler invocation.
pub type HandlerResult = Result<(), HandlerError>;

type HandlerFn<T> = dyn Fn(&T) -> HandlerResult + Send + Sync;

/// A callable that receives payloads of type `T`.
///
/// Registration and removal compare handlers by [`HandlerId`], never by
/// behavior. Clone a handler to keep a reference you can later unregister;
/// wrapping the same closure twice with [`Handler::new`] yields two distinct
/// handlers.
pub struct Handler<T> {
    id: HandlerId,
    func: Arc<HandlerFn<T>>,
}

impl<T> Handler<T> {
    /// Wrap an infallible closure.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Self::fallible(move |payload| {
            func(payload);
            Ok(())
        })
    }

    /// Wrap a closure that can report failure.
    pub fn fallible<F>(func: F) -> Self
    where
        F: Fn(&T) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            id: HandlerId::next(),
            func: Arc::new(func),
        }
    }

    /// Identity shared by every clone of this handler.
    pub fn id(&self) -> HandlerId {
        self.id
    }

    /// Invoke the handler directly.
    pub fn call(&self, payload: &T) -> HandlerResult {
        (self.func)(payload)
    }
}

impl<T> Clone for Handler<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            func: Arc::clone(&self.func),
        }
    }
}

impl<T> PartialEq for Handler<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handler<T> {}

impl<T> fmt::Debug for Handler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("id", &self.id).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[test]
    fn test_clone_shares_identity() {
        let handler = Handler::new(|_: &i32| {});
        let copy = handler.clone();
        assert_eq!(handler, copy);
        assert_eq!(handler.id(), copy.id());
    }

    #[test]
    fn test_same_closure_wrapped_twice_is_distinct() {
        let f = |_: &i32| {};
        let a = Handler::new(f);
        let b = Handler::new(f);
        assert_ne!(a, b);
    }

    #[test]
    fn test_call_runs_closure() {
        let total = Arc::new(AtomicI32::new(0));
        let sink = Arc::clone(&total);
        let handler = Handler::new(move |n: &i32| {
            sink.fetch_add(*n, Ordering::SeqCst);
        });

        handler.call(&3).unwrap();
        handler.call(&4).unwrap();
        assert_eq!(total.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_fallible_reports_error() {
        let handler = Handler::fallible(|n: &i32| {
            if *n < 0 {
                Err(HandlerError::Failed(format!("negative: {}", n)))
            } else {
                Ok(())
            }
        });

        assert!(handler.call(&1).is_ok());
        assert!(matches!(handler.call(&-1), Err(HandlerError::Failed(_))));
    }
}
