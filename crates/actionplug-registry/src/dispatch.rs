//! Isolated handler invocation.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use actionplug_core::{
    ActionPlug, DispatchConfig, Handler, HandlerError, HandlerFailure, HandlerResult,
};

type PanicPayload = Box<dyn Any + Send>;

/// Invoke one handler, capturing a panic instead of letting it unwind.
fn invoke<T>(handler: &Handler<T>, payload: &T) -> Result<HandlerResult, PanicPayload> {
    panic::catch_unwind(AssertUnwindSafe(|| handler.call(payload)))
}

/// Deliver `payload` to every handler in `snapshot`, collecting failures.
///
/// Every handler runs even when an earlier one fails or panics. With
/// `catch_panics` off, the first panic is re-raised once the whole snapshot
/// has been delivered.
pub(crate) fn deliver<T>(
    plug: &ActionPlug<T>,
    snapshot: &[Handler<T>],
    payload: &T,
    config: &DispatchConfig,
) -> Vec<HandlerFailure> {
    let mut failures = Vec::new();
    let mut deferred: Option<PanicPayload> = None;

    for handler in snapshot {
        let error = match invoke(handler, payload) {
            Ok(Ok(())) => continue,
            Ok(Err(error)) => error,
            Err(panic) => {
                let error = HandlerError::Panicked(panic_message(panic.as_ref()));
                if !config.catch_panics && deferred.is_none() {
                    deferred = Some(panic);
                }
                error
            }
        };

        if config.log_failures {
            tracing::error!("{} failed for {}: {}", handler.id(), plug, error);
        }
        failures.push(HandlerFailure {
            handler: handler.id(),
            error,
        });
    }

    if let Some(panic) = deferred {
        panic::resume_unwind(panic);
    }
    failures
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
