//! Isolated callback execution

use crate::error::CallbackError;
use crate::events::CallbackResult;
use std::panic::{self, AssertUnwindSafe};

/// Run a callback, turning both returned errors and (optionally) panics into
/// a [`CallbackError`]. With `isolate_panics` off, a panic unwinds into the
/// caller.
pub(crate) fn invoke_callback<F>(isolate_panics: bool, f: F) -> Result<(), CallbackError>
where
    F: FnOnce() -> CallbackResult,
{
    let outcome = if isolate_panics {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(outcome) => outcome,
            Err(payload) => return Err(CallbackError::Panicked(panic_message(payload.as_ref()))),
        }
    } else {
        f()
    };

    outcome.map_err(|e| CallbackError::Failed(e.to_string()))
}

/// Extract the message from a caught panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
