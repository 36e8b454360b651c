//! Capability traits an inner object implements to be wrapped.
//!
//! Each trait dispatches by method name, so the generated wrapper never needs
//! to know the concrete methods of the inner type. Every method has a default
//! body reporting [`Error::NoSuchMethod`], which lets a type opt into only the
//! conventions it supports. `#[thunkwrap::source]` writes these impls from
//! marked methods.

use crate::{Error, Result};
use serde_json::Value;
use std::sync::Arc;

/// Ordered, resizable list of arguments or results.
pub type Args = Vec<Value>;

/// One-shot completion callback. By convention the first value is `null` on
/// success and the error otherwise.
pub type Completion = Box<dyn FnOnce(Args) + Send>;

/// Event listener, invoked once per firing.
pub type Listener = Arc<dyn Fn(Args) + Send + Sync>;

/// Methods that take a trailing completion callback.
pub trait ThunkSource {
    /// Calls `method` with `args` followed by `done`.
    ///
    /// An `Err` means the call could not be dispatched at all; failures of
    /// the call itself belong in the completion's first slot.
    fn call_async(&self, method: &str, args: Args, done: Completion) -> Result<()> {
        let _ = (args, done);
        Err(Error::NoSuchMethod(method.to_owned()))
    }
}

/// Methods that return their result directly.
pub trait SyncSource {
    fn call_sync(&self, method: &str, args: Args) -> Result<Value> {
        let _ = args;
        Err(Error::NoSuchMethod(method.to_owned()))
    }
}

/// Subscription methods shaped like `on(event, listener)`.
pub trait EventSource {
    fn subscribe(&self, method: &str, event: &str, listener: Listener) -> Result<()> {
        let _ = (event, listener);
        Err(Error::NoSuchMethod(method.to_owned()))
    }
}
