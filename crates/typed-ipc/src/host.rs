//! # Host Boundary
//!
//! The two primitives a host runtime must supply. Both are untyped:
//! arguments are a positional list of dynamic values and results are a
//! single dynamic value. The typed façade in [`crate::handle`] and
//! [`crate::invoke`] is built entirely on top of these traits.

use crate::error::{HandlerError, InvokeError, RegistrationError};
use crate::event::InvokeEvent;
use futures::future::BoxFuture;
use serde_json::Value;
use std::sync::Arc;

/// Future returned by a raw handler.
pub type HandlerFuture = BoxFuture<'static, Result<Value, HandlerError>>;

/// A handler as the host stores it: context plus untyped arguments in,
/// untyped result out.
pub type RawHandler = Arc<dyn Fn(InvokeEvent, Vec<Value>) -> HandlerFuture + Send + Sync>;

/// Future returned by the host for an invocation.
pub type RawReply = BoxFuture<'static, Result<Value, InvokeError>>;

/// Serving side: installs handlers keyed by channel name.
pub trait HandlerRegistry: Send + Sync {
    /// Install `handler` under `channel`.
    ///
    /// What happens to a handler already registered under the same name is
    /// decided by the host.
    fn handle_raw(&self, channel: &str, handler: RawHandler) -> Result<(), RegistrationError>;
}

/// Calling side: dispatches a named call.
pub trait InvokeTransport: Send + Sync {
    /// Dispatch a call on `channel`.
    ///
    /// The call is handed to the host before this returns; the reply
    /// resolves once the handler's result is delivered.
    fn invoke_raw(&self, channel: &str, args: Vec<Value>) -> RawReply;
}

impl<T: HandlerRegistry + ?Sized> HandlerRegistry for Arc<T> {
    fn handle_raw(&self, channel: &str, handler: RawHandler) -> Result<(), RegistrationError> {
        (**self).handle_raw(channel, handler)
    }
}

impl<T: InvokeTransport + ?Sized> InvokeTransport for Arc<T> {
    fn invoke_raw(&self, channel: &str, args: Vec<Value>) -> RawReply {
        (**self).invoke_raw(channel, args)
    }
}
