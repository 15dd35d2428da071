//! # Handler Registration
//!
//! Typed wrappers over [`HandlerRegistry::handle_raw`]. A handler receives
//! the [`InvokeEvent`] followed by its argument tuple, and returns either a
//! result directly (`handle_sync`) or a future of one (`handle`).
//!
//! Arguments arrive untyped and are decoded into the declared tuple without
//! any arity check; see [`IpcArgs::from_values`]. A decode failure is
//! reported to the caller as [`HandlerError::Arguments`].

use crate::args::IpcArgs;
use crate::channel::IpcChannel;
use crate::error::{HandlerError, RegistrationError};
use crate::event::InvokeEvent;
use crate::host::{HandlerFuture, HandlerRegistry, RawHandler};
use futures::future::{self, FutureExt};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Register an asynchronous handler for `channel`.
///
/// # Example
///
/// ```rust,ignore
/// handle(&host, "equals", |_event, (a, b): (String, String)| async move {
///     Ok(a == b)
/// })?;
/// ```
pub fn handle<Reg, P, R, F, Fut>(
    registry: &Reg,
    channel: &str,
    handler: F,
) -> Result<(), RegistrationError>
where
    Reg: HandlerRegistry + ?Sized,
    P: IpcArgs,
    R: Serialize + 'static,
    F: Fn(InvokeEvent, P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
{
    let raw: RawHandler = Arc::new(move |event: InvokeEvent, args: Vec<Value>| -> HandlerFuture {
        let args = match P::from_values(args) {
            Ok(args) => args,
            Err(e) => return future::ready(Err(HandlerError::Arguments(e))).boxed(),
        };
        handler(event, args).map(encode_result).boxed()
    });
    registry.handle_raw(channel, raw)
}

/// Register a synchronous handler for `channel`.
pub fn handle_sync<Reg, P, R, F>(
    registry: &Reg,
    channel: &str,
    handler: F,
) -> Result<(), RegistrationError>
where
    Reg: HandlerRegistry + ?Sized,
    P: IpcArgs,
    R: Serialize + 'static,
    F: Fn(InvokeEvent, P) -> anyhow::Result<R> + Send + Sync + 'static,
{
    let raw: RawHandler = Arc::new(move |event: InvokeEvent, args: Vec<Value>| -> HandlerFuture {
        let result = P::from_values(args)
            .map_err(HandlerError::Arguments)
            .and_then(|args| encode_result(handler(event, args)));
        future::ready(result).boxed()
    });
    registry.handle_raw(channel, raw)
}

/// Register an asynchronous handler under the descriptor's name.
///
/// The argument tuple and result type are bound to the descriptor, so the
/// handler signature is checked against the invoking side at compile time.
pub fn register_ipc_channel<Reg, P, R, F, Fut>(
    registry: &Reg,
    channel: &IpcChannel<P, R>,
    handler: F,
) -> Result<(), RegistrationError>
where
    Reg: HandlerRegistry + ?Sized,
    P: IpcArgs,
    R: Serialize + 'static,
    F: Fn(InvokeEvent, P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
{
    handle(registry, channel.name(), handler)
}

/// Register a synchronous handler under the descriptor's name.
pub fn register_ipc_channel_sync<Reg, P, R, F>(
    registry: &Reg,
    channel: &IpcChannel<P, R>,
    handler: F,
) -> Result<(), RegistrationError>
where
    Reg: HandlerRegistry + ?Sized,
    P: IpcArgs,
    R: Serialize + 'static,
    F: Fn(InvokeEvent, P) -> anyhow::Result<R> + Send + Sync + 'static,
{
    handle_sync(registry, channel.name(), handler)
}

fn encode_result<R: Serialize>(result: anyhow::Result<R>) -> Result<Value, HandlerError> {
    let value = result.map_err(HandlerError::Failed)?;
    crate::value::to_value(value).map_err(HandlerError::Result)
}
