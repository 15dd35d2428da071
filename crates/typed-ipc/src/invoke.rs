//! # Invocation
//!
//! Typed wrappers over [`InvokeTransport::invoke_raw`]. The call is handed
//! to the host as soon as `invoke` returns; the returned [`PendingInvoke`]
//! resolves with the decoded result.
//!
//! There is no timeout, retry or cancellation. Dropping a `PendingInvoke`
//! only discards the result.

use crate::args::IpcArgs;
use crate::channel::IpcChannel;
use crate::error::InvokeError;
use crate::host::{InvokeTransport, RawReply};
use futures::future::{self, FutureExt};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::debug;

/// A dispatched call awaiting its typed result.
#[must_use = "the result of an invocation is only observed by awaiting it"]
pub struct PendingInvoke<R> {
    channel: String,
    reply: RawReply,
    _result: PhantomData<fn() -> R>,
}

impl<R> PendingInvoke<R> {
    /// The channel this call was addressed to.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl<R: DeserializeOwned> Future for PendingInvoke<R> {
    type Output = Result<R, InvokeError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let value = match self.reply.poll_unpin(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(Ok(value)) => value,
            Poll::Ready(Err(e)) => return Poll::Ready(Err(e)),
        };

        Poll::Ready(
            serde_json::from_value(value).map_err(|source| InvokeError::Decode {
                channel: self.channel.clone(),
                source,
            }),
        )
    }
}

/// Invoke `channel` with `args` and return a future of the result.
///
/// # Example
///
/// ```rust,ignore
/// let equal: bool = invoke(&host, "equals", ("a".to_string(), "b".to_string())).await?;
/// ```
pub fn invoke<T, P, R>(transport: &T, channel: &str, args: P) -> PendingInvoke<R>
where
    T: InvokeTransport + ?Sized,
    P: IpcArgs,
    R: DeserializeOwned,
{
    let reply = match args.into_values() {
        Ok(values) => {
            debug!(channel = channel, args = values.len(), "Invoking channel");
            transport.invoke_raw(channel, values)
        }
        Err(source) => future::ready(Err(InvokeError::Encode {
            channel: channel.to_string(),
            source,
        }))
        .boxed(),
    };

    PendingInvoke {
        channel: channel.to_string(),
        reply,
        _result: PhantomData,
    }
}

/// Invoke the descriptor's channel.
///
/// `args` and the result type are checked against the descriptor at
/// compile time.
pub fn invoke_ipc_channel<T, P, R>(
    transport: &T,
    channel: &IpcChannel<P, R>,
    args: P,
) -> PendingInvoke<R>
where
    T: InvokeTransport + ?Sized,
    P: IpcArgs,
    R: DeserializeOwned,
{
    invoke(transport, channel.name(), args)
}
