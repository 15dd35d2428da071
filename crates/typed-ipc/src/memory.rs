//! # In-Memory Host
//!
//! A host that keeps its name→handler table in process and dispatches every
//! invocation onto its own Tokio task. Cloning the host shares the table.
//!
//! Handlers run on the Tokio runtime current at invocation time. Invoking
//! outside a runtime rejects the call with [`InvokeError::NoRuntime`].

use crate::config::{DuplicatePolicy, HostConfig};
use crate::error::{HandlerError, InvokeError, RegistrationError};
use crate::event::{InvokeEvent, HOST_SENDER_ID};
use crate::host::{HandlerRegistry, InvokeTransport, RawHandler, RawReply};
use futures::future::{self, FutureExt};
use parking_lot::RwLock;
use serde_json::Value;
use std::any::Any;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinError;
use tracing::{debug, error, warn};

/// In-process implementation of both host primitives.
#[derive(Clone, Default)]
pub struct InMemoryHost {
    inner: Arc<HostInner>,
}

#[derive(Default)]
struct HostInner {
    /// Registered handlers by channel name.
    handlers: RwLock<HashMap<String, RawHandler>>,

    /// Host configuration.
    config: HostConfig,

    /// Total invocations handed to a handler.
    invocations_dispatched: AtomicU64,
}

impl InMemoryHost {
    /// Create a host with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host with the given configuration.
    #[must_use]
    pub fn with_config(config: HostConfig) -> Self {
        Self {
            inner: Arc::new(HostInner {
                handlers: RwLock::new(HashMap::new()),
                config,
                invocations_dispatched: AtomicU64::new(0),
            }),
        }
    }

    /// A calling endpoint that stamps `sender_id` on every invocation.
    #[must_use]
    pub fn invoker(&self, sender_id: u32) -> HostInvoker {
        HostInvoker {
            host: self.clone(),
            sender_id,
        }
    }

    /// The host configuration.
    #[must_use]
    pub fn config(&self) -> &HostConfig {
        &self.inner.config
    }

    /// Check whether a handler is registered for `channel`.
    #[must_use]
    pub fn has_handler(&self, channel: &str) -> bool {
        self.inner.handlers.read().contains_key(channel)
    }

    /// Number of registered channels.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.inner.handlers.read().len()
    }

    /// Registered channel names, sorted.
    #[must_use]
    pub fn channels(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.handlers.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Total invocations dispatched to a handler.
    #[must_use]
    pub fn invocations_dispatched(&self) -> u64 {
        self.inner.invocations_dispatched.load(Ordering::Relaxed)
    }

    fn dispatch(&self, channel: &str, args: Vec<Value>, sender_id: u32) -> RawReply {
        // Clone out of the table so the lock is released before dispatch.
        let handler = self.inner.handlers.read().get(channel).cloned();

        let Some(handler) = handler else {
            warn!(channel = channel, sender_id = sender_id, "No handler registered");
            return future::ready(Err(InvokeError::NoHandler {
                channel: channel.to_string(),
            }))
            .boxed();
        };

        let Ok(runtime) = Handle::try_current() else {
            warn!(channel = channel, sender_id = sender_id, "No Tokio runtime to dispatch on");
            return future::ready(Err(InvokeError::NoRuntime {
                channel: channel.to_string(),
            }))
            .boxed();
        };

        self.inner
            .invocations_dispatched
            .fetch_add(1, Ordering::Relaxed);

        let event = InvokeEvent::new(channel, sender_id);
        debug!(
            channel = channel,
            request_id = %event.request_id,
            sender_id = sender_id,
            args = args.len(),
            "Dispatching invocation"
        );

        let task = runtime.spawn(async move { handler(event, args).await });
        let channel = channel.to_string();

        async move {
            match task.await {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(source)) => {
                    debug!(channel = %channel, error = %source, "Handler failed");
                    Err(InvokeError::Handler { channel, source })
                }
                Err(join_error) => {
                    let source = join_failure(join_error);
                    error!(channel = %channel, error = %source, "Handler task aborted");
                    Err(InvokeError::Handler { channel, source })
                }
            }
        }
        .boxed()
    }
}

impl HandlerRegistry for InMemoryHost {
    fn handle_raw(&self, channel: &str, handler: RawHandler) -> Result<(), RegistrationError> {
        if channel.is_empty() {
            return Err(RegistrationError::EmptyChannelName);
        }

        let policy = self.inner.config.duplicate_policy;
        let mut handlers = self.inner.handlers.write();

        match handlers.entry(channel.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(handler);
            }
            Entry::Occupied(mut slot) => match policy {
                DuplicatePolicy::Replace => {
                    slot.insert(handler);
                }
                DuplicatePolicy::Warn => {
                    warn!(channel = channel, "Handler already registered, replacing");
                    slot.insert(handler);
                }
                DuplicatePolicy::Reject => {
                    return Err(RegistrationError::DuplicateHandler {
                        channel: channel.to_string(),
                    });
                }
            },
        }

        debug!(channel = channel, "Handler registered");
        Ok(())
    }
}

impl InvokeTransport for InMemoryHost {
    fn invoke_raw(&self, channel: &str, args: Vec<Value>) -> RawReply {
        self.dispatch(channel, args, HOST_SENDER_ID)
    }
}

/// Calling endpoint of an [`InMemoryHost`] bound to one sender id.
#[derive(Clone)]
pub struct HostInvoker {
    host: InMemoryHost,
    sender_id: u32,
}

impl HostInvoker {
    /// The sender id stamped on this endpoint's invocations.
    #[must_use]
    pub fn sender_id(&self) -> u32 {
        self.sender_id
    }
}

impl InvokeTransport for HostInvoker {
    fn invoke_raw(&self, channel: &str, args: Vec<Value>) -> RawReply {
        self.host.dispatch(channel, args, self.sender_id)
    }
}

fn join_failure(join_error: JoinError) -> HandlerError {
    match join_error.try_into_panic() {
        Ok(payload) => HandlerError::Panicked {
            message: panic_message(payload.as_ref()),
        },
        Err(_) => HandlerError::Cancelled,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
