//! # Typed IPC - Named Procedure Façade
//!
//! A strongly-typed layer over a host's inter-process call mechanism. One
//! side registers handlers by channel name, the other side invokes them by
//! name, and a shared [`IpcChannel`] descriptor makes both sides agree on
//! the argument tuple and result type at compile time.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐   invoke()    ┌──────────────┐   handler   ┌──────────────┐
//! │   Invoker    │ ────────────▶ │     Host     │ ──────────▶ │   Registrar  │
//! │              │ ◀──────────── │  (untyped)   │ ◀────────── │   handler    │
//! └──────────────┘   Future<R>   └──────────────┘    result   └──────────────┘
//! ```
//!
//! ## Host Boundary
//!
//! The host owns transport, serialization and delivery. This crate only
//! needs the two primitives in [`host`]: [`HandlerRegistry`] and
//! [`InvokeTransport`]. [`InMemoryHost`] implements both in process.
//!
//! ## Example
//!
//! ```rust,ignore
//! use typed_ipc::{invoke_ipc_channel, register_ipc_channel, InMemoryHost, IpcChannel};
//!
//! const SUM: IpcChannel<(i64, i64), i64> = IpcChannel::new("sum");
//!
//! let host = InMemoryHost::new();
//! register_ipc_channel(&host, &SUM, |_event, (a, b)| async move { Ok(a + b) })?;
//!
//! assert_eq!(invoke_ipc_channel(&host, &SUM, (2, 3)).await?, 5);
//! ```

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod args;
pub mod channel;
pub mod config;
pub mod error;
pub mod event;
pub mod handle;
pub mod host;
pub mod invoke;
pub mod memory;
mod value;

// Re-export main types
pub use args::IpcArgs;
pub use channel::IpcChannel;
pub use config::{DuplicatePolicy, HostConfig, ParsePolicyError};
pub use error::{HandlerError, InvokeError, RegistrationError};
pub use event::{InvokeEvent, HOST_SENDER_ID};
pub use handle::{handle, handle_sync, register_ipc_channel, register_ipc_channel_sync};
pub use host::{HandlerFuture, HandlerRegistry, InvokeTransport, RawHandler, RawReply};
pub use invoke::{invoke, invoke_ipc_channel, PendingInvoke};
pub use memory::{HostInvoker, InMemoryHost};

/// Largest argument tuple supported by [`IpcArgs`].
pub const MAX_ARGS: usize = 8;
