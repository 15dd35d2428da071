//! # Invoke Event
//!
//! The context value handed to every handler as its first parameter.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Sender id used when the host invokes its own handlers.
pub const HOST_SENDER_ID: u32 = 0;

/// Describes one invocation as seen by the serving side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeEvent {
    /// Unique identifier of this invocation.
    pub request_id: Uuid,
    /// The channel name that was invoked.
    pub channel: String,
    /// The endpoint that issued the call.
    pub sender_id: u32,
    /// Unix timestamp (seconds) when the host dispatched the call.
    pub timestamp: u64,
}

impl InvokeEvent {
    /// Create an event for a call on `channel` from `sender_id`, stamped now.
    #[must_use]
    pub fn new(channel: impl Into<String>, sender_id: u32) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            channel: channel.into(),
            sender_id,
            timestamp: current_timestamp(),
        }
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
