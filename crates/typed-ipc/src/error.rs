//! # Error Types
//!
//! Errors are split by the side of the channel they originate on:
//! registration, the serving-side handler, and the calling side.

use thiserror::Error;

/// Errors from installing a handler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Channel names must be non-empty.
    #[error("Channel name must not be empty")]
    EmptyChannelName,

    /// The host refuses to replace an existing handler.
    #[error("A handler is already registered for channel `{channel}`")]
    DuplicateHandler { channel: String },
}

/// Failures produced on the serving side of a call.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The untyped arguments could not be decoded into the handler's tuple.
    #[error("Invalid arguments: {0}")]
    Arguments(#[source] serde_json::Error),

    /// The handler's return value could not be encoded.
    #[error("Unencodable result: {0}")]
    Result(#[source] serde_json::Error),

    /// The handler itself returned an error.
    #[error(transparent)]
    Failed(anyhow::Error),

    /// The handler panicked.
    #[error("Handler panicked: {message}")]
    Panicked { message: String },

    /// The host dropped the call before the handler finished.
    #[error("Handler was cancelled by the host")]
    Cancelled,
}

impl HandlerError {
    /// The error returned by the handler body, if that is what failed.
    #[must_use]
    pub fn handler_error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors surfaced to the invoking side.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// No handler is registered for the channel.
    #[error("No handler registered for channel `{channel}`")]
    NoHandler { channel: String },

    /// The arguments could not be encoded for the host.
    #[error("Failed to encode arguments for channel `{channel}`: {source}")]
    Encode {
        channel: String,
        #[source]
        source: serde_json::Error,
    },

    /// The serving side failed while handling the call.
    #[error("Handler for channel `{channel}` failed: {source}")]
    Handler {
        channel: String,
        #[source]
        source: HandlerError,
    },

    /// The host had no async runtime to run the handler on.
    #[error("No async runtime available to dispatch channel `{channel}`")]
    NoRuntime { channel: String },

    /// The handler's result did not decode into the expected type.
    #[error("Failed to decode result of channel `{channel}`: {source}")]
    Decode {
        channel: String,
        #[source]
        source: serde_json::Error,
    },
}

impl InvokeError {
    /// The channel the failed call was addressed to.
    #[must_use]
    pub fn channel(&self) -> &str {
        match self {
            Self::NoHandler { channel }
            | Self::Encode { channel, .. }
            | Self::Handler { channel, .. }
            | Self::NoRuntime { channel }
            | Self::Decode { channel, .. } => channel,
        }
    }

    /// True when the call failed because nothing handles the channel.
    #[must_use]
    pub fn is_no_handler(&self) -> bool {
        matches!(self, Self::NoHandler { .. })
    }

    /// The error returned by the remote handler body, if any.
    ///
    /// Use `downcast_ref` on the result to recover the concrete type.
    #[must_use]
    pub fn handler_error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Handler { source, .. } => source.handler_error(),
            _ => None,
        }
    }
}
