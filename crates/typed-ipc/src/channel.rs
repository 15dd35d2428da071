//! # Channel Descriptors
//!
//! An `IpcChannel<P, R>` pairs a channel name with the argument tuple `P`
//! and result type `R` of the procedure behind it. The name is the only
//! value that exists at runtime; `P` and `R` are phantom types used to
//! correlate the invoking side with the handling side at compile time.
//!
//! ```rust,ignore
//! pub const SUM: IpcChannel<(i64, i64), i64> = IpcChannel::new("sum");
//!
//! // Serving side
//! register_ipc_channel(&host, &SUM, |_event, (a, b)| async move { Ok(a + b) })?;
//!
//! // Calling side
//! let total = invoke_ipc_channel(&host, &SUM, (2, 3)).await?;
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A named channel with a compile-time argument tuple and result type.
///
/// Descriptors are immutable and `Copy`; declare them once as `const`
/// items shared by both the calling and the serving code.
pub struct IpcChannel<P, R = ()> {
    name: &'static str,
    _types: PhantomData<fn(P) -> R>,
}

impl<P, R> IpcChannel<P, R> {
    /// Create a descriptor for the channel `name`.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _types: PhantomData,
        }
    }

    /// The name used for dispatch.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

// Manual impls: derives would demand the same traits of `P` and `R`.

impl<P, R> Clone for IpcChannel<P, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, R> Copy for IpcChannel<P, R> {}

impl<P, R> PartialEq for IpcChannel<P, R> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<P, R> Eq for IpcChannel<P, R> {}

impl<P, R> Hash for IpcChannel<P, R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<P, R> fmt::Debug for IpcChannel<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IpcChannel")
            .field("name", &self.name)
            .field("args", &std::any::type_name::<P>())
            .field("result", &std::any::type_name::<R>())
            .finish()
    }
}

impl<P, R> fmt::Display for IpcChannel<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
