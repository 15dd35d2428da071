//! # Argument Packing
//!
//! Converts typed argument tuples to and from the positional list of
//! dynamic values that crosses the untyped host boundary.
//!
//! Decoding performs no arity check. A missing trailing argument decodes
//! from `null` and surplus arguments are ignored, so a mismatch surfaces
//! as a decode failure of the affected element (or not at all, for
//! `Option<T>` members).
//!
//! Encoding rejects `NaN` and infinite floats instead of sending `null`.
//! A nested `Option<Option<T>>` does not survive the trip: `Some(None)`
//! arrives as `None`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// An argument tuple that can cross the host boundary.
///
/// Implemented for `()` and tuples of up to eight elements.
pub trait IpcArgs: Sized + Send + 'static {
    /// Number of positional arguments in the tuple.
    const ARITY: usize;

    /// Encode each element into its own value, in order.
    fn into_values(self) -> Result<Vec<Value>, serde_json::Error>;

    /// Decode a positional value list back into the tuple.
    fn from_values(values: Vec<Value>) -> Result<Self, serde_json::Error>;
}

impl IpcArgs for () {
    const ARITY: usize = 0;

    fn into_values(self) -> Result<Vec<Value>, serde_json::Error> {
        Ok(Vec::new())
    }

    fn from_values(_values: Vec<Value>) -> Result<Self, serde_json::Error> {
        Ok(())
    }
}

macro_rules! impl_ipc_args {
    ($arity:expr; $($ty:ident $var:ident),+) => {
        impl<$($ty),+> IpcArgs for ($($ty,)+)
        where
            $($ty: Serialize + DeserializeOwned + Send + 'static),+
        {
            const ARITY: usize = $arity;

            fn into_values(self) -> Result<Vec<Value>, serde_json::Error> {
                let ($($var,)+) = self;
                Ok(vec![$(crate::value::to_value($var)?),+])
            }

            fn from_values(values: Vec<Value>) -> Result<Self, serde_json::Error> {
                let mut values = values.into_iter();
                $(
                    let $var: $ty = serde_json::from_value(values.next().unwrap_or(Value::Null))?;
                )+
                Ok(($($var,)+))
            }
        }
    };
}

impl_ipc_args!(1; A a);
impl_ipc_args!(2; A a, B b);
impl_ipc_args!(3; A a, B b, C c);
impl_ipc_args!(4; A a, B b, C c, D d);
impl_ipc_args!(5; A a, B b, C c, D d, E e);
impl_ipc_args!(6; A a, B b, C c, D d, E e, F f);
impl_ipc_args!(7; A a, B b, C c, D d, E e, F f, G g);
impl_ipc_args!(8; A a, B b, C c, D d, E e, F f, G g, H h);
