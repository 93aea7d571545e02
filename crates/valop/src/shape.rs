//! Result shape tags.
//!
//! A [`ResultShape`] is fixed when an operation is registered. It identifies
//! the Rust type the response body decodes into, and carries a decoder for
//! callers that cannot name that type at compile time.

use std::any::{self, TypeId};
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

type DecodeFn = fn(&[u8]) -> Result<Value, serde_json::Error>;

/// Descriptor of the type an operation's response decodes into.
#[derive(Clone, Copy)]
pub struct ResultShape {
    type_id: TypeId,
    name: &'static str,
    decode: DecodeFn,
}

impl ResultShape {
    /// Shape for `T`.
    pub fn of<T>() -> Self
    where
        T: DeserializeOwned + Serialize + 'static,
    {
        Self {
            type_id: TypeId::of::<T>(),
            name: type_label::<T>(),
            decode: decode_as::<T>,
        }
    }

    /// Short type name, for logs and error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether `T` is the registered shape.
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Decode `body` as this shape and return its canonical JSON form.
    ///
    /// Fails exactly when decoding into the concrete type would fail.
    pub fn decode_value(&self, body: &[u8]) -> Result<Value, serde_json::Error> {
        (self.decode)(body)
    }
}

impl PartialEq for ResultShape {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ResultShape {}

impl fmt::Debug for ResultShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResultShape").field(&self.name).finish()
    }
}

impl fmt::Display for ResultShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

fn decode_as<T>(body: &[u8]) -> Result<Value, serde_json::Error>
where
    T: DeserializeOwned + Serialize,
{
    let decoded: T = serde_json::from_slice(body)?;
    serde_json::to_value(decoded)
}

/// Type name without its module path. Generic types keep the full name.
pub(crate) fn type_label<T: ?Sized>() -> &'static str {
    let full = any::type_name::<T>();
    if full.contains('<') {
        return full;
    }
    full.rsplit("::").next().unwrap_or(full)
}
