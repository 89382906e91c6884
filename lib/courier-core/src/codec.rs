//! JSON codec.
//!
//! The codec is injected into the provider and used for both directions:
//! encoding endpoint bodies and decoding response bodies. Decoding goes
//! through `serde_path_to_error` so failures report the offending field.

use std::fmt;

use bytes::Bytes;
use derive_more::{Display, Error};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// JSON encoding/decoding capability.
///
/// ```
/// use courier_core::JsonCodec;
///
/// let codec = JsonCodec::new();
/// let bytes = codec.encode(&vec![1, 2, 3]).expect("encode");
/// assert_eq!(bytes.as_ref(), b"[1,2,3]");
///
/// let values: Vec<u8> = codec.decode(&bytes).expect("decode");
/// assert_eq!(values, [1, 2, 3]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Compact output codec.
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Codec producing indented output.
    #[must_use]
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Whether output is indented.
    #[must_use]
    pub const fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// Serialize a value to JSON bytes.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Bytes, CodecError> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        encoded.map(Bytes::from).map_err(CodecError::encoding)
    }

    /// Deserialize JSON bytes, reporting the path of the failing field.
    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        let mut deserializer = serde_json::Deserializer::from_slice(bytes);
        serde_path_to_error::deserialize(&mut deserializer).map_err(|err| CodecError::Decoding {
            path: err.path().to_string(),
            message: err.inner().to_string(),
        })
    }
}

/// JSON codec failure.
#[derive(Debug, Display, Error)]
pub enum CodecError {
    /// The value could not be serialized.
    #[display("JSON encoding error: {_0}")]
    Encoding(serde_json::Error),

    /// The bytes could not be deserialized into the requested type.
    #[display("JSON decoding error at '{path}': {message}")]
    Decoding {
        /// JSON path to the failing field (e.g. `user.address.city`).
        path: String,
        /// Error message.
        message: String,
    },
}

impl CodecError {
    fn encoding(err: serde_json::Error) -> Self {
        Self::Encoding(err)
    }

    /// JSON path of a decoding failure.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Decoding { path, .. } => Some(path),
            Self::Encoding(_) => None,
        }
    }
}

/// Object-safe view of a serializable value, used for JSON endpoint bodies.
///
/// Implemented for every `Serialize + Debug + Send + Sync` type.
pub trait JsonEncodable: fmt::Debug + Send + Sync {
    /// Encode with the given codec.
    fn encode_with(&self, codec: &JsonCodec) -> Result<Bytes, CodecError>;
}

impl<T> JsonEncodable for T
where
    T: Serialize + fmt::Debug + Send + Sync,
{
    fn encode_with(&self, codec: &JsonCodec) -> Result<Bytes, CodecError> {
        codec.encode(self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use assert2::{check, let_assert};
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct User {
        name: String,
        address: Address,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Address {
        city: String,
    }

    #[test]
    fn encode_compact_and_pretty() {
        let value = BTreeMap::from([("name", "Alice")]);

        let compact = JsonCodec::new().encode(&value).expect("encode");
        check!(compact.as_ref() == br#"{"name":"Alice"}"#);

        let pretty = JsonCodec::pretty().encode(&value).expect("encode");
        check!(pretty.as_ref() == b"{\n  \"name\": \"Alice\"\n}");
    }

    #[test]
    fn encode_failure_is_reported() {
        let value = BTreeMap::from([((1, 2), "tuple keys are not JSON object keys")]);

        let_assert!(Err(CodecError::Encoding(_)) = JsonCodec::new().encode(&value));
    }

    #[test]
    fn decode_reports_field_path() {
        let bytes = br#"{"name":"Alice","address":{"city":42}}"#;

        let_assert!(Err(err) = JsonCodec::new().decode::<User>(bytes));
        check!(err.path() == Some("address.city"));
        check!(err.to_string().starts_with("JSON decoding error at 'address.city'"));
    }

    #[test]
    fn decode_malformed_json() {
        let_assert!(
            Err(CodecError::Decoding { .. }) = JsonCodec::new().decode::<User>(b"{not json")
        );
    }

    #[test]
    fn json_encodable_is_object_safe() {
        let body: Box<dyn JsonEncodable> = Box::new(vec!["a", "b"]);

        let bytes = body.encode_with(&JsonCodec::new()).expect("encode");
        check!(bytes.as_ref() == br#"["a","b"]"#);
    }
}
