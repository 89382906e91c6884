//! Endpoint parameters: either URL query items or a request body.

use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;

use crate::JsonEncodable;

/// The single parameter slot of an endpoint.
///
/// Query items and a body are mutually exclusive: an endpoint needing both
/// folds the query into its path.
#[derive(Debug, Clone)]
pub enum Parameter {
    /// URL query items, appended in key order.
    Query(BTreeMap<String, String>),
    /// Request body.
    Body(Body),
}

/// Request body shapes.
#[derive(Debug, Clone)]
pub enum Body {
    /// Raw bytes, sent verbatim.
    Data(Bytes),
    /// A value encoded with the injected [`JsonCodec`](crate::JsonCodec) at build time.
    Json(Arc<dyn JsonEncodable>),
}

impl Parameter {
    /// Query items from any iterator of pairs.
    ///
    /// ```
    /// use courier_core::Parameter;
    ///
    /// let parameter = Parameter::query([("verbose", "true")]);
    /// assert!(matches!(parameter, Parameter::Query(items) if items["verbose"] == "true"));
    /// ```
    pub fn query<K, V>(items: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Query(
            items
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Raw body bytes.
    pub fn data(bytes: impl Into<Bytes>) -> Self {
        Self::Body(Body::Data(bytes.into()))
    }

    /// JSON body, encoded when the request is built.
    pub fn json<T>(value: T) -> Self
    where
        T: JsonEncodable + 'static,
    {
        Self::Body(Body::Json(Arc::new(value)))
    }
}
