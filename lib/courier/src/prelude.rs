//! Prelude module for convenient imports.
//!
//! ```ignore
//! use courier::prelude::*;
//! ```

#[cfg(feature = "hyper-transport")]
pub use crate::HyperTransport;
pub use crate::plugins::{BearerAuthPlugin, HeaderPlugin, LoggingPlugin};
pub use crate::{
    Authorization, ContentType, DataStream, Endpoint, EndpointError, Header, HttpEndpoint,
    JsonCodec, Method, ObjectStream, Parameter, Plugin, Provider, ProviderError, Request,
    TransportClient, TransportError,
};
pub use futures_util::StreamExt;
pub use serde::{Deserialize, Serialize};
