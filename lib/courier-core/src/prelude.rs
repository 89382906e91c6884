//! Prelude module for convenient imports.
//!
//! ```ignore
//! use courier_core::prelude::*;
//! ```

pub use crate::{
    Authorization, Body, ContentType, Endpoint, EndpointError, Header, HttpEndpoint,
    HttpResponse, JsonCodec, Method, Parameter, Plugin, ProviderError, RawResponse, Request,
    RequestBuilder, ResponseMeta, ResponseStatus, SendError, StatusKind, Transport,
    TransportError,
};
