//! Core types and traits for the courier typed HTTP client.
//!
//! This crate provides the runtime-independent building blocks:
//! - [`Endpoint`] and [`HttpEndpoint`] - declarative API call descriptions
//! - [`Parameter`], [`Body`] and [`Header`] - what an endpoint carries
//! - [`Method`], [`Request`] and [`RequestBuilder`] - wire requests
//! - [`Transport`], [`RawResponse`] and [`ResponseMeta`] - the transport primitive contract
//! - [`ResponseStatus`] and [`StatusKind`] - status classification
//! - [`Plugin`] - request interception hooks
//! - [`JsonCodec`] - the JSON codec injected into providers
//! - [`EndpointError`], [`TransportError`], [`CodecError`] and [`ProviderError`] - layered errors

mod codec;
mod endpoint;
mod error;
mod headers;
mod method;
mod parameter;
mod plugin;
pub mod prelude;
mod request;
mod status;
mod transport;

pub use codec::{CodecError, JsonCodec, JsonEncodable};
pub use endpoint::{Endpoint, HttpEndpoint};
pub use error::{EndpointError, ProviderError, SendError, SendErrorKind, TransportError};
pub use headers::{Authorization, ContentType, Header};
pub use method::Method;
pub use parameter::{Body, Parameter};
pub use plugin::Plugin;
pub use request::{Request, RequestBuilder};
pub use status::{ResponseStatus, StatusKind};
pub use transport::{HttpResponse, RawResponse, ResponseMeta, Transport};

// Re-export http crate types for headers
pub use http::{HeaderMap, HeaderName, HeaderValue, header};
