//! Typed HTTP client toolkit.
//!
//! Describe API calls as [`Endpoint`]s, execute them through a
//! [`TransportClient`] with [`Plugin`]s, and decode responses with a
//! [`Provider`].
//!
//! - [`TransportClient::execute`] runs one request and returns the body of a
//!   `2xx` response; every other status is a [`TransportError::RequestFailure`]
//!   carrying the body.
//! - [`TransportClient::execute_stream`] returns a cold [`DataStream`] that
//!   runs the request when first polled and cancels it when dropped.
//! - [`Provider`] builds requests from endpoints and decodes JSON bodies,
//!   tagging failures by layer with [`ProviderError`].
//!
//! # Example
//!
//! ```ignore
//! use courier::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! struct Widget {
//!     id: u64,
//!     name: String,
//! }
//!
//! let endpoint = HttpEndpoint::new(
//!     |_: &()| "https://api.example.com".to_string(),
//!     "/widgets/12345",
//!     Method::Get,
//! )
//! .with_parameter(Parameter::query([("verbose", "true")]));
//!
//! let client = TransportClient::builder(HyperTransport::new())
//!     .plugin(LoggingPlugin::new())
//!     .build();
//! let provider: Provider<HttpEndpoint, _> = Provider::new(client, ());
//!
//! let widget: Widget = provider.request_object(&endpoint).await?;
//! ```

mod client;
#[cfg(feature = "hyper-transport")]
mod connector;
#[cfg(feature = "hyper-transport")]
mod hyper;
pub mod plugins;
pub mod prelude;
mod provider;
mod stream;

pub use client::{DataResult, ServiceFuture, TransportClient, TransportClientBuilder};
pub use provider::{ObjectStream, Provider};
pub use stream::{DataStream, ResultObserver};

#[cfg(feature = "hyper-transport")]
pub use hyper::{HyperTransport, HyperTransportBuilder, TransportConfig};

// Re-export core types
pub use courier_core::{
    Authorization, Body, CodecError, ContentType, Endpoint, EndpointError, Header, HttpEndpoint,
    HttpResponse, JsonCodec, JsonEncodable, Method, Parameter, Plugin, ProviderError, RawResponse,
    Request, RequestBuilder, ResponseMeta, ResponseStatus, SendError, SendErrorKind, StatusKind,
    Transport, TransportError,
};

// Re-export http types for headers
pub use courier_core::{HeaderMap, HeaderName, HeaderValue, header};

pub use url;
