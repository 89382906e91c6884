//! Transport primitive contract.
//!
//! A [`Transport`] is the thinnest possible wrapper over a platform HTTP stack:
//! it sends one prepared [`Request`] and returns the raw body with response
//! metadata, or fails with a [`SendError`]. Status classification, plugins and
//! decoding all live above it.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use http::HeaderMap;

use crate::{Request, ResponseStatus, SendError};

/// Raw request execution capability.
///
/// Implementations must be safe to call concurrently: the client places no
/// locking around them. A cancellation observed by the implementation should
/// be reported as [`SendError::cancelled`].
pub trait Transport: Send + Sync + 'static {
    /// Send the request and collect the full response body.
    fn send(&self, request: Request) -> impl Future<Output = Result<RawResponse, SendError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<RawResponse, SendError>> + Send {
        (**self).send(request)
    }
}

/// Body bytes and response metadata as returned by a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    body: Bytes,
    meta: ResponseMeta,
}

impl RawResponse {
    /// An HTTP response.
    #[must_use]
    pub fn http(
        status: impl Into<ResponseStatus>,
        headers: HeaderMap,
        body: impl Into<Bytes>,
    ) -> Self {
        Self {
            body: body.into(),
            meta: ResponseMeta::Http(HttpResponse::new(status.into(), headers)),
        }
    }

    /// A response the transport could not interpret as HTTP.
    #[must_use]
    pub fn non_http(description: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            meta: ResponseMeta::NonHttp(description.into()),
        }
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Response metadata.
    #[must_use]
    pub const fn meta(&self) -> &ResponseMeta {
        &self.meta
    }

    /// Consume into (body, metadata).
    #[must_use]
    pub fn into_parts(self) -> (Bytes, ResponseMeta) {
        (self.body, self.meta)
    }
}

/// Response metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseMeta {
    /// Status and headers of an HTTP response.
    Http(HttpResponse),
    /// Anything else, with a human readable description.
    NonHttp(String),
}

/// Status and headers of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: ResponseStatus,
    headers: HeaderMap,
}

impl HttpResponse {
    /// Creates a new response head.
    #[must_use]
    pub const fn new(status: ResponseStatus, headers: HeaderMap) -> Self {
        Self { status, headers }
    }

    /// Response status.
    #[must_use]
    pub const fn status(&self) -> ResponseStatus {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First header value by name, if it is valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}
