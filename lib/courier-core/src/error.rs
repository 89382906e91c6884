//! Error types for courier.
//!
//! Errors are layered the same way the pipeline is:
//!
//! - [`EndpointError`]: building the request failed, nothing was sent.
//! - [`TransportError`]: the request was handed to the transport and did not
//!   come back as a `2xx` response.
//! - [`CodecError`](crate::CodecError): the body could not be decoded.
//!
//! [`ProviderError`] wraps each tier without flattening it, so callers can
//! match on the layer that failed.

use std::error::Error as StdError;
use std::fmt;

use bytes::Bytes;
use derive_more::{Display, Error, From};

use crate::{CodecError, JsonCodec, ResponseStatus, StatusKind};

// ============================================================================
// Endpoint errors
// ============================================================================

/// Failure to turn an endpoint into a wire request.
#[derive(Debug, Display, Error)]
pub enum EndpointError {
    /// `target + path` is not a valid absolute URL.
    #[display("invalid URL '{url}': {source}")]
    InvalidUrl {
        /// The URL string that failed to parse.
        url: String,
        /// Parse failure.
        source: url::ParseError,
    },

    /// A declared header has an invalid name or value.
    #[display("invalid header '{_0}'")]
    InvalidHeader(#[error(not(source))] String),

    /// The JSON body could not be encoded.
    #[display("JSON body encoding failed: {_0}")]
    JsonEncoding(CodecError),
}

impl EndpointError {
    /// Create an invalid header error.
    #[must_use]
    pub fn invalid_header(name: impl Into<String>) -> Self {
        Self::InvalidHeader(name.into())
    }
}

// ============================================================================
// Transport primitive errors
// ============================================================================

/// Classification of a transport primitive failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum SendErrorKind {
    /// The operation was cancelled.
    #[display("cancelled")]
    Cancelled,
    /// The operation timed out.
    #[display("timeout")]
    Timeout,
    /// The connection could not be established.
    #[display("connection")]
    Connect,
    /// TLS handshake or certificate failure.
    #[display("TLS")]
    Tls,
    /// Any other I/O failure.
    #[display("I/O")]
    Other,
}

/// Failure reported by a [`Transport`](crate::Transport) implementation.
#[derive(Debug)]
pub struct SendError {
    kind: SendErrorKind,
    message: String,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl SendError {
    /// Create an error of the given kind.
    #[must_use]
    pub fn new(kind: SendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// The operation was cancelled.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::new(SendErrorKind::Cancelled, "operation cancelled")
    }

    /// The operation timed out.
    #[must_use]
    pub fn timeout() -> Self {
        Self::new(SendErrorKind::Timeout, "operation timed out")
    }

    /// Connection failure.
    #[must_use]
    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(SendErrorKind::Connect, message)
    }

    /// TLS failure.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::new(SendErrorKind::Tls, message)
    }

    /// Any other failure.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(SendErrorKind::Other, message)
    }

    /// Attach the underlying error.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Failure classification.
    #[must_use]
    pub const fn kind(&self) -> SendErrorKind {
        self.kind
    }

    /// Failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` if the transport reported a cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self.kind, SendErrorKind::Cancelled)
    }

    /// Returns `true` if the transport reported a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self.kind, SendErrorKind::Timeout)
    }
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.kind, self.message)
    }
}

impl StdError for SendError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn StdError + 'static))
    }
}

// ============================================================================
// Transport client errors
// ============================================================================

/// Failure of a request executed through a transport client.
#[derive(Debug, Display, Error)]
pub enum TransportError {
    /// The transport returned a response that is not an HTTP response.
    #[display("not an HTTP response: {_0}")]
    NotHttpResponse(#[error(not(source))] String),

    /// The server answered with a non-`2xx` status.
    #[display("request failed with status {status}")]
    RequestFailure {
        /// Response status.
        status: ResponseStatus,
        /// Raw response body.
        body: Bytes,
    },

    /// The transport primitive failed.
    #[display("transport error: {_0}")]
    Transport(SendError),

    /// The request was cancelled before completing.
    #[display("request cancelled")]
    Cancelled,

    /// The client that issued the request no longer exists.
    #[display("transport client is no longer available")]
    ClientUnavailable,
}

impl TransportError {
    /// Create a non-`2xx` failure.
    #[must_use]
    pub fn request_failure(status: ResponseStatus, body: impl Into<Bytes>) -> Self {
        Self::RequestFailure {
            status,
            body: body.into(),
        }
    }

    /// Response status for non-`2xx` failures.
    #[must_use]
    pub const fn status(&self) -> Option<ResponseStatus> {
        match self {
            Self::RequestFailure { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Status family for non-`2xx` failures.
    #[must_use]
    pub const fn status_kind(&self) -> Option<StatusKind> {
        match self.status() {
            Some(status) => Some(status.kind()),
            None => None,
        }
    }

    /// Response body for non-`2xx` failures.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        match self {
            Self::RequestFailure { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns `true` if the request was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Try to decode a non-`2xx` body as JSON, typically an API error payload.
    ///
    /// Returns `None` if this is not a [`TransportError::RequestFailure`].
    pub fn decode_body<T: serde::de::DeserializeOwned>(
        &self,
        codec: &JsonCodec,
    ) -> Option<Result<T, CodecError>> {
        self.body().map(|body| codec.decode(body))
    }
}

// ============================================================================
// Provider errors
// ============================================================================

/// Failure of a typed provider call, tagged by the layer that failed.
#[derive(Debug, Display, Error, From)]
pub enum ProviderError {
    /// The endpoint could not be turned into a request. Nothing was sent.
    #[display("request construction failed: {_0}")]
    #[from]
    Construction(EndpointError),

    /// The request was sent and failed.
    #[display("{_0}")]
    #[from]
    Transport(TransportError),

    /// The response body could not be decoded.
    #[display("response decoding failed: {_0}")]
    #[from]
    Decode(CodecError),

    /// The provider was dropped before the stream started.
    #[display("provider is no longer available")]
    #[from(skip)]
    Unavailable,
}

impl ProviderError {
    /// The transport error, if the failure happened while sending.
    #[must_use]
    pub const fn transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }

    /// Response status for non-`2xx` failures.
    #[must_use]
    pub fn status(&self) -> Option<ResponseStatus> {
        self.transport().and_then(TransportError::status)
    }

    /// Response body for non-`2xx` failures.
    #[must_use]
    pub fn body(&self) -> Option<&Bytes> {
        self.transport().and_then(TransportError::body)
    }

    /// Returns `true` if the request was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.transport().is_some_and(TransportError::is_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    #[test]
    fn error_display() {
        let err = TransportError::request_failure(ResponseStatus::new(404), "Not Found");
        check!(err.to_string() == "request failed with status 404 (client error)");

        check!(TransportError::Cancelled.to_string() == "request cancelled");

        let err = TransportError::Transport(SendError::connect("refused"));
        check!(err.to_string() == "transport error: connection error: refused");

        let err = ProviderError::from(EndpointError::invalid_header("bad name"));
        check!(err.to_string() == "request construction failed: invalid header 'bad name'");
    }

    #[test]
    fn invalid_url_keeps_parse_error() {
        let_assert!(Err(source) = url::Url::parse("not a url"));
        let err = EndpointError::InvalidUrl {
            url: "not a url".to_string(),
            source,
        };

        check!(err.source().is_some());
        check!(err.to_string().starts_with("invalid URL 'not a url'"));
    }

    #[test]
    fn transport_error_status_and_body() {
        let err = TransportError::request_failure(ResponseStatus::new(503), "busy");
        check!(err.status() == Some(ResponseStatus::new(503)));
        check!(err.status_kind() == Some(StatusKind::ServerError));
        check!(err.body() == Some(&Bytes::from("busy")));

        check!(TransportError::Cancelled.status().is_none());
        check!(TransportError::ClientUnavailable.body().is_none());
    }

    #[test]
    fn transport_error_decode_body() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct ApiError {
            error: String,
        }

        let err =
            TransportError::request_failure(ResponseStatus::new(404), r#"{"error":"not found"}"#);
        let_assert!(Some(Ok(api_error)) = err.decode_body::<ApiError>(&JsonCodec::new()));
        check!(api_error.error == "not found");

        check!(
            TransportError::Cancelled
                .decode_body::<ApiError>(&JsonCodec::new())
                .is_none()
        );
    }

    #[test]
    fn send_error_kind_and_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = SendError::other("read failed").with_source(io);

        check!(err.kind() == SendErrorKind::Other);
        check!(err.source().is_some());
        check!(!err.is_cancelled());
        check!(SendError::cancelled().is_cancelled());
        check!(SendError::timeout().is_timeout());
    }

    #[test]
    fn provider_error_accessors() {
        let failure = TransportError::request_failure(ResponseStatus::new(401), "nope");
        let err = ProviderError::from(failure);
        check!(err.status() == Some(ResponseStatus::new(401)));
        check!(err.body() == Some(&Bytes::from("nope")));
        check!(!err.is_cancelled());

        check!(ProviderError::from(TransportError::Cancelled).is_cancelled());
        check!(ProviderError::Unavailable.transport().is_none());
    }
}
