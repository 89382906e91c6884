//! Endpoint headers.
//!
//! Headers are kept as plain name/value pairs until the request is built, so
//! an endpoint stays a cheap immutable value. Validation happens in
//! [`Endpoint::build_request`](crate::Endpoint::build_request).

use derive_more::Display;
use http::{HeaderName, HeaderValue};

use crate::EndpointError;

/// One `name: value` header line declared by an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{name}: {value}")]
pub struct Header {
    name: String,
    value: String,
}

impl Header {
    /// Any header, by name.
    #[must_use]
    pub fn custom(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// `Authorization` header.
    #[must_use]
    pub fn authorization(authorization: Authorization) -> Self {
        Self::custom(http::header::AUTHORIZATION.as_str(), authorization.to_string())
    }

    /// `Accept` header.
    #[must_use]
    pub fn accept(content_type: ContentType) -> Self {
        Self::custom(http::header::ACCEPT.as_str(), content_type.as_str())
    }

    /// `Content-Type` header.
    #[must_use]
    pub fn content_type(content_type: ContentType) -> Self {
        Self::custom(http::header::CONTENT_TYPE.as_str(), content_type.as_str())
    }

    /// Header name as declared.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header value as declared.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Validate into wire types.
    pub fn to_http(&self) -> Result<(HeaderName, HeaderValue), EndpointError> {
        let name = HeaderName::from_bytes(self.name.as_bytes())
            .map_err(|_| EndpointError::invalid_header(self.name.clone()))?;
        let value = HeaderValue::from_str(&self.value)
            .map_err(|_| EndpointError::invalid_header(self.name.clone()))?;
        Ok((name, value))
    }
}

/// Credentials for the `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub enum Authorization {
    /// `Basic <token>`, the token being already base64-encoded.
    #[display("Basic {_0}")]
    Basic(String),
    /// `Bearer <token>`.
    #[display("Bearer {_0}")]
    Bearer(String),
}

/// Media types used by `Accept` and `Content-Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Plain text content type (`text/plain`).
    PlainText,
    /// Binary content type (`application/octet-stream`).
    OctetStream,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::PlainText => "text/plain",
            Self::OctetStream => "application/octet-stream",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
