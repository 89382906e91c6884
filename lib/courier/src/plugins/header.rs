//! Static header plugin.

use courier_core::{EndpointError, Header, HeaderName, HeaderValue, Plugin, Request};

/// Plugin that sets one header on every request, replacing any existing value.
///
/// Useful for client-wide headers such as `User-Agent` or an API version.
#[derive(Debug, Clone)]
pub struct HeaderPlugin {
    name: HeaderName,
    value: HeaderValue,
}

impl HeaderPlugin {
    /// Create a plugin setting `name: value`.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::InvalidHeader`] if the name or value is invalid.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Result<Self, EndpointError> {
        Self::from_header(&Header::custom(name, value))
    }

    /// Create a plugin from a typed header.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::InvalidHeader`] if the name or value is invalid.
    pub fn from_header(header: &Header) -> Result<Self, EndpointError> {
        let (name, value) = header.to_http()?;
        Ok(Self { name, value })
    }
}

impl Plugin for HeaderPlugin {
    fn modify(&self, request: Request) -> Request {
        request
            .into_builder()
            .set_header(self.name.clone(), self.value.clone())
            .build()
    }
}
