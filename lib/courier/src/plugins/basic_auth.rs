//! Basic authentication plugin.
//!
//! Sets an `Authorization: Basic <base64(user:pass)>` header on every
//! outgoing request.

use base64::Engine;
use courier_core::{Authorization, EndpointError, Header, HeaderValue, Plugin, Request, header};

/// Plugin that adds basic authentication to requests.
///
/// # Example
///
/// ```ignore
/// use courier::plugins::BasicAuthPlugin;
///
/// let client = TransportClient::builder(transport)
///     .plugin(BasicAuthPlugin::new("username", "password")?)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct BasicAuthPlugin {
    value: HeaderValue,
}

impl BasicAuthPlugin {
    /// Create a new basic auth plugin with the given username and password.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::InvalidHeader`] if the encoded credentials
    /// cannot form a header value.
    pub fn new(
        username: impl AsRef<str>,
        password: impl AsRef<str>,
    ) -> Result<Self, EndpointError> {
        let credentials = format!("{}:{}", username.as_ref(), password.as_ref());
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
        let (_, mut value) = Header::authorization(Authorization::Basic(encoded)).to_http()?;
        value.set_sensitive(true);
        Ok(Self { value })
    }
}

impl Plugin for BasicAuthPlugin {
    fn modify(&self, request: Request) -> Request {
        request
            .into_builder()
            .set_header(header::AUTHORIZATION, self.value.clone())
            .build()
    }
}
