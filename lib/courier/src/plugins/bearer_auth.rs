//! Bearer token authentication plugin.
//!
//! Sets an `Authorization: Bearer <token>` header on every outgoing request.

use courier_core::{Authorization, EndpointError, Header, HeaderValue, Plugin, Request, header};

/// Plugin that adds bearer token authentication to requests.
///
/// An `Authorization` header set by the endpoint is replaced.
///
/// # Example
///
/// ```ignore
/// use courier::plugins::BearerAuthPlugin;
///
/// let client = TransportClient::builder(transport)
///     .plugin(BearerAuthPlugin::new("my-secret-token")?)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct BearerAuthPlugin {
    value: HeaderValue,
}

impl BearerAuthPlugin {
    /// Create a new bearer auth plugin with the given token.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::InvalidHeader`] if the token is not a valid
    /// header value.
    pub fn new(token: impl Into<String>) -> Result<Self, EndpointError> {
        let (_, mut value) = Header::authorization(Authorization::Bearer(token.into())).to_http()?;
        value.set_sensitive(true);
        Ok(Self { value })
    }
}

impl Plugin for BearerAuthPlugin {
    fn modify(&self, request: Request) -> Request {
        request
            .into_builder()
            .set_header(header::AUTHORIZATION, self.value.clone())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use courier_core::Method;

    use super::*;

    fn request() -> Request {
        let url = url::Url::parse("https://example.com/test").expect("valid url");
        Request::builder(Method::Get, url)
            .header(header::AUTHORIZATION, HeaderValue::from_static("Bearer stale"))
            .build()
    }

    #[test]
    fn bearer_auth_replaces_authorization() {
        let plugin = BearerAuthPlugin::new("my-token").expect("valid token");

        let request = plugin.modify(request());

        assert_eq!(request.header("authorization"), Some("Bearer my-token"));
        assert_eq!(request.headers().get_all("authorization").iter().count(), 1);
    }

    #[test]
    fn bearer_auth_rejects_invalid_token() {
        let err = BearerAuthPlugin::new("line\nbreak").expect_err("newline is not allowed");
        assert!(matches!(err, EndpointError::InvalidHeader(_)));
    }

    #[test]
    fn bearer_auth_value_is_sensitive() {
        let plugin = BearerAuthPlugin::new("my-token").expect("valid token");
        let request = plugin.modify(request());

        let value = request.headers().get("authorization").expect("header set");
        assert!(value.is_sensitive());
    }
}
