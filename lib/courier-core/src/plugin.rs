//! Request interception hooks.

use bytes::Bytes;

use crate::{HttpResponse, Request, TransportError};

/// Interception capability registered on a transport client.
///
/// Every hook has a no-op default, so a plugin only implements what it needs.
/// Plugins run in registration order:
///
/// 1. [`modify`](Plugin::modify) is folded over the plugin list, the first
///    plugin seeing the original request;
/// 2. [`will_send`](Plugin::will_send) observes the final request;
/// 3. after the transport call, [`did_receive`](Plugin::did_receive) or
///    [`did_fail`](Plugin::did_fail) observes the outcome.
///
/// Each `will_send` is followed by exactly one of the two. A call abandoned
/// after `will_send` reaches `did_fail` with [`TransportError::Cancelled`].
/// Plugins cannot change whether a call succeeds.
///
/// # Example
///
/// ```
/// use courier_core::{Plugin, Request};
/// use http::{HeaderName, HeaderValue};
///
/// struct ApiVersion;
///
/// impl Plugin for ApiVersion {
///     fn modify(&self, request: Request) -> Request {
///         request
///             .into_builder()
///             .set_header(HeaderName::from_static("x-api-version"), HeaderValue::from_static("2"))
///             .build()
///     }
/// }
/// ```
pub trait Plugin: Send + Sync {
    /// Rewrite the outbound request.
    fn modify(&self, request: Request) -> Request {
        request
    }

    /// Observe the request about to be sent.
    fn will_send(&self, _request: &Request) {}

    /// Observe an HTTP response, whatever its status.
    fn did_receive(&self, _body: &Bytes, _response: &HttpResponse, _request: &Request) {}

    /// Observe a failure that produced no HTTP response.
    fn did_fail(&self, _error: &TransportError, _request: &Request) {}
}
