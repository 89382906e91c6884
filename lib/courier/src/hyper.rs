//! Default transport primitive using hyper-util.

use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tracing::trace;

use crate::{RawResponse, Request, SendError, Transport, connector::https_connector};

/// Timeouts and pool limits of a [`HyperTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Limit for the whole call, response body included.
    pub timeout: Duration,
    /// Limit for establishing a connection.
    pub connect_timeout: Duration,
    /// Idle connections kept per host.
    pub pool_idle_per_host: usize,
    /// How long an idle connection stays pooled.
    pub pool_idle_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

/// [`Transport`] backed by a pooled hyper client with rustls.
///
/// Connection pooling, HTTP/2 and TLS are handled by hyper; this type only
/// maps requests and failures.
///
/// # Example
///
/// ```ignore
/// use courier::{HyperTransport, TransportClient};
/// use std::time::Duration;
///
/// let transport = HyperTransport::builder()
///     .timeout(Duration::from_secs(10))
///     .build();
/// let client = TransportClient::new(transport);
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    config: TransportConfig,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// Create a transport with custom configuration.
    #[must_use]
    pub fn with_config(config: TransportConfig) -> Self {
        let connector = https_connector(config.connect_timeout);

        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(connector);

        Self { inner, config }
    }

    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> HyperTransportBuilder {
        HyperTransportBuilder::default()
    }

    /// Get the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Build a hyper request from a courier request.
    fn build_hyper_request(request: Request) -> Result<http::Request<Full<Bytes>>, SendError> {
        let (method, url, headers, body) = request.into_parts();

        let mut http_request = http::Request::builder()
            .method(http::Method::from(method))
            .uri(url.as_str())
            .body(body.map_or_else(Full::default, Full::new))
            .map_err(|err| SendError::other(err.to_string()).with_source(err))?;
        *http_request.headers_mut() = headers;

        Ok(http_request)
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> SendError {
        let msg = err.to_string();

        if err.is_connect() {
            return SendError::connect(msg).with_source(err);
        }

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return SendError::tls(msg).with_source(err);
        }

        SendError::other(msg).with_source(err)
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HyperTransport {
    async fn send(&self, request: Request) -> Result<RawResponse, SendError> {
        trace!(method = %request.method(), url = %request.url(), "hyper send");
        let hyper_request = Self::build_hyper_request(request)?;

        let response = tokio::time::timeout(self.config.timeout, self.inner.request(hyper_request))
            .await
            .map_err(|_| SendError::timeout())?
            .map_err(Self::map_hyper_error)?;

        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|err| SendError::other(err.to_string()).with_source(err))?
            .to_bytes();

        trace!(status = parts.status.as_u16(), len = body.len(), "hyper response");
        Ok(RawResponse::http(parts.status, parts.headers, body))
    }
}

/// Builder for [`HyperTransport`], starting from [`TransportConfig::default`].
#[derive(Debug, Clone, Default)]
pub struct HyperTransportBuilder {
    config: TransportConfig,
}

impl HyperTransportBuilder {
    /// Limit the whole call, response body included.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Limit connection establishment.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Idle connections kept per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.config.pool_idle_per_host = count;
        self
    }

    /// How long an idle connection stays pooled.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    /// Build the transport.
    #[must_use]
    pub fn build(self) -> HyperTransport {
        HyperTransport::with_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;
    use crate::Method;

    #[tokio::test]
    async fn transport_default() {
        let transport = HyperTransport::new();
        assert_eq!(transport.config(), &TransportConfig::default());
        assert_eq!(transport.config().timeout, Duration::from_secs(30));
        assert_eq!(transport.config().connect_timeout, Duration::from_secs(10));
        assert_eq!(transport.config().pool_idle_per_host, 32);
        assert_eq!(transport.config().pool_idle_timeout, Duration::from_secs(90));
    }

    #[tokio::test]
    async fn builder_overrides_only_what_is_set() {
        let transport = HyperTransport::builder()
            .timeout(Duration::from_secs(60))
            .pool_idle_per_host(16)
            .build();

        let expected = TransportConfig {
            timeout: Duration::from_secs(60),
            pool_idle_per_host: 16,
            ..TransportConfig::default()
        };
        assert_eq!(transport.config(), &expected);
    }

    #[test]
    fn hyper_request_keeps_duplicate_headers_and_body() {
        let url = url::Url::parse("https://api.example.com/items?page=2").expect("valid URL");
        let request = Request::builder(Method::Post, url)
            .header(http::header::ACCEPT, HeaderValue::from_static("text/plain"))
            .header(http::header::ACCEPT, HeaderValue::from_static("application/json"))
            .body("payload")
            .build();

        let hyper_request = HyperTransport::build_hyper_request(request).expect("valid request");

        assert_eq!(hyper_request.method(), http::Method::POST);
        assert_eq!(hyper_request.uri(), "https://api.example.com/items?page=2");
        assert_eq!(hyper_request.headers().get_all("accept").iter().count(), 2);
    }
}
