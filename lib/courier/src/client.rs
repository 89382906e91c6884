//! Transport client: plugin pipeline, status classification and execution modes.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

use bytes::Bytes;
use courier_core::{Method, Plugin, Request, ResponseMeta, SendError, Transport, TransportError};
use tracing::debug;
use url::Url;

use crate::stream::{DataStream, ResultObserver};

/// Outcome of one transport client call.
pub type DataResult = Result<Bytes, TransportError>;

// ============================================================================
// TransportClient
// ============================================================================

/// Executes requests through a [`Transport`], running the registered
/// [`Plugin`]s around every call.
///
/// Cloning is cheap: clones share the transport and the plugin list. Streams
/// created by [`execute_stream`](Self::execute_stream) do not keep the client
/// alive; a stream that starts after the last clone is dropped fails with
/// [`TransportError::ClientUnavailable`].
///
/// # Example
///
/// ```ignore
/// use courier::{HyperTransport, TransportClient};
/// use courier::plugins::LoggingPlugin;
///
/// let client = TransportClient::builder(HyperTransport::new())
///     .plugin(LoggingPlugin::new())
///     .build();
///
/// let body = client.execute_url("https://api.example.com/health".parse()?).await?;
/// ```
pub struct TransportClient<T> {
    inner: Arc<ClientInner<T>>,
}

impl<T> Clone for TransportClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for TransportClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportClient")
            .field("transport", &self.inner.transport)
            .field("plugins", &self.inner.plugins.len())
            .finish()
    }
}

impl<T: Transport> TransportClient<T> {
    /// Create a client without plugins.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::builder(transport).build()
    }

    /// Create a builder to register plugins.
    #[must_use]
    pub fn builder(transport: T) -> TransportClientBuilder<T> {
        TransportClientBuilder::new(transport)
    }

    /// The transport primitive.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// Registered plugins, in execution order.
    #[must_use]
    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.inner.plugins
    }

    /// Execute a request and return the body of a 2xx response.
    ///
    /// # Errors
    ///
    /// - [`TransportError::RequestFailure`] for any non-2xx status, with the body
    /// - [`TransportError::NotHttpResponse`] when the response is not HTTP
    /// - [`TransportError::Cancelled`] when the transport reports a cancellation
    /// - [`TransportError::Transport`] for any other transport failure
    pub async fn execute(&self, request: Request) -> DataResult {
        self.inner.dispatch(request, std::future::pending()).await
    }

    /// Execute a plain `GET` to `url`.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub async fn execute_url(&self, url: Url) -> DataResult {
        self.execute(Request::builder(Method::Get, url).build()).await
    }

    /// Create a cold stream for `request`.
    ///
    /// Nothing happens until the stream is first polled; it then yields exactly
    /// one result and completes. Dropping the stream, or calling
    /// [`DataStream::cancel`], cancels the in-flight call and guarantees no
    /// result is yielded afterwards.
    #[must_use]
    pub fn execute_stream(&self, request: Request) -> DataStream<T> {
        DataStream::new(self.liveness(), request, None)
    }

    /// Like [`execute_stream`](Self::execute_stream), handing any result that
    /// becomes available after cancellation to `observer` instead of
    /// discarding it.
    #[must_use]
    pub fn execute_stream_with<F>(&self, request: Request, observer: F) -> DataStream<T>
    where
        F: Fn(DataResult) + Send + Sync + 'static,
    {
        let observer: ResultObserver = Arc::new(observer);
        DataStream::new(self.liveness(), request, Some(observer))
    }

    /// Cold stream for a plain `GET` to `url`.
    #[must_use]
    pub fn execute_url_stream(&self, url: Url) -> DataStream<T> {
        self.execute_stream(Request::builder(Method::Get, url).build())
    }

    fn liveness(&self) -> Liveness<T> {
        Liveness(Arc::downgrade(&self.inner))
    }
}

// ============================================================================
// Pipeline
// ============================================================================

pub(crate) struct ClientInner<T> {
    transport: T,
    plugins: Vec<Arc<dyn Plugin>>,
}

impl<T: Transport> ClientInner<T> {
    /// Run one request through the plugins and the transport.
    ///
    /// The transport call is abandoned as soon as `cancelled` resolves; plugins
    /// then observe [`TransportError::Cancelled`]. They also observe it when the
    /// returned future is dropped after `will_send`, so every `will_send` is
    /// followed by exactly one `did_receive` or `did_fail`.
    pub(crate) async fn dispatch(
        &self,
        request: Request,
        cancelled: impl Future<Output = ()>,
    ) -> DataResult {
        let request = self
            .plugins
            .iter()
            .fold(request, |request, plugin| plugin.modify(request));

        for plugin in &self.plugins {
            plugin.will_send(&request);
        }
        let mut in_flight = InFlight {
            plugins: &self.plugins,
            request: &request,
            armed: true,
        };

        let outcome = tokio::select! {
            biased;
            () = cancelled => {
                debug!(url = %request.url(), "request cancelled before completion");
                Err(SendError::cancelled())
            }
            outcome = self.transport.send(request.clone()) => outcome,
        };
        in_flight.armed = false;

        match outcome {
            Ok(response) => {
                let (body, meta) = response.into_parts();
                match meta {
                    ResponseMeta::Http(response) => {
                        for plugin in &self.plugins {
                            plugin.did_receive(&body, &response, &request);
                        }

                        let status = response.status();
                        if status.is_success() {
                            Ok(body)
                        } else {
                            Err(TransportError::request_failure(status, body))
                        }
                    }
                    ResponseMeta::NonHttp(description) => {
                        self.fail(TransportError::NotHttpResponse(description), &request)
                    }
                }
            }
            Err(err) if err.is_cancelled() => self.fail(TransportError::Cancelled, &request),
            Err(err) => self.fail(TransportError::Transport(err), &request),
        }
    }

    fn fail(&self, error: TransportError, request: &Request) -> DataResult {
        for plugin in &self.plugins {
            plugin.did_fail(&error, request);
        }
        Err(error)
    }
}

/// Reports [`TransportError::Cancelled`] to the plugins if a dispatch is
/// dropped between `will_send` and its outcome.
struct InFlight<'a> {
    plugins: &'a [Arc<dyn Plugin>],
    request: &'a Request,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            debug!(url = %self.request.url(), "request dropped before completion");
            for plugin in self.plugins {
                plugin.did_fail(&TransportError::Cancelled, self.request);
            }
        }
    }
}

/// Non-owning handle to a client, checked when deferred work starts.
pub(crate) struct Liveness<T>(Weak<ClientInner<T>>);

impl<T> Liveness<T> {
    pub(crate) fn upgrade(&self) -> Result<Arc<ClientInner<T>>, TransportError> {
        self.0.upgrade().ok_or(TransportError::ClientUnavailable)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`TransportClient`].
pub struct TransportClientBuilder<T> {
    transport: T,
    plugins: Vec<Arc<dyn Plugin>>,
}

impl<T: Transport> TransportClientBuilder<T> {
    /// Create a builder around a transport.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            plugins: Vec::new(),
        }
    }

    /// Append a plugin. Plugins run in the order they are added.
    #[must_use]
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    /// Append a shared plugin.
    #[must_use]
    pub fn shared_plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Append several plugins, keeping their order.
    #[must_use]
    pub fn plugins(mut self, plugins: impl IntoIterator<Item = Arc<dyn Plugin>>) -> Self {
        self.plugins.extend(plugins);
        self
    }

    /// Build the client.
    #[must_use]
    pub fn build(self) -> TransportClient<T> {
        TransportClient {
            inner: Arc::new(ClientInner {
                transport: self.transport,
                plugins: self.plugins,
            }),
        }
    }
}

// ============================================================================
// Tower Service
// ============================================================================

/// Future returned by the [`tower_service::Service`] implementation.
pub type ServiceFuture = Pin<Box<dyn Future<Output = DataResult> + Send>>;

impl<T: Transport> tower_service::Service<Request> for TransportClient<T> {
    type Response = Bytes;
    type Error = TransportError;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let client = self.clone();
        Box::pin(async move { client.execute(request).await })
    }
}
