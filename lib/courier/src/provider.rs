//! Typed access to an API described by an [`Endpoint`] type.

use std::marker::PhantomData;
use std::mem;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

use bytes::Bytes;
use courier_core::{CodecError, Endpoint, JsonCodec, ProviderError, Request, Transport};
use futures_core::{FusedStream, Stream};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{DataStream, TransportClient};

/// Binds an [`Endpoint`] type to a [`TransportClient`], an environment and a
/// [`JsonCodec`].
///
/// Failures are tagged by layer with [`ProviderError`]: a construction failure
/// means nothing was sent, a transport failure keeps any status and body, and
/// a decode failure means a `2xx` body did not match the expected type.
///
/// # Example
///
/// ```ignore
/// use courier::{HyperTransport, Provider, TransportClient};
///
/// let provider: Provider<Widgets, _> =
///     Provider::new(TransportClient::new(HyperTransport::new()), Environment::production());
///
/// let widget: Widget = provider.request_object(&Widgets::Get { id: 12345 }).await?;
/// ```
pub struct Provider<E: Endpoint, T> {
    inner: Arc<ProviderInner<E, T>>,
}

struct ProviderInner<E: Endpoint, T> {
    client: TransportClient<T>,
    environment: E::Environment,
    codec: JsonCodec,
    _endpoint: PhantomData<fn(E)>,
}

impl<E: Endpoint, T> Clone for Provider<E, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E, T> std::fmt::Debug for Provider<E, T>
where
    E: Endpoint,
    E::Environment: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("environment", &self.inner.environment)
            .field("codec", &self.inner.codec)
            .finish_non_exhaustive()
    }
}

impl<E: Endpoint, T: Transport> Provider<E, T> {
    /// Create a provider with the default codec.
    #[must_use]
    pub fn new(client: TransportClient<T>, environment: E::Environment) -> Self {
        Self::with_codec(client, environment, JsonCodec::default())
    }

    /// Create a provider with an explicit codec.
    #[must_use]
    pub fn with_codec(
        client: TransportClient<T>,
        environment: E::Environment,
        codec: JsonCodec,
    ) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                client,
                environment,
                codec,
                _endpoint: PhantomData,
            }),
        }
    }

    /// The underlying transport client.
    #[must_use]
    pub fn client(&self) -> &TransportClient<T> {
        &self.inner.client
    }

    /// The environment endpoints are resolved against.
    #[must_use]
    pub fn environment(&self) -> &E::Environment {
        &self.inner.environment
    }

    /// The JSON codec used for bodies and responses.
    #[must_use]
    pub fn codec(&self) -> &JsonCodec {
        &self.inner.codec
    }

    /// Build the wire request for `endpoint` without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Construction`] if the endpoint is invalid.
    pub fn build_request(&self, endpoint: &E) -> Result<Request, ProviderError> {
        self.inner.build_request(endpoint)
    }

    /// Send `endpoint` and return the raw body of a `2xx` response.
    ///
    /// # Errors
    ///
    /// [`ProviderError::Construction`] or [`ProviderError::Transport`].
    pub async fn request_data(&self, endpoint: &E) -> Result<Bytes, ProviderError> {
        let request = self.build_request(endpoint)?;
        let body = self.inner.client.execute(request).await?;
        Ok(body)
    }

    /// Send `endpoint` and decode the `2xx` body as `R`.
    ///
    /// Non-`2xx` bodies are never decoded: they stay available through
    /// [`ProviderError::body`].
    ///
    /// # Errors
    ///
    /// [`ProviderError::Construction`], [`ProviderError::Transport`] or
    /// [`ProviderError::Decode`].
    pub async fn request_object<R: DeserializeOwned>(
        &self,
        endpoint: &E,
    ) -> Result<R, ProviderError> {
        let body = self.request_data(endpoint).await?;
        let value = self.inner.codec.decode(&body)?;
        Ok(value)
    }

    /// Send `endpoint`, ignoring the body of a `2xx` response.
    ///
    /// # Errors
    ///
    /// [`ProviderError::Construction`] or [`ProviderError::Transport`].
    pub async fn send(&self, endpoint: &E) -> Result<(), ProviderError> {
        self.request_data(endpoint).await.map(drop)
    }

    /// Cold stream variant of [`request_data`](Self::request_data).
    pub fn request_data_stream(&self, endpoint: E) -> ObjectStream<E, T, Bytes> {
        ObjectStream::new(self, endpoint, |_, body| Ok(body))
    }

    /// Cold stream variant of [`request_object`](Self::request_object).
    pub fn request_object_stream<R: DeserializeOwned>(&self, endpoint: E) -> ObjectStream<E, T, R> {
        ObjectStream::new(self, endpoint, |codec, body| codec.decode(&body))
    }

    /// Cold stream variant of [`send`](Self::send).
    pub fn send_stream(&self, endpoint: E) -> ObjectStream<E, T, ()> {
        ObjectStream::new(self, endpoint, |_, _| Ok(()))
    }
}

impl<E: Endpoint, T> ProviderInner<E, T> {
    fn build_request(&self, endpoint: &E) -> Result<Request, ProviderError> {
        let request = endpoint.build_request(&self.environment, &self.codec)?;
        Ok(request)
    }
}

// ============================================================================
// ObjectStream
// ============================================================================

type Decoder<R> = fn(&JsonCodec, Bytes) -> Result<R, CodecError>;

/// Stream yielding the single typed result of one provider call.
///
/// Like [`DataStream`], it is cold and yields one item. The request is built
/// on first poll, so a construction failure is yielded without sending
/// anything. Dropping the stream cancels the in-flight call.
///
/// The stream does not keep its provider alive: first polling it after the
/// last provider clone is dropped yields [`ProviderError::Unavailable`].
#[must_use = "streams do nothing unless polled"]
pub struct ObjectStream<E: Endpoint, T, R> {
    state: ObjectState<E, T>,
    decode: Decoder<R>,
}

enum ObjectState<E: Endpoint, T> {
    Cold {
        provider: Weak<ProviderInner<E, T>>,
        endpoint: E,
    },
    Running {
        inner: DataStream<T>,
        codec: JsonCodec,
    },
    Done,
}

// The endpoint is never pinned, so the stream can move freely.
impl<E: Endpoint, T, R> Unpin for ObjectStream<E, T, R> {}

impl<E: Endpoint, T, R> std::fmt::Debug for ObjectStream<E, T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            ObjectState::Cold { .. } => "cold",
            ObjectState::Running { .. } => "running",
            ObjectState::Done => "done",
        };
        f.debug_struct("ObjectStream").field("state", &state).finish()
    }
}

impl<E: Endpoint, T: Transport, R> ObjectStream<E, T, R> {
    fn new(provider: &Provider<E, T>, endpoint: E, decode: Decoder<R>) -> Self {
        Self {
            state: ObjectState::Cold {
                provider: Arc::downgrade(&provider.inner),
                endpoint,
            },
            decode,
        }
    }

    /// Cancel the call. Equivalent to dropping the stream.
    pub fn cancel(self) {
        if let ObjectState::Running { inner, .. } = self.state {
            inner.cancel();
        }
    }
}

impl<E: Endpoint, T: Transport, R> Stream for ObjectStream<E, T, R> {
    type Item = Result<R, ProviderError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match mem::replace(&mut this.state, ObjectState::Done) {
                ObjectState::Cold { provider, endpoint } => {
                    let Some(provider) = provider.upgrade() else {
                        debug!("provider dropped before the request started");
                        return Poll::Ready(Some(Err(ProviderError::Unavailable)));
                    };
                    match provider.build_request(&endpoint) {
                        Ok(request) => {
                            this.state = ObjectState::Running {
                                inner: provider.client.execute_stream(request),
                                codec: provider.codec,
                            };
                        }
                        Err(err) => return Poll::Ready(Some(Err(err))),
                    }
                }
                ObjectState::Running { mut inner, codec } => {
                    return match Pin::new(&mut inner).poll_next(cx) {
                        Poll::Pending => {
                            this.state = ObjectState::Running { inner, codec };
                            Poll::Pending
                        }
                        Poll::Ready(Some(Ok(body))) => {
                            let decoded = (this.decode)(&codec, body);
                            Poll::Ready(Some(decoded.map_err(ProviderError::from)))
                        }
                        Poll::Ready(Some(Err(err))) => Poll::Ready(Some(Err(err.into()))),
                        Poll::Ready(None) => Poll::Ready(None),
                    };
                }
                ObjectState::Done => return Poll::Ready(None),
            }
        }
    }
}

impl<E: Endpoint, T: Transport, R> FusedStream for ObjectStream<E, T, R> {
    fn is_terminated(&self) -> bool {
        matches!(self.state, ObjectState::Done)
    }
}
