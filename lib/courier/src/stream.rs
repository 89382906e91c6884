//! Cold, cancellable single-result streams.

use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use courier_core::{Request, SendError, Transport, TransportError};
use futures_core::{FusedStream, Stream};
use tokio::sync::oneshot;
use tracing::debug;

use crate::client::{DataResult, Liveness};

/// Receives results that became available after their stream was cancelled.
pub type ResultObserver = Arc<dyn Fn(DataResult) + Send + Sync>;

/// Stream yielding the single result of one transport client call.
///
/// The stream is cold: the request runs only once the stream is first polled,
/// on a spawned tokio task. It yields one item then completes.
///
/// Dropping the stream (or calling [`cancel`](Self::cancel)) while the call is
/// in flight aborts the transport call; plugins observe
/// [`TransportError::Cancelled`] and nothing is yielded. A result produced
/// concurrently with the cancellation goes to the observer registered with
/// [`TransportClient::execute_stream_with`](crate::TransportClient::execute_stream_with),
/// if any.
#[must_use = "streams do nothing unless polled"]
pub struct DataStream<T> {
    state: State<T>,
}

enum State<T> {
    Cold {
        client: Liveness<T>,
        request: Request,
        observer: Option<ResultObserver>,
    },
    Running(oneshot::Receiver<DataResult>),
    Done,
}

impl<T> std::fmt::Debug for DataStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            State::Cold { .. } => "cold",
            State::Running(_) => "running",
            State::Done => "done",
        };
        f.debug_struct("DataStream").field("state", &state).finish()
    }
}

impl<T: Transport> DataStream<T> {
    pub(crate) fn new(
        client: Liveness<T>,
        request: Request,
        observer: Option<ResultObserver>,
    ) -> Self {
        Self {
            state: State::Cold {
                client,
                request,
                observer,
            },
        }
    }

    /// Cancel the call. Equivalent to dropping the stream.
    pub fn cancel(self) {
        if matches!(self.state, State::Running(_)) {
            debug!("cancelling in-flight request");
        }
    }
}

impl<T: Transport> Stream for DataStream<T> {
    type Item = DataResult;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match mem::replace(&mut this.state, State::Done) {
                State::Cold {
                    client,
                    request,
                    observer,
                } => {
                    let (sender, receiver) = oneshot::channel();
                    tokio::spawn(run(client, request, sender, observer));
                    this.state = State::Running(receiver);
                }
                State::Running(mut receiver) => {
                    return match Pin::new(&mut receiver).poll(cx) {
                        Poll::Pending => {
                            this.state = State::Running(receiver);
                            Poll::Pending
                        }
                        Poll::Ready(Ok(result)) => Poll::Ready(Some(result)),
                        Poll::Ready(Err(_)) => Poll::Ready(Some(Err(TransportError::Transport(
                            SendError::other("transport task ended without a result"),
                        )))),
                    };
                }
                State::Done => return Poll::Ready(None),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.state {
            State::Done => (0, Some(0)),
            _ => (1, Some(1)),
        }
    }
}

impl<T: Transport> FusedStream for DataStream<T> {
    fn is_terminated(&self) -> bool {
        matches!(self.state, State::Done)
    }
}

/// Body of the spawned task: run the call unless the receiver goes away first.
async fn run<T: Transport>(
    client: Liveness<T>,
    request: Request,
    mut sender: oneshot::Sender<DataResult>,
    observer: Option<ResultObserver>,
) {
    let result = match client.upgrade() {
        Ok(client) => client.dispatch(request, sender.closed()).await,
        Err(err) => {
            debug!(url = %request.url(), "transport client dropped before the request started");
            Err(err)
        }
    };

    // `send` fails only once the receiver is gone, so delivery and
    // cancellation cannot both happen.
    if let Err(result) = sender.send(result) {
        match observer {
            Some(observer) => {
                debug!("delivering result produced after cancellation to observer");
                observer(result);
            }
            None => debug!("discarding result produced after cancellation"),
        }
    }
}
