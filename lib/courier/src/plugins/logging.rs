//! Request/response logging plugin.
//!
//! Logs every call with the `tracing` crate.

use bytes::Bytes;
use courier_core::{HttpResponse, Plugin, Request, TransportError};
use tracing::{debug, info, warn};

/// Plugin that logs requests and their outcome.
///
/// # Example
///
/// ```ignore
/// use courier::plugins::LoggingPlugin;
///
/// let client = TransportClient::builder(transport)
///     .plugin(LoggingPlugin::debug())
///     .build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingPlugin {
    level: LogLevel,
}

/// Log level for the logging plugin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Log at debug level, with headers and body sizes.
    Debug,
    /// Log at info level (summary only).
    #[default]
    Info,
}

impl LoggingPlugin {
    /// Create a new logging plugin with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging plugin that logs at debug level.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }

    /// The configured level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl Plugin for LoggingPlugin {
    fn will_send(&self, request: &Request) {
        let method = request.method();
        let url = request.url().as_str();
        match self.level {
            LogLevel::Debug => {
                debug!(
                    %method,
                    url,
                    headers = ?request.headers(),
                    body_len = request.body().map_or(0, Bytes::len),
                    "sending request"
                );
            }
            LogLevel::Info => info!(%method, url, "sending request"),
        }
    }

    fn did_receive(&self, body: &Bytes, response: &HttpResponse, request: &Request) {
        let method = request.method();
        let url = request.url().as_str();
        let status = response.status().code();

        if !response.status().is_success() {
            warn!(%method, url, status, "request failed with HTTP error");
            return;
        }

        match self.level {
            LogLevel::Debug => {
                debug!(
                    %method,
                    url,
                    status,
                    headers = ?response.headers(),
                    body_len = body.len(),
                    "request completed"
                );
            }
            LogLevel::Info => info!(%method, url, status, "request completed"),
        }
    }

    fn did_fail(&self, error: &TransportError, request: &Request) {
        let method = request.method();
        let url = request.url().as_str();
        if error.is_cancelled() {
            info!(%method, url, "request cancelled");
        } else {
            warn!(%method, url, error = %error, "request failed");
        }
    }
}
