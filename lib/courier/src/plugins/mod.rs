//! Ready-made [`Plugin`](courier_core::Plugin)s.
//!
//! Plugins are registered on a [`TransportClientBuilder`](crate::TransportClientBuilder)
//! and run in registration order: a header added by an earlier plugin is
//! visible to the ones after it.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `plugin-basic-auth` | [`BasicAuthPlugin`] |
//! | `plugin-metrics` | [`MetricsPlugin`] |
//!
//! # Example
//!
//! ```ignore
//! use courier::plugins::{BearerAuthPlugin, HeaderPlugin, LoggingPlugin};
//! use courier::{HyperTransport, TransportClient};
//!
//! let client = TransportClient::builder(HyperTransport::new())
//!     .plugin(HeaderPlugin::new("x-client", "courier")?)
//!     .plugin(BearerAuthPlugin::new("my-token")?)
//!     .plugin(LoggingPlugin::new())
//!     .build();
//! ```

#[cfg(feature = "plugin-basic-auth")]
mod basic_auth;
mod bearer_auth;
mod header;
mod logging;
#[cfg(feature = "plugin-metrics")]
mod metrics;

#[cfg(feature = "plugin-basic-auth")]
pub use basic_auth::BasicAuthPlugin;
pub use bearer_auth::BearerAuthPlugin;
pub use header::HeaderPlugin;
pub use logging::{LogLevel, LoggingPlugin};
#[cfg(feature = "plugin-metrics")]
pub use metrics::MetricsPlugin;
