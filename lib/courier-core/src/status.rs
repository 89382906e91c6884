//! HTTP response status classification.

use derive_more::Display;

/// Numeric HTTP status code as returned by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResponseStatus {
    code: u16,
}

/// Status code family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum StatusKind {
    /// `[100, 200)`.
    #[display("informational")]
    Informational,
    /// `[200, 300)`.
    #[display("successful")]
    Successful,
    /// `[300, 400)`.
    #[display("redirection")]
    Redirection,
    /// `[400, 500)`.
    #[display("client error")]
    ClientError,
    /// `[500, 600)`.
    #[display("server error")]
    ServerError,
    /// Anything outside `[100, 600)`.
    #[display("invalid")]
    Invalid,
}

impl ResponseStatus {
    /// Wrap a status code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self { code }
    }

    /// The numeric code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        self.code
    }

    /// The code family.
    #[must_use]
    pub const fn kind(&self) -> StatusKind {
        match self.code {
            100..=199 => StatusKind::Informational,
            200..=299 => StatusKind::Successful,
            300..=399 => StatusKind::Redirection,
            400..=499 => StatusKind::ClientError,
            500..=599 => StatusKind::ServerError,
            _ => StatusKind::Invalid,
        }
    }

    /// Only `2xx` counts as success; redirects are not followed at this layer.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.kind(), StatusKind::Successful)
    }
}

impl std::fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code, self.kind())
    }
}

impl From<u16> for ResponseStatus {
    fn from(code: u16) -> Self {
        Self::new(code)
    }
}

impl From<http::StatusCode> for ResponseStatus {
    fn from(status: http::StatusCode) -> Self {
        Self::new(status.as_u16())
    }
}
