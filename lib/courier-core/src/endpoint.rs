//! Declarative endpoints and request construction.
//!
//! An [`Endpoint`] describes one API call: where it goes, how, with which
//! headers and at most one [`Parameter`]. It is turned into a wire [`Request`]
//! by [`Endpoint::build_request`], which never touches the network.
//!
//! APIs with many calls usually implement [`Endpoint`] on an enum, one variant
//! per call. [`HttpEndpoint`] is a ready-made value type for one-off calls.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use http::HeaderValue;
use http::header::CONTENT_TYPE;
use url::Url;

use crate::{Body, EndpointError, Header, JsonCodec, Method, Parameter, Request};

/// Description of one API call.
///
/// # Example
///
/// ```
/// use std::borrow::Cow;
///
/// use courier_core::{Endpoint, JsonCodec, Method, Parameter};
///
/// enum Widgets {
///     Get { id: u64, verbose: bool },
/// }
///
/// struct Environment {
///     base_url: String,
/// }
///
/// impl Endpoint for Widgets {
///     type Environment = Environment;
///
///     fn target(&self, environment: &Environment) -> String {
///         environment.base_url.clone()
///     }
///
///     fn path(&self) -> Cow<'_, str> {
///         match self {
///             Self::Get { id, .. } => format!("/widgets/{id}").into(),
///         }
///     }
///
///     fn method(&self) -> Method {
///         Method::Get
///     }
///
///     fn parameter(&self) -> Option<Parameter> {
///         match self {
///             Self::Get { verbose, .. } => {
///                 Some(Parameter::query([("verbose", verbose.to_string())]))
///             }
///         }
///     }
/// }
///
/// let environment = Environment { base_url: "https://api.example.com".to_string() };
/// let request = Widgets::Get { id: 12345, verbose: true }
///     .build_request(&environment, &JsonCodec::new())
///     .expect("valid endpoint");
/// assert_eq!(request.url().as_str(), "https://api.example.com/widgets/12345?verbose=true");
/// ```
pub trait Endpoint: Send + Sync {
    /// Runtime context used to resolve the target, e.g. staging vs production.
    type Environment: Send + Sync;

    /// Base URL for this call, resolved at build time.
    fn target(&self, environment: &Self::Environment) -> String;

    /// Path appended to the target.
    fn path(&self) -> Cow<'_, str>;

    /// HTTP method.
    fn method(&self) -> Method;

    /// Headers, applied in order. Duplicates are all sent.
    fn headers(&self) -> Cow<'_, [Header]> {
        Cow::Borrowed(&[])
    }

    /// Query items or body.
    fn parameter(&self) -> Option<Parameter> {
        None
    }

    /// Resolve into a wire request.
    ///
    /// Deterministic for a given environment, except for JSON body encoding
    /// which depends on the codec.
    fn build_request(
        &self,
        environment: &Self::Environment,
        codec: &JsonCodec,
    ) -> Result<Request, EndpointError> {
        let url = format!("{}{}", self.target(environment), self.path());
        let url = Url::parse(&url).map_err(|source| EndpointError::InvalidUrl { url, source })?;

        let mut builder = Request::builder(self.method(), url);
        let headers = self.headers();
        for header in headers.iter() {
            let (name, value) = header.to_http()?;
            builder = builder.header(name, value);
        }

        match self.parameter() {
            None => {}
            Some(Parameter::Query(items)) => {
                builder = builder.query_pairs(&items);
            }
            Some(Parameter::Body(Body::Data(bytes))) => {
                builder = builder.body(bytes);
            }
            Some(Parameter::Body(Body::Json(value))) => {
                let bytes = value
                    .encode_with(codec)
                    .map_err(EndpointError::JsonEncoding)?;
                let declares_content_type = headers
                    .iter()
                    .any(|header| header.name().eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
                if !declares_content_type {
                    builder = builder
                        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                }
                builder = builder.body(bytes);
            }
        }

        Ok(builder.build())
    }

    /// Resolve an endpoint that needs no environment.
    fn build(&self, codec: &JsonCodec) -> Result<Request, EndpointError>
    where
        Self: Endpoint<Environment = ()>,
    {
        self.build_request(&(), codec)
    }
}

type TargetFn<E> = Arc<dyn Fn(&E) -> String + Send + Sync>;

/// Immutable endpoint value.
///
/// The target is a function of the environment, so switching environment at
/// runtime is picked up by the next build.
///
/// ```
/// use courier_core::{Endpoint, HttpEndpoint, JsonCodec, Method, Parameter};
///
/// let endpoint = HttpEndpoint::new(
///     |_: &()| "https://api.example.com".to_string(),
///     "/widgets/12345",
///     Method::Get,
/// )
/// .with_parameter(Parameter::query([("verbose", "true")]));
///
/// let request = endpoint.build(&JsonCodec::new()).expect("valid endpoint");
/// assert_eq!(request.url().as_str(), "https://api.example.com/widgets/12345?verbose=true");
/// ```
pub struct HttpEndpoint<E = ()> {
    target: TargetFn<E>,
    path: String,
    method: Method,
    headers: Vec<Header>,
    parameter: Option<Parameter>,
}

impl<E> HttpEndpoint<E> {
    /// Creates an endpoint without headers or parameter.
    pub fn new(
        target: impl Fn(&E) -> String + Send + Sync + 'static,
        path: impl Into<String>,
        method: Method,
    ) -> Self {
        Self {
            target: Arc::new(target),
            path: path.into(),
            method,
            headers: Vec::new(),
            parameter: None,
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, header: Header) -> Self {
        self.headers.push(header);
        self
    }

    /// Adds several headers.
    #[must_use]
    pub fn with_headers(mut self, headers: impl IntoIterator<Item = Header>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Sets the parameter, replacing any previous one.
    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameter = Some(parameter);
        self
    }
}

impl<E> Clone for HttpEndpoint<E> {
    fn clone(&self) -> Self {
        Self {
            target: Arc::clone(&self.target),
            path: self.path.clone(),
            method: self.method,
            headers: self.headers.clone(),
            parameter: self.parameter.clone(),
        }
    }
}

impl<E> fmt::Debug for HttpEndpoint<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpEndpoint")
            .field("path", &self.path)
            .field("method", &self.method)
            .field("headers", &self.headers)
            .field("parameter", &self.parameter)
            .finish_non_exhaustive()
    }
}

impl<E: Send + Sync> Endpoint for HttpEndpoint<E> {
    type Environment = E;

    fn target(&self, environment: &E) -> String {
        (self.target)(environment)
    }

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.path)
    }

    fn method(&self) -> Method {
        self.method
    }

    fn headers(&self) -> Cow<'_, [Header]> {
        Cow::Borrowed(&self.headers)
    }

    fn parameter(&self) -> Option<Parameter> {
        self.parameter.clone()
    }
}
