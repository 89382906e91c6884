//! Integration tests for `HyperTransport` using wiremock.

use std::borrow::Cow;
use std::time::Duration;

use bytes::Bytes;
use courier::{
    Authorization, ContentType, Endpoint, Header, HttpEndpoint, HyperTransport, Method, Parameter,
    Provider, ProviderError, SendErrorKind, StatusKind, TransportClient, TransportError,
};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
}

/// Endpoints of a small user API.
enum Users {
    Get { id: u64, verbose: bool },
    Create(User),
    Delete(u64),
}

/// Where the API lives.
struct Server {
    base_url: String,
}

impl Endpoint for Users {
    type Environment = Server;

    fn target(&self, environment: &Server) -> String {
        environment.base_url.clone()
    }

    fn path(&self) -> Cow<'_, str> {
        match self {
            Self::Get { id, .. } | Self::Delete(id) => format!("/users/{id}").into(),
            Self::Create(_) => "/users".into(),
        }
    }

    fn method(&self) -> Method {
        match self {
            Self::Get { .. } => Method::Get,
            Self::Create(_) => Method::Post,
            Self::Delete(_) => Method::Delete,
        }
    }

    fn headers(&self) -> Cow<'_, [Header]> {
        Cow::Owned(vec![Header::accept(ContentType::Json)])
    }

    fn parameter(&self) -> Option<Parameter> {
        match self {
            Self::Get { verbose, .. } => Some(Parameter::query([("verbose", verbose.to_string())])),
            Self::Create(user) => Some(Parameter::json(user.clone())),
            Self::Delete(_) => None,
        }
    }
}

fn provider(mock_server: &MockServer) -> Provider<Users, HyperTransport> {
    Provider::new(
        TransportClient::new(HyperTransport::new()),
        Server {
            base_url: mock_server.uri(),
        },
    )
}

#[tokio::test]
async fn test_get_object() {
    let mock_server = MockServer::start().await;

    let user = User {
        id: 1,
        name: "Alice".to_string(),
    };

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .and(query_param("verbose", "true"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&user))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider(&mock_server);
    let fetched: User = provider
        .request_object(&Users::Get { id: 1, verbose: true })
        .await
        .expect("user");

    assert_eq!(fetched, user);
}

#[tokio::test]
async fn test_post_json_body() {
    let mock_server = MockServer::start().await;

    let input = User {
        id: 0,
        name: "Bob".to_string(),
    };
    let output = User {
        id: 42,
        name: "Bob".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&input))
        .respond_with(ResponseTemplate::new(201).set_body_json(&output))
        .mount(&mock_server)
        .await;

    let provider = provider(&mock_server);
    let created: User = provider
        .request_object(&Users::Create(input))
        .await
        .expect("created");

    assert_eq!(created, output);
}

#[tokio::test]
async fn test_delete_ignores_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/users/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    provider(&mock_server)
        .send(&Users::Delete(7))
        .await
        .expect("deleted");
}

#[tokio::test]
async fn test_not_found_keeps_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/999"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such user"))
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server)
        .request_object::<User>(&Users::Get {
            id: 999,
            verbose: false,
        })
        .await
        .expect_err("404");

    assert_eq!(err.status().map(|status| status.code()), Some(404));
    assert_eq!(err.body(), Some(&Bytes::from_static(b"no such user")));
}

#[tokio::test]
async fn test_server_error_statuses() {
    for status in [300_u16, 400, 500] {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&mock_server)
            .await;

        let client = TransportClient::new(HyperTransport::new());
        let url = url::Url::parse(&format!("{}/anything", mock_server.uri())).expect("url");
        let err = client.execute_url(url).await.expect_err("non-2xx fails");

        let expected = match status {
            300 => StatusKind::Redirection,
            400 => StatusKind::ClientError,
            _ => StatusKind::ServerError,
        };
        assert_eq!(err.status_kind(), Some(expected), "status {status}");
    }
}

#[tokio::test]
async fn test_malformed_json_is_a_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server)
        .request_object::<User>(&Users::Get { id: 1, verbose: true })
        .await
        .expect_err("malformed");

    assert!(matches!(err, ProviderError::Decode(_)));
}

#[tokio::test]
async fn test_stream_through_hyper() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(User {
            id: 5,
            name: "Eve".to_string(),
        }))
        .mount(&mock_server)
        .await;

    let provider = provider(&mock_server);
    let users: Vec<Result<User, ProviderError>> = provider
        .request_object_stream(Users::Get { id: 5, verbose: false })
        .collect()
        .await;

    assert!(matches!(users.as_slice(), [Ok(user)] if user.name == "Eve"));
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let transport = HyperTransport::builder()
        .timeout(Duration::from_millis(100))
        .build();
    let client = TransportClient::new(transport);
    let url = url::Url::parse(&format!("{}/slow", mock_server.uri())).expect("url");

    let err = client.execute_url(url).await.expect_err("timeout");

    let TransportError::Transport(source) = err else {
        panic!("expected a transport error, got {err:?}");
    };
    assert_eq!(source.kind(), SendErrorKind::Timeout);
}

#[tokio::test]
async fn test_connection_refused() {
    // Nothing listens on port 1.
    let client = TransportClient::new(HyperTransport::new());
    let url = url::Url::parse("http://127.0.0.1:1/").expect("url");

    let err = client.execute_url(url).await.expect_err("refused");

    let TransportError::Transport(source) = err else {
        panic!("expected a transport error, got {err:?}");
    };
    assert_eq!(source.kind(), SendErrorKind::Connect);
}

#[tokio::test]
async fn test_http_endpoint_with_environment_switch() {
    let staging = MockServer::start().await;
    let production = MockServer::start().await;

    for (server, name) in [(&staging, "staging"), (&production, "production")] {
        Mock::given(method("GET"))
            .and(path("/env"))
            .respond_with(ResponseTemplate::new(200).set_body_string(name))
            .mount(server)
            .await;
    }

    let endpoint = HttpEndpoint::new(
        |environment: &String| environment.clone(),
        "/env",
        Method::Get,
    )
    .with_header(Header::authorization(Authorization::Bearer("token".to_string())));

    let client = TransportClient::new(HyperTransport::new());
    for (server, name) in [(&staging, "staging"), (&production, "production")] {
        let provider: Provider<HttpEndpoint<String>, _> =
            Provider::new(client.clone(), server.uri());
        let body = provider.request_data(&endpoint).await.expect("body");
        assert_eq!(body, name);
    }
}
