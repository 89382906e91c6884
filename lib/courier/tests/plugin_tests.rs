//! Integration tests for the ready-made plugins.

use courier::plugins::{
    BasicAuthPlugin, BearerAuthPlugin, HeaderPlugin, LoggingPlugin, MetricsPlugin,
};
use courier::{HyperTransport, Method, Request, TransportClient};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn get(mock_server: &MockServer, route: &str) -> Request {
    let url = url::Url::parse(&format!("{}{route}", mock_server.uri())).expect("url");
    Request::builder(Method::Get, url).build()
}

/// Test that the bearer auth plugin adds the Authorization header.
#[tokio::test]
async fn test_bearer_auth_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/protected"))
        .and(header("Authorization", "Bearer my-secret-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"user": "alice"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TransportClient::builder(HyperTransport::new())
        .plugin(BearerAuthPlugin::new("my-secret-token").expect("valid token"))
        .build();

    client
        .execute(get(&mock_server, "/protected"))
        .await
        .expect("authorized");
}

/// Test that the basic auth plugin adds the Authorization header.
#[tokio::test]
async fn test_basic_auth_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/protected"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TransportClient::builder(HyperTransport::new())
        .plugin(BasicAuthPlugin::new("user", "pass").expect("valid credentials"))
        .build();

    client
        .execute(get(&mock_server, "/protected"))
        .await
        .expect("authorized");
}

/// Test that later plugins override headers set by earlier ones.
#[tokio::test]
async fn test_plugins_apply_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/versioned"))
        .and(header("x-api-version", "2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TransportClient::builder(HyperTransport::new())
        .plugin(HeaderPlugin::new("x-api-version", "1").expect("valid header"))
        .plugin(HeaderPlugin::new("x-api-version", "2").expect("valid header"))
        .build();

    client
        .execute(get(&mock_server, "/versioned"))
        .await
        .expect("success");
}

/// Test that observing plugins do not change the outcome.
#[tokio::test]
async fn test_logging_and_metrics_plugins() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/observed"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = TransportClient::builder(HyperTransport::new())
        .plugin(LoggingPlugin::debug())
        .plugin(MetricsPlugin::new())
        .build();

    let err = client
        .execute(get(&mock_server, "/observed"))
        .await
        .expect_err("500");

    assert_eq!(err.status().map(|status| status.code()), Some(500));
}
