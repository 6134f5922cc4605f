//! Integration tests for the built-in extensions.
//!
//! Requests go either to a wiremock server through the default reqwest
//! transport, or to a recording transport that captures what would have
//! been sent.

use std::sync::{Arc, Mutex};

use apiful::extensions::{fetch, fetch_with, openapi, openapi_with, route_builder, route_builder_with};
use apiful::{
    ApiError, BoxFuture, ClientError, RequestOptions, RestMethod, Transport, Value, create_client,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct Recording {
    requests: Mutex<Vec<(String, RequestOptions)>>,
}

impl Recording {
    fn last(&self) -> (String, RequestOptions) {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

impl Transport for Recording {
    fn fetch(&self, target: &str, options: RequestOptions) -> BoxFuture<'_, Result<Value, ApiError>> {
        self.requests
            .lock()
            .unwrap()
            .push((target.to_string(), options));
        Box::pin(async { Ok(Value::from(json!({ "ok": true }))) })
    }
}

fn defaults(base: &str) -> RequestOptions {
    RequestOptions::new()
        .with_base_url(base)
        .with_header("X-Foo", "bar")
}

#[tokio::test]
async fn fetch_sends_default_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/echo/static/constant"))
        .and(header("X-Foo", "bar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": "foo" })))
        .mount(&server)
        .await;

    let client = create_client(defaults(&server.uri())).try_with(fetch()).unwrap();
    let response = client
        .call(vec![Value::from("/echo/static/constant")])
        .await
        .unwrap();

    assert_eq!(response.get("value").as_str(), Some("foo"));
}

#[tokio::test]
async fn fetch_reports_http_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let client = create_client(defaults(&server.uri())).try_with(fetch()).unwrap();
    let err = client.call(vec![Value::from("/missing")]).await.unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert!(matches!(
        err,
        ApiError::Client(ClientError::HttpStatus { status: 404, .. })
    ));
}

#[tokio::test]
async fn fetch_requires_a_target() {
    let transport = Arc::new(Recording::default());
    let client = create_client(RequestOptions::new()).with(fetch_with(transport));
    let err = client.call(vec![]).await.unwrap_err();
    assert!(err.to_string().contains("request target"));
}

#[tokio::test]
async fn route_builder_get_sends_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/echo/query"))
        .and(query_param("value", "bar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": "bar" })))
        .mount(&server)
        .await;

    let client = create_client(defaults(&server.uri()))
        .try_with(route_builder())
        .unwrap();
    let response = client
        .get("echo")
        .get("query")
        .get("get")
        .call(vec![Value::from(json!({ "value": "bar" }))])
        .await
        .unwrap();

    assert_eq!(response.get("value").as_str(), Some("bar"));
}

#[tokio::test]
async fn route_builder_post_sends_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/echo/request"))
        .and(body_json(json!({ "foo": "bar" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "method": "POST" })))
        .mount(&server)
        .await;

    let client = create_client(defaults(&server.uri()))
        .try_with(route_builder())
        .unwrap();
    let response = client
        .get("echo")
        .get("request")
        .get("post")
        .call(vec![Value::from(json!({ "foo": "bar" }))])
        .await
        .unwrap();

    assert_eq!(response.get("method").as_str(), Some("POST"));
}

#[tokio::test]
async fn route_builder_segments_from_calls() {
    let transport = Arc::new(Recording::default());
    let client = create_client(RequestOptions::new().with_base_url("https://api.example.com"))
        .with(route_builder_with(transport.clone()));

    let route = client
        .call(vec![Value::from("users"), Value::from(42)])
        .await
        .unwrap();
    route
        .get("DELETE")
        .call(vec![Value::Undefined, Value::from(json!({ "headers": { "X-Trace": "1" } }))])
        .await
        .unwrap();

    let (target, options) = transport.last();
    assert_eq!(target, "https://api.example.com/users/42");
    assert_eq!(options.method, Some(RestMethod::Delete));
    assert_eq!(options.body, None);
    assert_eq!(options.headers["X-Trace"], "1");
}

#[tokio::test]
async fn route_builder_without_base_starts_at_root() {
    let transport = Arc::new(Recording::default());
    let client = create_client(RequestOptions::new()).with(route_builder_with(transport.clone()));

    client
        .get("health")
        .get("get")
        .call(vec![])
        .await
        .unwrap();

    assert_eq!(transport.last().0, "/health");
}

#[tokio::test]
async fn openapi_resolves_path_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pets/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 42, "name": "Rex" })))
        .mount(&server)
        .await;

    let client = create_client(defaults(&server.uri())).try_with(openapi()).unwrap();
    let pet = client
        .call(vec![
            Value::from("/pets/{petId}"),
            Value::from(json!({ "path": { "petId": 42 } })),
        ])
        .await
        .unwrap();

    assert_eq!(pet.get("name").as_str(), Some("Rex"));
}

#[tokio::test]
async fn openapi_passes_other_options_through() {
    let transport = Arc::new(Recording::default());
    let client = create_client(defaults("https://api.example.com"))
        .with(openapi_with(transport.clone()));

    client
        .call(vec![
            Value::from("/stores/{storeId}/pets/{petId}"),
            Value::from(json!({
                "method": "POST",
                "path": { "storeId": "a b" },
                "body": { "name": "Rex" },
                "retry": 2
            })),
        ])
        .await
        .unwrap();

    let (target, options) = transport.last();
    assert_eq!(target, "/stores/a%20b/pets/{petId}");
    assert_eq!(options.method, Some(RestMethod::Post));
    assert_eq!(options.body, Some(json!({ "name": "Rex" })));
    assert_eq!(options.headers["X-Foo"], "bar");
    assert_eq!(options.extra["retry"], json!(2));
    assert!(!options.extra.contains_key("path"));
}
