//! Integration tests for extension composition.
//!
//! These tests exercise the resolution order of a composed client:
//! accumulated methods, own fields, then the extension applied by the
//! view's own `with` call.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use apiful::{
    ApiError, Client, Dynamic, Extension, Function, Methods, RequestOptions, ValidationError,
    Value, create_client,
};
use serde_json::json;

fn constant(text: &'static str) -> Function {
    Function::sync(move |_| Ok(Value::from(text)))
}

async fn call_text(client: &Client) -> Option<String> {
    client
        .call(vec![])
        .await
        .unwrap()
        .as_str()
        .map(str::to_string)
}

#[tokio::test]
async fn handler_survives_later_methods_extension() {
    let client = create_client(RequestOptions::new())
        .with(|_| Extension::handler(constant("A")))
        .with(|_| Extension::methods([("bKey", constant("B"))]));

    assert_eq!(call_text(&client).await.as_deref(), Some("A"));
}

#[tokio::test]
async fn later_handler_replaces_earlier_and_keeps_methods() {
    let client = create_client(RequestOptions::new())
        .with(|_| Extension::handler(constant("A")))
        .with(|_| Extension::methods([("bKey", constant("B"))]))
        .with(|_| Extension::handler(constant("C")));

    assert_eq!(call_text(&client).await.as_deref(), Some("C"));

    let b = client.get("bKey");
    assert!(b.is_callable());
    assert_eq!(b.call(vec![]).await.unwrap().as_str(), Some("B"));
}

#[tokio::test]
async fn last_methods_extension_wins_on_collision() {
    let client = create_client(RequestOptions::new())
        .with(|_| Extension::methods([("foo", constant("first"))]))
        .with(|_| Extension::methods([("foo", constant("second"))]));

    let foo = client.get("foo");
    assert_eq!(foo.call(vec![]).await.unwrap().as_str(), Some("second"));
    assert_eq!(client.method_names(), vec!["foo".to_string()]);
}

#[tokio::test]
async fn adapterless_client_resolves_to_undefined() {
    let client = create_client(RequestOptions::new().with_base_url("https://api.example.com"));
    let result = client.call(vec![Value::from("/anything")]).await.unwrap();
    assert!(result.is_undefined());
}

#[test]
fn builder_receives_the_current_view() {
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);

    create_client(RequestOptions::new().with_base_url("https://api.example.com"))
        .with(|_| Extension::methods([("first", constant("1"))]))
        .with(move |client| {
            assert_eq!(
                client.default_options().base_url.as_deref(),
                Some("https://api.example.com")
            );
            counter.store(client.method_names().len(), Ordering::SeqCst);
            Extension::methods([("second", constant("2"))])
        });

    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn builder_errors_propagate_unchanged() {
    #[derive(Debug, PartialEq)]
    struct Boom(&'static str);

    let client = create_client(RequestOptions::new());
    let err = client
        .try_with(|_| Err::<Extension, _>(Boom("builder failed")))
        .unwrap_err();

    assert_eq!(err, Boom("builder failed"));
    assert!(!client.has_handler());
}

#[test]
fn default_options_are_exposed_verbatim() {
    let options: RequestOptions = serde_json::from_value(json!({
        "baseURL": "https://api.example.com",
        "headers": { "X-Foo": "bar" },
        "retry": 3
    }))
    .unwrap();
    let client = create_client(options);

    let exposed = client.get("defaultOptions");
    assert_eq!(exposed.get("baseURL").as_str(), Some("https://api.example.com"));
    assert_eq!(exposed.get("headers").get("X-Foo").as_str(), Some("bar"));
    assert_eq!(exposed.get("retry").as_i64(), Some(3));
}

#[test]
fn methods_shadow_own_fields() {
    let client = create_client(RequestOptions::new())
        .with(|_| Extension::methods([("defaultOptions", constant("shadow"))]));
    assert!(client.get("defaultOptions").is_callable());
}

/// An extension object exposing a `version` property.
struct Versioned;

impl Dynamic for Versioned {
    fn get(&self, name: &str) -> Option<Value> {
        (name == "version").then(|| Value::from("v1"))
    }

    fn call(&self, _args: Vec<Value>) -> apiful::Reply {
        Box::pin(async { Ok(Value::from("called")) })
    }
}

#[tokio::test]
async fn unknown_reads_delegate_to_the_views_extension() {
    let base = create_client(RequestOptions::new());
    let extended = base.with(|_| Extension::object(Versioned));

    assert_eq!(extended.get("version").as_str(), Some("v1"));
    assert!(extended.get("missing").is_undefined());
    // the base view never applied the object, but shares its handler
    assert!(base.get("version").is_undefined());
    assert_eq!(base.call(vec![]).await.unwrap().as_str(), Some("called"));
}

#[test]
fn writes_follow_the_resolution_order() {
    let client = create_client(RequestOptions::new())
        .with(|_| Extension::methods([("foo", constant("a"))]))
        .with(|_| Extension::Methods(Methods::new().method("bar", constant("b"))));

    // accumulated key
    assert!(client.set("foo", Value::Function(constant("z"))));
    // delegated to the most recent extension, not added to the accumulated table
    assert!(client.set("baz", Value::Function(constant("q"))));
    assert!(!client.method_names().contains(&"baz".to_string()));
    assert!(client.get("baz").is_callable());
    // own field
    assert!(!client.set("defaultOptions", Value::from(1)));
}

#[tokio::test]
async fn clients_nest_as_dynamic_values() {
    let inner = create_client(RequestOptions::new()).with(|_| Extension::handler(constant("inner")));
    let outer = create_client(RequestOptions::new()).with(|_| Extension::object(inner));

    assert_eq!(call_text(&outer).await.as_deref(), Some("inner"));
}

#[tokio::test]
async fn calling_a_methods_bag_directly_is_an_error() {
    let bag = Value::object(Methods::new().method("foo", constant("a")));
    let err = bag.call(vec![]).await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Validation(ValidationError::NotCallable)
    ));
}
