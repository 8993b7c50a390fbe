//! End-to-end pipeline tests over an in-memory transport.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use assert2::{check, let_assert};
use conduit::middleware::{JsonDecode, Mock, MockHandler};
use conduit::{
    Client, Method, Middleware, Next, RawResponse, Reply, RequestOptions, Transport, middleware_fn,
    transport_fn,
};
use serde_json::{Value, json};

type Journal = Arc<Mutex<Vec<String>>>;

fn push(journal: &Journal, entry: impl Into<String>) {
    journal
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(entry.into());
}

fn entries(journal: &Journal) -> Vec<String> {
    journal
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Transport answering `body` with `content_type`, journaling `METHOD url`.
fn transport(journal: &Journal, status: u16, content_type: &str, body: &str) -> impl Transport {
    let journal = Arc::clone(journal);
    let headers = HashMap::from([("Content-Type".to_string(), content_type.to_string())]);
    let body = body.to_string();
    transport_fn(move |url, options| {
        push(&journal, format!("{} {url}", options.method()));
        let raw = RawResponse::new(status, headers.clone(), body.clone());
        async move { Ok(raw) }
    })
}

fn json_client(journal: &Journal) -> Client {
    Client::builder()
        .base_url("http://api.test")
        .transport(transport(journal, 200, "application/json", r#"{"id":1}"#))
        .build()
        .expect("client")
}

fn named(name: &'static str, journal: &Journal) -> impl Middleware {
    let journal = Arc::clone(journal);
    middleware_fn(move |options, next: Next| {
        push(&journal, name);
        next.run(options)
    })
}

#[tokio::test]
async fn test_chain_runs_in_registration_order() {
    let journal = Journal::default();
    let mut client = json_client(&journal);
    client
        .add_middleware(named("m1", &journal))
        .add_middleware(named("m2", &journal))
        .add_middleware(named("m3", &journal));

    client
        .get("/posts/1", RequestOptions::new())
        .await
        .expect("reply");

    insta::assert_snapshot!(entries(&journal).join(" -> "), @"m1 -> m2 -> m3 -> GET http://api.test/posts/1");
}

#[tokio::test]
async fn test_short_circuit_skips_the_rest() {
    let journal = Journal::default();
    let mut client = json_client(&journal);
    client
        .add_middleware(named("m1", &journal))
        .add_middleware(middleware_fn(|_options, _next| async {
            Ok(Reply::Data(json!("cached")))
        }))
        .add_middleware(named("m3", &journal));

    let reply = client
        .get("/posts/1", RequestOptions::new())
        .await
        .expect("reply");

    check!(entries(&journal) == ["m1"]);
    check!(reply.into_json::<String>().expect("data") == "cached");
}

#[tokio::test]
async fn test_concurrent_fetches_are_isolated() {
    let journal = Journal::default();
    let mut client = json_client(&journal);
    client.add_middleware(middleware_fn(|options: RequestOptions, next: Next| async move {
        let marker = options.url().to_string();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let reply = next.run(options.header("X-Marker", marker.clone())).await?;
        let response = reply.into_response()?;
        Ok(Reply::Data(json!({"marker": marker, "status": response.status()})))
    }));
    client.add_middleware(middleware_fn(|options: RequestOptions, next: Next| {
        let marker = options.header_value("X-Marker").unwrap_or_default().to_string();
        let url = options.url().to_string();
        assert_eq!(marker, url);
        next.run(options)
    }));

    let (a, b, c) = tokio::join!(
        client.get("/a", RequestOptions::new()),
        client.get("/b", RequestOptions::new()),
        client.get("/c", RequestOptions::new()),
    );

    check!(a.expect("a").into_json::<Value>().expect("a") == json!({"marker": "/a", "status": 200}));
    check!(b.expect("b").into_json::<Value>().expect("b") == json!({"marker": "/b", "status": 200}));
    check!(c.expect("c").into_json::<Value>().expect("c") == json!({"marker": "/c", "status": 200}));

    let mut seen = entries(&journal);
    seen.sort();
    check!(
        seen == [
            "GET http://api.test/a",
            "GET http://api.test/b",
            "GET http://api.test/c"
        ]
    );
}

#[tokio::test]
async fn test_invalid_verb_usage_fails_before_the_chain() {
    let journal = Journal::default();
    let mut client = json_client(&journal);
    client.add_middleware(named("m1", &journal));

    let_assert!(
        Err(err) = client
            .get("/posts", RequestOptions::new().with_data(json!({"a": 1})))
            .await
    );
    check!(err.is_invalid_argument());
    check!(entries(&journal).is_empty());

    let reply = client
        .post("/posts", Some(json!({"a": 1})), None, RequestOptions::new())
        .await
        .expect("post reaches the terminal");
    check!(reply.as_response().is_some());
    check!(entries(&journal) == ["m1", "POST http://api.test/posts"]);
}

#[tokio::test]
async fn test_configure_between_requests() {
    let journal = Journal::default();
    let mut client = Client::builder()
        .transport(transport(&journal, 200, "", ""))
        .build()
        .expect("client");

    client.configure(|config| {
        config.with_base_url("http://one.test");
    });
    client.get("/x", RequestOptions::new()).await.expect("one");

    client.configure(|config| {
        config.with_base_url("http://two.test").with_method(Method::Delete);
    });
    client.fetch("/x", RequestOptions::new()).await.expect("two");

    check!(entries(&journal) == ["GET http://one.test/x", "DELETE http://two.test/x"]);
}

#[tokio::test]
async fn test_empty_content_type_has_no_data() {
    let journal = Journal::default();
    let client = Client::builder()
        .base_url("http://api.test")
        .transport(transport(&journal, 200, "", "whatever"))
        .build()
        .expect("client");

    let response = client
        .get("/raw", RequestOptions::new())
        .await
        .expect("reply")
        .into_response()
        .expect("response");

    check!(response.has_data());
    check!(response.data().expect("no data").is_none());
    check!(response.text() == "whatever");
}

#[tokio::test]
async fn test_invalid_json_is_a_parse_error() {
    let journal = Journal::default();
    let client = Client::builder()
        .base_url("http://api.test")
        .transport(transport(&journal, 200, "application/json; charset=utf-8", "{"))
        .build()
        .expect("client");

    let response = client
        .get("/broken", RequestOptions::new())
        .await
        .expect("reply")
        .into_response()
        .expect("response");

    let_assert!(Err(err) = response.data());
    check!(err.is_parse());
    check!(err.to_string().starts_with("response body can't be parsed"));
}

#[tokio::test]
async fn test_no_content() {
    let journal = Journal::default();
    let client = Client::builder()
        .base_url("http://api.test")
        .transport(transport(&journal, 204, "", ""))
        .middleware(JsonDecode)
        .build()
        .expect("client");

    let reply = client
        .delete("/posts/1", None, RequestOptions::new())
        .await
        .expect("reply");

    check!(reply.into_json::<Value>().expect("null") == Value::Null);
}

#[tokio::test]
async fn test_json_middleware_registered_last() {
    let journal = Journal::default();
    let mut client = json_client(&journal);
    client
        .add_middleware(middleware_fn(|options, next: Next| async move {
            let reply = next.run(options).await?;
            assert!(matches!(reply, Reply::Data(_)));
            Ok(reply)
        }))
        .add_middleware(JsonDecode);

    let reply = client
        .get("/posts/1", RequestOptions::new())
        .await
        .expect("reply");

    let_assert!(Reply::Data(data) = reply);
    check!(data == json!({"id": 1}));
}

#[tokio::test(start_paused = true)]
async fn test_mock_short_circuits_after_delay() {
    let journal = Journal::default();
    let mut client = json_client(&journal);
    client.add_middleware(
        Mock::new().with_handler(
            MockHandler::matching(r"/users/\w+")
                .expect("regex")
                .with_delay(Duration::from_millis(100))
                .respond_with(|options| json!({"login": options.url().trim_start_matches("/users/")})),
        ),
    );

    let start = tokio::time::Instant::now();
    let reply = client
        .get("/users/octocat", RequestOptions::new())
        .await
        .expect("reply");

    check!(start.elapsed() >= Duration::from_millis(100));
    check!(reply.into_json::<Value>().expect("payload") == json!({"login": "octocat"}));
    check!(entries(&journal).is_empty());

    client
        .get("/posts/1", RequestOptions::new())
        .await
        .expect("forwarded");
    check!(entries(&journal) == ["GET http://api.test/posts/1"]);
}
