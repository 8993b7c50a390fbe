//! Integration tests for `Client` over `HyperTransport` using wiremock.

use conduit::{Attachment, Client, RequestOptions};
use serde::{Deserialize, Serialize};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, body_string_contains, header, method, path, query_param},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
}

fn client(server: &MockServer) -> Client {
    Client::with_base_url(server.uri()).expect("client")
}

#[tokio::test]
async fn test_get_request() {
    let mock_server = MockServer::start().await;

    let user = User {
        id: 1,
        name: "Alice".to_string(),
    };

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&user))
        .mount(&mock_server)
        .await;

    let response = client(&mock_server)
        .get("/users/1", RequestOptions::new())
        .await
        .expect("reply")
        .into_response()
        .expect("response");

    assert!(response.ok());
    assert_eq!(response.status(), 200);
    assert_eq!(response.status_text(), "OK");
    assert_eq!(response.content_type(), Some("application/json"));

    let body: Option<User> = response.data_as().expect("data");
    assert_eq!(body, Some(user));
}

#[tokio::test]
async fn test_post_request_with_json_body() {
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

    let data = serde_json::to_value(&input).expect("value");
    let reply = client(&mock_server)
        .post("/users", Some(data), None, RequestOptions::new())
        .await
        .expect("reply");

    let response = reply.into_response().expect("response");
    assert_eq!(response.status(), 201);
    assert_eq!(response.json::<User>().expect("json"), output);
}

#[tokio::test]
async fn test_error_status_is_a_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"error": "not found"})),
        )
        .mount(&mock_server)
        .await;

    let response = client(&mock_server)
        .get("/missing", RequestOptions::new())
        .await
        .expect("non-2xx resolves")
        .into_response()
        .expect("response");

    assert!(!response.ok());
    assert!(response.has_error());
    assert!(response.is_client_error());
    assert_eq!(response.status_text(), "Not Found");
    assert_eq!(
        response.data().expect("data"),
        Some(serde_json::json!({"error": "not found"}))
    );
}

#[tokio::test]
async fn test_query_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("userId", "1"))
        .and(query_param("q", "rust lang"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let response = client(&mock_server)
        .get(
            "/posts",
            RequestOptions::new().query("userId", "1").query("q", "rust lang"),
        )
        .await
        .expect("reply")
        .into_response()
        .expect("response");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_absolute_url_ignores_base_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/posts/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url("http://unreachable.invalid").expect("client");
    let response = client
        .delete(
            format!("{}/posts/1", mock_server.uri()),
            None,
            RequestOptions::new(),
        )
        .await
        .expect("reply")
        .into_response()
        .expect("response");

    assert_eq!(response.status(), 204);
    assert!(!response.has_data());
}

#[tokio::test]
async fn test_multipart_upload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/avatars/1"))
        .and(body_string_contains("name=\"caption\""))
        .and(body_string_contains("filename=\"avatar.png\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"stored": true})))
        .mount(&mock_server)
        .await;

    let files = vec![Attachment::file("avatar", "avatar.png", vec![0x89, b'P', b'N', b'G'])];
    let response = client(&mock_server)
        .put(
            "/avatars/1",
            Some(serde_json::json!({"caption": "me"})),
            Some(files),
            RequestOptions::new(),
        )
        .await
        .expect("reply")
        .into_response()
        .expect("response");

    assert!(response.ok());

    let requests = mock_server.received_requests().await.expect("recording");
    let content_type = requests
        .first()
        .and_then(|request| request.headers.get("content-type"))
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
}

#[tokio::test]
async fn test_text_body_without_decoder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/readme"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("hello", "text/plain"))
        .mount(&mock_server)
        .await;

    let response = client(&mock_server)
        .get("/readme", RequestOptions::new())
        .await
        .expect("reply")
        .into_response()
        .expect("response");

    assert_eq!(response.text(), "hello");
    let err = response.data().expect_err("no text decoder");
    assert!(err.is_unsupported_content_type());
}

#[tokio::test]
async fn test_custom_decoder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/readme"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("hello", "text/plain"))
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .decoder("text/plain", |body| Ok(serde_json::Value::from(body.to_uppercase())))
        .build()
        .expect("client");

    let response = client
        .get("/readme", RequestOptions::new())
        .await
        .expect("reply")
        .into_response()
        .expect("response");

    assert_eq!(response.data().expect("data"), Some(serde_json::json!("HELLO")));
}

#[tokio::test]
async fn test_connection_refused() {
    let client = Client::with_base_url("http://127.0.0.1:9").expect("client");

    let err = client
        .get("/nothing", RequestOptions::new())
        .await
        .expect_err("nothing listens on the discard port");

    assert!(err.is_connection());
}
