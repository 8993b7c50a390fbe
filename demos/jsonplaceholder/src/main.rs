//! JSONPlaceholder demo
//!
//! Demonstrates the conduit pipeline: a plain fetch, a JSON decoding
//! middleware and a mock middleware answering without network.
//!
//! Run with `--online` to also query <http://jsonplaceholder.typicode.com>.

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]
#![allow(dead_code)]

use std::time::Duration;

use conduit::middleware::{JsonDecode, Logging, Mock, MockHandler};
use conduit::prelude::*;

const BASE_URL: &str = "http://jsonplaceholder.typicode.com";

// ============================================================================
// Data Types
// ============================================================================

/// A blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub body: String,
}

/// Geographic coordinates of an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub lat: String,
    pub lng: String,
}

/// Postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Location,
}

/// Company a user works for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
    pub bs: String,
}

/// A user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub address: Address,
    pub phone: String,
    pub website: String,
    pub company: Company,
}

fn fake_user() -> User {
    User {
        id: 1,
        name: "Leanne Graham".to_string(),
        username: "Bret".to_string(),
        email: "Sincere@april.biz".to_string(),
        address: Address {
            street: "Kulas Light".to_string(),
            suite: "Apt. 556".to_string(),
            city: "Gwenborough".to_string(),
            zipcode: "92998-3874".to_string(),
            geo: Location {
                lat: "-37.3159".to_string(),
                lng: "81.1496".to_string(),
            },
        },
        phone: "1-770-736-8031 x56442".to_string(),
        website: "hildegard.org".to_string(),
        company: Company {
            name: "Romaguera-Crona".to_string(),
            catch_phrase: "Multi-layered client-server neural-net".to_string(),
            bs: "harness real-time e-markets".to_string(),
        },
    }
}

fn fake_post() -> Post {
    Post {
        user_id: 1,
        id: 1,
        title: "my title".to_string(),
        body: "quia et suscipit suscipit recusandae consequuntur".to_string(),
    }
}

// ============================================================================
// Demos
// ============================================================================

/// Plain fetch: the caller decodes the normalized response.
async fn minimal(base_url: &str) -> conduit::Result<Post> {
    let client = Client::with_base_url(base_url)?;
    let response = client
        .fetch("/posts/1", RequestOptions::new())
        .await?
        .into_response()?;
    response.json()
}

/// The JSON middleware turns every response into its body.
async fn json_middleware(base_url: &str) -> conduit::Result<Post> {
    let mut client = Client::with_base_url(base_url)?;
    client.add_middleware(JsonDecode);
    client.get("/posts/1", RequestOptions::new()).await?.into_json()
}

/// Mock handlers answer `/users/*` and `/posts/*` without touching the network.
fn mocked_client(base_url: &str) -> conduit::Result<Client> {
    let user = serde_json::to_value(fake_user())?;
    let post = serde_json::to_value(fake_post())?;

    let mut mock = Mock::new();
    mock.add_handler(
        MockHandler::matching(r"/users/(\w+)")?
            .with_delay(Duration::from_millis(100))
            .respond_json(user),
    )
    .add_handler(
        MockHandler::matching(r"/posts/(\w+)")?
            .with_delay(Duration::from_millis(100))
            .respond_json(post),
    );

    let mut client = Client::with_base_url(base_url)?;
    client
        .add_middleware(Logging::new())
        .add_middleware(mock)
        .add_middleware(JsonDecode);
    Ok(client)
}

async fn mock_demo(client: &Client) -> conduit::Result<(Post, User)> {
    let (post, user) = tokio::join!(
        client.get("/posts/1", RequestOptions::new()),
        client.get("/users/1", RequestOptions::new()),
    );
    Ok((post?.into_json()?, user?.into_json()?))
}

// ============================================================================
// Main: Demonstrate usage
// ============================================================================

#[tokio::main]
async fn main() -> conduit::Result<()> {
    let client = mocked_client(BASE_URL)?;
    let (post, user) = mock_demo(&client).await?;

    println!("=== Mock middleware ===");
    println!("{} {} {} {}", post.id, post.user_id, post.title, post.body);
    println!("{} {} {}", user.id, user.company.name, user.username);

    if std::env::args().any(|arg| arg == "--online") {
        println!("\n=== Minimal fetch ===");
        let post = minimal(BASE_URL).await?;
        println!("{} {} {} {}", post.id, post.user_id, post.title, post.body);

        println!("\n=== JSON middleware ===");
        let post = json_middleware(BASE_URL).await?;
        println!("{} {} {} {}", post.id, post.user_id, post.title, post.body);
    }

    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================
