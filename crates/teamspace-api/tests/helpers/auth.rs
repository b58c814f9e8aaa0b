use axum_test::TestServer;
use serde_json::{json, Value};
use uuid::Uuid;

use super::api_path;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// A registered user and the session token issued at registration.
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Register a user through the API and keep the returned session token.
pub async fn register_test_user(client: &TestServer, name: &str) -> TestUser {
    let email = format!("{}@example.com", name.to_lowercase());
    let response = client
        .post(&api_path("/auth/register"))
        .json(&json!({
            "name": name,
            "email": email,
            "password": TEST_PASSWORD,
        }))
        .await;
    assert_eq!(response.status_code(), 201, "register failed: {}", response.text());

    let body: Value = response.json();
    TestUser {
        id: body["data"]["user"]["id"]
            .as_str()
            .and_then(|id| id.parse().ok())
            .expect("user id in register response"),
        email,
        token: body["data"]["token"]
            .as_str()
            .expect("token in register response")
            .to_string(),
    }
}
