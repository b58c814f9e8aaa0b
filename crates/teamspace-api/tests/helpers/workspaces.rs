//! Shortcuts for building workspaces, projects and tasks through the API.

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};

use super::api_path;
use super::auth::TestUser;
use super::fixtures::create_minimal_png;

pub fn png_part(file_name: &str) -> Part {
    Part::bytes(create_minimal_png())
        .file_name(file_name)
        .mime_type("image/png")
}

/// Create a workspace without an image and return its `data` object.
pub async fn create_workspace(client: &TestServer, user: &TestUser, name: &str) -> Value {
    let response = client
        .post(&api_path("/workspaces"))
        .add_header("Authorization", user.bearer())
        .multipart(MultipartForm::new().add_text("name", name))
        .await;
    assert_eq!(response.status_code(), 201, "create workspace failed: {}", response.text());
    response.json::<Value>()["data"].clone()
}

pub async fn join_workspace(
    client: &TestServer,
    user: &TestUser,
    workspace_id: &str,
    code: &str,
) -> TestResponse {
    client
        .post(&api_path(&format!("/workspaces/{}/join", workspace_id)))
        .add_header("Authorization", user.bearer())
        .json(&json!({ "code": code }))
        .await
}

/// Create a workspace owned by `admin` and have `member` join it.
pub async fn shared_workspace(client: &TestServer, admin: &TestUser, member: &TestUser) -> Value {
    let workspace = create_workspace(client, admin, "Shared").await;
    let response = join_workspace(
        client,
        member,
        workspace["id"].as_str().unwrap(),
        workspace["invite_code"].as_str().unwrap(),
    )
    .await;
    assert_eq!(response.status_code(), 200, "join failed: {}", response.text());
    workspace
}

pub async fn create_project(
    client: &TestServer,
    user: &TestUser,
    workspace_id: &str,
    name: &str,
) -> Value {
    let response = client
        .post(&api_path("/projects"))
        .add_header("Authorization", user.bearer())
        .multipart(
            MultipartForm::new()
                .add_text("name", name)
                .add_text("workspace_id", workspace_id),
        )
        .await;
    assert_eq!(response.status_code(), 201, "create project failed: {}", response.text());
    response.json::<Value>()["data"].clone()
}

/// Member rows of a workspace, as seen by `user`.
pub async fn list_members(client: &TestServer, user: &TestUser, workspace_id: &str) -> Vec<Value> {
    let response = client
        .get(&api_path("/members"))
        .add_query_param("workspace_id", workspace_id)
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.status_code(), 200, "list members failed: {}", response.text());
    response.json::<Value>()["data"]["documents"]
        .as_array()
        .cloned()
        .unwrap_or_default()
}

/// Member id of `user` inside a workspace.
pub async fn member_id(client: &TestServer, user: &TestUser, workspace_id: &str) -> String {
    list_members(client, user, workspace_id)
        .await
        .into_iter()
        .find(|m| m["user_id"] == user.id.to_string())
        .and_then(|m| m["id"].as_str().map(str::to_string))
        .expect("caller is a member")
}

pub async fn create_task(client: &TestServer, user: &TestUser, body: Value) -> TestResponse {
    client
        .post(&api_path("/tasks"))
        .add_header("Authorization", user.bearer())
        .json(&body)
        .await
}
