//! Workspace membership, roles, invite codes and cascading deletes.
//!
//! Run with: `cargo test -p teamspace-api --test workspaces_test`

mod helpers;

use axum_test::multipart::MultipartForm;
use helpers::auth::register_test_user;
use helpers::workspaces::{
    create_project, create_task, create_workspace, join_workspace, list_members, member_id,
    shared_workspace,
};
use helpers::{api_path, setup_test_app};
use serde_json::{json, Value};
use std::time::Duration;
use uuid::Uuid;

#[tokio::test]
async fn test_creator_becomes_admin() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = register_test_user(client, "Ada").await;

    let workspace = create_workspace(client, &user, "Acme").await;
    assert_eq!(workspace["name"], "Acme");
    assert_eq!(workspace["user_id"], user.id.to_string());
    assert_eq!(workspace["invite_code"].as_str().unwrap().len(), 10);

    let members = list_members(client, &user, workspace["id"].as_str().unwrap()).await;
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["role"], "ADMIN");
    assert_eq!(members[0]["email"], user.email);
}

#[tokio::test]
async fn test_create_requires_a_name() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = register_test_user(client, "Ada").await;

    let response = client
        .post(&api_path("/workspaces"))
        .add_header("Authorization", user.bearer())
        .multipart(MultipartForm::new().add_text("name", "   "))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_list_only_shows_joined_workspaces() {
    let app = setup_test_app().await;
    let client = app.client();
    let ada = register_test_user(client, "Ada").await;
    let bob = register_test_user(client, "Bob").await;

    create_workspace(client, &ada, "First").await;
    create_workspace(client, &ada, "Second").await;
    create_workspace(client, &bob, "Bobs").await;

    let response = client
        .get(&api_path("/workspaces"))
        .add_header("Authorization", ada.bearer())
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"]["total"], 2);
    let mut names: Vec<&str> = body["data"]["documents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["name"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["First", "Second"]);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let app = setup_test_app().await;
    let client = app.client();
    let ada = register_test_user(client, "Ada").await;

    create_workspace(client, &ada, "Older").await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    create_workspace(client, &ada, "Newer").await;

    let response = client
        .get(&api_path("/workspaces"))
        .add_header("Authorization", ada.bearer())
        .await;
    let documents = &response.json::<Value>()["data"]["documents"];
    assert_eq!(documents[0]["name"], "Newer");
    assert_eq!(documents[1]["name"], "Older");
}

#[tokio::test]
async fn test_non_member_is_unauthorized() {
    let app = setup_test_app().await;
    let client = app.client();
    let ada = register_test_user(client, "Ada").await;
    let eve = register_test_user(client, "Eve").await;
    let workspace = create_workspace(client, &ada, "Acme").await;
    let id = workspace["id"].as_str().unwrap();

    for path in [
        format!("/workspaces/{}", id),
        format!("/members?workspace_id={}", id),
        format!("/projects?workspace_id={}", id),
        format!("/tasks?workspace_id={}", id),
    ] {
        let response = client
            .get(&api_path(&path))
            .add_header("Authorization", eve.bearer())
            .await;
        assert_eq!(response.status_code(), 401, "GET {}", path);
        assert_eq!(response.json::<Value>()["code"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn test_info_is_visible_to_any_signed_in_user() {
    let app = setup_test_app().await;
    let client = app.client();
    let ada = register_test_user(client, "Ada").await;
    let eve = register_test_user(client, "Eve").await;
    let workspace = create_workspace(client, &ada, "Acme").await;

    let response = client
        .get(&api_path(&format!(
            "/workspaces/{}/info",
            workspace["id"].as_str().unwrap()
        )))
        .add_header("Authorization", eve.bearer())
        .await;

    assert_eq!(response.status_code(), 200);
    let data = &response.json::<Value>()["data"];
    assert_eq!(data["name"], "Acme");
    assert!(data.get("invite_code").is_none());
}

#[tokio::test]
async fn test_join_with_correct_code_adds_one_membership() {
    let app = setup_test_app().await;
    let client = app.client();
    let ada = register_test_user(client, "Ada").await;
    let bob = register_test_user(client, "Bob").await;
    let workspace = create_workspace(client, &ada, "Acme").await;
    let id = workspace["id"].as_str().unwrap();
    let code = workspace["invite_code"].as_str().unwrap();

    let response = join_workspace(client, &bob, id, code).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["data"]["id"], id);

    let again = join_workspace(client, &bob, id, code).await;
    assert_eq!(again.status_code(), 400);
    assert_eq!(again.json::<Value>()["error"], "Already a member");

    let workspace_id: Uuid = id.parse().unwrap();
    assert_eq!(app.store.member_count(workspace_id).await, 2);

    let members = list_members(client, &bob, id).await;
    let bob_row = members
        .iter()
        .find(|m| m["user_id"] == bob.id.to_string())
        .unwrap();
    assert_eq!(bob_row["role"], "MEMBER");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_joins_add_one_membership() {
    let app = setup_test_app().await;
    let client = app.client();
    let ada = register_test_user(client, "Ada").await;
    let bob = register_test_user(client, "Bob").await;
    let workspace = create_workspace(client, &ada, "Acme").await;
    let id = workspace["id"].as_str().unwrap();
    let code = workspace["invite_code"].as_str().unwrap();

    let (first, second) = tokio::join!(
        join_workspace(client, &bob, id, code),
        join_workspace(client, &bob, id, code),
    );

    let mut statuses = vec![first.status_code().as_u16(), second.status_code().as_u16()];
    statuses.sort();
    assert_eq!(statuses, vec![200, 400]);
    let rejected = if first.status_code() == 400 { first } else { second };
    assert_eq!(rejected.json::<Value>()["error"], "Already a member");

    let workspace_id: Uuid = id.parse().unwrap();
    assert_eq!(app.store.member_count(workspace_id).await, 2);
}

#[tokio::test]
async fn test_join_with_wrong_code_changes_nothing() {
    let app = setup_test_app().await;
    let client = app.client();
    let ada = register_test_user(client, "Ada").await;
    let bob = register_test_user(client, "Bob").await;
    let workspace = create_workspace(client, &ada, "Acme").await;
    let id = workspace["id"].as_str().unwrap();

    let response = join_workspace(client, &bob, id, "wrong!").await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["error"], "Invalid invite code");
    assert_eq!(app.store.member_count(id.parse().unwrap()).await, 1);
}

#[tokio::test]
async fn test_join_unknown_workspace_is_not_found() {
    let app = setup_test_app().await;
    let client = app.client();
    let bob = register_test_user(client, "Bob").await;

    let response = join_workspace(client, &bob, &Uuid::new_v4().to_string(), "abcdef").await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_admin_only_operations_reject_members() {
    let app = setup_test_app().await;
    let client = app.client();
    let ada = register_test_user(client, "Ada").await;
    let bob = register_test_user(client, "Bob").await;
    let workspace = shared_workspace(client, &ada, &bob).await;
    let id = workspace["id"].as_str().unwrap();

    let rename = client
        .patch(&api_path(&format!("/workspaces/{}", id)))
        .add_header("Authorization", bob.bearer())
        .multipart(MultipartForm::new().add_text("name", "Taken over"))
        .await;
    assert_eq!(rename.status_code(), 401);

    let reset = client
        .post(&api_path(&format!("/workspaces/{}/reset-invite-code", id)))
        .add_header("Authorization", bob.bearer())
        .await;
    assert_eq!(reset.status_code(), 401);

    let delete = client
        .delete(&api_path(&format!("/workspaces/{}", id)))
        .add_header("Authorization", bob.bearer())
        .await;
    assert_eq!(delete.status_code(), 401);

    // Members can still read the workspace
    let read = client
        .get(&api_path(&format!("/workspaces/{}", id)))
        .add_header("Authorization", bob.bearer())
        .await;
    assert_eq!(read.status_code(), 200);
    assert_eq!(read.json::<Value>()["data"]["name"], "Shared");
}

#[tokio::test]
async fn test_admin_can_rename() {
    let app = setup_test_app().await;
    let client = app.client();
    let ada = register_test_user(client, "Ada").await;
    let workspace = create_workspace(client, &ada, "Acme").await;

    let response = client
        .patch(&api_path(&format!(
            "/workspaces/{}",
            workspace["id"].as_str().unwrap()
        )))
        .add_header("Authorization", ada.bearer())
        .multipart(MultipartForm::new().add_text("name", "Acme Corp"))
        .await;

    assert_eq!(response.status_code(), 200);
    let data = &response.json::<Value>()["data"];
    assert_eq!(data["name"], "Acme Corp");
    assert_eq!(data["invite_code"], workspace["invite_code"]);
}

#[tokio::test]
async fn test_reset_invalidates_old_code() {
    let app = setup_test_app().await;
    let client = app.client();
    let ada = register_test_user(client, "Ada").await;
    let bob = register_test_user(client, "Bob").await;
    let workspace = create_workspace(client, &ada, "Acme").await;
    let id = workspace["id"].as_str().unwrap();
    let old_code = workspace["invite_code"].as_str().unwrap();

    let response = client
        .post(&api_path(&format!("/workspaces/{}/reset-invite-code", id)))
        .add_header("Authorization", ada.bearer())
        .await;
    assert_eq!(response.status_code(), 200);
    let new_code = response.json::<Value>()["data"]["invite_code"]
        .as_str()
        .unwrap()
        .to_string();
    assert_ne!(new_code, old_code);

    let stale = join_workspace(client, &bob, id, old_code).await;
    assert_eq!(stale.status_code(), 400);

    let fresh = join_workspace(client, &bob, id, &new_code).await;
    assert_eq!(fresh.status_code(), 200);
}

#[tokio::test]
async fn test_delete_cascades_to_members_projects_and_tasks() {
    let app = setup_test_app().await;
    let client = app.client();
    let ada = register_test_user(client, "Ada").await;
    let bob = register_test_user(client, "Bob").await;
    let workspace = shared_workspace(client, &ada, &bob).await;
    let id = workspace["id"].as_str().unwrap();
    let workspace_id: Uuid = id.parse().unwrap();

    let project = create_project(client, &ada, id, "Launch").await;
    let assignee = member_id(client, &bob, id).await;
    let task = create_task(
        client,
        &ada,
        json!({
            "name": "Write docs",
            "workspace_id": id,
            "project_id": project["id"],
            "assignee_id": assignee,
            "status": "TODO",
            "due_date": "2030-01-01",
        }),
    )
    .await;
    assert_eq!(task.status_code(), 201);
    assert_eq!(app.store.content_count(workspace_id).await, (1, 1));

    let response = client
        .delete(&api_path(&format!("/workspaces/{}", id)))
        .add_header("Authorization", ada.bearer())
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["data"]["id"], id);

    assert_eq!(app.store.member_count(workspace_id).await, 0);
    assert_eq!(app.store.content_count(workspace_id).await, (0, 0));

    let gone = client
        .get(&api_path(&format!("/workspaces/{}", id)))
        .add_header("Authorization", ada.bearer())
        .await;
    assert_eq!(gone.status_code(), 401);
}
