//! HTTP-level integration tests for `/api/projects/{project_id}/tasks`.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_project, create_task, delete, get, post_json, put_json};
use serde_json::json;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_task_defaults_to_todo() {
    let app = common::build_test_app();
    let project_id = create_project(&app, "Sprint 1").await;

    let task = create_task(
        &app,
        &project_id,
        json!({ "title": " Write spec ", "assignee": " Maria " }),
    )
    .await;

    assert_eq!(task["title"], "Write spec");
    assert_eq!(task["assignee"], "Maria");
    assert_eq!(task["description"], "");
    assert_eq!(task["status"], "todo");
    assert_eq!(task["projectId"], project_id);
    assert!(task["id"].as_str().unwrap().starts_with("task_"));
}

#[tokio::test]
async fn create_task_accepts_explicit_status() {
    let app = common::build_test_app();
    let project_id = create_project(&app, "Board").await;

    let body = json!({ "title": "Ship", "status": "in_progress" });
    let task = create_task(&app, &project_id, body).await;
    assert_eq!(task["status"], "in_progress");
}

#[tokio::test]
async fn create_task_with_unknown_status_returns_400() {
    let app = common::build_test_app();
    let project_id = create_project(&app, "Board").await;

    let response = post_json(
        &app,
        &format!("/api/projects/{project_id}/tasks"),
        json!({ "title": "Blocked work", "status": "blocked" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Invalid status. Must be one of: todo, in_progress, done"
    );

    let tasks = body_json(get(&app, &format!("/api/projects/{project_id}/tasks")).await).await;
    assert_eq!(tasks, json!([]));
}

#[tokio::test]
async fn create_task_without_title_returns_400() {
    let app = common::build_test_app();
    let project_id = create_project(&app, "Board").await;

    let response = post_json(
        &app,
        &format!("/api/projects/{project_id}/tasks"),
        json!({ "title": "   ", "status": "blocked" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Task title is required");
}

#[tokio::test]
async fn create_task_validates_before_project_lookup() {
    let app = common::build_test_app();

    let response = post_json(&app, "/api/projects/proj_missing/tasks", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let uri = "/api/projects/proj_missing/tasks";
    let response = post_json(&app, uri, json!({ "title": "t" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Project not found");
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_tasks_in_creation_order() {
    let app = common::build_test_app();
    let project_id = create_project(&app, "Board").await;
    let other_id = create_project(&app, "Other").await;
    create_task(&app, &project_id, json!({ "title": "one" })).await;
    create_task(&app, &other_id, json!({ "title": "elsewhere" })).await;
    create_task(&app, &project_id, json!({ "title": "two" })).await;

    let response = get(&app, &format!("/api/projects/{project_id}/tasks")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let titles: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["one", "two"]);
}

#[tokio::test]
async fn list_tasks_of_missing_project_returns_404() {
    let app = common::build_test_app();
    let response = get(&app, "/api/projects/proj_missing/tasks").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Project not found");
}

#[tokio::test]
async fn get_task_is_scoped_to_its_project() {
    let app = common::build_test_app();
    let owner = create_project(&app, "Owner").await;
    let stranger = create_project(&app, "Stranger").await;
    let task = create_task(&app, &owner, json!({ "title": "Mine" })).await;
    let task_id = task["id"].as_str().unwrap();

    let response = get(&app, &format!("/api/projects/{owner}/tasks/{task_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["title"], "Mine");

    let response = get(&app, &format!("/api/projects/{stranger}/tasks/{task_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Task not found");
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_task_status_only_changes_status() {
    let app = common::build_test_app();
    let project_id = create_project(&app, "Board").await;
    let task = create_task(
        &app,
        &project_id,
        json!({ "title": "Lay out cards", "description": "Tailwind classes", "assignee": "Maria" }),
    )
    .await;
    let task_id = task["id"].as_str().unwrap();

    let response = put_json(
        &app,
        &format!("/api/projects/{project_id}/tasks/{task_id}"),
        json!({ "status": "done" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await;
    assert_eq!(updated["status"], "done");
    assert_eq!(updated["title"], task["title"]);
    assert_eq!(updated["description"], task["description"]);
    assert_eq!(updated["assignee"], task["assignee"]);
    assert_eq!(updated["createdAt"], task["createdAt"]);
}

#[tokio::test]
async fn update_task_with_blank_title_returns_400_and_keeps_title() {
    let app = common::build_test_app();
    let project_id = create_project(&app, "Board").await;
    let task = create_task(&app, &project_id, json!({ "title": "Keep" })).await;
    let task_id = task["id"].as_str().unwrap();
    let uri = format!("/api/projects/{project_id}/tasks/{task_id}");

    let response = put_json(&app, &uri, json!({ "title": "   " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Task title cannot be empty");

    let current = body_json(get(&app, &uri).await).await;
    assert_eq!(current["title"], "Keep");
}

#[tokio::test]
async fn update_task_with_bad_status_returns_400() {
    let app = common::build_test_app();
    let project_id = create_project(&app, "Board").await;
    let task = create_task(&app, &project_id, json!({ "title": "t" })).await;
    let task_id = task["id"].as_str().unwrap();

    let response = put_json(
        &app,
        &format!("/api/projects/{project_id}/tasks/{task_id}"),
        json!({ "status": "blocked" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_missing_task_returns_404() {
    let app = common::build_test_app();
    let project_id = create_project(&app, "Board").await;

    let response = put_json(
        &app,
        &format!("/api/projects/{project_id}/tasks/task_missing"),
        json!({ "status": "done" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Task not found");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_task_removes_exactly_one() {
    let app = common::build_test_app();
    let project_id = create_project(&app, "Board").await;
    let doomed = create_task(&app, &project_id, json!({ "title": "doomed" })).await;
    create_task(&app, &project_id, json!({ "title": "survivor" })).await;
    let doomed_id = doomed["id"].as_str().unwrap();

    let response = delete(&app, &format!("/api/projects/{project_id}/tasks/{doomed_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["title"], "doomed");

    let tasks = body_json(get(&app, &format!("/api/projects/{project_id}/tasks")).await).await;
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "survivor");

    let response = delete(&app, &format!("/api/projects/{project_id}/tasks/{doomed_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
