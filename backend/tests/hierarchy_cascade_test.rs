//! Tests for the deletion endpoints and their cascade semantics.

mod common;

use axum::http::{Method, StatusCode};
use classnest_backend::database::models::RoleName;
use common::{TestApp, json_request};
use serde_json::json;

struct Tree {
    admin_id: String,
    tutor_id: String,
    student_ids: Vec<String>,
}

/// Builds admin → tutor → {student...} through the real endpoints, so every
/// ownership edge exists exactly as production would create it.
async fn build_tree(app: &TestApp, admin_email: &str, student_count: usize) -> Tree {
    let admin_id = app
        .seed_user("Admin", admin_email, "secret-pass-1", RoleName::Admin)
        .await;
    let admin_token = app.access_token_for(&admin_id).await;

    let (status, tutor) = app
        .request(json_request(
            Method::POST,
            "/api/users/hierarchy",
            Some(&admin_token),
            Some(json!({
                "name": "Tutor",
                "email": format!("tutor-of-{admin_email}"),
                "password": "secret-pass-1"
            })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let tutor_id = tutor["id"].as_str().unwrap().to_string();

    let tutor_token = app.access_token_for(&tutor_id).await;
    let mut student_ids = Vec::new();
    for n in 0..student_count {
        let (status, student) = app
            .request(json_request(
                Method::POST,
                "/api/users/tutor-student",
                Some(&tutor_token),
                Some(json!({
                    "name": "Student",
                    "email": format!("student-{n}-of-{admin_email}"),
                    "password": "secret-pass-1"
                })),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        student_ids.push(student["id"].as_str().unwrap().to_string());
    }

    Tree {
        admin_id,
        tutor_id,
        student_ids,
    }
}

#[tokio::test]
async fn test_tutor_cascade_deletes_students_and_edges() {
    let app = TestApp::new().await;
    let tree = build_tree(&app, "alice@example.com", 2).await;
    let admin_token = app.access_token_for(&tree.admin_id).await;

    app.deactivate(&tree.tutor_id).await;

    let (status, body) = app
        .request(json_request(
            Method::DELETE,
            &format!("/api/users/tutor/{}/cascade", tree.tutor_id),
            Some(&admin_token),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tutorDeleted"], 1);
    assert_eq!(body["studentsDeleted"], 2);

    assert!(!app.user_exists(&tree.tutor_id).await);
    for student_id in &tree.student_ids {
        assert!(!app.user_exists(student_id).await);
    }
    assert_eq!(app.edge_counts().await, (0, 0));

    // Deletion never cascades upward.
    assert!(app.user_exists(&tree.admin_id).await);
}

#[tokio::test]
async fn test_admin_cascade_deletes_the_whole_tree() {
    let app = TestApp::new().await;
    // A second admin performs the deletion; the target admin owns the tree.
    let caller_id = app
        .seed_user("Caller", "caller@example.com", "secret-pass-1", RoleName::Admin)
        .await;
    let tree = build_tree(&app, "target@example.com", 2).await;
    let caller_token = app.access_token_for(&caller_id).await;

    app.deactivate(&tree.admin_id).await;

    let (status, body) = app
        .request(json_request(
            Method::DELETE,
            &format!("/api/users/admin/{}/cascade", tree.admin_id),
            Some(&caller_token),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["adminDeleted"], 1);
    assert_eq!(body["tutorsDeleted"], 1);
    assert_eq!(body["studentsDeleted"], 2);

    assert!(!app.user_exists(&tree.admin_id).await);
    assert!(!app.user_exists(&tree.tutor_id).await);
    for student_id in &tree.student_ids {
        assert!(!app.user_exists(student_id).await);
    }
    assert_eq!(app.edge_counts().await, (0, 0));
}

#[tokio::test]
async fn test_active_target_is_rejected_before_any_row_is_touched() {
    let app = TestApp::new().await;
    let tree = build_tree(&app, "alice@example.com", 2).await;
    let admin_token = app.access_token_for(&tree.admin_id).await;

    let users_before = app.user_count().await;
    let edges_before = app.edge_counts().await;

    // The tutor is still active; the precondition fires first.
    let (status, body) = app
        .request(json_request(
            Method::DELETE,
            &format!("/api/users/tutor/{}/cascade", tree.tutor_id),
            Some(&admin_token),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_operation");
    assert_eq!(app.user_count().await, users_before);
    assert_eq!(app.edge_counts().await, edges_before);
}

#[tokio::test]
async fn test_self_delete_is_rejected() {
    let app = TestApp::new().await;
    let admin_id = app
        .seed_user("Alice", "alice@example.com", "secret-pass-1", RoleName::Admin)
        .await;
    let token = app.access_token_for(&admin_id).await;

    let (status, body) = app
        .request(json_request(
            Method::DELETE,
            &format!("/api/users/{admin_id}"),
            Some(&token),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_operation");
    assert!(app.user_exists(&admin_id).await);
}

#[tokio::test]
async fn test_wrong_role_at_the_scoped_cascade_endpoints_is_400() {
    let app = TestApp::new().await;
    let admin_id = app
        .seed_user("Alice", "alice@example.com", "secret-pass-1", RoleName::Admin)
        .await;
    let student_id = app
        .seed_user("Sam", "sam@example.com", "secret-pass-1", RoleName::Student)
        .await;
    let token = app.access_token_for(&admin_id).await;

    app.deactivate(&student_id).await;

    let (status, _) = app
        .request(json_request(
            Method::DELETE,
            &format!("/api/users/tutor/{student_id}/cascade"),
            Some(&token),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request(json_request(
            Method::DELETE,
            &format!("/api/users/admin/{student_id}/cascade"),
            Some(&token),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(app.user_exists(&student_id).await);
}

#[tokio::test]
async fn test_deleting_a_missing_user_is_404() {
    let app = TestApp::new().await;
    let admin_id = app
        .seed_user("Alice", "alice@example.com", "secret-pass-1", RoleName::Admin)
        .await;
    let token = app.access_token_for(&admin_id).await;

    let (status, _) = app
        .request(json_request(
            Method::DELETE,
            "/api/users/no-such-id",
            Some(&token),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generic_delete_cascades_by_role() {
    let app = TestApp::new().await;
    let tree = build_tree(&app, "alice@example.com", 2).await;
    let admin_token = app.access_token_for(&tree.admin_id).await;

    app.deactivate(&tree.tutor_id).await;

    let (status, body) = app
        .request(json_request(
            Method::DELETE,
            &format!("/api/users/{}", tree.tutor_id),
            Some(&admin_token),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedSelf"], 1);
    assert_eq!(body["deletedStudents"], 2);

    for student_id in &tree.student_ids {
        assert!(!app.user_exists(student_id).await);
    }
}

#[tokio::test]
async fn test_generic_delete_of_a_student_reports_only_itself() {
    let app = TestApp::new().await;
    let tree = build_tree(&app, "alice@example.com", 1).await;
    let admin_token = app.access_token_for(&tree.admin_id).await;
    let student_id = &tree.student_ids[0];

    app.deactivate(student_id).await;

    let (status, body) = app
        .request(json_request(
            Method::DELETE,
            &format!("/api/users/{student_id}"),
            Some(&admin_token),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedSelf"], 1);
    assert!(body.get("deletedStudents").is_none());
    assert!(body.get("deletedTutors").is_none());

    // The owning tutor is untouched and its inbound edge survives.
    assert!(app.user_exists(&tree.tutor_id).await);
    let (admin_tutors, tutor_students) = app.edge_counts().await;
    assert_eq!(admin_tutors, 1);
    assert_eq!(tutor_students, 0);
}

#[tokio::test]
async fn test_strategy_self_leaves_subordinates_orphaned() {
    let app = TestApp::new().await;
    let tree = build_tree(&app, "alice@example.com", 2).await;
    let admin_token = app.access_token_for(&tree.admin_id).await;

    app.deactivate(&tree.tutor_id).await;

    let (status, body) = app
        .request(json_request(
            Method::DELETE,
            &format!("/api/users/{}?strategy=self", tree.tutor_id),
            Some(&admin_token),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedSelf"], 1);

    assert!(!app.user_exists(&tree.tutor_id).await);
    // The students survive as orphans; that is the explicit opt-in.
    for student_id in &tree.student_ids {
        assert!(app.user_exists(student_id).await);
    }
}

#[tokio::test]
async fn test_unknown_delete_strategy_is_400() {
    let app = TestApp::new().await;
    let admin_id = app
        .seed_user("Alice", "alice@example.com", "secret-pass-1", RoleName::Admin)
        .await;
    let target_id = app
        .seed_user("Tina", "tina@example.com", "secret-pass-1", RoleName::Tutor)
        .await;
    let token = app.access_token_for(&admin_id).await;

    app.deactivate(&target_id).await;

    let (status, _) = app
        .request(json_request(
            Method::DELETE,
            &format!("/api/users/{target_id}?strategy=everything"),
            Some(&token),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.user_exists(&target_id).await);
}
