//! Tests for provisioning and listing owned principals.

mod common;

use axum::http::{Method, StatusCode};
use classnest_backend::database::models::RoleName;
use common::{TestApp, json_request};
use serde_json::json;

fn subordinate_payload(name: &str, email: &str) -> serde_json::Value {
    json!({ "name": name, "email": email, "password": "secret-pass-1" })
}

#[tokio::test]
async fn test_admin_provisions_a_tutor_with_an_ownership_edge() {
    let app = TestApp::new().await;
    let admin_id = app
        .seed_user("Alice", "alice@example.com", "secret-pass-1", RoleName::Admin)
        .await;
    let token = app.access_token_for(&admin_id).await;

    let (status, body) = app
        .request(json_request(
            Method::POST,
            "/api/users/hierarchy",
            Some(&token),
            Some(subordinate_payload("Tina", "tina@example.com")),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "tutor");
    assert_eq!(body["createdBy"], admin_id.as_str());
    assert_eq!(body["status"], "active");

    let (admin_tutors, _) = app.edge_counts().await;
    assert_eq!(admin_tutors, 1);

    // The provisioned tutor can log in right away.
    let (status, _) = app
        .request(json_request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "tina@example.com", "password": "secret-pass-1" })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_tutor_provisions_a_student_with_an_ownership_edge() {
    let app = TestApp::new().await;
    let tutor_id = app
        .seed_user("Tina", "tina@example.com", "secret-pass-1", RoleName::Tutor)
        .await;
    let token = app.access_token_for(&tutor_id).await;

    let (status, body) = app
        .request(json_request(
            Method::POST,
            "/api/users/tutor-student",
            Some(&token),
            Some(subordinate_payload("Sam", "sam@example.com")),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "student");
    assert_eq!(body["createdBy"], tutor_id.as_str());

    let (_, tutor_students) = app.edge_counts().await;
    assert_eq!(tutor_students, 1);
}

#[tokio::test]
async fn test_duplicate_email_conflicts_and_writes_nothing() {
    let app = TestApp::new().await;
    let admin_id = app
        .seed_user("Alice", "alice@example.com", "secret-pass-1", RoleName::Admin)
        .await;
    let token = app.access_token_for(&admin_id).await;

    let users_before = app.user_count().await;

    let (status, body) = app
        .request(json_request(
            Method::POST,
            "/api/users/hierarchy",
            Some(&token),
            Some(subordinate_payload("Imposter", "alice@example.com")),
        ))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "already_exists");
    assert_eq!(app.user_count().await, users_before);
    assert_eq!(app.edge_counts().await, (0, 0));
}

#[tokio::test]
async fn test_list_owned_tutors_is_scoped_to_the_caller() {
    let app = TestApp::new().await;
    let alice_id = app
        .seed_user("Alice", "alice@example.com", "secret-pass-1", RoleName::Admin)
        .await;
    let bob_id = app
        .seed_user("Bob", "bob@example.com", "secret-pass-1", RoleName::Admin)
        .await;
    let alice_token = app.access_token_for(&alice_id).await;
    let bob_token = app.access_token_for(&bob_id).await;

    for email in ["t1@example.com", "t2@example.com"] {
        let (status, _) = app
            .request(json_request(
                Method::POST,
                "/api/users/hierarchy",
                Some(&alice_token),
                Some(subordinate_payload("Tutor", email)),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app
        .request(json_request(
            Method::GET,
            "/api/users/hierarchy",
            Some(&alice_token),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    let owned = body.as_array().unwrap();
    assert_eq!(owned.len(), 2);
    for tutor in owned {
        assert_eq!(tutor["createdBy"], alice_id.as_str());
        assert_eq!(tutor["role"], "tutor");
    }

    // An admin with no edges gets an empty list, not an error.
    let (status, body) = app
        .request(json_request(
            Method::GET,
            "/api/users/hierarchy",
            Some(&bob_token),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_owned_students_for_a_tutor() {
    let app = TestApp::new().await;
    let tutor_id = app
        .seed_user("Tina", "tina@example.com", "secret-pass-1", RoleName::Tutor)
        .await;
    let token = app.access_token_for(&tutor_id).await;

    for email in ["s1@example.com", "s2@example.com"] {
        let (status, _) = app
            .request(json_request(
                Method::POST,
                "/api/users/tutor-student",
                Some(&token),
                Some(subordinate_payload("Student", email)),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app
        .request(json_request(
            Method::GET,
            "/api/users/tutor-student",
            Some(&token),
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_status_toggle_round_trip() {
    let app = TestApp::new().await;
    let admin_id = app
        .seed_user("Alice", "alice@example.com", "secret-pass-1", RoleName::Admin)
        .await;
    let target_id = app
        .seed_user("Tina", "tina@example.com", "secret-pass-1", RoleName::Tutor)
        .await;
    let token = app.access_token_for(&admin_id).await;

    let (status, body) = app
        .request(json_request(
            Method::PATCH,
            &format!("/api/users/{target_id}/status"),
            Some(&token),
            Some(json!({ "status": "inactive" })),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "inactive");

    let (status, body) = app
        .request(json_request(
            Method::PATCH,
            &format!("/api/users/{target_id}/status"),
            Some(&token),
            Some(json!({ "status": "active" })),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
}

#[tokio::test]
async fn test_status_toggle_rejects_unknown_values_and_users() {
    let app = TestApp::new().await;
    let admin_id = app
        .seed_user("Alice", "alice@example.com", "secret-pass-1", RoleName::Admin)
        .await;
    let target_id = app
        .seed_user("Tina", "tina@example.com", "secret-pass-1", RoleName::Tutor)
        .await;
    let token = app.access_token_for(&admin_id).await;

    let (status, _) = app
        .request(json_request(
            Method::PATCH,
            &format!("/api/users/{target_id}/status"),
            Some(&token),
            Some(json!({ "status": "suspended" })),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request(json_request(
            Method::PATCH,
            "/api/users/missing-id/status",
            Some(&token),
            Some(json!({ "status": "inactive" })),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
