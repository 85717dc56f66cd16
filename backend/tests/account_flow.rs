//! End-to-end account flows over the in-memory backend.

mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use pawcare::domain::TRACE_ID_HEADER;
use serde_json::json;

use support::{PASSWORD, admin_token, app, bearer, memory_state, register, registration, send};

#[actix_web::test]
async fn register_login_and_fetch_profile() {
    let app = test::init_service(app(memory_state().await)).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(registration("Jane", "jane@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "jane@example.com");
    assert_eq!(body["isAdmin"], false);
    assert!(body.get("password").is_none());

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "jane@example.com", "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("token").to_owned();

    let (status, body) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstName"], "Jane");
}

#[actix_web::test]
async fn duplicate_registration_is_rejected() {
    let app = test::init_service(app(memory_state().await)).await;
    register(&app, "Jane", "jane@example.com").await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(registration("Janet", "jane@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn wrong_password_is_unauthorised() {
    let app = test::init_service(app(memory_state().await)).await;
    register(&app, "Jane", "jane@example.com").await;

    let (status, _) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "jane@example.com", "password": "nope-nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn pets_keep_insertion_order() {
    let app = test::init_service(app(memory_state().await)).await;
    let token = register(&app, "Jane", "jane@example.com").await;

    for (name, kind) in [("Biscuit", "Dog"), ("Mochi", "Cat"), ("Pip", "Bird")] {
        let (status, _) = send(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/pets")
                .insert_header(bearer(&token))
                .set_json(json!({ "name": name, "type": kind, "age": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer(&token)),
    )
    .await;
    let names: Vec<&str> = body["pets"]
        .as_array()
        .expect("pets array")
        .iter()
        .filter_map(|pet| pet["name"].as_str())
        .collect();
    assert_eq!(names, ["Biscuit", "Mochi", "Pip"]);
    assert_eq!(body["pets"][1]["type"], "Cat");
}

#[actix_web::test]
async fn members_cannot_list_users_but_admins_can() {
    let app = test::init_service(app(memory_state().await)).await;
    let member = register(&app, "Jane", "jane@example.com").await;

    let (status, body) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/users")
            .insert_header(bearer(&member)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Admin access required");

    let admin = admin_token(&app).await;
    let (status, body) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/users")
            .insert_header(bearer(&admin)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("user list").len(), 2);
}

#[actix_web::test]
async fn deleted_accounts_lose_their_sessions() {
    let app = test::init_service(app(memory_state().await)).await;
    let token = register(&app, "Jane", "jane@example.com").await;

    let (status, body) = send(
        &app,
        test::TestRequest::delete()
            .uri("/api/auth/delete")
            .insert_header(bearer(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User removed");

    let (status, _) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn password_changes_retire_earlier_tokens() {
    let app = test::init_service(app(memory_state().await)).await;
    let old_token = register(&app, "Jane", "jane@example.com").await;

    let (status, body) = send(
        &app,
        test::TestRequest::put()
            .uri("/api/auth/update")
            .insert_header(bearer(&old_token))
            .set_json(json!({ "password": "an0ther-secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let new_token = body["token"].as_str().expect("token").to_owned();

    let (status, _) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer(&old_token)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer(&new_token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "jane@example.com");

    let (status, _) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "jane@example.com", "password": "an0ther-secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn error_bodies_echo_the_trace_header() {
    let app = test::init_service(app(memory_state().await)).await;

    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/auth/me").to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .expect("trace header")
        .to_str()
        .expect("ascii")
        .to_owned();
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "Not authorized, no token");
    assert_eq!(body["traceId"], header.as_str());
}
