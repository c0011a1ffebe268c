use crate::auth::ensure_admin;
use crate::test_support::{self, bearer};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{json, Value};

fn register(name: &str, email: &str, password: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": name, "email": email, "password": password }))
}

fn login(email: &str, password: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": password }))
}

#[actix_web::test]
async fn register_then_use_the_token() {
    let ctx = test_support::context();
    let app = test::init_service(test_support::app(&ctx.state)).await;

    let resp = test::call_service(
        &app,
        register("Alice", "Alice@Example.com", "secret1").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["email"], "alice@example.com");
    assert_eq!(body["data"]["role"], "user");
    assert!(body["data"].get("passwordHash").is_none());
    let token = body["token"].as_str().unwrap().to_string();

    let req = TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["name"], "Alice");
}

#[actix_web::test]
async fn duplicate_email_conflicts() {
    let ctx = test_support::context();
    let app = test::init_service(test_support::app(&ctx.state)).await;

    let first = register("Alice", "alice@example.com", "secret1").to_request();
    assert_eq!(test::call_service(&app, first).await.status(), StatusCode::CREATED);
    let second = register("Other", "ALICE@example.com", "secret2").to_request();
    assert_eq!(test::call_service(&app, second).await.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn invalid_registration_is_rejected() {
    let ctx = test_support::context();
    let app = test::init_service(test_support::app(&ctx.state)).await;

    let req = register("Alice", "not-an-email", "secret1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn login_checks_the_password() {
    let ctx = test_support::context();
    ensure_admin(&ctx.state.store, "root@example.com", "s3cret-pass").unwrap();
    let app = test::init_service(test_support::app(&ctx.state)).await;

    let resp = test::call_service(&app, login("root@example.com", "wrong").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let resp = test::call_service(&app, login("nobody@example.com", "s3cret-pass").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value =
        test::call_and_read_body_json(&app, login("Root@example.com", "s3cret-pass").to_request())
            .await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["role"], "admin");
    assert!(body["token"].as_str().is_some());
}

#[actix_web::test]
async fn logout_ends_only_the_current_session() {
    let ctx = test_support::context();
    let app = test::init_service(test_support::app(&ctx.state)).await;

    let body: Value = test::call_and_read_body_json(
        &app,
        register("Alice", "alice@example.com", "secret1").to_request(),
    )
    .await;
    let first = body["token"].as_str().unwrap().to_string();
    let body: Value =
        test::call_and_read_body_json(&app, login("alice@example.com", "secret1").to_request())
            .await;
    let second = body["token"].as_str().unwrap().to_string();

    let req = TestRequest::get()
        .uri("/api/auth/logout")
        .insert_header(bearer(&first))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let me = |token: &str| {
        TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer(token))
            .to_request()
    };
    assert_eq!(test::call_service(&app, me(&first)).await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(test::call_service(&app, me(&second)).await.status(), StatusCode::OK);
}
