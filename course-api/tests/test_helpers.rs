/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Shared test helpers for course-api integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{self, header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use course_api::config::Config;
use course_api::routes;
use course_api::state::AppState;
use course_api::store::memory::InMemoryStore;
use course_types::responses::{
    APIResponse, CategoryResponse, CourseResponse, EnrollmentResponse, LoginResponse,
    ModuleResponse,
};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-for-integration-tests";
pub const TEST_PASSWORD: &str = "password123";
const TEST_TOKEN_TTL: i64 = 600;

/// Build the full application on a fresh in-memory store.
pub fn build_app() -> Router {
    let config = Config {
        listen_addr: "127.0.0.1:0".to_string(),
        database_url: None,
        db_max_connections: 1,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        token_ttl_secs: TEST_TOKEN_TTL,
    };
    routes::app(AppState::new(Arc::new(InMemoryStore::new()), &config))
}

/// Request builder carrying `Authorization: Bearer <token>` when a token is given.
pub fn request(method: &str, uri: &str, token: Option<&str>) -> http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    request(method, uri, token).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    request(method, uri, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Send one request through a clone of the router.
pub async fn send(app: &Router, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.unwrap()
}

/// Consume a response body and deserialize JSON into `T`.
pub async fn response_json<T: DeserializeOwned>(resp: Response) -> T {
    let bytes = resp
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("deserialize response body")
}

/// Send a request that must succeed with `expected`, returning its `data`.
pub async fn expect_data<T: DeserializeOwned + serde::Serialize>(
    app: &Router,
    req: Request<Body>,
    expected: StatusCode,
) -> T {
    let resp = send(app, req).await;
    assert_eq!(resp.status(), expected);
    let body: APIResponse<T> = response_json(resp).await;
    body.data
}

/// Register an account in `realm` ("customer" or "instructor") and log in.
pub async fn register_and_login(app: &Router, realm: &str, email: &str) -> String {
    let register = json_request(
        "POST",
        &format!("/{realm}/register"),
        None,
        json!({ "name": "Test Account", "email": email, "password": TEST_PASSWORD }),
    );
    let resp = send(app, register).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    login(app, realm, email).await
}

pub async fn login(app: &Router, realm: &str, email: &str) -> String {
    let req = json_request(
        "POST",
        &format!("/{realm}/login"),
        None,
        json!({ "email": email, "password": TEST_PASSWORD }),
    );
    let login: LoginResponse = expect_data(app, req, StatusCode::OK).await;
    login.token
}

pub async fn create_category(app: &Router, instructor: &str, name: &str) -> CategoryResponse {
    let req = json_request(
        "POST",
        "/instructor/categories",
        Some(instructor),
        json!({ "name": name, "description": "test category" }),
    );
    expect_data(app, req, StatusCode::CREATED).await
}

/// Create a course (in a new category) with the given number of seats.
pub async fn create_course(
    app: &Router,
    instructor: &str,
    name: &str,
    capacity: i32,
) -> CourseResponse {
    let category = create_category(app, instructor, &format!("{name} category")).await;
    let req = json_request(
        "POST",
        "/instructor/courses",
        Some(instructor),
        json!({
            "name": name,
            "description": "about the course",
            "objective": "learn things",
            "price": 150000,
            "discount": 10,
            "capacity": capacity,
            "category_id": category.id,
        }),
    );
    expect_data(app, req, StatusCode::CREATED).await
}

pub async fn create_module(
    app: &Router,
    instructor: &str,
    course_id: &str,
    no_module: i32,
) -> ModuleResponse {
    let req = json_request(
        "POST",
        &format!("/instructor/courses/{course_id}/modules"),
        Some(instructor),
        json!({ "name": format!("Module {no_module}"), "content": "content", "no_module": no_module }),
    );
    expect_data(app, req, StatusCode::CREATED).await
}

pub async fn enroll(app: &Router, customer: &str, course_id: &str) -> EnrollmentResponse {
    let req = empty_request(
        "POST",
        &format!("/customer/courses/{course_id}/enroll"),
        Some(customer),
    );
    expect_data(app, req, StatusCode::CREATED).await
}
