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

//! Integration tests for taking courses, seat accounting and progress.

mod test_helpers;

use axum::http::StatusCode;
use course_types::responses::{CourseDetailResponse, CourseResponse, EnrollmentResponse};
use course_types::APIError;
use serde_json::json;
use test_helpers::*;

async fn seats_left(app: &axum::Router, course_id: &str) -> i32 {
    let detail: CourseDetailResponse = expect_data(
        app,
        empty_request("GET", &format!("/courses/{course_id}"), None),
        StatusCode::OK,
    )
    .await;
    detail.course.capacity
}

#[tokio::test]
async fn test_enroll_takes_a_seat() {
    let app = build_app();
    let instructor = register_and_login(&app, "instructor", "seat@example.com").await;
    let customer = register_and_login(&app, "customer", "learner@example.com").await;
    let course = create_course(&app, &instructor, "Seats", 3).await;

    let enrollment = enroll(&app, &customer, &course.id).await;
    assert!(enrollment.status);
    assert_eq!(enrollment.no_module, 0);
    assert!(!enrollment.is_finish);
    assert_eq!(seats_left(&app, &course.id).await, 2);

    let mine: Vec<EnrollmentResponse> = expect_data(
        &app,
        empty_request("GET", "/customer/enrollments", Some(&customer)),
        StatusCode::OK,
    )
    .await;
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, enrollment.id);
}

#[tokio::test]
async fn test_second_enrollment_is_a_conflict() {
    let app = build_app();
    let instructor = register_and_login(&app, "instructor", "twice@example.com").await;
    let customer = register_and_login(&app, "customer", "eager@example.com").await;
    let course = create_course(&app, &instructor, "Twice", 5).await;
    enroll(&app, &customer, &course.id).await;

    let resp = send(
        &app,
        empty_request(
            "POST",
            &format!("/customer/courses/{}/enroll", course.id),
            Some(&customer),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: APIError = response_json(resp).await;
    assert_eq!(body.code, "ALREADY_ENROLLED");
    assert_eq!(seats_left(&app, &course.id).await, 4);
}

#[tokio::test]
async fn test_last_seat_goes_to_first_customer_until_released() {
    let app = build_app();
    let instructor = register_and_login(&app, "instructor", "last@example.com").await;
    let a = register_and_login(&app, "customer", "first@example.com").await;
    let b = register_and_login(&app, "customer", "second@example.com").await;
    let course = create_course(&app, &instructor, "One Seat", 1).await;

    let a_enrollment = enroll(&app, &a, &course.id).await;
    assert_eq!(seats_left(&app, &course.id).await, 0);

    let resp = send(
        &app,
        empty_request(
            "POST",
            &format!("/customer/courses/{}/enroll", course.id),
            Some(&b),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: APIError = response_json(resp).await;
    assert_eq!(body.code, "CAPACITY_EXCEEDED");
    assert_eq!(body.error, "course capacity exceeded");

    let released: CourseResponse = expect_data(
        &app,
        empty_request(
            "DELETE",
            &format!("/customer/enrollments/{}", a_enrollment.id),
            Some(&a),
        ),
        StatusCode::OK,
    )
    .await;
    assert_eq!(released.capacity, 1);

    enroll(&app, &b, &course.id).await;
    assert_eq!(seats_left(&app, &course.id).await, 0);
}

#[tokio::test]
async fn test_unknown_course_cannot_be_taken() {
    let app = build_app();
    let customer = register_and_login(&app, "customer", "lost@example.com").await;
    let resp = send(
        &app,
        empty_request("POST", "/customer/courses/nope/enroll", Some(&customer)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cannot_unenroll_someone_else() {
    let app = build_app();
    let instructor = register_and_login(&app, "instructor", "guard@example.com").await;
    let owner = register_and_login(&app, "customer", "holder@example.com").await;
    let intruder = register_and_login(&app, "customer", "intruder@example.com").await;
    let course = create_course(&app, &instructor, "Guarded", 2).await;
    let enrollment = enroll(&app, &owner, &course.id).await;

    let resp = send(
        &app,
        empty_request(
            "DELETE",
            &format!("/customer/enrollments/{}", enrollment.id),
            Some(&intruder),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(seats_left(&app, &course.id).await, 1);
}

#[tokio::test]
async fn test_progress_marks_course_finished() {
    let app = build_app();
    let instructor = register_and_login(&app, "instructor", "prog@example.com").await;
    let customer = register_and_login(&app, "customer", "student@example.com").await;
    let course = create_course(&app, &instructor, "Progress", 2).await;
    create_module(&app, &instructor, &course.id, 0).await;
    create_module(&app, &instructor, &course.id, 1).await;
    let enrollment = enroll(&app, &customer, &course.id).await;

    let uri = format!("/customer/enrollments/{}/progress", enrollment.id);
    let halfway: EnrollmentResponse = expect_data(
        &app,
        json_request("PUT", &uri, Some(&customer), json!({ "no_module": 1 })),
        StatusCode::OK,
    )
    .await;
    assert!(!halfway.is_finish);

    let resp = send(
        &app,
        json_request("PUT", &uri, Some(&customer), json!({ "no_module": 3 })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let done: EnrollmentResponse = expect_data(
        &app,
        json_request("PUT", &uri, Some(&customer), json!({ "no_module": 2 })),
        StatusCode::OK,
    )
    .await;
    assert!(done.is_finish);
    assert_eq!(done.no_module, 2);
}

#[tokio::test]
async fn test_instructor_sees_course_enrollments() {
    let app = build_app();
    let instructor = register_and_login(&app, "instructor", "roster@example.com").await;
    let other = register_and_login(&app, "instructor", "nosy@example.com").await;
    let course = create_course(&app, &instructor, "Roster", 5).await;
    for i in 0..3 {
        let customer = register_and_login(&app, "customer", &format!("r{i}@example.com")).await;
        enroll(&app, &customer, &course.id).await;
    }

    let uri = format!("/instructor/courses/{}/enrollments", course.id);
    let roster: Vec<EnrollmentResponse> =
        expect_data(&app, empty_request("GET", &uri, Some(&instructor)), StatusCode::OK).await;
    assert_eq!(roster.len(), 3);

    let resp = send(&app, empty_request("GET", &uri, Some(&other))).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_concurrent_enrollments_respect_capacity() {
    let app = build_app();
    let instructor = register_and_login(&app, "instructor", "rush@example.com").await;
    let course = create_course(&app, &instructor, "Rush", 2).await;

    let mut tokens = Vec::new();
    for i in 0..6 {
        tokens.push(register_and_login(&app, "customer", &format!("rush{i}@example.com")).await);
    }

    let mut handles = Vec::new();
    for token in tokens {
        let app = app.clone();
        let uri = format!("/customer/courses/{}/enroll", course.id);
        handles.push(tokio::spawn(async move {
            send(&app, empty_request("POST", &uri, Some(&token)))
                .await
                .status()
        }));
    }

    let mut created = 0;
    for handle in handles {
        let status = handle.await.unwrap();
        if status == StatusCode::CREATED {
            created += 1;
        } else {
            assert_eq!(status, StatusCode::CONFLICT);
        }
    }
    assert_eq!(created, 2);
    assert_eq!(seats_left(&app, &course.id).await, 0);
}
