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

//! Integration tests for assignments, submissions and grading.

mod test_helpers;

use axum::http::StatusCode;
use axum::Router;
use course_types::responses::{AssignmentResponse, ModuleDetailResponse, SubmissionResponse};
use course_types::APIError;
use serde_json::json;
use test_helpers::*;

struct Classroom {
    instructor: String,
    customer: String,
    module_id: String,
    assignment: AssignmentResponse,
}

async fn classroom(app: &Router, tag: &str) -> Classroom {
    let instructor =
        register_and_login(app, "instructor", &format!("{tag}-instructor@example.com")).await;
    let customer = register_and_login(app, "customer", &format!("{tag}-learner@example.com")).await;
    let course = create_course(app, &instructor, tag, 5).await;
    let module = create_module(app, &instructor, &course.id, 0).await;
    enroll(app, &customer, &course.id).await;

    let assignment = expect_data(
        app,
        json_request(
            "POST",
            &format!("/instructor/modules/{}/assignment", module.id),
            Some(&instructor),
            json!({ "title": "Build a CLI", "description": "Use clap" }),
        ),
        StatusCode::CREATED,
    )
    .await;

    Classroom {
        instructor,
        customer,
        module_id: module.id,
        assignment,
    }
}

fn submit(assignment_id: &str, token: &str, file: &str) -> axum::http::Request<axum::body::Body> {
    json_request(
        "POST",
        &format!("/customer/assignments/{assignment_id}/submissions"),
        Some(token),
        json!({ "file": file }),
    )
}

#[tokio::test]
async fn test_one_assignment_per_module() {
    let app = build_app();
    let room = classroom(&app, "Single").await;

    let resp = send(
        &app,
        json_request(
            "POST",
            &format!("/instructor/modules/{}/assignment", room.module_id),
            Some(&room.instructor),
            json!({ "title": "Another" }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: APIError = response_json(resp).await;
    assert_eq!(body.code, "ASSIGNMENT_EXISTS");

    let detail: ModuleDetailResponse = expect_data(
        &app,
        empty_request(
            "GET",
            &format!("/instructor/modules/{}", room.module_id),
            Some(&room.instructor),
        ),
        StatusCode::OK,
    )
    .await;
    assert_eq!(
        detail.assignment.map(|a| a.id),
        Some(room.assignment.id.clone())
    );
}

#[tokio::test]
async fn test_submit_grade_and_lock() {
    let app = build_app();
    let room = classroom(&app, "Grading").await;

    let submission: SubmissionResponse = expect_data(
        &app,
        submit(&room.assignment.id, &room.customer, "s3://bucket/v1.zip"),
        StatusCode::CREATED,
    )
    .await;
    assert!(submission.grade.is_none());

    let resp = send(
        &app,
        submit(&room.assignment.id, &room.customer, "s3://bucket/v2.zip"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: APIError = response_json(resp).await;
    assert_eq!(body.code, "ALREADY_SUBMITTED");

    let uri = format!("/customer/submissions/{}", submission.id);
    let revised: SubmissionResponse = expect_data(
        &app,
        json_request(
            "PUT",
            &uri,
            Some(&room.customer),
            json!({ "file": "s3://bucket/v2.zip" }),
        ),
        StatusCode::OK,
    )
    .await;
    assert_eq!(revised.file, "s3://bucket/v2.zip");

    let listed: Vec<SubmissionResponse> = expect_data(
        &app,
        empty_request(
            "GET",
            &format!("/instructor/assignments/{}/submissions", room.assignment.id),
            Some(&room.instructor),
        ),
        StatusCode::OK,
    )
    .await;
    assert_eq!(listed.len(), 1);

    let grade_uri = format!("/instructor/submissions/{}/grade", submission.id);
    let resp = send(
        &app,
        json_request("PUT", &grade_uri, Some(&room.instructor), json!({ "grade": 101 })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let graded: SubmissionResponse = expect_data(
        &app,
        json_request("PUT", &grade_uri, Some(&room.instructor), json!({ "grade": 88 })),
        StatusCode::OK,
    )
    .await;
    assert_eq!(graded.grade, Some(88));

    let resp = send(
        &app,
        json_request(
            "PUT",
            &uri,
            Some(&room.customer),
            json!({ "file": "s3://bucket/v3.zip" }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let mine: Vec<SubmissionResponse> = expect_data(
        &app,
        empty_request("GET", "/customer/submissions", Some(&room.customer)),
        StatusCode::OK,
    )
    .await;
    assert_eq!(mine[0].grade, Some(88));
}

#[tokio::test]
async fn test_submission_requires_enrollment() {
    let app = build_app();
    let room = classroom(&app, "Outsider").await;
    let outsider = register_and_login(&app, "customer", "outsider@example.com").await;

    let resp = send(&app, submit(&room.assignment.id, &outsider, "file.zip")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: APIError = response_json(resp).await;
    assert_eq!(body.code, "NOT_ENROLLED");
}

#[tokio::test]
async fn test_only_owner_grades() {
    let app = build_app();
    let room = classroom(&app, "Grader").await;
    let other = register_and_login(&app, "instructor", "other-grader@example.com").await;
    let submission: SubmissionResponse = expect_data(
        &app,
        submit(&room.assignment.id, &room.customer, "work.zip"),
        StatusCode::CREATED,
    )
    .await;

    let resp = send(
        &app,
        json_request(
            "PUT",
            &format!("/instructor/submissions/{}/grade", submission.id),
            Some(&other),
            json!({ "grade": 10 }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_deleting_assignment_hides_it() {
    let app = build_app();
    let room = classroom(&app, "Removal").await;

    let uri = format!("/instructor/assignments/{}", room.assignment.id);
    let updated: AssignmentResponse = expect_data(
        &app,
        json_request(
            "PUT",
            &uri,
            Some(&room.instructor),
            json!({ "title": "Build a TUI" }),
        ),
        StatusCode::OK,
    )
    .await;
    assert_eq!(updated.title, "Build a TUI");
    assert_eq!(updated.description, "Use clap");

    let resp = send(&app, empty_request("DELETE", &uri, Some(&room.instructor))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&app, submit(&room.assignment.id, &room.customer, "late.zip")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleted_assignment_hides_its_submissions() {
    let app = build_app();
    let room = classroom(&app, "Retired").await;

    let submission: SubmissionResponse = expect_data(
        &app,
        submit(&room.assignment.id, &room.customer, "s3://bucket/old.zip"),
        StatusCode::CREATED,
    )
    .await;

    let resp = send(
        &app,
        empty_request(
            "DELETE",
            &format!("/instructor/assignments/{}", room.assignment.id),
            Some(&room.instructor),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let mine: Vec<SubmissionResponse> = expect_data(
        &app,
        empty_request("GET", "/customer/submissions", Some(&room.customer)),
        StatusCode::OK,
    )
    .await;
    assert!(mine.is_empty());

    let resp = send(
        &app,
        json_request(
            "PUT",
            &format!("/customer/submissions/{}", submission.id),
            Some(&room.customer),
            json!({ "file": "s3://bucket/new.zip" }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: APIError = response_json(resp).await;
    assert_eq!(body.error, "assignment not found");
}
