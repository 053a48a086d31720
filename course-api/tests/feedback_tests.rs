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

//! Integration tests for favorites and course ratings.

mod test_helpers;

use axum::http::StatusCode;
use axum::Router;
use course_types::responses::{
    CourseDetailResponse, CourseResponse, FavoriteResponse, RatingResponse,
};
use course_types::APIError;
use serde_json::json;
use test_helpers::*;

/// A course with one module plus a customer who finished it.
async fn finished_course(app: &Router, tag: &str) -> (String, String, CourseResponse) {
    let instructor =
        register_and_login(app, "instructor", &format!("{tag}-instructor@example.com")).await;
    let customer = register_and_login(app, "customer", &format!("{tag}-learner@example.com")).await;
    let course = create_course(app, &instructor, tag, 5).await;
    create_module(app, &instructor, &course.id, 0).await;
    let enrollment = enroll(app, &customer, &course.id).await;

    let req = json_request(
        "PUT",
        &format!("/customer/enrollments/{}/progress", enrollment.id),
        Some(&customer),
        json!({ "no_module": 1 }),
    );
    let resp = send(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    (instructor, customer, course)
}

fn rate(course_id: &str, token: &str, rating: i32) -> axum::http::Request<axum::body::Body> {
    json_request(
        "POST",
        &format!("/customer/courses/{course_id}/ratings"),
        Some(token),
        json!({ "rating": rating, "testimonial": "Worth every minute" }),
    )
}

#[tokio::test]
async fn test_favorite_lifecycle() {
    let app = build_app();
    let instructor = register_and_login(&app, "instructor", "fav-i@example.com").await;
    let customer = register_and_login(&app, "customer", "fav-c@example.com").await;
    let course = create_course(&app, &instructor, "Favorites", 3).await;
    let uri = format!("/customer/courses/{}/favorite", course.id);

    let favorite: FavoriteResponse = expect_data(
        &app,
        empty_request("POST", &uri, Some(&customer)),
        StatusCode::CREATED,
    )
    .await;

    let resp = send(&app, empty_request("POST", &uri, Some(&customer))).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: APIError = response_json(resp).await;
    assert_eq!(body.code, "ALREADY_FAVORITED");

    let list: Vec<FavoriteResponse> = expect_data(
        &app,
        empty_request("GET", "/customer/favorites", Some(&customer)),
        StatusCode::OK,
    )
    .await;
    assert_eq!(list.len(), 1);

    let resp = send(
        &app,
        empty_request(
            "DELETE",
            &format!("/customer/favorites/{}", favorite.id),
            Some(&customer),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The course can be favorited again once removed.
    let resp = send(&app, empty_request("POST", &uri, Some(&customer))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_rating_requires_enrollment_and_completion() {
    let app = build_app();
    let instructor = register_and_login(&app, "instructor", "rr-i@example.com").await;
    let customer = register_and_login(&app, "customer", "rr-c@example.com").await;
    let course = create_course(&app, &instructor, "Unrated", 3).await;
    create_module(&app, &instructor, &course.id, 0).await;

    let resp = send(&app, rate(&course.id, &customer, 4)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: APIError = response_json(resp).await;
    assert_eq!(body.code, "NOT_ENROLLED");

    enroll(&app, &customer, &course.id).await;
    let resp = send(&app, rate(&course.id, &customer, 4)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: APIError = response_json(resp).await;
    assert_eq!(body.code, "COURSE_NOT_FINISHED");
}

#[tokio::test]
async fn test_rating_out_of_range_is_rejected() {
    let app = build_app();
    let (_, customer, course) = finished_course(&app, "Range").await;
    let resp = send(&app, rate(&course.id, &customer, 6)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_long_testimonial_is_accepted() {
    let app = build_app();
    let (_, customer, course) = finished_course(&app, "Verbose").await;
    let testimonial = "x".repeat(300);
    let req = json_request(
        "POST",
        &format!("/customer/courses/{}/ratings", course.id),
        Some(&customer),
        json!({ "rating": 5, "testimonial": testimonial }),
    );
    let rating: RatingResponse = expect_data(&app, req, StatusCode::CREATED).await;
    assert_eq!(rating.testimonial, testimonial);
}

#[tokio::test]
async fn test_rating_is_hidden_until_published() {
    let app = build_app();
    let (instructor, customer, course) = finished_course(&app, "Publish").await;

    let rating: RatingResponse =
        expect_data(&app, rate(&course.id, &customer, 4), StatusCode::CREATED).await;
    assert!(!rating.is_publish);

    let resp = send(&app, rate(&course.id, &customer, 5)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: APIError = response_json(resp).await;
    assert_eq!(body.code, "ALREADY_RATED");

    let public_uri = format!("/courses/{}/ratings", course.id);
    let public: Vec<RatingResponse> =
        expect_data(&app, empty_request("GET", &public_uri, None), StatusCode::OK).await;
    assert!(public.is_empty());

    let all: Vec<RatingResponse> = expect_data(
        &app,
        empty_request(
            "GET",
            &format!("/instructor/courses/{}/ratings", course.id),
            Some(&instructor),
        ),
        StatusCode::OK,
    )
    .await;
    assert_eq!(all.len(), 1);

    let published: RatingResponse = expect_data(
        &app,
        json_request(
            "PUT",
            &format!("/instructor/ratings/{}/publish", rating.id),
            Some(&instructor),
            json!({ "is_publish": true }),
        ),
        StatusCode::OK,
    )
    .await;
    assert!(published.is_publish);

    let public: Vec<RatingResponse> =
        expect_data(&app, empty_request("GET", &public_uri, None), StatusCode::OK).await;
    assert_eq!(public.len(), 1);

    let detail: CourseDetailResponse = expect_data(
        &app,
        empty_request("GET", &format!("/courses/{}", course.id), None),
        StatusCode::OK,
    )
    .await;
    assert_eq!(detail.rating_count, 1);
    assert_eq!(detail.average_rating, Some(4.0));
}

#[tokio::test]
async fn test_only_course_owner_publishes_ratings() {
    let app = build_app();
    let (_, customer, course) = finished_course(&app, "Owner").await;
    let stranger = register_and_login(&app, "instructor", "stranger@example.com").await;
    let rating: RatingResponse =
        expect_data(&app, rate(&course.id, &customer, 3), StatusCode::CREATED).await;

    let resp = send(
        &app,
        json_request(
            "PUT",
            &format!("/instructor/ratings/{}/publish", rating.id),
            Some(&stranger),
            json!({ "is_publish": true }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_customer_deletes_own_rating() {
    let app = build_app();
    let (_, customer, course) = finished_course(&app, "Retract").await;
    let rating: RatingResponse =
        expect_data(&app, rate(&course.id, &customer, 2), StatusCode::CREATED).await;

    let resp = send(
        &app,
        empty_request(
            "DELETE",
            &format!("/customer/ratings/{}", rating.id),
            Some(&customer),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Rating again is allowed after the old one is gone.
    let resp = send(&app, rate(&course.id, &customer, 5)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}
