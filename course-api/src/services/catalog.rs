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

//! Categories and courses.

use chrono::Utc;
use course_types::requests::{
    CreateCategoryRequest, CreateCourseRequest, ListCoursesQuery, UpdateCategoryRequest,
    UpdateCourseRequest,
};
use course_types::responses::{CourseDetailResponse, CourseResponse};

use super::{ensure_course_owner, load_course, new_id, non_blank};
use crate::auth::Principal;
use crate::error::AppError;
use crate::model::{Category, Course};
use crate::store::{CategoryPatch, CourseFilter, CoursePatch, CourseStore};
use crate::validate;

// -- Categories --

pub async fn create_category(
    store: &dyn CourseStore,
    principal: &Principal,
    req: CreateCategoryRequest,
) -> Result<Category, AppError> {
    let now = Utc::now();
    let category = Category {
        id: new_id(),
        name: validate::required_text("name", &req.name)?,
        description: req.description.trim().to_string(),
        created_at: now,
        updated_at: now,
    };
    let category = store.create_category(category).await?;
    tracing::info!(category_id = %category.id, instructor_id = %principal.id, "Category created");
    Ok(category)
}

pub async fn list_categories(store: &dyn CourseStore) -> Result<Vec<Category>, AppError> {
    Ok(store.list_categories().await?)
}

pub async fn get_category(store: &dyn CourseStore, id: &str) -> Result<Category, AppError> {
    store
        .get_category(id)
        .await?
        .ok_or(AppError::NotFound("category"))
}

pub async fn update_category(
    store: &dyn CourseStore,
    id: &str,
    req: UpdateCategoryRequest,
) -> Result<Category, AppError> {
    let patch = CategoryPatch {
        name: req
            .name
            .map(|n| validate::required_text("name", &n))
            .transpose()?,
        description: req.description.map(|d| d.trim().to_string()),
    };
    Ok(store.update_category(id, patch).await?)
}

pub async fn delete_category(store: &dyn CourseStore, id: &str) -> Result<(), AppError> {
    store.delete_category(id).await?;
    tracing::info!(category_id = id, "Category deleted");
    Ok(())
}

// -- Courses --

pub async fn create_course(
    store: &dyn CourseStore,
    principal: &Principal,
    req: CreateCourseRequest,
) -> Result<Course, AppError> {
    let name = validate::required_text("name", &req.name)?;
    validate::price(req.price)?;
    validate::discount(req.discount)?;
    validate::capacity(req.capacity)?;
    get_category(store, &req.category_id).await?;

    let now = Utc::now();
    let course = Course {
        id: new_id(),
        name,
        description: req.description.trim().to_string(),
        objective: req.objective.trim().to_string(),
        price: req.price,
        discount: req.discount,
        thumbnail: non_blank(req.thumbnail),
        capacity: req.capacity,
        instructor_id: principal.id.clone(),
        category_id: req.category_id,
        created_at: now,
        updated_at: now,
    };
    let course = store.create_course(course).await?;
    tracing::info!(course_id = %course.id, instructor_id = %principal.id, "Course created");
    Ok(course)
}

/// Public course listing.
pub async fn browse_courses(
    store: &dyn CourseStore,
    query: ListCoursesQuery,
) -> Result<Vec<Course>, AppError> {
    let filter = CourseFilter {
        name: non_blank(query.name),
        category_id: non_blank(query.category_id),
        instructor_id: None,
    };
    Ok(store.list_courses(&filter).await?)
}

pub async fn list_instructor_courses(
    store: &dyn CourseStore,
    principal: &Principal,
) -> Result<Vec<Course>, AppError> {
    let filter = CourseFilter {
        instructor_id: Some(principal.id.clone()),
        ..CourseFilter::default()
    };
    Ok(store.list_courses(&filter).await?)
}

/// Course with its ordered modules and the average of its published ratings.
pub async fn course_detail(
    store: &dyn CourseStore,
    course_id: &str,
) -> Result<CourseDetailResponse, AppError> {
    let course = load_course(store, course_id).await?;
    let modules = store.list_modules(course_id).await?;
    let ratings = store.list_ratings(course_id, true).await?;

    let rating_count = ratings.len();
    let average_rating = (rating_count > 0).then(|| {
        let total: i64 = ratings.iter().map(|r| i64::from(r.rating)).sum();
        total as f64 / rating_count as f64
    });

    Ok(CourseDetailResponse {
        course: CourseResponse::from(course),
        modules: modules.into_iter().map(Into::into).collect(),
        average_rating,
        rating_count,
    })
}

pub async fn update_course(
    store: &dyn CourseStore,
    principal: &Principal,
    course_id: &str,
    req: UpdateCourseRequest,
) -> Result<Course, AppError> {
    ensure_course_owner(store, principal, course_id).await?;

    if let Some(price) = req.price {
        validate::price(price)?;
    }
    if let Some(discount) = req.discount {
        validate::discount(discount)?;
    }
    if let Some(capacity) = req.capacity {
        validate::capacity(capacity)?;
    }
    if let Some(category_id) = &req.category_id {
        get_category(store, category_id).await?;
    }

    let patch = CoursePatch {
        name: req
            .name
            .map(|n| validate::required_text("name", &n))
            .transpose()?,
        description: req.description.map(|d| d.trim().to_string()),
        objective: req.objective.map(|o| o.trim().to_string()),
        price: req.price,
        discount: req.discount,
        thumbnail: non_blank(req.thumbnail),
        capacity: req.capacity,
        category_id: req.category_id,
    };
    Ok(store.update_course(course_id, patch).await?)
}

/// Delete a course together with everything hanging off it.
pub async fn delete_course(
    store: &dyn CourseStore,
    principal: &Principal,
    course_id: &str,
) -> Result<(), AppError> {
    ensure_course_owner(store, principal, course_id).await?;
    store.delete_course(course_id).await?;
    tracing::info!(course_id, instructor_id = %principal.id, "Course deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;
    use crate::store::memory::InMemoryStore;
    use course_types::Role;

    #[tokio::test]
    async fn create_then_get_returns_equal_fields() {
        let store = InMemoryStore::new();
        let instructor = testing::register(&store, Role::Instructor, "i@mail.com").await;
        let created = testing::course(&store, &instructor, "Rust 101", 10).await;

        let fetched = load_course(&store, &created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.instructor_id, instructor.id);
    }

    #[tokio::test]
    async fn course_requires_existing_category() {
        let store = InMemoryStore::new();
        let instructor = testing::register(&store, Role::Instructor, "i@mail.com").await;
        let err = create_course(
            &store,
            &instructor,
            CreateCourseRequest {
                name: "Rust".to_string(),
                description: String::new(),
                objective: String::new(),
                price: 0,
                discount: 0,
                thumbnail: None,
                capacity: 1,
                category_id: "missing".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound("category")));
    }

    #[tokio::test]
    async fn category_with_live_courses_cannot_be_deleted() {
        let store = InMemoryStore::new();
        let instructor = testing::register(&store, Role::Instructor, "i@mail.com").await;
        let course = testing::course(&store, &instructor, "Rust", 1).await;

        let err = delete_category(&store, &course.category_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InUse("category")));
        assert!(get_category(&store, &course.category_id).await.is_ok());

        delete_course(&store, &instructor, &course.id).await.unwrap();
        delete_category(&store, &course.category_id).await.unwrap();
        let err = delete_category(&store, &course.category_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound("category")));
    }

    #[tokio::test]
    async fn non_owner_cannot_update_or_delete() {
        let store = InMemoryStore::new();
        let owner = testing::register(&store, Role::Instructor, "owner@mail.com").await;
        let other = testing::register(&store, Role::Instructor, "other@mail.com").await;
        let course = testing::course(&store, &owner, "Rust", 5).await;

        let err = delete_course(&store, &other, &course.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotAuthorized));
        let err = update_course(&store, &other, &course.id, UpdateCourseRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotAuthorized));
        assert!(store.get_course(&course.id).await.unwrap().is_some());

        delete_course(&store, &owner, &course.id).await.unwrap();
        assert!(store.get_course(&course.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_validates_discount() {
        let store = InMemoryStore::new();
        let owner = testing::register(&store, Role::Instructor, "owner@mail.com").await;
        let course = testing::course(&store, &owner, "Rust", 5).await;
        let err = update_course(
            &store,
            &owner,
            &course.id,
            UpdateCourseRequest {
                discount: Some(150),
                ..UpdateCourseRequest::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn browse_filters_by_name() {
        let store = InMemoryStore::new();
        let owner = testing::register(&store, Role::Instructor, "owner@mail.com").await;
        testing::course(&store, &owner, "Intro to Rust", 5).await;
        testing::course(&store, &owner, "Go basics", 5).await;

        let found = browse_courses(
            &store,
            ListCoursesQuery {
                name: Some("rust".to_string()),
                category_id: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Intro to Rust");
    }

    #[tokio::test]
    async fn detail_lists_modules_in_order() {
        let store = InMemoryStore::new();
        let owner = testing::register(&store, Role::Instructor, "owner@mail.com").await;
        let course = testing::course(&store, &owner, "Rust", 5).await;
        testing::module(&store, &owner, &course.id, 2).await;
        testing::module(&store, &owner, &course.id, 1).await;

        let detail = course_detail(&store, &course.id).await.unwrap();
        let order: Vec<i32> = detail.modules.iter().map(|m| m.no_module).collect();
        assert_eq!(order, vec![1, 2]);
        assert_eq!(detail.average_rating, None);
        assert_eq!(detail.rating_count, 0);
    }
}
