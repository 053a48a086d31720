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

//! Repository layer.
//!
//! [`CourseStore`] is the only way services touch persisted state. Two
//! backends implement it:
//! - [`memory::InMemoryStore`]: maps behind one `RwLock`, used for local
//!   development and tests. Not durable.
//! - [`postgres::PgStore`]: PostgreSQL through sqlx. Schema comes from the
//!   migrations in `course-api/migrations`.
//!
//! Operations that touch more than one row (`enroll`, `unenroll`,
//! `delete_course`, `delete_module`) are atomic in both backends: a failure
//! leaves no partial writes behind.
//!
//! Reads never return soft-deleted rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use course_types::Role;
use thiserror::Error;

use crate::model::{
    Account, Assignment, Category, Course, Enrollment, Favorite, MediaModule, Module, Quiz,
    Rating, Submission,
};

pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0} already exists")]
    Conflict(&'static str),
    #[error("course capacity exceeded")]
    CapacityExceeded,
    /// Live rows still reference the entity.
    #[error("{0} is still in use")]
    InUse(&'static str),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Filters for course listings. `None` means "don't filter".
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    /// Case-insensitive substring of the course name.
    pub name: Option<String>,
    pub category_id: Option<String>,
    pub instructor_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub profile_image: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CoursePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub objective: Option<String>,
    pub price: Option<i64>,
    pub discount: Option<i32>,
    pub thumbnail: Option<String>,
    pub capacity: Option<i32>,
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ModulePatch {
    pub name: Option<String>,
    pub content: Option<String>,
    pub no_module: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionPatch {
    pub file: Option<String>,
    pub grade: Option<i32>,
}

#[async_trait]
pub trait CourseStore: Send + Sync {
    // -- Accounts --

    /// Insert a new account. `Conflict("email")` if the email is taken in that realm.
    async fn create_account(&self, account: Account) -> StoreResult<Account>;
    async fn find_account_by_email(&self, role: Role, email: &str)
        -> StoreResult<Option<Account>>;
    async fn get_account(&self, role: Role, id: &str) -> StoreResult<Option<Account>>;
    async fn update_account(&self, role: Role, id: &str, patch: AccountPatch)
        -> StoreResult<Account>;

    // -- Token revocation --

    /// Revoke a token id until `expires_at`. Revoking twice is a no-op.
    async fn revoke_token(&self, jti: &str, expires_at: DateTime<Utc>) -> StoreResult<()>;
    async fn is_token_revoked(&self, jti: &str) -> StoreResult<bool>;
    /// Forget revocations whose token has expired anyway. Returns the number removed.
    async fn purge_expired_tokens(&self) -> StoreResult<u64>;

    // -- Categories --

    async fn create_category(&self, category: Category) -> StoreResult<Category>;
    async fn list_categories(&self) -> StoreResult<Vec<Category>>;
    async fn get_category(&self, id: &str) -> StoreResult<Option<Category>>;
    async fn update_category(&self, id: &str, patch: CategoryPatch) -> StoreResult<Category>;
    async fn delete_category(&self, id: &str) -> StoreResult<()>;

    // -- Courses --

    async fn create_course(&self, course: Course) -> StoreResult<Course>;
    async fn list_courses(&self, filter: &CourseFilter) -> StoreResult<Vec<Course>>;
    async fn get_course(&self, id: &str) -> StoreResult<Option<Course>>;
    async fn update_course(&self, id: &str, patch: CoursePatch) -> StoreResult<Course>;
    /// Soft-delete a course with its modules, media, assignments, quizzes and
    /// enrollments; hard-delete its favorites and ratings.
    async fn delete_course(&self, id: &str) -> StoreResult<()>;

    // -- Modules & media --

    async fn create_module(&self, module: Module) -> StoreResult<Module>;
    /// Modules of a course ordered by `no_module`.
    async fn list_modules(&self, course_id: &str) -> StoreResult<Vec<Module>>;
    async fn count_modules(&self, course_id: &str) -> StoreResult<i64>;
    async fn get_module(&self, id: &str) -> StoreResult<Option<Module>>;
    async fn update_module(&self, id: &str, patch: ModulePatch) -> StoreResult<Module>;
    /// Soft-delete a module with its media and assignment.
    async fn delete_module(&self, id: &str) -> StoreResult<()>;

    async fn create_media(&self, media: MediaModule) -> StoreResult<MediaModule>;
    async fn list_media(&self, module_id: &str) -> StoreResult<Vec<MediaModule>>;
    async fn get_media(&self, id: &str) -> StoreResult<Option<MediaModule>>;
    async fn update_media(&self, id: &str, url: &str) -> StoreResult<MediaModule>;
    async fn delete_media(&self, id: &str) -> StoreResult<()>;

    // -- Quizzes --

    async fn create_quiz(&self, quiz: Quiz) -> StoreResult<Quiz>;
    async fn list_quizzes(&self, course_id: &str) -> StoreResult<Vec<Quiz>>;
    async fn get_quiz(&self, id: &str) -> StoreResult<Option<Quiz>>;
    async fn update_quiz(&self, id: &str, link: &str) -> StoreResult<Quiz>;
    async fn delete_quiz(&self, id: &str) -> StoreResult<()>;

    // -- Assignments & submissions --

    /// `Conflict("assignment")` if the module already has a live assignment.
    async fn create_assignment(&self, assignment: Assignment) -> StoreResult<Assignment>;
    async fn get_assignment(&self, id: &str) -> StoreResult<Option<Assignment>>;
    async fn find_assignment_by_module(&self, module_id: &str)
        -> StoreResult<Option<Assignment>>;
    async fn update_assignment(&self, id: &str, patch: AssignmentPatch)
        -> StoreResult<Assignment>;
    async fn delete_assignment(&self, id: &str) -> StoreResult<()>;

    /// `Conflict("submission")` if the customer already submitted this assignment.
    async fn create_submission(&self, submission: Submission) -> StoreResult<Submission>;
    async fn get_submission(&self, id: &str) -> StoreResult<Option<Submission>>;
    async fn list_submissions_by_assignment(&self, assignment_id: &str)
        -> StoreResult<Vec<Submission>>;
    async fn list_submissions_by_customer(&self, customer_id: &str)
        -> StoreResult<Vec<Submission>>;
    async fn update_submission(&self, id: &str, patch: SubmissionPatch)
        -> StoreResult<Submission>;
    /// Hard delete.
    async fn delete_submission(&self, id: &str) -> StoreResult<()>;

    // -- Enrollment --

    /// Take a seat in a course: insert the enrollment and decrement the
    /// course capacity as one atomic step.
    ///
    /// Errors: `NotFound("course")`, `CapacityExceeded`,
    /// `Conflict("enrollment")` when the customer is already enrolled.
    async fn enroll(&self, enrollment: Enrollment) -> StoreResult<Enrollment>;
    /// Give a seat back: soft-delete the customer's enrollment and increment
    /// the course capacity as one atomic step. Returns the updated course.
    ///
    /// Errors: `NotFound("enrollment")` when no live enrollment with this id
    /// belongs to `customer_id`.
    async fn unenroll(&self, enrollment_id: &str, customer_id: &str) -> StoreResult<Course>;
    async fn get_enrollment(&self, id: &str) -> StoreResult<Option<Enrollment>>;
    async fn find_enrollment(&self, course_id: &str, customer_id: &str)
        -> StoreResult<Option<Enrollment>>;
    async fn list_enrollments_by_customer(&self, customer_id: &str)
        -> StoreResult<Vec<Enrollment>>;
    async fn list_enrollments_by_course(&self, course_id: &str) -> StoreResult<Vec<Enrollment>>;
    async fn update_progress(&self, id: &str, no_module: i32, is_finish: bool)
        -> StoreResult<Enrollment>;

    // -- Favorites & ratings --

    /// `Conflict("favorite")` on a duplicate (customer, course) pair.
    async fn create_favorite(&self, favorite: Favorite) -> StoreResult<Favorite>;
    async fn get_favorite(&self, id: &str) -> StoreResult<Option<Favorite>>;
    async fn list_favorites(&self, customer_id: &str) -> StoreResult<Vec<Favorite>>;
    /// Hard delete.
    async fn delete_favorite(&self, id: &str) -> StoreResult<()>;

    /// `Conflict("rating")` on a duplicate (customer, course) pair.
    async fn create_rating(&self, rating: Rating) -> StoreResult<Rating>;
    async fn get_rating(&self, id: &str) -> StoreResult<Option<Rating>>;
    async fn list_ratings(&self, course_id: &str, published_only: bool)
        -> StoreResult<Vec<Rating>>;
    async fn set_rating_published(&self, id: &str, is_publish: bool) -> StoreResult<Rating>;
    /// Hard delete.
    async fn delete_rating(&self, id: &str) -> StoreResult<()>;

    // -- Operations --

    async fn health_check(&self) -> StoreResult<()>;
    fn backend_name(&self) -> &'static str;
}
