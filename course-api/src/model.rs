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

//! Domain entities shared by every store backend.
//!
//! Rows derive `sqlx::FromRow` so the Postgres store can map query results
//! directly; the in-memory store keeps the same structs in its maps.

use chrono::{DateTime, Utc};
use course_types::responses::{
    AccountResponse, AssignmentResponse, CategoryResponse, CourseResponse, EnrollmentResponse,
    FavoriteResponse, MediaResponse, ModuleResponse, QuizResponse, RatingResponse,
    SubmissionResponse,
};
use course_types::Role;

/// A customer or instructor. Both realms share one shape; instructors are
/// always active.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: String,
    pub role: Role,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub profile_image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub description: String,
    pub objective: String,
    pub price: i64,
    pub discount: i32,
    pub thumbnail: Option<String>,
    pub capacity: i32,
    pub instructor_id: String,
    pub category_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Module {
    pub id: String,
    pub name: String,
    pub content: String,
    pub course_id: String,
    pub no_module: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct MediaModule {
    pub id: String,
    pub url: String,
    pub module_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub description: String,
    pub module_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A customer's submission for an assignment (`customer_assignments`).
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Submission {
    pub id: String,
    pub file: String,
    pub grade: Option<i32>,
    pub assignment_id: String,
    pub customer_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Enrollment record (`customer_courses`).
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Enrollment {
    pub id: String,
    pub customer_id: String,
    pub course_id: String,
    pub status: bool,
    pub no_module: i32,
    pub is_finish: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Favorite {
    pub id: String,
    pub customer_id: String,
    pub course_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Rating {
    pub id: String,
    pub rating: i32,
    pub testimonial: String,
    pub is_publish: bool,
    pub customer_id: String,
    pub course_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Quiz {
    pub id: String,
    pub course_id: String,
    pub link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// -- Conversions to API response types --

impl From<Account> for AccountResponse {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            role: a.role,
            name: a.name,
            email: a.email,
            profile_image: a.profile_image,
            is_active: a.is_active,
            created_at: a.created_at.timestamp(),
        }
    }
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            created_at: c.created_at.timestamp(),
            updated_at: c.updated_at.timestamp(),
        }
    }
}

impl From<Course> for CourseResponse {
    fn from(c: Course) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            objective: c.objective,
            price: c.price,
            discount: c.discount,
            thumbnail: c.thumbnail,
            capacity: c.capacity,
            instructor_id: c.instructor_id,
            category_id: c.category_id,
            created_at: c.created_at.timestamp(),
            updated_at: c.updated_at.timestamp(),
        }
    }
}

impl From<Module> for ModuleResponse {
    fn from(m: Module) -> Self {
        Self {
            id: m.id,
            name: m.name,
            content: m.content,
            course_id: m.course_id,
            no_module: m.no_module,
            created_at: m.created_at.timestamp(),
            updated_at: m.updated_at.timestamp(),
        }
    }
}

impl From<MediaModule> for MediaResponse {
    fn from(m: MediaModule) -> Self {
        Self {
            id: m.id,
            url: m.url,
            module_id: m.module_id,
            created_at: m.created_at.timestamp(),
        }
    }
}

impl From<Assignment> for AssignmentResponse {
    fn from(a: Assignment) -> Self {
        Self {
            id: a.id,
            title: a.title,
            description: a.description,
            module_id: a.module_id,
            created_at: a.created_at.timestamp(),
            updated_at: a.updated_at.timestamp(),
        }
    }
}

impl From<Submission> for SubmissionResponse {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            file: s.file,
            grade: s.grade,
            assignment_id: s.assignment_id,
            customer_id: s.customer_id,
            created_at: s.created_at.timestamp(),
            updated_at: s.updated_at.timestamp(),
        }
    }
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(e: Enrollment) -> Self {
        Self {
            id: e.id,
            customer_id: e.customer_id,
            course_id: e.course_id,
            status: e.status,
            no_module: e.no_module,
            is_finish: e.is_finish,
            created_at: e.created_at.timestamp(),
            updated_at: e.updated_at.timestamp(),
        }
    }
}

impl From<Favorite> for FavoriteResponse {
    fn from(f: Favorite) -> Self {
        Self {
            id: f.id,
            customer_id: f.customer_id,
            course_id: f.course_id,
            created_at: f.created_at.timestamp(),
        }
    }
}

impl From<Rating> for RatingResponse {
    fn from(r: Rating) -> Self {
        Self {
            id: r.id,
            rating: r.rating,
            testimonial: r.testimonial,
            is_publish: r.is_publish,
            customer_id: r.customer_id,
            course_id: r.course_id,
            created_at: r.created_at.timestamp(),
        }
    }
}

impl From<Quiz> for QuizResponse {
    fn from(q: Quiz) -> Self {
        Self {
            id: q.id,
            course_id: q.course_id,
            link: q.link,
            created_at: q.created_at.timestamp(),
            updated_at: q.updated_at.timestamp(),
        }
    }
}
