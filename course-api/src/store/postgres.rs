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

//! PostgreSQL implementation of [`CourseStore`].
//!
//! Multi-row operations run inside one transaction. `enroll` and `unenroll`
//! take a row lock on the course (`SELECT … FOR UPDATE` / `UPDATE`) so two
//! concurrent requests for the same course cannot lose a capacity update.
//! Uniqueness (emails, enrollments, favorites, ratings, submissions, one
//! assignment per module) is enforced by unique indexes and surfaces as
//! [`StoreError::Conflict`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use course_types::Role;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{
    AccountPatch, AssignmentPatch, CategoryPatch, CourseFilter, CoursePatch, CourseStore,
    ModulePatch, StoreError, StoreResult, SubmissionPatch,
};
use crate::model::{
    Account, Assignment, Category, Course, Enrollment, Favorite, MediaModule, Module, Quiz,
    Rating, Submission,
};

const CATEGORY_COLUMNS: &str = "id, name, description, created_at, updated_at";
const COURSE_COLUMNS: &str = r#"
    id, name, description, objective, price, discount, thumbnail, capacity,
    instructor_id, category_id, created_at, updated_at
"#;
const MODULE_COLUMNS: &str = "id, name, content, course_id, no_module, created_at, updated_at";
const MEDIA_COLUMNS: &str = "id, url, module_id, created_at, updated_at";
const QUIZ_COLUMNS: &str = "id, course_id, link, created_at, updated_at";
const ASSIGNMENT_COLUMNS: &str = "id, title, description, module_id, created_at, updated_at";
const SUBMISSION_COLUMNS: &str =
    "id, file, grade, assignment_id, customer_id, created_at, updated_at";
const ENROLLMENT_COLUMNS: &str =
    "id, customer_id, course_id, status, no_module, is_finish, created_at, updated_at";
const FAVORITE_COLUMNS: &str = "id, customer_id, course_id, created_at";
const RATING_COLUMNS: &str =
    "id, rating, testimonial, is_publish, customer_id, course_id, created_at, updated_at";

/// Row returned from the `customers` / `instructors` tables.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    profile_image: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self, role: Role) -> Account {
        Account {
            id: self.id,
            role,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            profile_image: self.profile_image,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn account_table(role: Role) -> &'static str {
    match role {
        Role::Customer => "customers",
        Role::Instructor => "instructors",
    }
}

/// Instructors have no `is_active` column; they are always active.
fn account_columns(role: Role) -> &'static str {
    match role {
        Role::Customer => {
            "id, name, email, password_hash, profile_image, is_active, created_at, updated_at"
        }
        Role::Instructor => {
            "id, name, email, password_hash, profile_image, TRUE AS is_active, created_at, updated_at"
        }
    }
}

/// Map a unique-index violation to `Conflict(what)`, anything else to `Database`.
fn conflict_on_unique(err: sqlx::Error, what: &'static str) -> StoreError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            StoreError::Conflict(what)
        }
        other => StoreError::Database(other),
    }
}

/// Build an `ILIKE` substring pattern with `%`, `_` and `\` escaped.
fn contains_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Durable store backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Apply the embedded migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CourseStore for PgStore {
    // -- Accounts --

    async fn create_account(&self, account: Account) -> StoreResult<Account> {
        let role = account.role;
        let row = match role {
            Role::Customer => {
                let query = format!(
                    r#"
                    INSERT INTO customers
                        (id, name, email, password_hash, profile_image, is_active, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    RETURNING {}
                    "#,
                    account_columns(role)
                );
                sqlx::query_as::<_, AccountRow>(&query)
                    .bind(&account.id)
                    .bind(&account.name)
                    .bind(&account.email)
                    .bind(&account.password_hash)
                    .bind(&account.profile_image)
                    .bind(account.is_active)
                    .bind(account.created_at)
                    .bind(account.updated_at)
                    .fetch_one(&self.pool)
                    .await
            }
            Role::Instructor => {
                let query = format!(
                    r#"
                    INSERT INTO instructors
                        (id, name, email, password_hash, profile_image, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    RETURNING {}
                    "#,
                    account_columns(role)
                );
                sqlx::query_as::<_, AccountRow>(&query)
                    .bind(&account.id)
                    .bind(&account.name)
                    .bind(&account.email)
                    .bind(&account.password_hash)
                    .bind(&account.profile_image)
                    .bind(account.created_at)
                    .bind(account.updated_at)
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(|e| conflict_on_unique(e, "email"))?;
        Ok(row.into_account(role))
    }

    async fn find_account_by_email(
        &self,
        role: Role,
        email: &str,
    ) -> StoreResult<Option<Account>> {
        let query = format!(
            "SELECT {} FROM {} WHERE email = $1 AND deleted_at IS NULL",
            account_columns(role),
            account_table(role)
        );
        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.into_account(role)))
    }

    async fn get_account(&self, role: Role, id: &str) -> StoreResult<Option<Account>> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = $1 AND deleted_at IS NULL",
            account_columns(role),
            account_table(role)
        );
        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.into_account(role)))
    }

    async fn update_account(
        &self,
        role: Role,
        id: &str,
        patch: AccountPatch,
    ) -> StoreResult<Account> {
        let query = format!(
            r#"
            UPDATE {}
            SET name = COALESCE($2, name),
                profile_image = COALESCE($3, profile_image),
                password_hash = COALESCE($4, password_hash),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            account_table(role),
            account_columns(role)
        );
        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(id)
            .bind(patch.name)
            .bind(patch.profile_image)
            .bind(patch.password_hash)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("account"))?;
        Ok(row.into_account(role))
    }

    // -- Token revocation --

    async fn revoke_token(&self, jti: &str, expires_at: DateTime<Utc>) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (jti, expires_at)
            VALUES ($1, $2)
            ON CONFLICT (jti) DO NOTHING
            "#,
        )
        .bind(jti)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn is_token_revoked(&self, jti: &str) -> StoreResult<bool> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM revoked_tokens WHERE jti = $1)")
                .bind(jti)
                .fetch_one(&self.pool)
                .await?;
        Ok(row.0)
    }

    async fn purge_expired_tokens(&self) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // -- Categories --

    async fn create_category(&self, category: Category) -> StoreResult<Category> {
        let query = format!(
            r#"
            INSERT INTO categories (id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CATEGORY_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, Category>(&query)
            .bind(&category.id)
            .bind(&category.name)
            .bind(&category.description)
            .bind(category.created_at)
            .bind(category.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let query = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE deleted_at IS NULL ORDER BY name, id"
        );
        Ok(sqlx::query_as::<_, Category>(&query)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_category(&self, id: &str) -> StoreResult<Option<Category>> {
        let query =
            format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1 AND deleted_at IS NULL");
        Ok(sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_category(&self, id: &str, patch: CategoryPatch) -> StoreResult<Category> {
        let query = format!(
            r#"
            UPDATE categories
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {CATEGORY_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(patch.name)
            .bind(patch.description)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("category"))
    }

    async fn delete_category(&self, id: &str) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        // The row lock conflicts with the foreign key check of a concurrent
        // course insert, so no course can slip in before the delete commits.
        let found: Option<(String,)> = sqlx::query_as(
            "SELECT id FROM categories WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        if found.is_none() {
            return Err(StoreError::NotFound("category"));
        }

        let (in_use,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM courses WHERE category_id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if in_use {
            return Err(StoreError::InUse("category"));
        }

        sqlx::query("UPDATE categories SET deleted_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    // -- Courses --

    async fn create_course(&self, course: Course) -> StoreResult<Course> {
        let query = format!(
            r#"
            INSERT INTO courses
                (id, name, description, objective, price, discount, thumbnail, capacity,
                 instructor_id, category_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {COURSE_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, Course>(&query)
            .bind(&course.id)
            .bind(&course.name)
            .bind(&course.description)
            .bind(&course.objective)
            .bind(course.price)
            .bind(course.discount)
            .bind(&course.thumbnail)
            .bind(course.capacity)
            .bind(&course.instructor_id)
            .bind(&course.category_id)
            .bind(course.created_at)
            .bind(course.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_courses(&self, filter: &CourseFilter) -> StoreResult<Vec<Course>> {
        let query = format!(
            r#"
            SELECT {COURSE_COLUMNS}
            FROM courses
            WHERE deleted_at IS NULL
              AND ($1::text IS NULL OR name ILIKE $1)
              AND ($2::text IS NULL OR category_id = $2)
              AND ($3::text IS NULL OR instructor_id = $3)
            ORDER BY created_at DESC, id
            "#
        );
        Ok(sqlx::query_as::<_, Course>(&query)
            .bind(filter.name.as_deref().map(contains_pattern))
            .bind(filter.category_id.as_deref())
            .bind(filter.instructor_id.as_deref())
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_course(&self, id: &str) -> StoreResult<Option<Course>> {
        let query =
            format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1 AND deleted_at IS NULL");
        Ok(sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_course(&self, id: &str, patch: CoursePatch) -> StoreResult<Course> {
        let query = format!(
            r#"
            UPDATE courses
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                objective = COALESCE($4, objective),
                price = COALESCE($5, price),
                discount = COALESCE($6, discount),
                thumbnail = COALESCE($7, thumbnail),
                capacity = COALESCE($8, capacity),
                category_id = COALESCE($9, category_id),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {COURSE_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(patch.name)
            .bind(patch.description)
            .bind(patch.objective)
            .bind(patch.price)
            .bind(patch.discount)
            .bind(patch.thumbnail)
            .bind(patch.capacity)
            .bind(patch.category_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("course"))
    }

    async fn delete_course(&self, id: &str) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            "UPDATE courses SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if deleted.rows_affected() == 0 {
            return Err(StoreError::NotFound("course"));
        }

        sqlx::query(
            r#"
            UPDATE media_modules SET deleted_at = NOW()
            WHERE deleted_at IS NULL
              AND module_id IN (SELECT id FROM modules WHERE course_id = $1 AND deleted_at IS NULL)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            r#"
            UPDATE assignments SET deleted_at = NOW()
            WHERE deleted_at IS NULL
              AND module_id IN (SELECT id FROM modules WHERE course_id = $1 AND deleted_at IS NULL)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        for table in ["modules", "quizzes", "customer_courses"] {
            let query = format!(
                "UPDATE {table} SET deleted_at = NOW() WHERE course_id = $1 AND deleted_at IS NULL"
            );
            sqlx::query(&query).bind(id).execute(&mut *tx).await?;
        }
        for table in ["favorites", "ratings"] {
            let query = format!("DELETE FROM {table} WHERE course_id = $1");
            sqlx::query(&query).bind(id).execute(&mut *tx).await?;
        }

        tx.commit().await?;
        tracing::debug!(course_id = id, "course deleted with dependents");
        Ok(())
    }

    // -- Modules & media --

    async fn create_module(&self, module: Module) -> StoreResult<Module> {
        let query = format!(
            r#"
            INSERT INTO modules (id, name, content, course_id, no_module, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {MODULE_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, Module>(&query)
            .bind(&module.id)
            .bind(&module.name)
            .bind(&module.content)
            .bind(&module.course_id)
            .bind(module.no_module)
            .bind(module.created_at)
            .bind(module.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_modules(&self, course_id: &str) -> StoreResult<Vec<Module>> {
        let query = format!(
            r#"
            SELECT {MODULE_COLUMNS} FROM modules
            WHERE course_id = $1 AND deleted_at IS NULL
            ORDER BY no_module, created_at
            "#
        );
        Ok(sqlx::query_as::<_, Module>(&query)
            .bind(course_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn count_modules(&self, course_id: &str) -> StoreResult<i64> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM modules WHERE course_id = $1 AND deleted_at IS NULL",
        )
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }

    async fn get_module(&self, id: &str) -> StoreResult<Option<Module>> {
        let query =
            format!("SELECT {MODULE_COLUMNS} FROM modules WHERE id = $1 AND deleted_at IS NULL");
        Ok(sqlx::query_as::<_, Module>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_module(&self, id: &str, patch: ModulePatch) -> StoreResult<Module> {
        let query = format!(
            r#"
            UPDATE modules
            SET name = COALESCE($2, name),
                content = COALESCE($3, content),
                no_module = COALESCE($4, no_module),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {MODULE_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Module>(&query)
            .bind(id)
            .bind(patch.name)
            .bind(patch.content)
            .bind(patch.no_module)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("module"))
    }

    async fn delete_module(&self, id: &str) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            "UPDATE modules SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if deleted.rows_affected() == 0 {
            return Err(StoreError::NotFound("module"));
        }
        for table in ["media_modules", "assignments"] {
            let query = format!(
                "UPDATE {table} SET deleted_at = NOW() WHERE module_id = $1 AND deleted_at IS NULL"
            );
            sqlx::query(&query).bind(id).execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn create_media(&self, media: MediaModule) -> StoreResult<MediaModule> {
        let query = format!(
            r#"
            INSERT INTO media_modules (id, url, module_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {MEDIA_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, MediaModule>(&query)
            .bind(&media.id)
            .bind(&media.url)
            .bind(&media.module_id)
            .bind(media.created_at)
            .bind(media.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_media(&self, module_id: &str) -> StoreResult<Vec<MediaModule>> {
        let query = format!(
            r#"
            SELECT {MEDIA_COLUMNS} FROM media_modules
            WHERE module_id = $1 AND deleted_at IS NULL
            ORDER BY created_at, id
            "#
        );
        Ok(sqlx::query_as::<_, MediaModule>(&query)
            .bind(module_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_media(&self, id: &str) -> StoreResult<Option<MediaModule>> {
        let query = format!(
            "SELECT {MEDIA_COLUMNS} FROM media_modules WHERE id = $1 AND deleted_at IS NULL"
        );
        Ok(sqlx::query_as::<_, MediaModule>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_media(&self, id: &str, url: &str) -> StoreResult<MediaModule> {
        let query = format!(
            r#"
            UPDATE media_modules SET url = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {MEDIA_COLUMNS}
            "#
        );
        sqlx::query_as::<_, MediaModule>(&query)
            .bind(id)
            .bind(url)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("media"))
    }

    async fn delete_media(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE media_modules SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("media"));
        }
        Ok(())
    }

    // -- Quizzes --

    async fn create_quiz(&self, quiz: Quiz) -> StoreResult<Quiz> {
        let query = format!(
            r#"
            INSERT INTO quizzes (id, course_id, link, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {QUIZ_COLUMNS}
            "#
        );
        Ok(sqlx::query_as::<_, Quiz>(&query)
            .bind(&quiz.id)
            .bind(&quiz.course_id)
            .bind(&quiz.link)
            .bind(quiz.created_at)
            .bind(quiz.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_quizzes(&self, course_id: &str) -> StoreResult<Vec<Quiz>> {
        let query = format!(
            r#"
            SELECT {QUIZ_COLUMNS} FROM quizzes
            WHERE course_id = $1 AND deleted_at IS NULL
            ORDER BY created_at, id
            "#
        );
        Ok(sqlx::query_as::<_, Quiz>(&query)
            .bind(course_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_quiz(&self, id: &str) -> StoreResult<Option<Quiz>> {
        let query =
            format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1 AND deleted_at IS NULL");
        Ok(sqlx::query_as::<_, Quiz>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_quiz(&self, id: &str, link: &str) -> StoreResult<Quiz> {
        let query = format!(
            r#"
            UPDATE quizzes SET link = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {QUIZ_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Quiz>(&query)
            .bind(id)
            .bind(link)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("quiz"))
    }

    async fn delete_quiz(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE quizzes SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("quiz"));
        }
        Ok(())
    }

    // -- Assignments & submissions --

    async fn create_assignment(&self, assignment: Assignment) -> StoreResult<Assignment> {
        let query = format!(
            r#"
            INSERT INTO assignments (id, title, description, module_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ASSIGNMENT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(&assignment.id)
            .bind(&assignment.title)
            .bind(&assignment.description)
            .bind(&assignment.module_id)
            .bind(assignment.created_at)
            .bind(assignment.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "assignment"))
    }

    async fn get_assignment(&self, id: &str) -> StoreResult<Option<Assignment>> {
        let query = format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = $1 AND deleted_at IS NULL"
        );
        Ok(sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_assignment_by_module(
        &self,
        module_id: &str,
    ) -> StoreResult<Option<Assignment>> {
        let query = format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE module_id = $1 AND deleted_at IS NULL"
        );
        Ok(sqlx::query_as::<_, Assignment>(&query)
            .bind(module_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_assignment(
        &self,
        id: &str,
        patch: AssignmentPatch,
    ) -> StoreResult<Assignment> {
        let query = format!(
            r#"
            UPDATE assignments
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {ASSIGNMENT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .bind(patch.title)
            .bind(patch.description)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("assignment"))
    }

    async fn delete_assignment(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE assignments SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("assignment"));
        }
        Ok(())
    }

    async fn create_submission(&self, submission: Submission) -> StoreResult<Submission> {
        let query = format!(
            r#"
            INSERT INTO customer_assignments
                (id, file, grade, assignment_id, customer_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {SUBMISSION_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(&submission.id)
            .bind(&submission.file)
            .bind(submission.grade)
            .bind(&submission.assignment_id)
            .bind(&submission.customer_id)
            .bind(submission.created_at)
            .bind(submission.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "submission"))
    }

    async fn get_submission(&self, id: &str) -> StoreResult<Option<Submission>> {
        let query = format!("SELECT {SUBMISSION_COLUMNS} FROM customer_assignments WHERE id = $1");
        Ok(sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_submissions_by_assignment(
        &self,
        assignment_id: &str,
    ) -> StoreResult<Vec<Submission>> {
        let query = format!(
            r#"
            SELECT {SUBMISSION_COLUMNS} FROM customer_assignments
            WHERE assignment_id = $1
            ORDER BY created_at, id
            "#
        );
        Ok(sqlx::query_as::<_, Submission>(&query)
            .bind(assignment_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_submissions_by_customer(
        &self,
        customer_id: &str,
    ) -> StoreResult<Vec<Submission>> {
        let query = format!(
            r#"
            SELECT {SUBMISSION_COLUMNS} FROM customer_assignments
            WHERE customer_id = $1
              AND assignment_id IN (SELECT id FROM assignments WHERE deleted_at IS NULL)
            ORDER BY created_at, id
            "#
        );
        Ok(sqlx::query_as::<_, Submission>(&query)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_submission(
        &self,
        id: &str,
        patch: SubmissionPatch,
    ) -> StoreResult<Submission> {
        let query = format!(
            r#"
            UPDATE customer_assignments
            SET file = COALESCE($2, file),
                grade = COALESCE($3, grade),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SUBMISSION_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .bind(patch.file)
            .bind(patch.grade)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("submission"))
    }

    async fn delete_submission(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM customer_assignments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("submission"));
        }
        Ok(())
    }

    // -- Enrollment --

    async fn enroll(&self, enrollment: Enrollment) -> StoreResult<Enrollment> {
        let mut tx = self.pool.begin().await?;

        // Lock the course row so concurrent enrollments serialize on capacity.
        let capacity: Option<(i32,)> = sqlx::query_as(
            "SELECT capacity FROM courses WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(&enrollment.course_id)
        .fetch_optional(&mut *tx)
        .await?;
        let (capacity,) = capacity.ok_or(StoreError::NotFound("course"))?;
        if capacity <= 0 {
            return Err(StoreError::CapacityExceeded);
        }

        let existing: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT id FROM customer_courses
            WHERE course_id = $1 AND customer_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(&enrollment.course_id)
        .bind(&enrollment.customer_id)
        .fetch_optional(&mut *tx)
        .await?;
        if existing.is_some() {
            return Err(StoreError::Conflict("enrollment"));
        }

        let query = format!(
            r#"
            INSERT INTO customer_courses
                (id, customer_id, course_id, status, no_module, is_finish, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ENROLLMENT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, Enrollment>(&query)
            .bind(&enrollment.id)
            .bind(&enrollment.customer_id)
            .bind(&enrollment.course_id)
            .bind(enrollment.status)
            .bind(enrollment.no_module)
            .bind(enrollment.is_finish)
            .bind(enrollment.created_at)
            .bind(enrollment.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| conflict_on_unique(e, "enrollment"))?;

        sqlx::query("UPDATE courses SET capacity = capacity - 1, updated_at = NOW() WHERE id = $1")
            .bind(&enrollment.course_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn unenroll(&self, enrollment_id: &str, customer_id: &str) -> StoreResult<Course> {
        let mut tx = self.pool.begin().await?;

        let removed: Option<(String,)> = sqlx::query_as(
            r#"
            UPDATE customer_courses SET deleted_at = NOW()
            WHERE id = $1 AND customer_id = $2 AND deleted_at IS NULL
            RETURNING course_id
            "#,
        )
        .bind(enrollment_id)
        .bind(customer_id)
        .fetch_optional(&mut *tx)
        .await?;
        let (course_id,) = removed.ok_or(StoreError::NotFound("enrollment"))?;

        let query = format!(
            r#"
            UPDATE courses SET capacity = capacity + 1, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {COURSE_COLUMNS}
            "#
        );
        let course = sqlx::query_as::<_, Course>(&query)
            .bind(&course_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound("course"))?;

        tx.commit().await?;
        Ok(course)
    }

    async fn get_enrollment(&self, id: &str) -> StoreResult<Option<Enrollment>> {
        let query = format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM customer_courses WHERE id = $1 AND deleted_at IS NULL"
        );
        Ok(sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_enrollment(
        &self,
        course_id: &str,
        customer_id: &str,
    ) -> StoreResult<Option<Enrollment>> {
        let query = format!(
            r#"
            SELECT {ENROLLMENT_COLUMNS} FROM customer_courses
            WHERE course_id = $1 AND customer_id = $2 AND deleted_at IS NULL
            "#
        );
        Ok(sqlx::query_as::<_, Enrollment>(&query)
            .bind(course_id)
            .bind(customer_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_enrollments_by_customer(
        &self,
        customer_id: &str,
    ) -> StoreResult<Vec<Enrollment>> {
        let query = format!(
            r#"
            SELECT {ENROLLMENT_COLUMNS} FROM customer_courses
            WHERE customer_id = $1 AND deleted_at IS NULL
            ORDER BY created_at, id
            "#
        );
        Ok(sqlx::query_as::<_, Enrollment>(&query)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_enrollments_by_course(&self, course_id: &str) -> StoreResult<Vec<Enrollment>> {
        let query = format!(
            r#"
            SELECT {ENROLLMENT_COLUMNS} FROM customer_courses
            WHERE course_id = $1 AND deleted_at IS NULL
            ORDER BY created_at, id
            "#
        );
        Ok(sqlx::query_as::<_, Enrollment>(&query)
            .bind(course_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_progress(
        &self,
        id: &str,
        no_module: i32,
        is_finish: bool,
    ) -> StoreResult<Enrollment> {
        let query = format!(
            r#"
            UPDATE customer_courses
            SET no_module = $2, is_finish = $3, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {ENROLLMENT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .bind(no_module)
            .bind(is_finish)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("enrollment"))
    }

    // -- Favorites & ratings --

    async fn create_favorite(&self, favorite: Favorite) -> StoreResult<Favorite> {
        let query = format!(
            r#"
            INSERT INTO favorites (id, customer_id, course_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {FAVORITE_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Favorite>(&query)
            .bind(&favorite.id)
            .bind(&favorite.customer_id)
            .bind(&favorite.course_id)
            .bind(favorite.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "favorite"))
    }

    async fn get_favorite(&self, id: &str) -> StoreResult<Option<Favorite>> {
        let query = format!("SELECT {FAVORITE_COLUMNS} FROM favorites WHERE id = $1");
        Ok(sqlx::query_as::<_, Favorite>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_favorites(&self, customer_id: &str) -> StoreResult<Vec<Favorite>> {
        let query = format!(
            "SELECT {FAVORITE_COLUMNS} FROM favorites WHERE customer_id = $1 ORDER BY created_at, id"
        );
        Ok(sqlx::query_as::<_, Favorite>(&query)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn delete_favorite(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("favorite"));
        }
        Ok(())
    }

    async fn create_rating(&self, rating: Rating) -> StoreResult<Rating> {
        let query = format!(
            r#"
            INSERT INTO ratings
                (id, rating, testimonial, is_publish, customer_id, course_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {RATING_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Rating>(&query)
            .bind(&rating.id)
            .bind(rating.rating)
            .bind(&rating.testimonial)
            .bind(rating.is_publish)
            .bind(&rating.customer_id)
            .bind(&rating.course_id)
            .bind(rating.created_at)
            .bind(rating.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "rating"))
    }

    async fn get_rating(&self, id: &str) -> StoreResult<Option<Rating>> {
        let query = format!("SELECT {RATING_COLUMNS} FROM ratings WHERE id = $1");
        Ok(sqlx::query_as::<_, Rating>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_ratings(&self, course_id: &str, published_only: bool) -> StoreResult<Vec<Rating>> {
        let query = format!(
            r#"
            SELECT {RATING_COLUMNS} FROM ratings
            WHERE course_id = $1 AND (NOT $2 OR is_publish)
            ORDER BY created_at DESC, id
            "#
        );
        Ok(sqlx::query_as::<_, Rating>(&query)
            .bind(course_id)
            .bind(published_only)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn set_rating_published(&self, id: &str, is_publish: bool) -> StoreResult<Rating> {
        let query = format!(
            r#"
            UPDATE ratings SET is_publish = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {RATING_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Rating>(&query)
            .bind(id)
            .bind(is_publish)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("rating"))
    }

    async fn delete_rating(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM ratings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("rating"));
        }
        Ok(())
    }

    // -- Operations --

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("rust"), "%rust%");
        assert_eq!(contains_pattern("100%_off"), "%100\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn instructors_select_constant_is_active() {
        assert!(account_columns(Role::Instructor).contains("TRUE AS is_active"));
        assert_eq!(account_table(Role::Customer), "customers");
    }
}
