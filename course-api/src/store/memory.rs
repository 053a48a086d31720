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

//! In-memory implementation of [`CourseStore`].
//!
//! All tables live in one [`Tables`] value behind a single `tokio::sync::RwLock`.
//! Every mutation takes the write lock for its whole duration, so multi-row
//! operations (`enroll`, `unenroll`, cascading deletes) are atomic with respect
//! to each other. State is lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use course_types::Role;
use tokio::sync::RwLock;

use super::{
    AccountPatch, AssignmentPatch, CategoryPatch, CourseFilter, CoursePatch, CourseStore,
    ModulePatch, StoreError, StoreResult, SubmissionPatch,
};
use crate::model::{
    Account, Assignment, Category, Course, Enrollment, Favorite, MediaModule, Module, Quiz,
    Rating, Submission,
};

/// A soft-deletable row.
#[derive(Debug, Clone)]
struct Row<T> {
    value: T,
    deleted_at: Option<DateTime<Utc>>,
}

impl<T> Row<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            deleted_at: None,
        }
    }

    fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

fn live<'a, T>(map: &'a HashMap<String, Row<T>>, id: &str) -> Option<&'a T> {
    map.get(id).filter(|r| r.is_live()).map(|r| &r.value)
}

fn live_mut<'a, T>(map: &'a mut HashMap<String, Row<T>>, id: &str) -> Option<&'a mut T> {
    map.get_mut(id)
        .filter(|r| r.is_live())
        .map(|r| &mut r.value)
}

fn soft_delete<T>(map: &mut HashMap<String, Row<T>>, id: &str, what: &'static str) -> StoreResult<()> {
    let row = map
        .get_mut(id)
        .filter(|r| r.is_live())
        .ok_or(StoreError::NotFound(what))?;
    row.deleted_at = Some(Utc::now());
    Ok(())
}

fn live_values<'a, T: Clone + 'a>(
    map: &'a HashMap<String, Row<T>>,
    mut keep: impl FnMut(&T) -> bool,
) -> Vec<T> {
    map.values()
        .filter(|r| r.is_live() && keep(&r.value))
        .map(|r| r.value.clone())
        .collect()
}

#[derive(Debug, Default)]
struct Tables {
    customers: HashMap<String, Row<Account>>,
    instructors: HashMap<String, Row<Account>>,
    revoked_tokens: HashMap<String, DateTime<Utc>>,
    categories: HashMap<String, Row<Category>>,
    courses: HashMap<String, Row<Course>>,
    modules: HashMap<String, Row<Module>>,
    media: HashMap<String, Row<MediaModule>>,
    quizzes: HashMap<String, Row<Quiz>>,
    assignments: HashMap<String, Row<Assignment>>,
    submissions: HashMap<String, Submission>,
    enrollments: HashMap<String, Row<Enrollment>>,
    favorites: HashMap<String, Favorite>,
    ratings: HashMap<String, Rating>,
}

impl Tables {
    fn accounts(&self, role: Role) -> &HashMap<String, Row<Account>> {
        match role {
            Role::Customer => &self.customers,
            Role::Instructor => &self.instructors,
        }
    }

    fn accounts_mut(&mut self, role: Role) -> &mut HashMap<String, Row<Account>> {
        match role {
            Role::Customer => &mut self.customers,
            Role::Instructor => &mut self.instructors,
        }
    }

    /// Soft-delete everything hanging off a module (media and assignment).
    fn cascade_module(&mut self, module_id: &str, now: DateTime<Utc>) {
        for row in self
            .media
            .values_mut()
            .filter(|r| r.is_live() && r.value.module_id == module_id)
        {
            row.deleted_at = Some(now);
        }
        for row in self
            .assignments
            .values_mut()
            .filter(|r| r.is_live() && r.value.module_id == module_id)
        {
            row.deleted_at = Some(now);
        }
    }
}

/// Non-durable store for development and tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseStore for InMemoryStore {
    // -- Accounts --

    async fn create_account(&self, account: Account) -> StoreResult<Account> {
        let mut guard = self.tables.write().await;
        let accounts = guard.accounts_mut(account.role);
        if accounts
            .values()
            .any(|r| r.is_live() && r.value.email == account.email)
        {
            return Err(StoreError::Conflict("email"));
        }
        accounts.insert(account.id.clone(), Row::new(account.clone()));
        Ok(account)
    }

    async fn find_account_by_email(
        &self,
        role: Role,
        email: &str,
    ) -> StoreResult<Option<Account>> {
        let guard = self.tables.read().await;
        Ok(guard
            .accounts(role)
            .values()
            .find(|r| r.is_live() && r.value.email == email)
            .map(|r| r.value.clone()))
    }

    async fn get_account(&self, role: Role, id: &str) -> StoreResult<Option<Account>> {
        let guard = self.tables.read().await;
        Ok(live(guard.accounts(role), id).cloned())
    }

    async fn update_account(
        &self,
        role: Role,
        id: &str,
        patch: AccountPatch,
    ) -> StoreResult<Account> {
        let mut guard = self.tables.write().await;
        let account =
            live_mut(guard.accounts_mut(role), id).ok_or(StoreError::NotFound("account"))?;
        if let Some(name) = patch.name {
            account.name = name;
        }
        if let Some(image) = patch.profile_image {
            account.profile_image = Some(image);
        }
        if let Some(hash) = patch.password_hash {
            account.password_hash = hash;
        }
        account.updated_at = Utc::now();
        Ok(account.clone())
    }

    // -- Token revocation --

    async fn revoke_token(&self, jti: &str, expires_at: DateTime<Utc>) -> StoreResult<()> {
        let mut guard = self.tables.write().await;
        guard.revoked_tokens.insert(jti.to_string(), expires_at);
        Ok(())
    }

    async fn is_token_revoked(&self, jti: &str) -> StoreResult<bool> {
        let guard = self.tables.read().await;
        Ok(guard.revoked_tokens.contains_key(jti))
    }

    async fn purge_expired_tokens(&self) -> StoreResult<u64> {
        let mut guard = self.tables.write().await;
        let now = Utc::now();
        let before = guard.revoked_tokens.len();
        guard.revoked_tokens.retain(|_, expires_at| *expires_at > now);
        Ok((before - guard.revoked_tokens.len()) as u64)
    }

    // -- Categories --

    async fn create_category(&self, category: Category) -> StoreResult<Category> {
        let mut guard = self.tables.write().await;
        guard
            .categories
            .insert(category.id.clone(), Row::new(category.clone()));
        Ok(category)
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let guard = self.tables.read().await;
        let mut items = live_values(&guard.categories, |_| true);
        items.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn get_category(&self, id: &str) -> StoreResult<Option<Category>> {
        let guard = self.tables.read().await;
        Ok(live(&guard.categories, id).cloned())
    }

    async fn update_category(&self, id: &str, patch: CategoryPatch) -> StoreResult<Category> {
        let mut guard = self.tables.write().await;
        let category =
            live_mut(&mut guard.categories, id).ok_or(StoreError::NotFound("category"))?;
        if let Some(name) = patch.name {
            category.name = name;
        }
        if let Some(description) = patch.description {
            category.description = description;
        }
        category.updated_at = Utc::now();
        Ok(category.clone())
    }

    async fn delete_category(&self, id: &str) -> StoreResult<()> {
        let mut guard = self.tables.write().await;
        if live(&guard.categories, id).is_none() {
            return Err(StoreError::NotFound("category"));
        }
        if guard
            .courses
            .values()
            .any(|r| r.is_live() && r.value.category_id == id)
        {
            return Err(StoreError::InUse("category"));
        }
        soft_delete(&mut guard.categories, id, "category")
    }

    // -- Courses --

    async fn create_course(&self, course: Course) -> StoreResult<Course> {
        let mut guard = self.tables.write().await;
        guard
            .courses
            .insert(course.id.clone(), Row::new(course.clone()));
        Ok(course)
    }

    async fn list_courses(&self, filter: &CourseFilter) -> StoreResult<Vec<Course>> {
        let guard = self.tables.read().await;
        let needle = filter.name.as_ref().map(|n| n.to_lowercase());
        let mut items = live_values(&guard.courses, |c| {
            needle
                .as_ref()
                .map_or(true, |n| c.name.to_lowercase().contains(n.as_str()))
                && filter
                    .category_id
                    .as_ref()
                    .map_or(true, |id| &c.category_id == id)
                && filter
                    .instructor_id
                    .as_ref()
                    .map_or(true, |id| &c.instructor_id == id)
        });
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(items)
    }

    async fn get_course(&self, id: &str) -> StoreResult<Option<Course>> {
        let guard = self.tables.read().await;
        Ok(live(&guard.courses, id).cloned())
    }

    async fn update_course(&self, id: &str, patch: CoursePatch) -> StoreResult<Course> {
        let mut guard = self.tables.write().await;
        let course = live_mut(&mut guard.courses, id).ok_or(StoreError::NotFound("course"))?;
        if let Some(name) = patch.name {
            course.name = name;
        }
        if let Some(description) = patch.description {
            course.description = description;
        }
        if let Some(objective) = patch.objective {
            course.objective = objective;
        }
        if let Some(price) = patch.price {
            course.price = price;
        }
        if let Some(discount) = patch.discount {
            course.discount = discount;
        }
        if let Some(thumbnail) = patch.thumbnail {
            course.thumbnail = Some(thumbnail);
        }
        if let Some(capacity) = patch.capacity {
            course.capacity = capacity;
        }
        if let Some(category_id) = patch.category_id {
            course.category_id = category_id;
        }
        course.updated_at = Utc::now();
        Ok(course.clone())
    }

    async fn delete_course(&self, id: &str) -> StoreResult<()> {
        let mut guard = self.tables.write().await;
        let t = &mut *guard;
        let now = Utc::now();

        let course = t
            .courses
            .get_mut(id)
            .filter(|r| r.is_live())
            .ok_or(StoreError::NotFound("course"))?;
        course.deleted_at = Some(now);

        let module_ids: Vec<String> = t
            .modules
            .values()
            .filter(|r| r.is_live() && r.value.course_id == id)
            .map(|r| r.value.id.clone())
            .collect();
        for module_id in &module_ids {
            t.cascade_module(module_id, now);
            if let Some(row) = t.modules.get_mut(module_id) {
                row.deleted_at = Some(now);
            }
        }
        for row in t
            .quizzes
            .values_mut()
            .filter(|r| r.is_live() && r.value.course_id == id)
        {
            row.deleted_at = Some(now);
        }
        for row in t
            .enrollments
            .values_mut()
            .filter(|r| r.is_live() && r.value.course_id == id)
        {
            row.deleted_at = Some(now);
        }
        t.favorites.retain(|_, f| f.course_id != id);
        t.ratings.retain(|_, r| r.course_id != id);
        Ok(())
    }

    // -- Modules & media --

    async fn create_module(&self, module: Module) -> StoreResult<Module> {
        let mut guard = self.tables.write().await;
        guard
            .modules
            .insert(module.id.clone(), Row::new(module.clone()));
        Ok(module)
    }

    async fn list_modules(&self, course_id: &str) -> StoreResult<Vec<Module>> {
        let guard = self.tables.read().await;
        let mut items = live_values(&guard.modules, |m| m.course_id == course_id);
        items.sort_by(|a, b| {
            a.no_module
                .cmp(&b.no_module)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(items)
    }

    async fn count_modules(&self, course_id: &str) -> StoreResult<i64> {
        let guard = self.tables.read().await;
        Ok(guard
            .modules
            .values()
            .filter(|r| r.is_live() && r.value.course_id == course_id)
            .count() as i64)
    }

    async fn get_module(&self, id: &str) -> StoreResult<Option<Module>> {
        let guard = self.tables.read().await;
        Ok(live(&guard.modules, id).cloned())
    }

    async fn update_module(&self, id: &str, patch: ModulePatch) -> StoreResult<Module> {
        let mut guard = self.tables.write().await;
        let module = live_mut(&mut guard.modules, id).ok_or(StoreError::NotFound("module"))?;
        if let Some(name) = patch.name {
            module.name = name;
        }
        if let Some(content) = patch.content {
            module.content = content;
        }
        if let Some(no_module) = patch.no_module {
            module.no_module = no_module;
        }
        module.updated_at = Utc::now();
        Ok(module.clone())
    }

    async fn delete_module(&self, id: &str) -> StoreResult<()> {
        let mut guard = self.tables.write().await;
        let now = Utc::now();
        soft_delete(&mut guard.modules, id, "module")?;
        guard.cascade_module(id, now);
        Ok(())
    }

    async fn create_media(&self, media: MediaModule) -> StoreResult<MediaModule> {
        let mut guard = self.tables.write().await;
        guard
            .media
            .insert(media.id.clone(), Row::new(media.clone()));
        Ok(media)
    }

    async fn list_media(&self, module_id: &str) -> StoreResult<Vec<MediaModule>> {
        let guard = self.tables.read().await;
        let mut items = live_values(&guard.media, |m| m.module_id == module_id);
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn get_media(&self, id: &str) -> StoreResult<Option<MediaModule>> {
        let guard = self.tables.read().await;
        Ok(live(&guard.media, id).cloned())
    }

    async fn update_media(&self, id: &str, url: &str) -> StoreResult<MediaModule> {
        let mut guard = self.tables.write().await;
        let media = live_mut(&mut guard.media, id).ok_or(StoreError::NotFound("media"))?;
        media.url = url.to_string();
        media.updated_at = Utc::now();
        Ok(media.clone())
    }

    async fn delete_media(&self, id: &str) -> StoreResult<()> {
        let mut guard = self.tables.write().await;
        soft_delete(&mut guard.media, id, "media")
    }

    // -- Quizzes --

    async fn create_quiz(&self, quiz: Quiz) -> StoreResult<Quiz> {
        let mut guard = self.tables.write().await;
        guard.quizzes.insert(quiz.id.clone(), Row::new(quiz.clone()));
        Ok(quiz)
    }

    async fn list_quizzes(&self, course_id: &str) -> StoreResult<Vec<Quiz>> {
        let guard = self.tables.read().await;
        let mut items = live_values(&guard.quizzes, |q| q.course_id == course_id);
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn get_quiz(&self, id: &str) -> StoreResult<Option<Quiz>> {
        let guard = self.tables.read().await;
        Ok(live(&guard.quizzes, id).cloned())
    }

    async fn update_quiz(&self, id: &str, link: &str) -> StoreResult<Quiz> {
        let mut guard = self.tables.write().await;
        let quiz = live_mut(&mut guard.quizzes, id).ok_or(StoreError::NotFound("quiz"))?;
        quiz.link = link.to_string();
        quiz.updated_at = Utc::now();
        Ok(quiz.clone())
    }

    async fn delete_quiz(&self, id: &str) -> StoreResult<()> {
        let mut guard = self.tables.write().await;
        soft_delete(&mut guard.quizzes, id, "quiz")
    }

    // -- Assignments & submissions --

    async fn create_assignment(&self, assignment: Assignment) -> StoreResult<Assignment> {
        let mut guard = self.tables.write().await;
        if guard
            .assignments
            .values()
            .any(|r| r.is_live() && r.value.module_id == assignment.module_id)
        {
            return Err(StoreError::Conflict("assignment"));
        }
        guard
            .assignments
            .insert(assignment.id.clone(), Row::new(assignment.clone()));
        Ok(assignment)
    }

    async fn get_assignment(&self, id: &str) -> StoreResult<Option<Assignment>> {
        let guard = self.tables.read().await;
        Ok(live(&guard.assignments, id).cloned())
    }

    async fn find_assignment_by_module(
        &self,
        module_id: &str,
    ) -> StoreResult<Option<Assignment>> {
        let guard = self.tables.read().await;
        Ok(guard
            .assignments
            .values()
            .find(|r| r.is_live() && r.value.module_id == module_id)
            .map(|r| r.value.clone()))
    }

    async fn update_assignment(
        &self,
        id: &str,
        patch: AssignmentPatch,
    ) -> StoreResult<Assignment> {
        let mut guard = self.tables.write().await;
        let assignment =
            live_mut(&mut guard.assignments, id).ok_or(StoreError::NotFound("assignment"))?;
        if let Some(title) = patch.title {
            assignment.title = title;
        }
        if let Some(description) = patch.description {
            assignment.description = description;
        }
        assignment.updated_at = Utc::now();
        Ok(assignment.clone())
    }

    async fn delete_assignment(&self, id: &str) -> StoreResult<()> {
        let mut guard = self.tables.write().await;
        soft_delete(&mut guard.assignments, id, "assignment")
    }

    async fn create_submission(&self, submission: Submission) -> StoreResult<Submission> {
        let mut guard = self.tables.write().await;
        if guard.submissions.values().any(|s| {
            s.assignment_id == submission.assignment_id && s.customer_id == submission.customer_id
        }) {
            return Err(StoreError::Conflict("submission"));
        }
        guard
            .submissions
            .insert(submission.id.clone(), submission.clone());
        Ok(submission)
    }

    async fn get_submission(&self, id: &str) -> StoreResult<Option<Submission>> {
        let guard = self.tables.read().await;
        Ok(guard.submissions.get(id).cloned())
    }

    async fn list_submissions_by_assignment(
        &self,
        assignment_id: &str,
    ) -> StoreResult<Vec<Submission>> {
        let guard = self.tables.read().await;
        let mut items: Vec<Submission> = guard
            .submissions
            .values()
            .filter(|s| s.assignment_id == assignment_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn list_submissions_by_customer(
        &self,
        customer_id: &str,
    ) -> StoreResult<Vec<Submission>> {
        let guard = self.tables.read().await;
        let mut items: Vec<Submission> = guard
            .submissions
            .values()
            .filter(|s| {
                s.customer_id == customer_id
                    && live(&guard.assignments, &s.assignment_id).is_some()
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn update_submission(
        &self,
        id: &str,
        patch: SubmissionPatch,
    ) -> StoreResult<Submission> {
        let mut guard = self.tables.write().await;
        let submission = guard
            .submissions
            .get_mut(id)
            .ok_or(StoreError::NotFound("submission"))?;
        if let Some(file) = patch.file {
            submission.file = file;
        }
        if let Some(grade) = patch.grade {
            submission.grade = Some(grade);
        }
        submission.updated_at = Utc::now();
        Ok(submission.clone())
    }

    async fn delete_submission(&self, id: &str) -> StoreResult<()> {
        let mut guard = self.tables.write().await;
        guard
            .submissions
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound("submission"))
    }

    // -- Enrollment --

    async fn enroll(&self, enrollment: Enrollment) -> StoreResult<Enrollment> {
        let mut guard = self.tables.write().await;
        let t = &mut *guard;

        let capacity = live(&t.courses, &enrollment.course_id)
            .map(|c| c.capacity)
            .ok_or(StoreError::NotFound("course"))?;
        if capacity <= 0 {
            return Err(StoreError::CapacityExceeded);
        }
        if t.enrollments.values().any(|r| {
            r.is_live()
                && r.value.course_id == enrollment.course_id
                && r.value.customer_id == enrollment.customer_id
        }) {
            return Err(StoreError::Conflict("enrollment"));
        }

        if let Some(course) = live_mut(&mut t.courses, &enrollment.course_id) {
            course.capacity -= 1;
            course.updated_at = enrollment.created_at;
        }
        t.enrollments
            .insert(enrollment.id.clone(), Row::new(enrollment.clone()));
        Ok(enrollment)
    }

    async fn unenroll(&self, enrollment_id: &str, customer_id: &str) -> StoreResult<Course> {
        let mut guard = self.tables.write().await;
        let t = &mut *guard;
        let now = Utc::now();

        let course_id = live(&t.enrollments, enrollment_id)
            .filter(|e| e.customer_id == customer_id)
            .map(|e| e.course_id.clone())
            .ok_or(StoreError::NotFound("enrollment"))?;
        let course = live_mut(&mut t.courses, &course_id).ok_or(StoreError::NotFound("course"))?;
        course.capacity += 1;
        course.updated_at = now;
        let course = course.clone();

        if let Some(row) = t.enrollments.get_mut(enrollment_id) {
            row.deleted_at = Some(now);
        }
        Ok(course)
    }

    async fn get_enrollment(&self, id: &str) -> StoreResult<Option<Enrollment>> {
        let guard = self.tables.read().await;
        Ok(live(&guard.enrollments, id).cloned())
    }

    async fn find_enrollment(
        &self,
        course_id: &str,
        customer_id: &str,
    ) -> StoreResult<Option<Enrollment>> {
        let guard = self.tables.read().await;
        Ok(guard
            .enrollments
            .values()
            .find(|r| {
                r.is_live() && r.value.course_id == course_id && r.value.customer_id == customer_id
            })
            .map(|r| r.value.clone()))
    }

    async fn list_enrollments_by_customer(
        &self,
        customer_id: &str,
    ) -> StoreResult<Vec<Enrollment>> {
        let guard = self.tables.read().await;
        let mut items = live_values(&guard.enrollments, |e| e.customer_id == customer_id);
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn list_enrollments_by_course(&self, course_id: &str) -> StoreResult<Vec<Enrollment>> {
        let guard = self.tables.read().await;
        let mut items = live_values(&guard.enrollments, |e| e.course_id == course_id);
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn update_progress(
        &self,
        id: &str,
        no_module: i32,
        is_finish: bool,
    ) -> StoreResult<Enrollment> {
        let mut guard = self.tables.write().await;
        let enrollment =
            live_mut(&mut guard.enrollments, id).ok_or(StoreError::NotFound("enrollment"))?;
        enrollment.no_module = no_module;
        enrollment.is_finish = is_finish;
        enrollment.updated_at = Utc::now();
        Ok(enrollment.clone())
    }

    // -- Favorites & ratings --

    async fn create_favorite(&self, favorite: Favorite) -> StoreResult<Favorite> {
        let mut guard = self.tables.write().await;
        if guard
            .favorites
            .values()
            .any(|f| f.customer_id == favorite.customer_id && f.course_id == favorite.course_id)
        {
            return Err(StoreError::Conflict("favorite"));
        }
        guard
            .favorites
            .insert(favorite.id.clone(), favorite.clone());
        Ok(favorite)
    }

    async fn get_favorite(&self, id: &str) -> StoreResult<Option<Favorite>> {
        let guard = self.tables.read().await;
        Ok(guard.favorites.get(id).cloned())
    }

    async fn list_favorites(&self, customer_id: &str) -> StoreResult<Vec<Favorite>> {
        let guard = self.tables.read().await;
        let mut items: Vec<Favorite> = guard
            .favorites
            .values()
            .filter(|f| f.customer_id == customer_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn delete_favorite(&self, id: &str) -> StoreResult<()> {
        let mut guard = self.tables.write().await;
        guard
            .favorites
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound("favorite"))
    }

    async fn create_rating(&self, rating: Rating) -> StoreResult<Rating> {
        let mut guard = self.tables.write().await;
        if guard
            .ratings
            .values()
            .any(|r| r.customer_id == rating.customer_id && r.course_id == rating.course_id)
        {
            return Err(StoreError::Conflict("rating"));
        }
        guard.ratings.insert(rating.id.clone(), rating.clone());
        Ok(rating)
    }

    async fn get_rating(&self, id: &str) -> StoreResult<Option<Rating>> {
        let guard = self.tables.read().await;
        Ok(guard.ratings.get(id).cloned())
    }

    async fn list_ratings(&self, course_id: &str, published_only: bool) -> StoreResult<Vec<Rating>> {
        let guard = self.tables.read().await;
        let mut items: Vec<Rating> = guard
            .ratings
            .values()
            .filter(|r| r.course_id == course_id && (!published_only || r.is_publish))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn set_rating_published(&self, id: &str, is_publish: bool) -> StoreResult<Rating> {
        let mut guard = self.tables.write().await;
        let rating = guard
            .ratings
            .get_mut(id)
            .ok_or(StoreError::NotFound("rating"))?;
        rating.is_publish = is_publish;
        rating.updated_at = Utc::now();
        Ok(rating.clone())
    }

    async fn delete_rating(&self, id: &str) -> StoreResult<()> {
        let mut guard = self.tables.write().await;
        guard
            .ratings
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound("rating"))
    }

    // -- Operations --

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
