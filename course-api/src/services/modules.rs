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

//! Course content: modules, their media, and course quizzes.
//!
//! Instructors manage the content of the courses they own. Customers read it
//! only for courses they are enrolled in.

use chrono::Utc;
use course_types::requests::{
    CreateModuleRequest, MediaRequest, QuizRequest, UpdateModuleRequest,
};
use course_types::responses::ModuleDetailResponse;

use super::{ensure_course_owner, ensure_enrolled, ensure_module_owner, load_course, load_module, new_id};
use crate::auth::Principal;
use crate::error::AppError;
use crate::model::{MediaModule, Module, Quiz};
use crate::store::{CourseStore, ModulePatch};
use crate::validate;

async fn module_detail(
    store: &dyn CourseStore,
    module: Module,
) -> Result<ModuleDetailResponse, AppError> {
    let media = store.list_media(&module.id).await?;
    let assignment = store.find_assignment_by_module(&module.id).await?;
    Ok(ModuleDetailResponse {
        module: module.into(),
        media: media.into_iter().map(Into::into).collect(),
        assignment: assignment.map(Into::into),
    })
}

// -- Modules (instructor) --

pub async fn create_module(
    store: &dyn CourseStore,
    principal: &Principal,
    course_id: &str,
    req: CreateModuleRequest,
) -> Result<Module, AppError> {
    ensure_course_owner(store, principal, course_id).await?;
    validate::module_number(req.no_module)?;

    let now = Utc::now();
    let module = Module {
        id: new_id(),
        name: validate::required_text("name", &req.name)?,
        content: req.content,
        course_id: course_id.to_string(),
        no_module: req.no_module,
        created_at: now,
        updated_at: now,
    };
    let module = store.create_module(module).await?;
    tracing::info!(module_id = %module.id, course_id, "Module created");
    Ok(module)
}

pub async fn list_modules_for_owner(
    store: &dyn CourseStore,
    principal: &Principal,
    course_id: &str,
) -> Result<Vec<Module>, AppError> {
    ensure_course_owner(store, principal, course_id).await?;
    Ok(store.list_modules(course_id).await?)
}

pub async fn module_for_owner(
    store: &dyn CourseStore,
    principal: &Principal,
    module_id: &str,
) -> Result<ModuleDetailResponse, AppError> {
    let (module, _) = ensure_module_owner(store, principal, module_id).await?;
    module_detail(store, module).await
}

pub async fn update_module(
    store: &dyn CourseStore,
    principal: &Principal,
    module_id: &str,
    req: UpdateModuleRequest,
) -> Result<Module, AppError> {
    ensure_module_owner(store, principal, module_id).await?;
    if let Some(no_module) = req.no_module {
        validate::module_number(no_module)?;
    }
    let patch = ModulePatch {
        name: req
            .name
            .map(|n| validate::required_text("name", &n))
            .transpose()?,
        content: req.content,
        no_module: req.no_module,
    };
    Ok(store.update_module(module_id, patch).await?)
}

pub async fn delete_module(
    store: &dyn CourseStore,
    principal: &Principal,
    module_id: &str,
) -> Result<(), AppError> {
    ensure_module_owner(store, principal, module_id).await?;
    store.delete_module(module_id).await?;
    tracing::info!(module_id, "Module deleted");
    Ok(())
}

// -- Modules (customer) --

pub async fn list_modules_for_customer(
    store: &dyn CourseStore,
    principal: &Principal,
    course_id: &str,
) -> Result<Vec<Module>, AppError> {
    load_course(store, course_id).await?;
    ensure_enrolled(store, principal, course_id).await?;
    Ok(store.list_modules(course_id).await?)
}

pub async fn module_for_customer(
    store: &dyn CourseStore,
    principal: &Principal,
    module_id: &str,
) -> Result<ModuleDetailResponse, AppError> {
    let module = load_module(store, module_id).await?;
    ensure_enrolled(store, principal, &module.course_id).await?;
    module_detail(store, module).await
}

// -- Media --

pub async fn add_media(
    store: &dyn CourseStore,
    principal: &Principal,
    module_id: &str,
    req: MediaRequest,
) -> Result<MediaModule, AppError> {
    ensure_module_owner(store, principal, module_id).await?;
    let now = Utc::now();
    let media = MediaModule {
        id: new_id(),
        url: validate::required("url", &req.url)?,
        module_id: module_id.to_string(),
        created_at: now,
        updated_at: now,
    };
    Ok(store.create_media(media).await?)
}

async fn owned_media(
    store: &dyn CourseStore,
    principal: &Principal,
    media_id: &str,
) -> Result<MediaModule, AppError> {
    let media = store
        .get_media(media_id)
        .await?
        .ok_or(AppError::NotFound("media"))?;
    ensure_module_owner(store, principal, &media.module_id).await?;
    Ok(media)
}

pub async fn update_media(
    store: &dyn CourseStore,
    principal: &Principal,
    media_id: &str,
    req: MediaRequest,
) -> Result<MediaModule, AppError> {
    owned_media(store, principal, media_id).await?;
    let url = validate::required("url", &req.url)?;
    Ok(store.update_media(media_id, &url).await?)
}

pub async fn delete_media(
    store: &dyn CourseStore,
    principal: &Principal,
    media_id: &str,
) -> Result<(), AppError> {
    owned_media(store, principal, media_id).await?;
    Ok(store.delete_media(media_id).await?)
}

// -- Quizzes --

pub async fn create_quiz(
    store: &dyn CourseStore,
    principal: &Principal,
    course_id: &str,
    req: QuizRequest,
) -> Result<Quiz, AppError> {
    ensure_course_owner(store, principal, course_id).await?;
    let now = Utc::now();
    let quiz = Quiz {
        id: new_id(),
        course_id: course_id.to_string(),
        link: validate::required("link", &req.link)?,
        created_at: now,
        updated_at: now,
    };
    Ok(store.create_quiz(quiz).await?)
}

async fn owned_quiz(
    store: &dyn CourseStore,
    principal: &Principal,
    quiz_id: &str,
) -> Result<Quiz, AppError> {
    let quiz = store
        .get_quiz(quiz_id)
        .await?
        .ok_or(AppError::NotFound("quiz"))?;
    ensure_course_owner(store, principal, &quiz.course_id).await?;
    Ok(quiz)
}

pub async fn update_quiz(
    store: &dyn CourseStore,
    principal: &Principal,
    quiz_id: &str,
    req: QuizRequest,
) -> Result<Quiz, AppError> {
    owned_quiz(store, principal, quiz_id).await?;
    let link = validate::required("link", &req.link)?;
    Ok(store.update_quiz(quiz_id, &link).await?)
}

pub async fn delete_quiz(
    store: &dyn CourseStore,
    principal: &Principal,
    quiz_id: &str,
) -> Result<(), AppError> {
    owned_quiz(store, principal, quiz_id).await?;
    Ok(store.delete_quiz(quiz_id).await?)
}

pub async fn list_quizzes_for_customer(
    store: &dyn CourseStore,
    principal: &Principal,
    course_id: &str,
) -> Result<Vec<Quiz>, AppError> {
    load_course(store, course_id).await?;
    ensure_enrolled(store, principal, course_id).await?;
    Ok(store.list_quizzes(course_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{enrollment, testing};
    use crate::store::memory::InMemoryStore;
    use course_types::Role;

    #[tokio::test]
    async fn customers_need_an_enrollment_to_read_modules() {
        let store = InMemoryStore::new();
        let instructor = testing::register(&store, Role::Instructor, "i@mail.com").await;
        let customer = testing::register(&store, Role::Customer, "c@mail.com").await;
        let course = testing::course(&store, &instructor, "Rust", 5).await;
        let module = testing::module(&store, &instructor, &course.id, 1).await;

        let err = list_modules_for_customer(&store, &customer, &course.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotEnrolled));
        let err = module_for_customer(&store, &customer, &module.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotEnrolled));

        enrollment::take_course(&store, &customer, &course.id)
            .await
            .unwrap();
        let modules = list_modules_for_customer(&store, &customer, &course.id)
            .await
            .unwrap();
        assert_eq!(modules, vec![module]);
    }

    #[tokio::test]
    async fn module_detail_includes_media() {
        let store = InMemoryStore::new();
        let instructor = testing::register(&store, Role::Instructor, "i@mail.com").await;
        let course = testing::course(&store, &instructor, "Rust", 5).await;
        let module = testing::module(&store, &instructor, &course.id, 1).await;
        add_media(
            &store,
            &instructor,
            &module.id,
            MediaRequest {
                url: "https://cdn/intro.mp4".to_string(),
            },
        )
        .await
        .unwrap();

        let detail = module_for_owner(&store, &instructor, &module.id).await.unwrap();
        assert_eq!(detail.media.len(), 1);
        assert_eq!(detail.media[0].url, "https://cdn/intro.mp4");
        assert!(detail.assignment.is_none());
    }

    #[tokio::test]
    async fn other_instructor_cannot_touch_content() {
        let store = InMemoryStore::new();
        let owner = testing::register(&store, Role::Instructor, "i@mail.com").await;
        let other = testing::register(&store, Role::Instructor, "o@mail.com").await;
        let course = testing::course(&store, &owner, "Rust", 5).await;
        let module = testing::module(&store, &owner, &course.id, 1).await;

        let err = delete_module(&store, &other, &module.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotAuthorized));
        let err = create_quiz(
            &store,
            &other,
            &course.id,
            QuizRequest {
                link: "https://quiz".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotAuthorized));
    }

    #[tokio::test]
    async fn deleting_a_module_hides_its_media() {
        let store = InMemoryStore::new();
        let owner = testing::register(&store, Role::Instructor, "i@mail.com").await;
        let course = testing::course(&store, &owner, "Rust", 5).await;
        let module = testing::module(&store, &owner, &course.id, 1).await;
        let media = add_media(
            &store,
            &owner,
            &module.id,
            MediaRequest {
                url: "https://cdn/a.mp4".to_string(),
            },
        )
        .await
        .unwrap();

        delete_module(&store, &owner, &module.id).await.unwrap();
        assert!(store.get_media(&media.id).await.unwrap().is_none());
        let err = update_media(
            &store,
            &owner,
            &media.id,
            MediaRequest {
                url: "https://cdn/b.mp4".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound("media")));
    }
}
