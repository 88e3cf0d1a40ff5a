//! services/api/src/web/access.rs
//!
//! Loads the rows a policy decision reads and runs the decision. Missing
//! targets fail with `NotFound` here, before any rule is evaluated.

use course_platform_core::{
    evaluate, Action, CoursePlatformStore, Course, DbId, Decision, Lesson, LessonScope,
    PortResult, Principal,
};
use tracing::warn;

use crate::error::ApiResult;

/// A lesson together with its course and the caller's enrollment flag.
pub struct LessonContext {
    pub lesson: Lesson,
    pub course: Course,
    pub enrolled: bool,
}

impl LessonContext {
    pub fn scope(&self) -> LessonScope<'_> {
        LessonScope {
            course: &self.course,
            enrolled: self.enrolled,
        }
    }
}

pub async fn load_lesson_context(
    store: &dyn CoursePlatformStore,
    principal: &Principal,
    lesson_id: DbId,
) -> PortResult<LessonContext> {
    let lesson = store.get_lesson(lesson_id).await?;
    let course = store.get_course(lesson.course_id).await?;
    let enrolled = store
        .find_enrollment(principal.user_id, course.id)
        .await?
        .is_some();
    Ok(LessonContext {
        lesson,
        course,
        enrolled,
    })
}

/// Evaluates `action` for `principal`, logging and converting a denial into a 403.
pub fn guard(principal: &Principal, action: &Action<'_>) -> ApiResult<()> {
    let decision = evaluate(principal, action);
    if let Decision::Deny(reason) = &decision {
        warn!(user_id = principal.user_id, %reason, ?action, "Access denied");
    }
    Ok(decision.into_result()?)
}
