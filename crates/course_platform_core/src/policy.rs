//! crates/course_platform_core/src/policy.rs
//!
//! The access policy evaluator. A pure decision function over a principal and
//! an action whose context (course, enrollment flag, owning rows) has already
//! been loaded by the caller. Missing targets are reported as `NotFound` by the
//! caller before evaluation ever runs.

use std::fmt;

use crate::domain::{Comment, Course, DbId, Enrollment, Rating, User};
use crate::ports::{PortError, PortResult};

/// The authenticated user making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: DbId,
    pub is_admin: bool,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            is_admin: user.is_admin,
        }
    }
}

/// What a lesson-scoped action needs to know about the lesson's course.
#[derive(Debug, Clone, Copy)]
pub struct LessonScope<'a> {
    pub course: &'a Course,
    /// Whether an enrollment links the principal to `course`.
    pub enrolled: bool,
}

/// Every guarded operation, carrying the rows its predicate reads.
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    UpdateCourse(&'a Course),
    DeleteCourse(&'a Course),
    ViewCourseStudents(&'a Course),
    CreateLesson(&'a Course),
    /// `course` is the lesson's course.
    UpdateLesson(&'a Course),
    DeleteLesson(&'a Course),
    ViewLesson(LessonScope<'a>),
    ViewLessonComments(LessonScope<'a>),
    ViewLessonRatings(LessonScope<'a>),
    ViewComment(LessonScope<'a>),
    CreateComment(LessonScope<'a>),
    UpdateComment(&'a Comment),
    DeleteComment {
        comment: &'a Comment,
        course: &'a Course,
    },
    /// Create or update a rating. Only enrollment counts here.
    RateLesson { enrolled: bool },
    DeleteRating(&'a Rating),
    DeleteEnrollment(&'a Enrollment),
    /// User management, statistics and the admin panel.
    Administer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotEnrolled,
    InsufficientPermissions,
    AdminRequired,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            DenyReason::NotEnrolled => "not enrolled in this course",
            DenyReason::InsufficientPermissions => "insufficient permissions",
            DenyReason::AdminRequired => "Not enough permissions",
        };
        f.write_str(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    fn allow_if(condition: bool, reason: DenyReason) -> Self {
        if condition {
            Decision::Allow
        } else {
            Decision::Deny(reason)
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Maps a denial to [`PortError::Forbidden`].
    pub fn into_result(self) -> PortResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(PortError::Forbidden(reason.to_string())),
        }
    }
}

/// Decides whether `principal` may perform `action`.
///
/// Rating a lesson is the one action admins and course authors are not exempt
/// from: it requires an enrollment. Everything else is allowed for admins,
/// then decided by ownership or enrollment.
pub fn evaluate(principal: &Principal, action: &Action<'_>) -> Decision {
    use DenyReason::*;

    let me = principal.user_id;
    match action {
        Action::RateLesson { enrolled } => Decision::allow_if(*enrolled, NotEnrolled),
        _ if principal.is_admin => Decision::Allow,
        Action::UpdateCourse(course)
        | Action::DeleteCourse(course)
        | Action::ViewCourseStudents(course)
        | Action::CreateLesson(course)
        | Action::UpdateLesson(course)
        | Action::DeleteLesson(course) => {
            Decision::allow_if(course.author_id == me, InsufficientPermissions)
        }
        Action::ViewLesson(scope)
        | Action::ViewLessonComments(scope)
        | Action::ViewLessonRatings(scope)
        | Action::ViewComment(scope)
        | Action::CreateComment(scope) => {
            Decision::allow_if(scope.course.author_id == me || scope.enrolled, NotEnrolled)
        }
        Action::UpdateComment(comment) => {
            Decision::allow_if(comment.user_id == me, InsufficientPermissions)
        }
        Action::DeleteComment { comment, course } => Decision::allow_if(
            comment.user_id == me || course.author_id == me,
            InsufficientPermissions,
        ),
        Action::DeleteRating(rating) => {
            Decision::allow_if(rating.user_id == me, InsufficientPermissions)
        }
        Action::DeleteEnrollment(enrollment) => {
            Decision::allow_if(enrollment.user_id == me, InsufficientPermissions)
        }
        Action::Administer => Decision::Deny(AdminRequired),
    }
}

/// Shorthand for `evaluate(..).into_result()`.
pub fn authorize(principal: &Principal, action: &Action<'_>) -> PortResult<()> {
    evaluate(principal, action).into_result()
}
