pub mod domain;
pub mod policy;
pub mod ports;
pub mod reporting;

pub use domain::{
    Comment, Course, CourseChanges, DbId, Enrollment, Lesson, LessonChanges, NewComment,
    NewCourse, NewLesson, NewUser, Page, Rating, User, UserChanges,
};
pub use policy::{authorize, evaluate, Action, Decision, DenyReason, LessonScope, Principal};
pub use ports::{CoursePlatformStore, PortError, PortResult};
