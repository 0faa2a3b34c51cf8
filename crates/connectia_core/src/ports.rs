//! crates/connectia_core/src/ports.rs
//!
//! Defines the service contract (trait) for the application's data access.
//! The trait forms the boundary of the hexagonal architecture, allowing the
//! request layer (HTTP or console) to be independent of the concrete
//! database implementation.

use async_trait::async_trait;

use crate::domain::{
    Course, CourseScope, CourseStatus, CourseSummary, NewUser, Page, User, UserCourse,
    UserSummary, UserUpdate,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the database driver and is
/// the taxonomy the request layer maps onto transport status codes.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Missing or invalid input (absent required field, empty update set,
    /// out-of-range status). Raised before any row is touched.
    #[error("Invalid input: {0}")]
    Validation(String),
    /// A write would violate email uniqueness.
    #[error("Already registered: {0}")]
    Duplicate(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A delete was blocked by rows still referencing the target.
    #[error("Referential integrity violation: {0}")]
    Integrity(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Data-Access Port (Trait)
//=========================================================================================

/// One method per logical operation of the admin surface. Every method
/// acquires a pooled connection on entry and releases it on every exit
/// path; writes commit immediately on success.
#[async_trait]
pub trait AdminDatabase: Send + Sync {
    // --- User CRUD ---
    async fn list_users(&self, page: Page) -> PortResult<Vec<User>>;

    async fn get_user(&self, id_usuario: i64) -> PortResult<User>;

    /// Validates the required field set, refuses duplicate emails, assigns
    /// the next identifier as `max(id_usuario) + 1` and returns the created
    /// record.
    async fn create_user(&self, new_user: NewUser) -> PortResult<User>;

    /// Applies the whitelisted subset of `changes` and returns the freshly
    /// re-read record. An empty change set is a validation error.
    async fn update_user(&self, id_usuario: i64, changes: UserUpdate) -> PortResult<User>;

    async fn delete_user(&self, id_usuario: i64) -> PortResult<()>;

    // --- Courses ---
    async fn list_courses(&self, page: Page) -> PortResult<Vec<Course>>;

    async fn get_course(&self, id_curso: i64, scope: Option<CourseScope>) -> PortResult<Course>;

    /// Transitions a course to `status`, optionally narrowed to a
    /// career + area pair, and returns the re-read course.
    async fn update_course_status(
        &self,
        id_curso: i64,
        status: CourseStatus,
        scope: Option<CourseScope>,
    ) -> PortResult<Course>;

    // --- Reporting queries ---
    async fn users_by_career(&self, id_carreira: i64) -> PortResult<Vec<UserSummary>>;

    async fn courses_by_status(&self, status: CourseStatus) -> PortResult<Vec<CourseSummary>>;

    async fn courses_by_user(&self, id_usuario: i64) -> PortResult<Vec<UserCourse>>;
}
