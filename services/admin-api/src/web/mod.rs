pub mod courses;
pub mod queries;
pub mod rest;
pub mod state;
pub mod users;

// Re-export the handlers the binaries wire into the router.
pub use courses::{list_courses_handler, update_course_status_handler};
pub use queries::{courses_by_status_handler, user_courses_handler, users_by_career_handler};
pub use rest::{index_handler, ApiDoc};
pub use state::AppState;
pub use users::{
    create_user_handler, delete_user_handler, get_user_handler, list_users_handler,
    update_user_handler,
};
