pub mod domain;
pub mod ports;

pub use domain::{
    Course, CourseScope, CourseStatus, CourseSummary, NewUser, Page, User, UserCourse,
    UserSummary, UserUpdate,
};
pub use ports::{AdminDatabase, PortError, PortResult};
