pub mod attendance;
pub mod session;
pub mod student;
pub mod user;
