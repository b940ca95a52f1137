pub mod admin;
pub mod attendance;
pub mod session;
pub mod stats;
pub mod student;
