pub mod assessment;
pub mod auth;
pub mod check_dates;
pub mod complaint;
pub mod config;
pub mod context;
pub mod init;
pub mod leave;
pub mod overview;
pub mod render;
pub mod resource;
pub mod timetable;
