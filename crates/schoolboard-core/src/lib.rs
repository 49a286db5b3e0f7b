//! schoolboard-core: data model, validation, and timetable resolution.
//!
//! This crate defines the records the school-management backend serves,
//! the client-side validation rules applied before anything is sent, the
//! timetable grid resolver, and the `SchoolApi` trait that backends implement.

pub mod assessment;
pub mod error;
pub mod form;
pub mod listing;
pub mod model;
pub mod record_id;
pub mod serde_dates;
pub mod session;
pub mod timetable;
pub mod traits;
