//! Rendering of timetable grids and assessment boards.

pub mod html;
pub mod labels;
pub mod markdown;
pub mod snapshot;

pub use labels::Labels;
pub use snapshot::TimetableSnapshot;
