//! Display models built from component state.
//!
//! Pure functions only: they read state and return plain data, leaving
//! presentation to the front end.

mod attendance;
mod dashboard;
mod students;

pub use attendance::{
    attendance_view, course_options, AttendanceRow, AttendanceTable, AttendanceView, Badge,
    CourseOption, SaveButton, SELECT_COURSE,
};
pub use dashboard::{student_cards, teacher_cards, StatCard};
pub use students::{student_table, Pagination, StudentRow, StudentTable};

use serde::Serialize;

/// Colour family of a badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Gray,
    Green,
    Red,
    Yellow,
    Indigo,
}
