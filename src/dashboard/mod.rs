//! Aggregate loaders behind the two dashboards.
//!
//! Each loader issues its fetches concurrently. List fetches fall back to an
//! empty list on failure, except an invalid session, which fails the whole
//! load.

mod student;
mod teacher;

pub use student::{load_student_summary, StudentSummary};
pub use teacher::{load_teacher_overview, GradeRow, TeacherOverview};

/// Number of courses and assignments previewed on the student dashboard
pub const PREVIEW_LEN: usize = 3;
