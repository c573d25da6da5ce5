use serde::Serialize;

use super::Tone;
use crate::attendance::{
    AttendanceBackend, AttendanceBuffer, AttendanceStatus, Clock, RosterStatus,
};
use crate::domain::{Course, Id};

pub const UNMARKED: &str = "Unmarked";
pub const LOAD_FAILED: &str = "Failed to load students";
pub const NO_STUDENTS: &str = "No students enrolled in this course.";
pub const SELECT_COURSE: &str = "Select a Course...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub tone: Tone,
}

impl Badge {
    pub fn for_status(status: Option<AttendanceStatus>) -> Self {
        match status {
            Some(status) => Self {
                label: status.as_str().to_string(),
                tone: match status {
                    AttendanceStatus::Present => Tone::Green,
                    AttendanceStatus::Absent => Tone::Red,
                    AttendanceStatus::Late => Tone::Yellow,
                },
            },
            None => Self {
                label: UNMARKED.to_string(),
                tone: Tone::Gray,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRow {
    pub id: Id,
    pub name: String,
    pub badge: Badge,
    /// `HH:MM`
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AttendanceTable {
    NoCourse,
    LoadFailed { message: String },
    Empty { message: String },
    Rows(Vec<AttendanceRow>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveButton {
    pub label: String,
    /// Set while there are unsaved edits
    pub highlighted: bool,
}

impl SaveButton {
    pub fn for_pending(count: usize) -> Self {
        if count == 0 {
            Self {
                label: "Save".to_string(),
                highlighted: false,
            }
        } else {
            Self {
                label: format!("Save ({})", count),
                highlighted: true,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceView {
    pub table: AttendanceTable,
    pub save_button: SaveButton,
}

pub fn attendance_view<B: AttendanceBackend, C: Clock>(
    buffer: &AttendanceBuffer<B, C>,
) -> AttendanceView {
    let table = match buffer.roster_status() {
        RosterStatus::NotSelected => AttendanceTable::NoCourse,
        RosterStatus::Failed(_) => AttendanceTable::LoadFailed {
            message: LOAD_FAILED.to_string(),
        },
        RosterStatus::Loaded if buffer.roster().is_empty() => AttendanceTable::Empty {
            message: NO_STUDENTS.to_string(),
        },
        RosterStatus::Loaded => {
            let time = buffer.clock().now().format("%H:%M").to_string();
            AttendanceTable::Rows(
                buffer
                    .roster()
                    .iter()
                    .map(|entry| AttendanceRow {
                        id: entry.id,
                        name: entry.name.clone(),
                        badge: Badge::for_status(buffer.status_of(entry.id)),
                        time: time.clone(),
                    })
                    .collect(),
            )
        }
    };

    AttendanceView {
        table,
        save_button: SaveButton::for_pending(buffer.pending_count()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseOption {
    /// `None` for the placeholder
    pub value: Option<Id>,
    pub label: String,
}

/// Course picker entries, led by a placeholder
pub fn course_options(courses: &[Course]) -> Vec<CourseOption> {
    std::iter::once(CourseOption {
        value: None,
        label: SELECT_COURSE.to_string(),
    })
    .chain(courses.iter().map(|c| CourseOption {
        value: Some(c.id),
        label: c.name.clone(),
    }))
    .collect()
}
