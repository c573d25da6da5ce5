//! Attendance taking for one course at a time.
//!
//! The [`AttendanceBuffer`] holds the selected course's roster and the
//! unsaved status edits, and flushes them to the backend as one bulk write.

mod buffer;
mod clock;
mod csv;
mod status;

pub use buffer::{AttendanceBackend, AttendanceBuffer, CommitOutcome, RosterStatus};
pub use clock::{Clock, FixedClock, SystemClock};
pub use status::AttendanceStatus;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Id;

/// Date format of `attendanceDate`
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// 24h check-in time, e.g. `17:21:24`
pub const CHECK_IN_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub id: Id,
    pub name: String,
    pub course_id: Id,
}

/// One record of the bulk attendance write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceUpdate {
    pub student_id: Id,
    pub course_id: Id,
    pub attendance_date: NaiveDate,
    pub status: AttendanceStatus,
    pub check_in_time: String,
}

/// Why a status edit was ignored. Informational, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditRejected {
    #[error("No status selected")]
    EmptyStatus,

    #[error("Unknown attendance status {0:?} (expected Present, Absent or Late)")]
    UnknownStatus(String),

    #[error("Student {0} is not on the current roster")]
    NotInRoster(Id),
}
