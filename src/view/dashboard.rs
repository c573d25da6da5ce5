use serde::Serialize;

use crate::dashboard::{StudentSummary, TeacherOverview};

/// Card value when there is nothing to average
pub const NO_DATA: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub title: String,
    pub value: String,
}

impl StatCard {
    fn new(title: &str, value: impl ToString) -> Self {
        Self {
            title: title.to_string(),
            value: value.to_string(),
        }
    }
}

pub fn teacher_cards(overview: &TeacherOverview) -> Vec<StatCard> {
    let full = overview.courses.iter().filter(|c| c.is_full).count();
    vec![
        StatCard::new("Courses", overview.courses.len()),
        StatCard::new("Full courses", full),
        StatCard::new("Assignments", overview.assignments.len()),
        StatCard::new("Graded students", overview.students.len()),
        StatCard::new("Unread messages", overview.messages.iter().filter(|m| m.unread).count()),
    ]
}

pub fn student_cards(summary: &StudentSummary) -> Vec<StatCard> {
    vec![
        StatCard::new("Courses", summary.courses_count),
        StatCard::new("Assignments", summary.assignments_count),
        StatCard::new(
            "Attendance",
            summary
                .attendance_pct
                .map(|pct| format!("{:.0}%", pct))
                .unwrap_or_else(|| NO_DATA.to_string()),
        ),
        StatCard::new(
            "Average grade",
            summary
                .average_points
                .map(|avg| format!("{:.1}", avg))
                .unwrap_or_else(|| NO_DATA.to_string()),
        ),
    ]
}
