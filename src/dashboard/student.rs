use serde::Serialize;

use super::PREVIEW_LEN;
use crate::api::{ApiClient, ApiResultExt};
use crate::attendance::AttendanceStatus;
use crate::domain::{Assignment, AttendanceRecord, Course, StudentGrade};
use crate::error::ApiResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentSummary {
    pub courses_count: usize,
    pub assignments_count: usize,
    /// Present or late over all records; `None` without records
    pub attendance_pct: Option<f64>,
    /// Mean of graded points; `None` without grades
    pub average_points: Option<f64>,
    pub courses: Vec<Course>,
    pub assignments: Vec<Assignment>,
}

pub async fn load_student_summary(api: &ApiClient) -> ApiResult<StudentSummary> {
    let (courses, assignments, grades, attendance) = futures::try_join!(
        async { api.list_courses().await.or_empty("courses") },
        async { api.list_assignments().await.or_empty("assignments") },
        async { api.list_grades().await.or_empty("grades") },
        async { api.list_attendance().await.or_empty("attendance") },
    )?;

    Ok(summarize(courses, assignments, &grades, &attendance))
}

pub(crate) fn summarize(
    courses: Vec<Course>,
    assignments: Vec<Assignment>,
    grades: &[StudentGrade],
    attendance: &[AttendanceRecord],
) -> StudentSummary {
    StudentSummary {
        courses_count: courses.len(),
        assignments_count: assignments.len(),
        attendance_pct: attendance_pct(attendance),
        average_points: average_points(grades),
        courses: courses.into_iter().take(PREVIEW_LEN).collect(),
        assignments: assignments.into_iter().take(PREVIEW_LEN).collect(),
    }
}

fn attendance_pct(records: &[AttendanceRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let attended = records
        .iter()
        .filter(|r| {
            r.status
                .parse::<AttendanceStatus>()
                .map(|s| s.attended())
                .unwrap_or(false)
        })
        .count();
    Some(attended as f64 * 100.0 / records.len() as f64)
}

fn average_points(grades: &[StudentGrade]) -> Option<f64> {
    let points: Vec<f64> = grades.iter().filter_map(|g| g.points).collect();
    if points.is_empty() {
        return None;
    }
    Some(points.iter().sum::<f64>() / points.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: None,
            student_id: 1,
            student_name: None,
            course_id: Some(1),
            attendance_date: Some("2026-10-01".to_string()),
            status: status.to_string(),
            check_in_time: None,
        }
    }

    fn course(id: i64) -> Course {
        serde_json::from_value(serde_json::json!({ "id": id, "name": format!("C{}", id) })).unwrap()
    }

    #[test]
    fn test_attendance_pct_counts_late_as_attended() {
        let records = vec![record("Present"), record("Late"), record("Absent"), record("Absent")];
        assert_eq!(attendance_pct(&records), Some(50.0));
        assert_eq!(attendance_pct(&[]), None);
    }

    #[test]
    fn test_unknown_status_not_attended() {
        assert_eq!(attendance_pct(&[record("Excused")]), Some(0.0));
    }

    #[test]
    fn test_summary_previews_first_three() {
        let courses: Vec<Course> = (1..=5).map(course).collect();
        let grade = |points| StudentGrade {
            id: 1,
            student_id: Some(1),
            student_name: String::new(),
            course_id: Some(1),
            points,
        };
        let summary = summarize(courses, Vec::new(), &[grade(Some(80.0)), grade(None), grade(Some(90.0))], &[]);

        assert_eq!(summary.courses_count, 5);
        assert_eq!(summary.courses.len(), 3);
        assert_eq!(summary.courses[2].id, 3);
        assert_eq!(summary.average_points, Some(85.0));
        assert_eq!(summary.attendance_pct, None);
    }
}
