use serde::Serialize;

use crate::api::{ApiClient, ApiResultExt};
use crate::domain::{Assignment, Course, Id, Message, StudentGrade};
use crate::error::ApiResult;

/// One graded student as shown in the teacher's student list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeRow {
    /// Grade record id
    pub id: Id,
    pub student_id: Option<Id>,
    pub name: String,
    pub course_id: Option<Id>,
    pub grade: f64,
}

impl From<StudentGrade> for GradeRow {
    fn from(grade: StudentGrade) -> Self {
        Self {
            id: grade.id,
            student_id: grade.student_id,
            name: grade.student_name,
            course_id: grade.course_id,
            grade: grade.points.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeacherOverview {
    pub courses: Vec<Course>,
    pub assignments: Vec<Assignment>,
    pub students: Vec<GradeRow>,
    pub messages: Vec<Message>,
}

impl TeacherOverview {
    /// Students graded in `course_id`
    pub fn students_in(&self, course_id: Id) -> impl Iterator<Item = &GradeRow> {
        self.students
            .iter()
            .filter(move |row| row.course_id == Some(course_id))
    }
}

pub async fn load_teacher_overview(api: &ApiClient) -> ApiResult<TeacherOverview> {
    let (courses, assignments, grades) = futures::try_join!(
        async { api.list_courses().await.or_empty("courses") },
        async { api.list_assignments().await.or_empty("assignments") },
        async { api.list_grades().await.or_empty("grades") },
    )?;
    let messages = api.messages().await;

    tracing::info!(
        courses = courses.len(),
        assignments = assignments.len(),
        students = grades.len(),
        "Teacher overview loaded"
    );

    Ok(TeacherOverview {
        courses,
        assignments,
        students: grades.into_iter().map(GradeRow::from).collect(),
        messages,
    })
}
