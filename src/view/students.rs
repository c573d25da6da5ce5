use serde::Serialize;

use super::attendance::Badge;
use super::Tone;
use crate::directory::DirectoryStatus;
use crate::domain::{Id, Page, Student};

pub const NO_STUDENTS_FOUND: &str = "No students found";
pub const LOAD_ERROR: &str = "Error loading data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRow {
    pub id: Id,
    pub name: String,
    pub avatar_url: String,
    /// First enrolled course code, or "No Course"
    pub course: Badge,
    pub email: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub label: String,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StudentTable {
    Message(String),
    Rows {
        rows: Vec<StudentRow>,
        pagination: Pagination,
    },
}

pub fn avatar_url(name: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=random",
        urlencoding::encode(name)
    )
}

fn student_row(student: &Student) -> StudentRow {
    let course = match student.courses.first() {
        Some(course) => Badge {
            label: course.code.clone(),
            tone: Tone::Indigo,
        },
        None => Badge {
            label: "No Course".to_string(),
            tone: Tone::Gray,
        },
    };

    StudentRow {
        id: student.id,
        name: student.name.clone(),
        avatar_url: avatar_url(&student.name),
        course,
        email: student
            .email
            .clone()
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| "N/A".to_string()),
        status: "Active".to_string(),
    }
}

pub fn pagination(page: &Page<Student>) -> Pagination {
    Pagination {
        label: format!("Page {} of {}", page.number + 1, page.total_pages.max(1)),
        prev_enabled: !page.first,
        next_enabled: !page.last,
    }
}

pub fn student_table(status: &DirectoryStatus, page: Option<&Page<Student>>) -> StudentTable {
    if let DirectoryStatus::Failed(_) = status {
        return StudentTable::Message(LOAD_ERROR.to_string());
    }

    match page {
        Some(page) if !page.content.is_empty() => StudentTable::Rows {
            rows: page.content.iter().map(student_row).collect(),
            pagination: pagination(page),
        },
        _ => StudentTable::Message(NO_STUDENTS_FOUND.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CourseRef;

    fn page(content: Vec<Student>, number: u32, total_pages: u32) -> Page<Student> {
        Page {
            content,
            number,
            size: 10,
            total_pages,
            total_elements: 0,
            first: number == 0,
            last: number + 1 >= total_pages,
        }
    }

    fn student(id: Id, name: &str, email: Option<&str>, course: Option<&str>) -> Student {
        Student {
            id,
            name: name.to_string(),
            email: email.map(str::to_string),
            courses: course
                .map(|code| {
                    vec![CourseRef {
                        id: 1,
                        name: String::new(),
                        code: code.to_string(),
                    }]
                })
                .unwrap_or_default(),
        }
    }

    #[test]
    fn test_rows_and_fallbacks() {
        let page = page(
            vec![
                student(1, "Dara Sok", Some("dara@school.edu"), Some("ITE401")),
                student(2, "Vanna", None, None),
            ],
            0,
            3,
        );
        let table = student_table(&DirectoryStatus::Loaded, Some(&page));
        let StudentTable::Rows { rows, pagination } = table else {
            panic!("expected rows");
        };

        assert_eq!(rows[0].course.label, "ITE401");
        assert_eq!(
            rows[0].avatar_url,
            "https://ui-avatars.com/api/?name=Dara%20Sok&background=random"
        );
        assert_eq!(rows[1].course.label, "No Course");
        assert_eq!(rows[1].email, "N/A");
        assert_eq!(rows[1].status, "Active");

        assert_eq!(pagination.label, "Page 1 of 3");
        assert!(!pagination.prev_enabled);
        assert!(pagination.next_enabled);
    }

    #[test]
    fn test_empty_and_failed() {
        let empty = page(Vec::new(), 0, 0);
        assert_eq!(
            student_table(&DirectoryStatus::Loaded, Some(&empty)),
            StudentTable::Message(NO_STUDENTS_FOUND.to_string())
        );
        assert_eq!(
            student_table(&DirectoryStatus::Failed("x".to_string()), Some(&empty)),
            StudentTable::Message(LOAD_ERROR.to_string())
        );
    }

    #[test]
    fn test_last_page_disables_next() {
        let last = page(vec![student(9, "Z", None, None)], 2, 3);
        let p = pagination(&last);
        assert_eq!(p.label, "Page 3 of 3");
        assert!(p.prev_enabled);
        assert!(!p.next_enabled);
    }
}
