//! Records exchanged with the backend.
//!
//! Field names follow the backend's camelCase JSON. Presentation fields the
//! backend may omit are filled with the defaults the dashboards display.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Backend entity identifier
pub type Id = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
    /// Enrolled count
    #[serde(default)]
    pub students: u32,
    #[serde(default = "default_course_max")]
    pub max: u32,
    #[serde(default)]
    pub is_full: bool,
    #[serde(default = "default_course_img")]
    pub img: String,
    #[serde(default = "default_course_color")]
    pub color: String,
}

fn default_course_max() -> u32 {
    40
}

fn default_course_img() -> String {
    "fa-book".to_string()
}

fn default_course_color() -> String {
    "indigo".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub name: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRef {
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub courses: Vec<CourseRef>,
}

/// One page of a paged listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    /// Zero-based page index
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Id,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub course_id: Option<Id>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignment {
    pub title: String,
    pub course_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentGrade {
    pub id: Id,
    #[serde(default)]
    pub student_id: Option<Id>,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub course_id: Option<Id>,
    #[serde(default)]
    pub points: Option<f64>,
}

/// Attendance as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(default)]
    pub id: Option<Id>,
    pub student_id: Id,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub course_id: Option<Id>,
    #[serde(default)]
    pub attendance_date: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub check_in_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAttendanceRow {
    pub student_id: Id,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub present_count: u32,
    #[serde(default)]
    pub absent_count: u32,
    #[serde(default)]
    pub late_count: u32,
    /// Per-day breakdown and anything else the backend adds
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub amount: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default, alias = "paymentId")]
    pub id: Option<Value>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub qr_string: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Payment {
    /// Id rendered as text whether the backend sends a number or a string
    pub fn id_text(&self) -> Option<String> {
        match &self.id {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Id,
    pub from: String,
    pub text: String,
    pub time: String,
    pub unread: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_presentation_defaults() {
        let course: Course = serde_json::from_str(r#"{"id":3,"name":"Web","code":"ITE101"}"#).unwrap();
        assert_eq!(course.students, 0);
        assert_eq!(course.max, 40);
        assert!(!course.is_full);
        assert_eq!(course.img, "fa-book");
        assert_eq!(course.color, "indigo");
    }

    #[test]
    fn test_page_deserialize() {
        let json = r#"{
            "content": [{"id": 1, "name": "A", "courses": [{"id": 2, "code": "CS201"}]}],
            "number": 0,
            "size": 10,
            "totalPages": 3,
            "totalElements": 21,
            "first": true,
            "last": false
        }"#;
        let page: Page<Student> = serde_json::from_str(json).unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].courses[0].code, "CS201");
        assert_eq!(page.total_pages, 3);
        assert!(page.first);
        assert!(!page.last);
    }

    #[test]
    fn test_monthly_row_keeps_extra_fields() {
        let json = r#"{"studentId": 4, "studentName": "B", "presentCount": 18, "days": {"1": "Present"}}"#;
        let row: MonthlyAttendanceRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.present_count, 18);
        assert_eq!(row.absent_count, 0);
        assert!(row.extra.contains_key("days"));
    }

    #[test]
    fn test_payment_id_text() {
        let payment: Payment = serde_json::from_str(r#"{"paymentId": 55, "status": "PENDING"}"#).unwrap();
        assert_eq!(payment.id_text().as_deref(), Some("55"));

        let payment: Payment = serde_json::from_str(r#"{"id": "PAY-1"}"#).unwrap();
        assert_eq!(payment.id_text().as_deref(), Some("PAY-1"));
    }

    #[test]
    fn test_registration_serializes_camel_case() {
        let reg = Registration {
            full_name: "Dara".to_string(),
            email: "d@x.edu".to_string(),
            password: "pw".to_string(),
            phone_number: None,
            role: Some("STUDENT".to_string()),
        };
        let json = serde_json::to_value(&reg).unwrap();
        assert_eq!(json["fullName"], "Dara");
        assert!(json.get("phoneNumber").is_none());
    }
}
