use reqwest::Method;

use super::{routes, ApiClient};
use crate::attendance::{AttendanceBackend, AttendanceUpdate, RosterEntry};
use crate::domain::{AttendanceRecord, Id, MonthlyAttendanceRow};
use crate::error::ApiResult;

impl ApiClient {
    pub async fn list_attendance(&self) -> ApiResult<Vec<AttendanceRecord>> {
        let request = self
            .http
            .request(Method::GET, &self.routes.api(routes::ATTENDANCE_ALL))
            .await;
        self.http.send_json(request).await
    }

    pub async fn bulk_save_attendance(&self, records: &[AttendanceUpdate]) -> ApiResult<()> {
        let request = self
            .http
            .request(Method::POST, &self.routes.api(routes::ATTENDANCE_BULK))
            .await
            .json(records);
        self.http.send(request).await?;
        Ok(())
    }

    pub async fn monthly_attendance_overview(
        &self,
        course_id: Id,
        year: i32,
        month: u32,
    ) -> ApiResult<Vec<MonthlyAttendanceRow>> {
        let request = self
            .http
            .request(Method::GET, &self.routes.api(routes::ATTENDANCE_MONTHLY))
            .await
            .query(&[
                ("courseId", course_id.to_string()),
                ("year", year.to_string()),
                ("month", month.to_string()),
            ]);
        let rows: Vec<MonthlyAttendanceRow> = self.http.send_json(request).await?;
        tracing::debug!(course_id, year, month, students = rows.len(), "Monthly overview loaded");
        Ok(rows)
    }
}

impl AttendanceBackend for ApiClient {
    async fn roster(&self, course_id: Id) -> ApiResult<Vec<RosterEntry>> {
        let page = self.students_by_course(course_id).await?;
        Ok(page
            .content
            .into_iter()
            .map(|student| RosterEntry {
                id: student.id,
                name: student.name,
                course_id,
            })
            .collect())
    }

    async fn bulk_write(&self, batch: &[AttendanceUpdate]) -> ApiResult<()> {
        self.bulk_save_attendance(batch).await
    }
}
