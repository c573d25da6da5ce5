use reqwest::Method;
use serde_json::{json, Value};

use super::{routes, ApiClient};
use crate::domain::{Id, StudentGrade};
use crate::error::{ApiError, ApiResult};

impl ApiClient {
    pub async fn list_grades(&self) -> ApiResult<Vec<StudentGrade>> {
        let request = self
            .http
            .request(Method::GET, &self.routes.api(routes::STUDENT_GRADES))
            .await;
        self.http.send_json(request).await
    }

    /// Raw grade record, unknown fields included
    pub async fn get_grade(&self, id: Id) -> ApiResult<Value> {
        let request = self
            .http
            .request(Method::GET, &self.routes.api_item(routes::STUDENT_GRADES, id))
            .await;
        self.http.send(request).await
    }

    /// Replaces `points` on the stored record and writes it back.
    ///
    /// The record is read first so fields this client does not model
    /// survive the PUT.
    pub async fn update_grade(&self, id: Id, points: f64) -> ApiResult<Value> {
        let mut record = self.get_grade(id).await?;
        let Some(fields) = record.as_object_mut() else {
            return Err(ApiError::MalformedBody(format!(
                "grade {} is not a JSON object",
                id
            )));
        };
        fields.insert("points".to_string(), json!(points));

        let request = self
            .http
            .request(Method::PUT, &self.routes.api_item(routes::STUDENT_GRADES, id))
            .await
            .json(&record);
        let updated = self.http.send(request).await?;
        tracing::info!(grade_id = id, points, "Grade updated");
        Ok(updated)
    }
}
