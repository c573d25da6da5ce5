use reqwest::Method;
use serde_json::Value;

use super::{routes, ApiClient};
use crate::domain::{Assignment, NewAssignment};
use crate::error::ApiResult;

impl ApiClient {
    pub async fn list_assignments(&self) -> ApiResult<Vec<Assignment>> {
        let request = self
            .http
            .request(Method::GET, &self.routes.api(routes::ASSIGNMENTS))
            .await;
        self.http.send_json(request).await
    }

    pub async fn create_assignment(&self, assignment: &NewAssignment) -> ApiResult<Value> {
        let request = self
            .http
            .request(Method::POST, &self.routes.api(routes::ASSIGNMENTS))
            .await
            .json(assignment);
        let created = self.http.send(request).await?;
        tracing::info!(
            title = %assignment.title,
            course_id = assignment.course_id,
            "Assignment created"
        );
        Ok(created)
    }
}
