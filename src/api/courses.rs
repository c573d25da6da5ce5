use reqwest::Method;
use serde_json::Value;

use super::{routes, ApiClient};
use crate::domain::{Course, NewCourse};
use crate::error::ApiResult;

impl ApiClient {
    pub async fn list_courses(&self) -> ApiResult<Vec<Course>> {
        let request = self
            .http
            .request(Method::GET, &self.routes.api(routes::COURSES_ALL))
            .await;
        self.http.send_json(request).await
    }

    pub async fn create_course(&self, course: &NewCourse) -> ApiResult<Value> {
        let request = self
            .http
            .request(Method::POST, &self.routes.api(routes::COURSES_SAVE))
            .await
            .json(course);
        let created = self.http.send(request).await?;
        tracing::info!(name = %course.name, code = %course.code, "Course created");
        Ok(created)
    }
}
