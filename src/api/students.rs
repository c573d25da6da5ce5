use reqwest::Method;

use super::{routes, ApiClient};
use crate::domain::{Id, Page, Student};
use crate::error::ApiResult;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Roster fetches ask for the whole class in one page
pub const ROSTER_PAGE_SIZE: u32 = 100;
pub const CLASSMATES_PAGE_SIZE: u32 = 50;

/// Query for the paged student listing
#[derive(Debug, Clone, PartialEq)]
pub struct StudentQuery {
    pub page: u32,
    pub size: u32,
    pub course_id: Option<Id>,
    pub search: Option<String>,
}

impl Default for StudentQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            course_id: None,
            search: None,
        }
    }
}

impl StudentQuery {
    /// Query string pairs; empty filters are left out
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        if let Some(course_id) = self.course_id {
            params.push(("courseId", course_id.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        params
    }
}

impl ApiClient {
    pub async fn list_students(&self, query: &StudentQuery) -> ApiResult<Page<Student>> {
        let request = self
            .http
            .request(Method::GET, &self.routes.api(routes::STUDENTS))
            .await
            .query(&query.params());
        self.http.send_json(request).await
    }

    pub async fn students_by_course(&self, course_id: Id) -> ApiResult<Page<Student>> {
        let request = self
            .http
            .request(Method::GET, &self.routes.api(routes::STUDENTS))
            .await
            .query(&[
                ("courseId", course_id.to_string()),
                ("size", ROSTER_PAGE_SIZE.to_string()),
            ]);
        self.http.send_json(request).await
    }

    pub async fn classmates(&self) -> ApiResult<Vec<Student>> {
        let request = self
            .http
            .request(Method::GET, &self.routes.api(routes::STUDENTS))
            .await
            .query(&[("size", CLASSMATES_PAGE_SIZE.to_string())]);
        let page: Page<Student> = self.http.send_json(request).await?;
        Ok(page.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_params() {
        let params = StudentQuery::default().params();
        assert_eq!(
            params,
            vec![("page", "0".to_string()), ("size", "10".to_string())]
        );
    }

    #[test]
    fn test_filters_included_when_set() {
        let query = StudentQuery {
            page: 2,
            size: 10,
            course_id: Some(4),
            search: Some("sok".to_string()),
        };
        let params = query.params();
        assert!(params.contains(&("courseId", "4".to_string())));
        assert!(params.contains(&("search", "sok".to_string())));
    }

    #[test]
    fn test_empty_search_omitted() {
        let query = StudentQuery {
            search: Some(String::new()),
            ..StudentQuery::default()
        };
        assert!(query.params().iter().all(|(k, _)| *k != "search"));
    }
}
