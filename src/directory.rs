//! Paged, searchable student listing.

use std::future::Future;

use crate::api::{ApiClient, StudentQuery};
use crate::domain::{Id, Page, Student};
use crate::error::ApiResult;

pub trait StudentSource: Send + Sync {
    fn students(&self, query: &StudentQuery) -> impl Future<Output = ApiResult<Page<Student>>> + Send;
}

impl StudentSource for ApiClient {
    async fn students(&self, query: &StudentQuery) -> ApiResult<Page<Student>> {
        self.list_students(query).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryStatus {
    Idle,
    Loaded,
    Failed(String),
}

/// Cursor, search text and course filter over the student listing
pub struct StudentDirectory<S> {
    source: S,
    query: StudentQuery,
    current: Option<Page<Student>>,
    status: DirectoryStatus,
}

impl<S: StudentSource> StudentDirectory<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            query: StudentQuery::default(),
            current: None,
            status: DirectoryStatus::Idle,
        }
    }

    /// Starts with a course filter and search text already applied; nothing is loaded yet
    pub fn with_filters(source: S, course_id: Option<Id>, search: Option<&str>) -> Self {
        let mut directory = Self::new(source);
        directory.query.course_id = course_id;
        directory.query.search = search.and_then(search_text);
        directory
    }

    /// Loads `page` with the current search and filter
    pub async fn load(&mut self, page: u32) -> &DirectoryStatus {
        self.query.page = page;

        match self.source.students(&self.query).await {
            Ok(result) => {
                tracing::debug!(
                    page,
                    rows = result.content.len(),
                    total_pages = result.total_pages,
                    "Student page loaded"
                );
                self.current = Some(result);
                self.status = DirectoryStatus::Loaded;
            }
            Err(e) => {
                tracing::error!(page, error = %e, "Failed to load students");
                self.status = DirectoryStatus::Failed(e.to_string());
            }
        }

        &self.status
    }

    /// New search text; restarts from the first page
    pub async fn search(&mut self, text: &str) -> &DirectoryStatus {
        self.query.search = search_text(text);
        self.load(0).await
    }

    /// New course filter; restarts from the first page
    pub async fn filter(&mut self, course_id: Option<Id>) -> &DirectoryStatus {
        self.query.course_id = course_id;
        self.load(0).await
    }

    /// Advances one page; `false` when already on the last page
    pub async fn next(&mut self) -> bool {
        match &self.current {
            Some(page) if !page.last && page.number + 1 < page.total_pages => {
                let target = page.number + 1;
                self.load(target).await;
                true
            }
            _ => false,
        }
    }

    /// Goes back one page; `false` when already on the first page
    pub async fn prev(&mut self) -> bool {
        match &self.current {
            Some(page) if !page.first && page.number > 0 => {
                let target = page.number - 1;
                self.load(target).await;
                true
            }
            _ => false,
        }
    }

    pub fn query(&self) -> &StudentQuery {
        &self.query
    }

    pub fn current(&self) -> Option<&Page<Student>> {
        self.current.as_ref()
    }

    pub fn status(&self) -> &DirectoryStatus {
        &self.status
    }
}

/// Trimmed search text; blank means no search
fn search_text(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
