use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::FieldError;
use crate::tasks::repo::{Task, TaskCategory, TaskPriority, TaskStatus};

pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;
pub const TAG_MAX: usize = 30;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub category: Option<TaskCategory>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    pub estimated_time: Option<i32>,
    pub actual_time: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateTaskRequest {
    /// Trims free-text fields and reports every constraint violation.
    pub fn validate(&mut self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        self.title = self.title.trim().to_string();
        if self.title.is_empty() || self.title.chars().count() > TITLE_MAX {
            errors.push(FieldError::new(
                "title",
                "Title must be between 1 and 100 characters",
            ));
        }
        if let Some(description) = &mut self.description {
            *description = description.trim().to_string();
            if description.chars().count() > DESCRIPTION_MAX {
                errors.push(FieldError::new(
                    "description",
                    "Description cannot be more than 500 characters",
                ));
            }
        }
        validate_times(self.estimated_time, self.actual_time, &mut errors);
        validate_tags(&mut self.tags, &mut errors);
        errors
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub category: Option<TaskCategory>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    pub estimated_time: Option<i32>,
    pub actual_time: Option<i32>,
    pub tags: Option<Vec<String>>,
}

impl UpdateTaskRequest {
    pub fn validate(&mut self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Some(title) = &mut self.title {
            *title = title.trim().to_string();
            if title.is_empty() || title.chars().count() > TITLE_MAX {
                errors.push(FieldError::new(
                    "title",
                    "Title must be between 1 and 100 characters",
                ));
            }
        }
        if let Some(description) = &mut self.description {
            *description = description.trim().to_string();
            if description.chars().count() > DESCRIPTION_MAX {
                errors.push(FieldError::new(
                    "description",
                    "Description cannot be more than 500 characters",
                ));
            }
        }
        validate_times(self.estimated_time, self.actual_time, &mut errors);
        if let Some(tags) = &mut self.tags {
            validate_tags(tags, &mut errors);
        }
        errors
    }
}

fn validate_times(estimated: Option<i32>, actual: Option<i32>, errors: &mut Vec<FieldError>) {
    if let Some(minutes) = estimated {
        if minutes < 1 {
            errors.push(FieldError::new(
                "estimatedTime",
                "Estimated time must be a positive integer",
            ));
        }
    }
    if let Some(minutes) = actual {
        if minutes < 0 {
            errors.push(FieldError::new(
                "actualTime",
                "Actual time must be a non-negative integer",
            ));
        }
    }
}

fn validate_tags(tags: &mut [String], errors: &mut Vec<FieldError>) {
    for tag in tags.iter_mut() {
        *tag = tag.trim().to_string();
        if tag.chars().count() > TAG_MAX {
            errors.push(FieldError::new(
                "tags",
                "Tag cannot be more than 30 characters",
            ));
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub category: Option<TaskCategory>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default = "default_sort")]
    pub sort: String,
}

fn default_page() -> i64 {
    1
}
fn default_limit() -> i64 {
    10
}
fn default_sort() -> String {
    "-createdAt".into()
}

impl TaskListQuery {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.page < 1 {
            errors.push(FieldError::new("page", "Page must be at least 1"));
        }
        if self.limit < 1 || self.limit > 100 {
            errors.push(FieldError::new("limit", "Limit must be between 1 and 100"));
        }
        if parse_sort(&self.sort).is_none() {
            errors.push(FieldError::new("sort", "Invalid sort field"));
        }
        errors
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Maps an API sort key to a whitelisted column and direction.
/// A leading `-` selects descending order.
pub fn parse_sort(sort: &str) -> Option<(&'static str, bool)> {
    let (key, descending) = match sort.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (sort, false),
    };
    let column = match key {
        "createdAt" => "created_at",
        "updatedAt" => "updated_at",
        "dueDate" => "due_date",
        "title" => "title",
        _ => return None,
    };
    Some((column, descending))
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(title: &str) -> CreateTaskRequest {
        CreateTaskRequest {
            title: title.into(),
            description: None,
            status: None,
            priority: None,
            category: None,
            due_date: None,
            estimated_time: None,
            actual_time: None,
            tags: vec![],
        }
    }

    #[test]
    fn create_rejects_blank_and_oversized_title() {
        let mut req = create_request("   ");
        assert!(req.validate().iter().any(|e| e.field == "title"));

        let mut req = create_request(&"x".repeat(101));
        assert!(req.validate().iter().any(|e| e.field == "title"));

        let mut req = create_request("Write report");
        assert!(req.validate().is_empty());
    }

    #[test]
    fn create_trims_title_and_tags() {
        let mut req = create_request("  Write report  ");
        req.tags = vec!["  focus ".into()];
        assert!(req.validate().is_empty());
        assert_eq!(req.title, "Write report");
        assert_eq!(req.tags[0], "focus");
    }

    #[test]
    fn create_rejects_bad_durations() {
        let mut req = create_request("ok");
        req.estimated_time = Some(0);
        req.actual_time = Some(-5);
        let errors = req.validate();
        assert!(errors.iter().any(|e| e.field == "estimatedTime"));
        assert!(errors.iter().any(|e| e.field == "actualTime"));
    }

    #[test]
    fn create_rejects_long_description_and_tag() {
        let mut req = create_request("ok");
        req.description = Some("d".repeat(501));
        req.tags = vec!["t".repeat(31)];
        let errors = req.validate();
        assert!(errors.iter().any(|e| e.field == "description"));
        assert!(errors.iter().any(|e| e.field == "tags"));
    }

    #[test]
    fn length_limits_count_characters_not_bytes() {
        // 100 two-byte characters stay within the title limit.
        let mut req = create_request(&"é".repeat(100));
        req.description = Some("ö".repeat(500));
        req.tags = vec!["ü".repeat(30)];
        assert!(req.validate().is_empty());

        let mut req = create_request(&"é".repeat(101));
        assert!(req.validate().iter().any(|e| e.field == "title"));
    }

    #[test]
    fn update_allows_empty_body() {
        let mut req = UpdateTaskRequest::default();
        assert!(req.validate().is_empty());
    }

    #[test]
    fn list_query_defaults() {
        let q: TaskListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 10);
        assert_eq!(q.sort, "-createdAt");
        assert!(q.validate().is_empty());
    }

    #[test]
    fn list_query_bounds() {
        let q: TaskListQuery = serde_json::from_str(r#"{"page":0,"limit":101}"#).unwrap();
        let errors = q.validate();
        assert!(errors.iter().any(|e| e.field == "page"));
        assert!(errors.iter().any(|e| e.field == "limit"));
    }

    #[test]
    fn sort_whitelist() {
        assert_eq!(parse_sort("-createdAt"), Some(("created_at", true)));
        assert_eq!(parse_sort("dueDate"), Some(("due_date", false)));
        assert_eq!(parse_sort("-title"), Some(("title", true)));
        assert_eq!(parse_sort("priority"), None);
        assert_eq!(parse_sort("created_at; DROP TABLE tasks"), None);
    }

    #[test]
    fn list_query_offset() {
        let q: TaskListQuery = serde_json::from_str(r#"{"page":3,"limit":10}"#).unwrap();
        assert_eq!(q.offset(), 20);
    }
}
