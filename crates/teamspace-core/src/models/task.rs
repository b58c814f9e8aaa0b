use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Backlog,
    Todo,
    InProgress,
    InReview,
    Done,
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TaskStatus::Backlog => write!(f, "BACKLOG"),
            TaskStatus::Todo => write!(f, "TODO"),
            TaskStatus::InProgress => write!(f, "IN_PROGRESS"),
            TaskStatus::InReview => write!(f, "IN_REVIEW"),
            TaskStatus::Done => write!(f, "DONE"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BACKLOG" => Ok(TaskStatus::Backlog),
            "TODO" => Ok(TaskStatus::Todo),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "IN_REVIEW" => Ok(TaskStatus::InReview),
            "DONE" => Ok(TaskStatus::Done),
            _ => Err(anyhow::anyhow!("Invalid task status: {}", s)),
        }
    }
}

/// Task entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub workspace_id: Uuid,
    pub project_id: Uuid,
    /// Member id within the same workspace
    pub assignee_id: Uuid,
    pub status: TaskStatus,
    pub due_date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub workspace_id: Uuid,
    pub project_id: Uuid,
    pub assignee_id: Uuid,
    pub status: TaskStatus,
    pub due_date: NaiveDate,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub name: Option<String>,
    pub project_id: Option<Uuid>,
    pub assignee_id: Option<Uuid>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
}

/// Filters for task listing; all set fields must match
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub workspace_id: Uuid,
    pub project_id: Option<Uuid>,
    pub assignee_id: Option<Uuid>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
    /// Case-insensitive substring of the task name
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        task.workspace_id == self.workspace_id
            && self.project_id.is_none_or(|id| task.project_id == id)
            && self.assignee_id.is_none_or(|id| task.assignee_id == id)
            && self.status.is_none_or(|status| task.status == status)
            && self.due_date.is_none_or(|date| task.due_date == date)
            && self.search.as_deref().is_none_or(|needle| {
                task.name.to_lowercase().contains(&needle.to_lowercase())
            })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 256, message = "Task name is required"))]
    pub name: String,
    pub workspace_id: Uuid,
    pub project_id: Uuid,
    pub assignee_id: Uuid,
    pub status: TaskStatus,
    pub due_date: NaiveDate,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 256, message = "Task name cannot be empty"))]
    pub name: Option<String>,
    pub project_id: Option<Uuid>,
    pub assignee_id: Option<Uuid>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
}

impl From<UpdateTaskRequest> for TaskChanges {
    fn from(req: UpdateTaskRequest) -> Self {
        TaskChanges {
            name: req.name,
            project_id: req.project_id,
            assignee_id: req.assignee_id,
            status: req.status,
            due_date: req.due_date,
            description: req
                .description
                .map(|d| if d.trim().is_empty() { None } else { Some(d) }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str, status: TaskStatus) -> Task {
        Task {
            id: Uuid::new_v4(),
            name: name.to_string(),
            workspace_id: Uuid::nil(),
            project_id: Uuid::nil(),
            assignee_id: Uuid::nil(),
            status,
            due_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn status_uses_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!("IN_REVIEW".parse::<TaskStatus>().unwrap(), TaskStatus::InReview);
        assert!("in_review".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn filter_matches_search_case_insensitively() {
        let filter = TaskFilter {
            workspace_id: Uuid::nil(),
            search: Some("LOGIN".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&task("Fix login page", TaskStatus::Todo)));
        assert!(!filter.matches(&task("Write docs", TaskStatus::Todo)));
    }

    #[test]
    fn filter_requires_every_set_field() {
        let filter = TaskFilter {
            workspace_id: Uuid::nil(),
            status: Some(TaskStatus::Done),
            due_date: NaiveDate::from_ymd_opt(2026, 1, 15),
            ..Default::default()
        };
        assert!(filter.matches(&task("a", TaskStatus::Done)));
        assert!(!filter.matches(&task("a", TaskStatus::Todo)));

        let other_workspace = TaskFilter {
            workspace_id: Uuid::new_v4(),
            ..Default::default()
        };
        assert!(!other_workspace.matches(&task("a", TaskStatus::Done)));
    }

    #[test]
    fn empty_description_clears() {
        let changes: TaskChanges = UpdateTaskRequest {
            description: Some("  ".to_string()),
            ..Default::default()
        }
        .into();
        assert_eq!(changes.description, Some(None));
    }
}
