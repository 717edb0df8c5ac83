use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{RecurringTask, Task, TaskStatus, TaskType};
use crate::{households::repo_types::UserSummary, recurrence::Frequency};

/// Task with its assignee resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub assigned_to: Option<UserSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTaskView {
    #[serde(flatten)]
    pub recurring_task: RecurringTask,
    pub assigned_to: Option<UserSummary>,
}

/// Per-assignee counts over a set of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: u32,
    pub completed: u32,
    pub user: Option<UserSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedOccurrence {
    pub updated_recurring_task: RecurringTask,
    pub completed_task: Task,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub task_type: TaskType,
    pub assigned_to_user_id: Option<Uuid>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "crate::patch::nullable")]
    pub description: Option<Option<String>>,
    #[serde(rename = "type")]
    pub task_type: Option<TaskType>,
    #[serde(default, deserialize_with = "crate::patch::nullable")]
    pub assigned_to_user_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "crate::patch::nullable_rfc3339")]
    pub due_date: Option<Option<OffsetDateTime>>,
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecurringTaskRequest {
    pub title: String,
    pub frequency: Frequency,
    pub description: Option<String>,
    #[serde(default = "default_interval")]
    pub interval: i32,
    pub assigned_to_user_id: Option<Uuid>,
}
fn default_interval() -> i32 {
    1
}
