use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::recurrence::Frequency;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "task_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    #[default]
    Generic,
    House,
    Baby,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn is_open(self) -> bool {
        matches!(self, TaskStatus::Todo | TaskStatus::InProgress)
    }

    /// `completed_at` value that goes with this status.
    pub fn completed_at(self, now: OffsetDateTime) -> Option<OffsetDateTime> {
        (self == TaskStatus::Done).then_some(now)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub household_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub task_type: TaskType,
    pub assigned_to_user_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    pub status: TaskStatus,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub household_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub task_type: TaskType,
    pub assigned_to_user_id: Option<Uuid>,
    pub due_date: Option<OffsetDateTime>,
    pub status: TaskStatus,
    pub completed_at: Option<OffsetDateTime>,
}

/// Partial update. The outer `Option` means "leave unchanged"; an inner
/// `None` clears the column.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub task_type: Option<TaskType>,
    pub assigned_to_user_id: Option<Option<Uuid>>,
    pub due_date: Option<Option<OffsetDateTime>>,
    pub status: Option<(TaskStatus, Option<OffsetDateTime>)>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.task_type.is_none()
            && self.assigned_to_user_id.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
    }
}

/// Template that produces a DONE task each time it is completed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTask {
    pub id: Uuid,
    pub household_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub frequency: Frequency,
    pub interval: i32,
    pub assigned_to_user_id: Option<Uuid>,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_occurrence_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub next_occurrence_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewRecurringTask {
    pub household_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub frequency: Frequency,
    pub interval: i32,
    pub assigned_to_user_id: Option<Uuid>,
    pub next_occurrence_at: OffsetDateTime,
}

/// Cursor advance plus the history row written for one completion.
#[derive(Debug, Clone)]
pub struct RecurringCompletion {
    pub household_id: Uuid,
    pub recurring_task_id: Uuid,
    pub completed_at: OffsetDateTime,
    pub next_occurrence_at: OffsetDateTime,
    pub snapshot: NewTask,
}
