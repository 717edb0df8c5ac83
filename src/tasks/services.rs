use std::collections::{BTreeMap, HashMap};

use time::Duration;
use tracing::info;
use uuid::Uuid;

use super::dto::{
    CompletedOccurrence, CreateRecurringTaskRequest, CreateTaskRequest, RecurringTaskView,
    TaskStats, TaskView, UpdateTaskRequest,
};
use super::repo_types::{
    NewRecurringTask, NewTask, RecurringCompletion, Task, TaskChanges, TaskStatus, TaskType,
};
use crate::{
    dates::{self, WeekBounds},
    error::{require_text, AppError, AppResult},
    households::{
        repo_types::{User, UserSummary},
        services::check_assignee,
    },
    recurrence::next_occurrence,
    state::AppState,
};

/// Bucket key for tasks nobody is assigned to.
pub const UNASSIGNED: &str = "unassigned";

fn summaries(users: &[User]) -> HashMap<Uuid, UserSummary> {
    users.iter().map(|u| (u.id, u.summary())).collect()
}

fn attach_assignees(tasks: Vec<Task>, users: &[User]) -> Vec<TaskView> {
    let by_id = summaries(users);
    tasks
        .into_iter()
        .map(|task| TaskView {
            assigned_to: task.assigned_to_user_id.and_then(|id| by_id.get(&id).cloned()),
            task,
        })
        .collect()
}

async fn with_assignees(st: &AppState, household_id: Uuid, tasks: Vec<Task>) -> AppResult<Vec<TaskView>> {
    if tasks.iter().all(|t| t.assigned_to_user_id.is_none()) {
        return Ok(attach_assignees(tasks, &[]));
    }
    let users = st.households.list_users(household_id).await?;
    Ok(attach_assignees(tasks, &users))
}

/// Groups by assignee, counting DONE tasks as completed.
pub fn weekly_task_stats(tasks: &[Task], users: &[User]) -> BTreeMap<String, TaskStats> {
    let by_id = summaries(users);
    let mut stats: BTreeMap<String, TaskStats> = BTreeMap::new();
    for task in tasks {
        let key = task
            .assigned_to_user_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| UNASSIGNED.to_string());
        let entry = stats.entry(key).or_insert_with(|| TaskStats {
            total: 0,
            completed: 0,
            user: task.assigned_to_user_id.and_then(|id| by_id.get(&id).cloned()),
        });
        entry.total += 1;
        if task.status == TaskStatus::Done {
            entry.completed += 1;
        }
    }
    stats
}

/// Open tasks due today, plus open tasks without a due date.
pub async fn tasks_for_today(st: &AppState, household_id: Uuid) -> AppResult<Vec<TaskView>> {
    let (start, end) = dates::day_bounds(st.clock.now());
    let tasks = st
        .tasks
        .list_open_due_or_undated(household_id, start, end)
        .await?;
    with_assignees(st, household_id, tasks).await
}

/// Every task due in the seven days starting today, whatever its status.
pub async fn tasks_for_week(st: &AppState, household_id: Uuid) -> AppResult<Vec<TaskView>> {
    let (start, _) = dates::day_bounds(st.clock.now());
    let tasks = st
        .tasks
        .list_due_between(household_id, start, start + Duration::days(7))
        .await?;
    with_assignees(st, household_id, tasks).await
}

/// Stats over the Monday-aligned calendar week.
pub async fn calendar_week_stats(
    st: &AppState,
    household_id: Uuid,
    week: &WeekBounds,
) -> AppResult<BTreeMap<String, TaskStats>> {
    let tasks = st
        .tasks
        .list_due_between(household_id, week.start, week.end_exclusive())
        .await?;
    let users = st.households.list_users(household_id).await?;
    Ok(weekly_task_stats(&tasks, &users))
}

pub async fn create_task(
    st: &AppState,
    household_id: Uuid,
    req: CreateTaskRequest,
) -> AppResult<TaskView> {
    let title = require_text("title", &req.title)?;
    check_assignee(st, household_id, req.assigned_to_user_id).await?;

    let task = st
        .tasks
        .insert_task(NewTask {
            household_id,
            title,
            description: req.description,
            task_type: req.task_type,
            assigned_to_user_id: req.assigned_to_user_id,
            due_date: req.due_date,
            status: TaskStatus::Todo,
            completed_at: None,
        })
        .await?;
    info!(%household_id, task_id = %task.id, "task created");

    let mut views = with_assignees(st, household_id, vec![task]).await?;
    views.pop().ok_or(AppError::NotFound("Task"))
}

pub async fn update_task(
    st: &AppState,
    household_id: Uuid,
    task_id: Uuid,
    req: UpdateTaskRequest,
) -> AppResult<TaskView> {
    let title = req.title.map(|t| require_text("title", &t)).transpose()?;
    if let Some(assignee) = req.assigned_to_user_id {
        check_assignee(st, household_id, assignee).await?;
    }
    let now = st.clock.now();

    let changes = TaskChanges {
        title,
        description: req.description,
        task_type: req.task_type,
        assigned_to_user_id: req.assigned_to_user_id,
        due_date: req.due_date,
        status: req.status.map(|s| (s, s.completed_at(now))),
    };
    if changes.is_empty() {
        return Err(AppError::validation("no valid fields provided"));
    }

    let task = st
        .tasks
        .update_task(household_id, task_id, changes)
        .await?
        .ok_or(AppError::NotFound("Task"))?;
    info!(%household_id, %task_id, status = ?task.status, "task updated");

    let mut views = with_assignees(st, household_id, vec![task]).await?;
    views.pop().ok_or(AppError::NotFound("Task"))
}

/// `completed_at` is stamped when the status becomes DONE and cleared otherwise.
pub async fn update_task_status(
    st: &AppState,
    household_id: Uuid,
    task_id: Uuid,
    status: TaskStatus,
) -> AppResult<TaskView> {
    update_task(
        st,
        household_id,
        task_id,
        UpdateTaskRequest {
            status: Some(status),
            ..Default::default()
        },
    )
    .await
}

pub async fn list_recurring_tasks(
    st: &AppState,
    household_id: Uuid,
) -> AppResult<Vec<RecurringTaskView>> {
    let recurring = st.tasks.list_active_recurring(household_id).await?;
    let users = st.households.list_users(household_id).await?;
    let by_id = summaries(&users);
    Ok(recurring
        .into_iter()
        .map(|r| RecurringTaskView {
            assigned_to: r.assigned_to_user_id.and_then(|id| by_id.get(&id).cloned()),
            recurring_task: r,
        })
        .collect())
}

pub async fn create_recurring_task(
    st: &AppState,
    household_id: Uuid,
    req: CreateRecurringTaskRequest,
) -> AppResult<RecurringTaskView> {
    let title = require_text("title", &req.title)?;
    let interval = u32::try_from(req.interval)
        .ok()
        .filter(|i| *i >= 1)
        .ok_or_else(|| AppError::validation("interval must be at least 1"))?;
    check_assignee(st, household_id, req.assigned_to_user_id).await?;

    let next = next_occurrence(st.clock.now(), req.frequency, interval)
        .ok_or_else(|| AppError::validation("interval is too large"))?;

    let recurring = st
        .tasks
        .insert_recurring(NewRecurringTask {
            household_id,
            title,
            description: req.description,
            frequency: req.frequency,
            interval: req.interval,
            assigned_to_user_id: req.assigned_to_user_id,
            next_occurrence_at: next,
        })
        .await?;
    info!(%household_id, recurring_task_id = %recurring.id, frequency = ?recurring.frequency, "recurring task created");

    let users = st.households.list_users(household_id).await?;
    Ok(RecurringTaskView {
        assigned_to: recurring
            .assigned_to_user_id
            .and_then(|id| users.iter().find(|u| u.id == id).map(User::summary)),
        recurring_task: recurring,
    })
}

/// Marks the current occurrence done: advances the cursor from now and
/// records a DONE task due at the previous cursor.
pub async fn complete_recurring_task(
    st: &AppState,
    household_id: Uuid,
    recurring_task_id: Uuid,
) -> AppResult<CompletedOccurrence> {
    let recurring = st
        .tasks
        .find_recurring(household_id, recurring_task_id)
        .await?
        .ok_or(AppError::NotFound("Recurring task"))?;

    let now = st.clock.now();
    let interval = u32::try_from(recurring.interval).unwrap_or(1).max(1);
    let next = next_occurrence(now, recurring.frequency, interval)
        .ok_or_else(|| AppError::validation("next occurrence is out of range"))?;

    let completion = RecurringCompletion {
        household_id,
        recurring_task_id,
        completed_at: now,
        next_occurrence_at: next,
        snapshot: NewTask {
            household_id,
            title: recurring.title.clone(),
            description: recurring.description.clone(),
            task_type: TaskType::Generic,
            assigned_to_user_id: recurring.assigned_to_user_id,
            due_date: Some(recurring.next_occurrence_at),
            status: TaskStatus::Done,
            completed_at: Some(now),
        },
    };

    let (updated, snapshot) = st
        .tasks
        .record_completion(completion)
        .await?
        .ok_or(AppError::NotFound("Recurring task"))?;
    info!(
        %household_id,
        %recurring_task_id,
        next_occurrence_at = %updated.next_occurrence_at,
        "recurring task completed"
    );

    Ok(CompletedOccurrence {
        updated_recurring_task: updated,
        completed_task: snapshot,
    })
}
