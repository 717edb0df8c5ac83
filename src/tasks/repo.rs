use async_trait::async_trait;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{
    NewRecurringTask, NewTask, RecurringCompletion, RecurringTask, Task, TaskChanges, TaskStatus,
};

#[async_trait]
pub trait TaskRepo: Send + Sync {
    /// Open tasks (TODO / IN_PROGRESS) due within `[from, until)` or undated,
    /// oldest first.
    async fn list_open_due_or_undated(
        &self,
        household_id: Uuid,
        from: OffsetDateTime,
        until: OffsetDateTime,
    ) -> anyhow::Result<Vec<Task>>;

    /// Tasks of any status due within `[from, until)`, by due date.
    async fn list_due_between(
        &self,
        household_id: Uuid,
        from: OffsetDateTime,
        until: OffsetDateTime,
    ) -> anyhow::Result<Vec<Task>>;

    async fn insert_task(&self, task: NewTask) -> anyhow::Result<Task>;

    async fn update_task(
        &self,
        household_id: Uuid,
        task_id: Uuid,
        changes: TaskChanges,
    ) -> anyhow::Result<Option<Task>>;

    /// Active templates ordered by next occurrence.
    async fn list_active_recurring(&self, household_id: Uuid) -> anyhow::Result<Vec<RecurringTask>>;

    async fn insert_recurring(&self, task: NewRecurringTask) -> anyhow::Result<RecurringTask>;

    async fn find_recurring(
        &self,
        household_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<RecurringTask>>;

    /// Advances the cursor and writes the DONE snapshot as one unit.
    async fn record_completion(
        &self,
        completion: RecurringCompletion,
    ) -> anyhow::Result<Option<(RecurringTask, Task)>>;
}

#[derive(Clone)]
pub struct PgTaskRepo {
    db: PgPool,
}

impl PgTaskRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const TASK_COLUMNS: &str = "id, household_id, title, description, type, assigned_to_user_id, \
     due_date, status, completed_at, created_at";

const RECURRING_COLUMNS: &str = "id, household_id, title, description, frequency, \"interval\", \
     assigned_to_user_id, is_active, last_occurrence_at, next_occurrence_at, created_at";

async fn insert_task_with<'e, E>(executor: E, task: &NewTask) -> sqlx::Result<Task>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, Task>(&format!(
        r#"
        INSERT INTO tasks
            (household_id, title, description, type, assigned_to_user_id, due_date, status, completed_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {TASK_COLUMNS}
        "#
    ))
    .bind(task.household_id)
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.task_type)
    .bind(task.assigned_to_user_id)
    .bind(task.due_date)
    .bind(task.status)
    .bind(task.completed_at)
    .fetch_one(executor)
    .await
}

#[async_trait]
impl TaskRepo for PgTaskRepo {
    async fn list_open_due_or_undated(
        &self,
        household_id: Uuid,
        from: OffsetDateTime,
        until: OffsetDateTime,
    ) -> anyhow::Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE household_id = $1
              AND ((due_date >= $2 AND due_date < $3) OR due_date IS NULL)
              AND status IN ($4, $5)
            ORDER BY created_at ASC
            "#
        ))
        .bind(household_id)
        .bind(from)
        .bind(until)
        .bind(TaskStatus::Todo)
        .bind(TaskStatus::InProgress)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn list_due_between(
        &self,
        household_id: Uuid,
        from: OffsetDateTime,
        until: OffsetDateTime,
    ) -> anyhow::Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE household_id = $1 AND due_date >= $2 AND due_date < $3
            ORDER BY due_date ASC
            "#
        ))
        .bind(household_id)
        .bind(from)
        .bind(until)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn insert_task(&self, task: NewTask) -> anyhow::Result<Task> {
        Ok(insert_task_with(&self.db, &task).await?)
    }

    async fn update_task(
        &self,
        household_id: Uuid,
        task_id: Uuid,
        changes: TaskChanges,
    ) -> anyhow::Result<Option<Task>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE tasks SET updated_at = now()");
        if let Some(title) = changes.title {
            qb.push(", title = ").push_bind(title);
        }
        if let Some(description) = changes.description {
            qb.push(", description = ").push_bind(description);
        }
        if let Some(task_type) = changes.task_type {
            qb.push(", type = ").push_bind(task_type);
        }
        if let Some(assignee) = changes.assigned_to_user_id {
            qb.push(", assigned_to_user_id = ").push_bind(assignee);
        }
        if let Some(due_date) = changes.due_date {
            qb.push(", due_date = ").push_bind(due_date);
        }
        if let Some((status, completed_at)) = changes.status {
            qb.push(", status = ").push_bind(status);
            qb.push(", completed_at = ").push_bind(completed_at);
        }
        qb.push(" WHERE id = ").push_bind(task_id);
        qb.push(" AND household_id = ").push_bind(household_id);
        qb.push(format!(" RETURNING {TASK_COLUMNS}"));

        let row = qb
            .build_query_as::<Task>()
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn list_active_recurring(&self, household_id: Uuid) -> anyhow::Result<Vec<RecurringTask>> {
        let rows = sqlx::query_as::<_, RecurringTask>(&format!(
            r#"
            SELECT {RECURRING_COLUMNS}
            FROM recurring_tasks
            WHERE household_id = $1 AND is_active
            ORDER BY next_occurrence_at ASC
            "#
        ))
        .bind(household_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn insert_recurring(&self, task: NewRecurringTask) -> anyhow::Result<RecurringTask> {
        let row = sqlx::query_as::<_, RecurringTask>(&format!(
            r#"
            INSERT INTO recurring_tasks
                (household_id, title, description, frequency, "interval", assigned_to_user_id, next_occurrence_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {RECURRING_COLUMNS}
            "#
        ))
        .bind(task.household_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.frequency)
        .bind(task.interval)
        .bind(task.assigned_to_user_id)
        .bind(task.next_occurrence_at)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_recurring(
        &self,
        household_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<RecurringTask>> {
        let row = sqlx::query_as::<_, RecurringTask>(&format!(
            "SELECT {RECURRING_COLUMNS} FROM recurring_tasks WHERE id = $1 AND household_id = $2"
        ))
        .bind(id)
        .bind(household_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn record_completion(
        &self,
        completion: RecurringCompletion,
    ) -> anyhow::Result<Option<(RecurringTask, Task)>> {
        let mut tx = self.db.begin().await?;

        let updated = sqlx::query_as::<_, RecurringTask>(&format!(
            r#"
            UPDATE recurring_tasks
            SET last_occurrence_at = $3, next_occurrence_at = $4
            WHERE id = $1 AND household_id = $2
            RETURNING {RECURRING_COLUMNS}
            "#
        ))
        .bind(completion.recurring_task_id)
        .bind(completion.household_id)
        .bind(completion.completed_at)
        .bind(completion.next_occurrence_at)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(updated) = updated else {
            tx.rollback().await?;
            return Ok(None);
        };

        let snapshot = insert_task_with(&mut *tx, &completion.snapshot).await?;
        tx.commit().await?;
        Ok(Some((updated, snapshot)))
    }
}
