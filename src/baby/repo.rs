use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::repo_types::{BabyChecklistItem, BabyItemChanges, NewBabyItem};

#[async_trait]
pub trait BabyRepo: Send + Sync {
    /// By section, then due date (undated last), then creation.
    async fn list_items(&self, household_id: Uuid) -> anyhow::Result<Vec<BabyChecklistItem>>;

    async fn insert_item(&self, item: NewBabyItem) -> anyhow::Result<BabyChecklistItem>;

    async fn find_item(
        &self,
        household_id: Uuid,
        item_id: Uuid,
    ) -> anyhow::Result<Option<BabyChecklistItem>>;

    async fn update_item(
        &self,
        household_id: Uuid,
        item_id: Uuid,
        changes: BabyItemChanges,
    ) -> anyhow::Result<Option<BabyChecklistItem>>;
}

#[derive(Clone)]
pub struct PgBabyRepo {
    db: PgPool,
}

impl PgBabyRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const BABY_COLUMNS: &str = "id, household_id, section, title, item_type, status, due_date, \
     assigned_to_user_id, related_task_id, related_shopping_item_id, completed_at, created_at";

#[async_trait]
impl BabyRepo for PgBabyRepo {
    async fn list_items(&self, household_id: Uuid) -> anyhow::Result<Vec<BabyChecklistItem>> {
        let rows = sqlx::query_as::<_, BabyChecklistItem>(&format!(
            r#"
            SELECT {BABY_COLUMNS}
            FROM baby_checklist_items
            WHERE household_id = $1
            ORDER BY section ASC, due_date ASC NULLS LAST, created_at ASC
            "#
        ))
        .bind(household_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn insert_item(&self, item: NewBabyItem) -> anyhow::Result<BabyChecklistItem> {
        let row = sqlx::query_as::<_, BabyChecklistItem>(&format!(
            r#"
            INSERT INTO baby_checklist_items
                (household_id, section, title, item_type, due_date, assigned_to_user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {BABY_COLUMNS}
            "#
        ))
        .bind(item.household_id)
        .bind(&item.section)
        .bind(&item.title)
        .bind(item.item_type)
        .bind(item.due_date)
        .bind(item.assigned_to_user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_item(
        &self,
        household_id: Uuid,
        item_id: Uuid,
    ) -> anyhow::Result<Option<BabyChecklistItem>> {
        let row = sqlx::query_as::<_, BabyChecklistItem>(&format!(
            "SELECT {BABY_COLUMNS} FROM baby_checklist_items WHERE id = $1 AND household_id = $2"
        ))
        .bind(item_id)
        .bind(household_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn update_item(
        &self,
        household_id: Uuid,
        item_id: Uuid,
        changes: BabyItemChanges,
    ) -> anyhow::Result<Option<BabyChecklistItem>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE baby_checklist_items SET id = id");
        if let Some(title) = changes.title {
            qb.push(", title = ").push_bind(title);
        }
        if let Some(section) = changes.section {
            qb.push(", section = ").push_bind(section);
        }
        if let Some(item_type) = changes.item_type {
            qb.push(", item_type = ").push_bind(item_type);
        }
        if let Some(due_date) = changes.due_date {
            qb.push(", due_date = ").push_bind(due_date);
        }
        if let Some(assignee) = changes.assigned_to_user_id {
            qb.push(", assigned_to_user_id = ").push_bind(assignee);
        }
        if let Some((status, completed_at)) = changes.status {
            qb.push(", status = ").push_bind(status);
            qb.push(", completed_at = ").push_bind(completed_at);
        }
        if let Some(task_id) = changes.related_task_id {
            qb.push(", related_task_id = ").push_bind(task_id);
        }
        if let Some(shopping_item_id) = changes.related_shopping_item_id {
            qb.push(", related_shopping_item_id = ").push_bind(shopping_item_id);
        }
        qb.push(" WHERE id = ").push_bind(item_id);
        qb.push(" AND household_id = ").push_bind(household_id);
        qb.push(format!(" RETURNING {BABY_COLUMNS}"));

        let row = qb
            .build_query_as::<BabyChecklistItem>()
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }
}
