use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::repo_types::{
    NewShoppingItem, ShoppingItem, ShoppingItemChanges, ShoppingList, ShoppingPriority,
    UrgentShoppingItem,
};

#[async_trait]
pub trait ShoppingRepo: Send + Sync {
    /// Newest first.
    async fn list_lists(&self, household_id: Uuid) -> anyhow::Result<Vec<ShoppingList>>;

    async fn create_list(&self, household_id: Uuid, name: &str) -> anyhow::Result<ShoppingList>;

    async fn find_list(
        &self,
        household_id: Uuid,
        list_id: Uuid,
    ) -> anyhow::Result<Option<ShoppingList>>;

    /// HIGH to LOW, then oldest first.
    async fn list_items(&self, list_id: Uuid) -> anyhow::Result<Vec<ShoppingItem>>;

    async fn insert_item(&self, item: NewShoppingItem) -> anyhow::Result<ShoppingItem>;

    /// Items are owned through their list; `None` when the list belongs elsewhere.
    async fn update_item(
        &self,
        household_id: Uuid,
        item_id: Uuid,
        changes: ShoppingItemChanges,
    ) -> anyhow::Result<Option<ShoppingItem>>;

    async fn delete_item(&self, household_id: Uuid, item_id: Uuid) -> anyhow::Result<bool>;

    /// HIGH priority, not bought, across every list of the household. Newest first.
    async fn list_urgent(&self, household_id: Uuid) -> anyhow::Result<Vec<UrgentShoppingItem>>;
}

#[derive(Clone)]
pub struct PgShoppingRepo {
    db: PgPool,
}

impl PgShoppingRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const LIST_COLUMNS: &str = "id, household_id, name, created_at";

const ITEM_COLUMNS: &str =
    "id, list_id, name, quantity, category, priority, is_bought, bought_at, created_at";

#[async_trait]
impl ShoppingRepo for PgShoppingRepo {
    async fn list_lists(&self, household_id: Uuid) -> anyhow::Result<Vec<ShoppingList>> {
        let rows = sqlx::query_as::<_, ShoppingList>(&format!(
            "SELECT {LIST_COLUMNS} FROM shopping_lists WHERE household_id = $1 ORDER BY created_at DESC"
        ))
        .bind(household_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn create_list(&self, household_id: Uuid, name: &str) -> anyhow::Result<ShoppingList> {
        let row = sqlx::query_as::<_, ShoppingList>(&format!(
            "INSERT INTO shopping_lists (household_id, name) VALUES ($1, $2) RETURNING {LIST_COLUMNS}"
        ))
        .bind(household_id)
        .bind(name)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_list(
        &self,
        household_id: Uuid,
        list_id: Uuid,
    ) -> anyhow::Result<Option<ShoppingList>> {
        let row = sqlx::query_as::<_, ShoppingList>(&format!(
            "SELECT {LIST_COLUMNS} FROM shopping_lists WHERE id = $1 AND household_id = $2"
        ))
        .bind(list_id)
        .bind(household_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn list_items(&self, list_id: Uuid) -> anyhow::Result<Vec<ShoppingItem>> {
        let rows = sqlx::query_as::<_, ShoppingItem>(&format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM shopping_items
            WHERE list_id = $1
            ORDER BY priority DESC, created_at ASC
            "#
        ))
        .bind(list_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn insert_item(&self, item: NewShoppingItem) -> anyhow::Result<ShoppingItem> {
        let row = sqlx::query_as::<_, ShoppingItem>(&format!(
            r#"
            INSERT INTO shopping_items (list_id, name, quantity, category, priority)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(item.list_id)
        .bind(&item.name)
        .bind(&item.quantity)
        .bind(&item.category)
        .bind(item.priority)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update_item(
        &self,
        household_id: Uuid,
        item_id: Uuid,
        changes: ShoppingItemChanges,
    ) -> anyhow::Result<Option<ShoppingItem>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE shopping_items SET id = id");
        if let Some(name) = changes.name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(quantity) = changes.quantity {
            qb.push(", quantity = ").push_bind(quantity);
        }
        if let Some(category) = changes.category {
            qb.push(", category = ").push_bind(category);
        }
        if let Some(priority) = changes.priority {
            qb.push(", priority = ").push_bind(priority);
        }
        if let Some((is_bought, bought_at)) = changes.bought {
            qb.push(", is_bought = ").push_bind(is_bought);
            qb.push(", bought_at = ").push_bind(bought_at);
        }
        qb.push(" WHERE id = ").push_bind(item_id);
        qb.push(" AND list_id IN (SELECT id FROM shopping_lists WHERE household_id = ")
            .push_bind(household_id)
            .push(")");
        qb.push(format!(" RETURNING {ITEM_COLUMNS}"));

        let row = qb
            .build_query_as::<ShoppingItem>()
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn delete_item(&self, household_id: Uuid, item_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            DELETE FROM shopping_items
            WHERE id = $1
              AND list_id IN (SELECT id FROM shopping_lists WHERE household_id = $2)
            "#,
        )
        .bind(item_id)
        .bind(household_id)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_urgent(&self, household_id: Uuid) -> anyhow::Result<Vec<UrgentShoppingItem>> {
        let rows = sqlx::query_as::<_, UrgentShoppingItem>(
            r#"
            SELECT i.id, i.list_id, i.name, i.quantity, i.category, i.priority,
                   i.is_bought, i.bought_at, i.created_at, l.name AS list_name
            FROM shopping_items i
            JOIN shopping_lists l ON l.id = i.list_id
            WHERE l.household_id = $1 AND i.priority = $2 AND NOT i.is_bought
            ORDER BY i.created_at DESC
            "#,
        )
        .bind(household_id)
        .bind(ShoppingPriority::High)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
