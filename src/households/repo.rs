use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Household, NewUser, User, UserChanges};

#[async_trait]
pub trait HouseholdRepo: Send + Sync {
    async fn find_household(&self, id: Uuid) -> anyhow::Result<Option<Household>>;

    /// The first household ever created, used when none is configured.
    async fn oldest_household(&self) -> anyhow::Result<Option<Household>>;

    async fn create_household(&self, id: Uuid, name: &str) -> anyhow::Result<Household>;

    /// Users of one household ordered by name.
    async fn list_users(&self, household_id: Uuid) -> anyhow::Result<Vec<User>>;

    async fn create_user(&self, user: NewUser) -> anyhow::Result<User>;

    async fn update_user(
        &self,
        household_id: Uuid,
        user_id: Uuid,
        changes: UserChanges,
    ) -> anyhow::Result<Option<User>>;
}

#[derive(Clone)]
pub struct PgHouseholdRepo {
    db: PgPool,
}

impl PgHouseholdRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const USER_COLUMNS: &str = "id, household_id, name, role, profile, color, created_at";

#[async_trait]
impl HouseholdRepo for PgHouseholdRepo {
    async fn find_household(&self, id: Uuid) -> anyhow::Result<Option<Household>> {
        let row = sqlx::query_as::<_, Household>(
            r#"SELECT id, name, created_at FROM households WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn oldest_household(&self) -> anyhow::Result<Option<Household>> {
        let row = sqlx::query_as::<_, Household>(
            r#"
            SELECT id, name, created_at
            FROM households
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn create_household(&self, id: Uuid, name: &str) -> anyhow::Result<Household> {
        let row = sqlx::query_as::<_, Household>(
            r#"
            INSERT INTO households (id, name)
            VALUES ($1, $2)
            RETURNING id, name, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn list_users(&self, household_id: Uuid) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE household_id = $1 ORDER BY name ASC"
        ))
        .bind(household_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn create_user(&self, user: NewUser) -> anyhow::Result<User> {
        let row = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (household_id, name, role, profile, color)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.household_id)
        .bind(&user.name)
        .bind(user.role)
        .bind(&user.profile)
        .bind(&user.color)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update_user(
        &self,
        household_id: Uuid,
        user_id: Uuid,
        changes: UserChanges,
    ) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($3, name),
                color = COALESCE($4, color)
            WHERE id = $1 AND household_id = $2
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(household_id)
        .bind(changes.name)
        .bind(changes.color)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }
}
