use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::repo_types::{MealPlanEntry, MealStatus, MealType, MealUpsert};

#[async_trait]
pub trait MealRepo: Send + Sync {
    /// Dinners dated within `[from, to]`, oldest first.
    async fn list_dinners_between(
        &self,
        household_id: Uuid,
        from: Date,
        to: Date,
    ) -> anyhow::Result<Vec<MealPlanEntry>>;

    async fn find_dinner_on(
        &self,
        household_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Option<MealPlanEntry>>;

    /// Inserts the dinner for `(household, date)` or overwrites label, notes
    /// and status of the existing one. Concurrent writers: last one wins.
    async fn upsert_dinner(&self, meal: MealUpsert) -> anyhow::Result<MealPlanEntry>;

    /// Returns the number of rows touched; zero when the meal is not owned by
    /// the household.
    async fn update_status(
        &self,
        household_id: Uuid,
        meal_id: Uuid,
        status: MealStatus,
    ) -> anyhow::Result<u64>;
}

#[derive(Clone)]
pub struct PgMealRepo {
    db: PgPool,
}

impl PgMealRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const MEAL_COLUMNS: &str =
    "id, household_id, date, day_of_week, meal_type, label, notes, status, created_at, updated_at";

#[async_trait]
impl MealRepo for PgMealRepo {
    async fn list_dinners_between(
        &self,
        household_id: Uuid,
        from: Date,
        to: Date,
    ) -> anyhow::Result<Vec<MealPlanEntry>> {
        let rows = sqlx::query_as::<_, MealPlanEntry>(&format!(
            r#"
            SELECT {MEAL_COLUMNS}
            FROM meal_plan_entries
            WHERE household_id = $1
              AND meal_type = $2
              AND date BETWEEN $3 AND $4
            ORDER BY date ASC
            "#
        ))
        .bind(household_id)
        .bind(MealType::Dinner)
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_dinner_on(
        &self,
        household_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Option<MealPlanEntry>> {
        let row = sqlx::query_as::<_, MealPlanEntry>(&format!(
            r#"
            SELECT {MEAL_COLUMNS}
            FROM meal_plan_entries
            WHERE household_id = $1 AND meal_type = $2 AND date = $3
            "#
        ))
        .bind(household_id)
        .bind(MealType::Dinner)
        .bind(date)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn upsert_dinner(&self, meal: MealUpsert) -> anyhow::Result<MealPlanEntry> {
        let row = sqlx::query_as::<_, MealPlanEntry>(&format!(
            r#"
            INSERT INTO meal_plan_entries
                (household_id, date, day_of_week, meal_type, label, notes, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (household_id, date, meal_type) DO UPDATE
            SET label = EXCLUDED.label,
                notes = EXCLUDED.notes,
                status = EXCLUDED.status,
                updated_at = now()
            RETURNING {MEAL_COLUMNS}
            "#
        ))
        .bind(meal.household_id)
        .bind(meal.date)
        .bind(&meal.day_of_week)
        .bind(MealType::Dinner)
        .bind(&meal.label)
        .bind(&meal.notes)
        .bind(meal.status)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update_status(
        &self,
        household_id: Uuid,
        meal_id: Uuid,
        status: MealStatus,
    ) -> anyhow::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE meal_plan_entries
            SET status = $3, updated_at = now()
            WHERE id = $1 AND household_id = $2
            "#,
        )
        .bind(meal_id)
        .bind(household_id)
        .bind(status)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected())
    }
}
