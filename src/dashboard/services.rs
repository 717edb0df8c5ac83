use std::cmp::Ordering;

use tracing::{debug, warn};
use uuid::Uuid;

use super::dto::{BabyProgress, DashboardData};
use crate::{
    baby::repo_types::{BabyChecklistItem, BabyItemStatus},
    dates,
    error::{AppError, AppResult},
    meals, shopping,
    state::AppState,
    tasks,
};

const UPCOMING_BABY_ITEMS: usize = 3;

/// Counts plus the soonest open items. Dated items come first in due order;
/// undated ones keep their relative order after them.
pub fn baby_progress(items: Vec<BabyChecklistItem>) -> BabyProgress {
    let total = items.len();
    let completed = items
        .iter()
        .filter(|i| i.status == BabyItemStatus::Done)
        .count();

    let mut open: Vec<BabyChecklistItem> = items
        .into_iter()
        .filter(|i| i.status != BabyItemStatus::Done)
        .collect();
    // stable sort
    open.sort_by(|a, b| match (a.due_date, b.due_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    open.truncate(UPCOMING_BABY_ITEMS);

    BabyProgress {
        total,
        completed,
        upcoming: open,
    }
}

pub async fn dashboard_data(st: &AppState, household_id: Uuid) -> AppResult<DashboardData> {
    let now = st.clock.now();
    let week = dates::current_week(now)
        .ok_or_else(|| AppError::validation("current week is out of range"))?;

    let todays_meal = meals::services::dinner_on(st, household_id, now).await?;
    let todays_tasks = tasks::services::tasks_for_today(st, household_id).await?;
    let urgent_shopping = shopping::services::urgent_items(st, household_id).await?;
    let weekly_meals = meals::services::dinners_in_week(st, household_id, &week).await?;
    let weekly_task_stats = tasks::services::calendar_week_stats(st, household_id, &week).await?;

    let baby_items = match st.baby.list_items(household_id).await {
        Ok(items) => items,
        Err(e) => {
            warn!(%household_id, error = %e, "baby items unavailable, dashboard shows none");
            Vec::new()
        }
    };

    debug!(
        %household_id,
        todays_tasks = todays_tasks.len(),
        urgent = urgent_shopping.len(),
        weekly_meals = weekly_meals.len(),
        "dashboard composed"
    );

    Ok(DashboardData {
        todays_meal,
        todays_tasks,
        urgent_shopping,
        weekly_meals,
        weekly_task_stats,
        baby_progress: baby_progress(baby_items),
    })
}
