use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    baby::repo_types::BabyChecklistItem,
    meals::repo_types::MealPlanEntry,
    shopping::repo_types::UrgentShoppingItem,
    tasks::dto::{TaskStats, TaskView},
};

#[derive(Debug, Clone, Default, Serialize)]
pub struct BabyProgress {
    pub total: usize,
    pub completed: usize,
    pub upcoming: Vec<BabyChecklistItem>,
}

/// Read model for the home view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub todays_meal: Option<MealPlanEntry>,
    pub todays_tasks: Vec<TaskView>,
    pub urgent_shopping: Vec<UrgentShoppingItem>,
    pub weekly_meals: Vec<MealPlanEntry>,
    pub weekly_task_stats: BTreeMap<String, TaskStats>,
    pub baby_progress: BabyProgress,
}
