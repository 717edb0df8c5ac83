//! In-memory store behind every repo trait. Test builds only.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, MutexGuard,
};

use anyhow::anyhow;
use async_trait::async_trait;
use time::{macros::datetime, Date, Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
    baby::{
        repo::BabyRepo,
        repo_types::{BabyChecklistItem, BabyItemChanges, BabyItemStatus, NewBabyItem},
    },
    households::{
        repo::HouseholdRepo,
        repo_types::{Household, NewUser, User, UserChanges},
    },
    meals::{
        repo::MealRepo,
        repo_types::{MealPlanEntry, MealStatus, MealType, MealUpsert},
    },
    shopping::{
        repo::ShoppingRepo,
        repo_types::{
            NewShoppingItem, ShoppingItem, ShoppingItemChanges, ShoppingList, ShoppingPriority,
            UrgentShoppingItem,
        },
    },
    tasks::{
        repo::TaskRepo,
        repo_types::{
            NewRecurringTask, NewTask, RecurringCompletion, RecurringTask, Task, TaskChanges,
        },
    },
};

#[derive(Default)]
struct Tables {
    seq: i64,
    households: Vec<Household>,
    users: Vec<User>,
    meals: Vec<MealPlanEntry>,
    tasks: Vec<Task>,
    recurring: Vec<RecurringTask>,
    lists: Vec<ShoppingList>,
    items: Vec<ShoppingItem>,
    baby: Vec<BabyChecklistItem>,
}

impl Tables {
    /// Strictly increasing creation stamps so ordering by age is deterministic.
    fn stamp(&mut self) -> OffsetDateTime {
        self.seq += 1;
        datetime!(2023-12-01 00:00 UTC) + Duration::seconds(self.seq)
    }

    fn insert_task(&mut self, task: &NewTask) -> Task {
        let row = Task {
            id: Uuid::new_v4(),
            household_id: task.household_id,
            title: task.title.clone(),
            description: task.description.clone(),
            task_type: task.task_type,
            assigned_to_user_id: task.assigned_to_user_id,
            due_date: task.due_date,
            status: task.status,
            completed_at: task.completed_at,
            created_at: self.stamp(),
        };
        self.tasks.push(row.clone());
        row
    }

    fn owns_list(&self, household_id: Uuid, list_id: Uuid) -> bool {
        self.lists
            .iter()
            .any(|l| l.id == list_id && l.household_id == household_id)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    baby_unavailable: AtomicBool,
}

impl MemoryStore {
    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| anyhow!("memory store poisoned"))
    }

    /// Makes every baby checklist read fail.
    pub fn fail_baby_reads(&self, fail: bool) {
        self.baby_unavailable.store(fail, Ordering::SeqCst);
    }

    /// Synchronous seeding for `AppState::fake`.
    pub fn seed_household(&self, name: &str) -> Uuid {
        let mut t = self.tables.lock().expect("memory store poisoned");
        let household = Household {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: t.stamp(),
        };
        let id = household.id;
        t.households.push(household);
        id
    }

    pub fn seed_users(&self, users: Vec<NewUser>) {
        let mut t = self.tables.lock().expect("memory store poisoned");
        for user in users {
            let created_at = t.stamp();
            t.users.push(user_row(user, created_at));
        }
    }
}

fn user_row(user: NewUser, created_at: OffsetDateTime) -> User {
    User {
        id: Uuid::new_v4(),
        household_id: user.household_id,
        name: user.name,
        role: user.role,
        profile: user.profile,
        color: user.color,
        created_at,
    }
}

#[async_trait]
impl HouseholdRepo for MemoryStore {
    async fn find_household(&self, id: Uuid) -> anyhow::Result<Option<Household>> {
        Ok(self.lock()?.households.iter().find(|h| h.id == id).cloned())
    }

    async fn oldest_household(&self) -> anyhow::Result<Option<Household>> {
        Ok(self
            .lock()?
            .households
            .iter()
            .min_by_key(|h| h.created_at)
            .cloned())
    }

    async fn create_household(&self, id: Uuid, name: &str) -> anyhow::Result<Household> {
        let mut t = self.lock()?;
        let household = Household {
            id,
            name: name.to_string(),
            created_at: t.stamp(),
        };
        t.households.push(household.clone());
        Ok(household)
    }

    async fn list_users(&self, household_id: Uuid) -> anyhow::Result<Vec<User>> {
        let mut users: Vec<User> = self
            .lock()?
            .users
            .iter()
            .filter(|u| u.household_id == household_id)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn create_user(&self, user: NewUser) -> anyhow::Result<User> {
        let mut t = self.lock()?;
        let created_at = t.stamp();
        let row = user_row(user, created_at);
        t.users.push(row.clone());
        Ok(row)
    }

    async fn update_user(
        &self,
        household_id: Uuid,
        user_id: Uuid,
        changes: UserChanges,
    ) -> anyhow::Result<Option<User>> {
        let mut t = self.lock()?;
        let Some(user) = t
            .users
            .iter_mut()
            .find(|u| u.id == user_id && u.household_id == household_id)
        else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(color) = changes.color {
            user.color = Some(color);
        }
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl MealRepo for MemoryStore {
    async fn list_dinners_between(
        &self,
        household_id: Uuid,
        from: Date,
        to: Date,
    ) -> anyhow::Result<Vec<MealPlanEntry>> {
        let mut meals: Vec<MealPlanEntry> = self
            .lock()?
            .meals
            .iter()
            .filter(|m| m.household_id == household_id && m.date >= from && m.date <= to)
            .cloned()
            .collect();
        meals.sort_by_key(|m| m.date);
        Ok(meals)
    }

    async fn find_dinner_on(
        &self,
        household_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Option<MealPlanEntry>> {
        Ok(self
            .lock()?
            .meals
            .iter()
            .find(|m| m.household_id == household_id && m.date == date)
            .cloned())
    }

    async fn upsert_dinner(&self, meal: MealUpsert) -> anyhow::Result<MealPlanEntry> {
        let mut t = self.lock()?;
        let now = t.stamp();
        if let Some(existing) = t
            .meals
            .iter_mut()
            .find(|m| m.household_id == meal.household_id && m.date == meal.date)
        {
            existing.label = meal.label;
            existing.notes = meal.notes;
            existing.status = meal.status;
            existing.updated_at = now;
            return Ok(existing.clone());
        }
        let row = MealPlanEntry {
            id: Uuid::new_v4(),
            household_id: meal.household_id,
            date: meal.date,
            day_of_week: meal.day_of_week,
            meal_type: MealType::Dinner,
            label: meal.label,
            notes: meal.notes,
            status: meal.status,
            created_at: now,
            updated_at: now,
        };
        t.meals.push(row.clone());
        Ok(row)
    }

    async fn update_status(
        &self,
        household_id: Uuid,
        meal_id: Uuid,
        status: MealStatus,
    ) -> anyhow::Result<u64> {
        let mut t = self.lock()?;
        let mut count = 0;
        for meal in t
            .meals
            .iter_mut()
            .filter(|m| m.id == meal_id && m.household_id == household_id)
        {
            meal.status = status;
            count += 1;
        }
        Ok(count)
    }
}

#[async_trait]
impl TaskRepo for MemoryStore {
    async fn list_open_due_or_undated(
        &self,
        household_id: Uuid,
        from: OffsetDateTime,
        until: OffsetDateTime,
    ) -> anyhow::Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .lock()?
            .tasks
            .iter()
            .filter(|t| t.household_id == household_id && t.status.is_open())
            .filter(|t| t.due_date.map_or(true, |d| d >= from && d < until))
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.created_at);
        Ok(tasks)
    }

    async fn list_due_between(
        &self,
        household_id: Uuid,
        from: OffsetDateTime,
        until: OffsetDateTime,
    ) -> anyhow::Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .lock()?
            .tasks
            .iter()
            .filter(|t| t.household_id == household_id)
            .filter(|t| t.due_date.is_some_and(|d| d >= from && d < until))
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.due_date);
        Ok(tasks)
    }

    async fn insert_task(&self, task: NewTask) -> anyhow::Result<Task> {
        Ok(self.lock()?.insert_task(&task))
    }

    async fn update_task(
        &self,
        household_id: Uuid,
        task_id: Uuid,
        changes: TaskChanges,
    ) -> anyhow::Result<Option<Task>> {
        let mut t = self.lock()?;
        let Some(task) = t
            .tasks
            .iter_mut()
            .find(|x| x.id == task_id && x.household_id == household_id)
        else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            task.title = title;
        }
        if let Some(description) = changes.description {
            task.description = description;
        }
        if let Some(task_type) = changes.task_type {
            task.task_type = task_type;
        }
        if let Some(assignee) = changes.assigned_to_user_id {
            task.assigned_to_user_id = assignee;
        }
        if let Some(due_date) = changes.due_date {
            task.due_date = due_date;
        }
        if let Some((status, completed_at)) = changes.status {
            task.status = status;
            task.completed_at = completed_at;
        }
        Ok(Some(task.clone()))
    }

    async fn list_active_recurring(&self, household_id: Uuid) -> anyhow::Result<Vec<RecurringTask>> {
        let mut rows: Vec<RecurringTask> = self
            .lock()?
            .recurring
            .iter()
            .filter(|r| r.household_id == household_id && r.is_active)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.next_occurrence_at);
        Ok(rows)
    }

    async fn insert_recurring(&self, task: NewRecurringTask) -> anyhow::Result<RecurringTask> {
        let mut t = self.lock()?;
        let row = RecurringTask {
            id: Uuid::new_v4(),
            household_id: task.household_id,
            title: task.title,
            description: task.description,
            frequency: task.frequency,
            interval: task.interval,
            assigned_to_user_id: task.assigned_to_user_id,
            is_active: true,
            last_occurrence_at: None,
            next_occurrence_at: task.next_occurrence_at,
            created_at: t.stamp(),
        };
        t.recurring.push(row.clone());
        Ok(row)
    }

    async fn find_recurring(
        &self,
        household_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<RecurringTask>> {
        Ok(self
            .lock()?
            .recurring
            .iter()
            .find(|r| r.id == id && r.household_id == household_id)
            .cloned())
    }

    async fn record_completion(
        &self,
        completion: RecurringCompletion,
    ) -> anyhow::Result<Option<(RecurringTask, Task)>> {
        let mut t = self.lock()?;
        let Some(recurring) = t.recurring.iter_mut().find(|r| {
            r.id == completion.recurring_task_id && r.household_id == completion.household_id
        }) else {
            return Ok(None);
        };
        recurring.last_occurrence_at = Some(completion.completed_at);
        recurring.next_occurrence_at = completion.next_occurrence_at;
        let updated = recurring.clone();
        let snapshot = t.insert_task(&completion.snapshot);
        Ok(Some((updated, snapshot)))
    }
}

#[async_trait]
impl ShoppingRepo for MemoryStore {
    async fn list_lists(&self, household_id: Uuid) -> anyhow::Result<Vec<ShoppingList>> {
        let mut lists: Vec<ShoppingList> = self
            .lock()?
            .lists
            .iter()
            .filter(|l| l.household_id == household_id)
            .cloned()
            .collect();
        lists.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(lists)
    }

    async fn create_list(&self, household_id: Uuid, name: &str) -> anyhow::Result<ShoppingList> {
        let mut t = self.lock()?;
        let list = ShoppingList {
            id: Uuid::new_v4(),
            household_id,
            name: name.to_string(),
            created_at: t.stamp(),
        };
        t.lists.push(list.clone());
        Ok(list)
    }

    async fn find_list(
        &self,
        household_id: Uuid,
        list_id: Uuid,
    ) -> anyhow::Result<Option<ShoppingList>> {
        Ok(self
            .lock()?
            .lists
            .iter()
            .find(|l| l.id == list_id && l.household_id == household_id)
            .cloned())
    }

    async fn list_items(&self, list_id: Uuid) -> anyhow::Result<Vec<ShoppingItem>> {
        let mut items: Vec<ShoppingItem> = self
            .lock()?
            .items
            .iter()
            .filter(|i| i.list_id == list_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(items)
    }

    async fn insert_item(&self, item: NewShoppingItem) -> anyhow::Result<ShoppingItem> {
        let mut t = self.lock()?;
        let row = ShoppingItem {
            id: Uuid::new_v4(),
            list_id: item.list_id,
            name: item.name,
            quantity: item.quantity,
            category: item.category,
            priority: item.priority,
            is_bought: false,
            bought_at: None,
            created_at: t.stamp(),
        };
        t.items.push(row.clone());
        Ok(row)
    }

    async fn update_item(
        &self,
        household_id: Uuid,
        item_id: Uuid,
        changes: ShoppingItemChanges,
    ) -> anyhow::Result<Option<ShoppingItem>> {
        let mut t = self.lock()?;
        let Some(pos) = t.items.iter().position(|i| i.id == item_id) else {
            return Ok(None);
        };
        if !t.owns_list(household_id, t.items[pos].list_id) {
            return Ok(None);
        }
        let item = &mut t.items[pos];
        if let Some(name) = changes.name {
            item.name = name;
        }
        if let Some(quantity) = changes.quantity {
            item.quantity = quantity;
        }
        if let Some(category) = changes.category {
            item.category = category;
        }
        if let Some(priority) = changes.priority {
            item.priority = priority;
        }
        if let Some((is_bought, bought_at)) = changes.bought {
            item.is_bought = is_bought;
            item.bought_at = bought_at;
        }
        Ok(Some(item.clone()))
    }

    async fn delete_item(&self, household_id: Uuid, item_id: Uuid) -> anyhow::Result<bool> {
        let mut t = self.lock()?;
        let Some(pos) = t.items.iter().position(|i| i.id == item_id) else {
            return Ok(false);
        };
        if !t.owns_list(household_id, t.items[pos].list_id) {
            return Ok(false);
        }
        t.items.remove(pos);
        Ok(true)
    }

    async fn list_urgent(&self, household_id: Uuid) -> anyhow::Result<Vec<UrgentShoppingItem>> {
        let t = self.lock()?;
        let mut urgent: Vec<UrgentShoppingItem> = t
            .items
            .iter()
            .filter(|i| i.priority == ShoppingPriority::High && !i.is_bought)
            .filter_map(|i| {
                t.lists
                    .iter()
                    .find(|l| l.id == i.list_id && l.household_id == household_id)
                    .map(|l| UrgentShoppingItem {
                        item: i.clone(),
                        list_name: l.name.clone(),
                    })
            })
            .collect();
        urgent.sort_by(|a, b| b.item.created_at.cmp(&a.item.created_at));
        Ok(urgent)
    }
}

#[async_trait]
impl BabyRepo for MemoryStore {
    async fn list_items(&self, household_id: Uuid) -> anyhow::Result<Vec<BabyChecklistItem>> {
        if self.baby_unavailable.load(Ordering::SeqCst) {
            return Err(anyhow!("baby_checklist_items unavailable"));
        }
        let mut items: Vec<BabyChecklistItem> = self
            .lock()?
            .baby
            .iter()
            .filter(|i| i.household_id == household_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            a.section
                .cmp(&b.section)
                .then_with(|| match (a.due_date, b.due_date) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(items)
    }

    async fn insert_item(&self, item: NewBabyItem) -> anyhow::Result<BabyChecklistItem> {
        let mut t = self.lock()?;
        let row = BabyChecklistItem {
            id: Uuid::new_v4(),
            household_id: item.household_id,
            section: item.section,
            title: item.title,
            item_type: item.item_type,
            status: BabyItemStatus::Todo,
            due_date: item.due_date,
            assigned_to_user_id: item.assigned_to_user_id,
            related_task_id: None,
            related_shopping_item_id: None,
            completed_at: None,
            created_at: t.stamp(),
        };
        t.baby.push(row.clone());
        Ok(row)
    }

    async fn find_item(
        &self,
        household_id: Uuid,
        item_id: Uuid,
    ) -> anyhow::Result<Option<BabyChecklistItem>> {
        Ok(self
            .lock()?
            .baby
            .iter()
            .find(|i| i.id == item_id && i.household_id == household_id)
            .cloned())
    }

    async fn update_item(
        &self,
        household_id: Uuid,
        item_id: Uuid,
        changes: BabyItemChanges,
    ) -> anyhow::Result<Option<BabyChecklistItem>> {
        let mut t = self.lock()?;
        let Some(item) = t
            .baby
            .iter_mut()
            .find(|i| i.id == item_id && i.household_id == household_id)
        else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            item.title = title;
        }
        if let Some(section) = changes.section {
            item.section = section;
        }
        if let Some(item_type) = changes.item_type {
            item.item_type = item_type;
        }
        if let Some(due_date) = changes.due_date {
            item.due_date = due_date;
        }
        if let Some(assignee) = changes.assigned_to_user_id {
            item.assigned_to_user_id = assignee;
        }
        if let Some((status, completed_at)) = changes.status {
            item.status = status;
            item.completed_at = completed_at;
        }
        if let Some(task_id) = changes.related_task_id {
            item.related_task_id = Some(task_id);
        }
        if let Some(shopping_item_id) = changes.related_shopping_item_id {
            item.related_shopping_item_id = Some(shopping_item_id);
        }
        Ok(Some(item.clone()))
    }
}
