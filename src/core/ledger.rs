use crate::core::week::resolve_week_start;
use crate::domain::model::{
    CalendarDate, Child, ChildId, Chore, ChoreId, CompletedChore, CompletedChoreId, User, UserId,
    WeeklyTotal, WeeklyTotalId,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ChoreWeekError, Result};
use crate::utils::validation::{validate_amount, validate_name, validate_range};
use std::collections::BTreeMap;

pub const DEFAULT_RECENT_LIMIT: usize = 10;
pub const DEFAULT_NAME_MAX_LENGTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerSettings {
    pub recent_limit: usize,
    pub name_max_length: usize,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
            name_max_length: DEFAULT_NAME_MAX_LENGTH,
        }
    }
}

impl LedgerSettings {
    pub fn from_config(config: &dyn ConfigProvider) -> Result<Self> {
        validate_range("ledger.recent_limit", config.recent_limit(), 1, 100)?;
        validate_range("ledger.name_max_length", config.name_max_length(), 1, 255)?;
        Ok(Self {
            recent_limit: config.recent_limit(),
            name_max_length: config.name_max_length(),
        })
    }
}

/// 記憶體內的家事帳本：使用者、小孩、家事、完成紀錄與每週總額。
///
/// 每筆完成紀錄都會累加到所在週 (週一起算) 的 `WeeklyTotal`；
/// 刪除紀錄時扣回同樣的金額。
#[derive(Debug, Default)]
pub struct ChoreLedger {
    settings: LedgerSettings,
    users: BTreeMap<UserId, User>,
    children: BTreeMap<ChildId, Child>,
    chores: BTreeMap<ChoreId, Chore>,
    completed: BTreeMap<CompletedChoreId, CompletedChore>,
    weekly_totals: BTreeMap<(ChildId, CalendarDate), WeeklyTotal>,
    next_id: u32,
}

impl ChoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: LedgerSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> LedgerSettings {
        self.settings
    }

    fn allocate_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn register_user(&mut self, user_name: &str, admin: bool) -> Result<UserId> {
        validate_name("user.user_name", user_name, self.settings.name_max_length)?;
        let user_name = user_name.trim();

        if self.find_user(user_name).is_some() {
            return Err(ChoreWeekError::Duplicate {
                entity: "User",
                value: user_name.to_string(),
            });
        }

        let id = UserId(self.allocate_id());
        self.users.insert(
            id,
            User {
                id,
                user_name: user_name.to_string(),
                admin,
            },
        );
        tracing::info!(user = user_name, admin, "Registered user");
        Ok(id)
    }

    pub fn grant_admin(&mut self, user_name: &str) -> Result<UserId> {
        let user = self
            .users
            .values_mut()
            .find(|u| u.user_name == user_name.trim())
            .ok_or_else(|| ChoreWeekError::not_found("User", user_name))?;

        user.admin = true;
        tracing::info!(user = %user.user_name, "User is now an admin");
        Ok(user.id)
    }

    pub fn add_child(&mut self, name: &str) -> Result<ChildId> {
        validate_name("child.name", name, self.settings.name_max_length)?;

        let id = ChildId(self.allocate_id());
        self.children.insert(
            id,
            Child {
                id,
                name: name.trim().to_string(),
            },
        );
        tracing::info!(child = name.trim(), "Child added");
        Ok(id)
    }

    pub fn add_chore(&mut self, chore: &str, value: f64) -> Result<ChoreId> {
        validate_name("chore.chore", chore, self.settings.name_max_length)?;
        validate_amount("chore.value", value)?;

        let id = ChoreId(self.allocate_id());
        self.chores.insert(
            id,
            Chore {
                id,
                chore: chore.trim().to_string(),
                value,
            },
        );
        tracing::info!(chore = chore.trim(), value, "Chore added");
        Ok(id)
    }

    /// 記錄一筆完成的家事，並把金額加到 `completed_on` 所在週的總額
    pub fn complete_chore(
        &mut self,
        child_id: ChildId,
        chore_id: ChoreId,
        user_id: UserId,
        completed_on: CalendarDate,
    ) -> Result<CompletedChoreId> {
        self.child(child_id)?;
        self.user(user_id)?;
        let value = self.chore(chore_id)?.value;
        let week_start = resolve_week_start(completed_on)?;

        let id = CompletedChoreId(self.allocate_id());
        self.completed.insert(
            id,
            CompletedChore {
                id,
                chore_id,
                child_id,
                user_id,
                completed_on,
                value,
            },
        );

        let next_total_id = self.next_id + 1;
        let weekly = self
            .weekly_totals
            .entry((child_id, week_start))
            .or_insert_with(|| WeeklyTotal {
                id: WeeklyTotalId(next_total_id),
                child_id,
                week_start,
                total: 0.0,
                approved_by: None,
                approved_on: None,
            });
        weekly.total += value;
        let created = weekly.id.0 == next_total_id;
        let total = weekly.total;
        if created {
            self.next_id = next_total_id;
        }

        tracing::info!(
            child = %child_id,
            chore = %chore_id,
            %completed_on,
            %week_start,
            total,
            "Chore completed"
        );
        Ok(id)
    }

    /// 刪除完成紀錄並從該週總額扣除當時記錄的金額
    pub fn delete_completed(&mut self, id: CompletedChoreId) -> Result<CompletedChore> {
        let record = self
            .completed
            .remove(&id)
            .ok_or_else(|| ChoreWeekError::not_found("CompletedChore", id))?;

        let week_start = resolve_week_start(record.completed_on)?;
        match self.weekly_totals.get_mut(&(record.child_id, week_start)) {
            Some(weekly) => {
                weekly.total -= record.value;
                tracing::info!(
                    completed = %id,
                    %week_start,
                    total = weekly.total,
                    "Completed chore deleted"
                );
            }
            None => {
                tracing::warn!(completed = %id, %week_start, "Deleted chore had no weekly total");
            }
        }

        Ok(record)
    }

    /// 最近的完成紀錄 (新到舊)，最多 `recent_limit` 筆
    pub fn recent_completions(&self) -> Vec<&CompletedChore> {
        self.completed
            .values()
            .rev()
            .take(self.settings.recent_limit)
            .collect()
    }

    pub fn latest_completion(&self) -> Option<&CompletedChore> {
        self.completed.values().next_back()
    }

    pub fn completions_between(
        &self,
        from: CalendarDate,
        to: CalendarDate,
    ) -> impl Iterator<Item = &CompletedChore> + '_ {
        self.completed
            .values()
            .filter(move |c| from <= c.completed_on && c.completed_on <= to)
    }

    /// 該週總額；沒有紀錄時為 0
    pub fn weekly_total(&self, child_id: ChildId, week_start: CalendarDate) -> f64 {
        self.weekly_totals
            .get(&(child_id, week_start))
            .map(|w| w.total)
            .unwrap_or(0.0)
    }

    pub fn weekly_total_row(&self, child_id: ChildId, week_start: CalendarDate) -> Option<&WeeklyTotal> {
        self.weekly_totals.get(&(child_id, week_start))
    }

    pub fn weekly_totals(&self) -> impl Iterator<Item = &WeeklyTotal> + '_ {
        self.weekly_totals.values()
    }

    /// 由管理員核准某個小孩某週的零用錢。`week_start` 可以是該週任一天。
    pub fn approve_week(
        &mut self,
        child_id: ChildId,
        week_start: CalendarDate,
        approver: UserId,
        approved_on: CalendarDate,
    ) -> Result<&WeeklyTotal> {
        let child_name = self.child(child_id)?.name.clone();
        let user = self.user(approver)?;
        if !user.admin {
            return Err(ChoreWeekError::Unauthorized {
                user: user.user_name.clone(),
                action: "approve weekly totals".to_string(),
            });
        }
        let approver_name = user.user_name.clone();
        let week_start = resolve_week_start(week_start)?;

        let weekly = self
            .weekly_totals
            .get_mut(&(child_id, week_start))
            .ok_or_else(|| ChoreWeekError::NoWeeklyTotal {
                child: child_name.clone(),
                week_start: week_start.to_string(),
            })?;

        weekly.approved_by = Some(approver);
        weekly.approved_on = Some(approved_on);
        tracing::info!(
            child = %child_name,
            %week_start,
            approver = %approver_name,
            "Weekly allowance approved"
        );
        Ok(weekly)
    }

    pub fn user(&self, id: UserId) -> Result<&User> {
        self.users.get(&id).ok_or_else(|| ChoreWeekError::not_found("User", id))
    }

    pub fn find_user(&self, user_name: &str) -> Option<&User> {
        self.users.values().find(|u| u.user_name == user_name)
    }

    pub fn child(&self, id: ChildId) -> Result<&Child> {
        self.children
            .get(&id)
            .ok_or_else(|| ChoreWeekError::not_found("Child", id))
    }

    pub fn chore(&self, id: ChoreId) -> Result<&Chore> {
        self.chores.get(&id).ok_or_else(|| ChoreWeekError::not_found("Chore", id))
    }

    pub fn completed(&self, id: CompletedChoreId) -> Result<&CompletedChore> {
        self.completed
            .get(&id)
            .ok_or_else(|| ChoreWeekError::not_found("CompletedChore", id))
    }

    pub fn users(&self) -> impl Iterator<Item = &User> + '_ {
        self.users.values()
    }

    pub fn children(&self) -> impl Iterator<Item = &Child> + '_ {
        self.children.values()
    }

    pub fn chores(&self) -> impl Iterator<Item = &Chore> + '_ {
        self.chores.values()
    }
}
