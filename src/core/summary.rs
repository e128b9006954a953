use crate::core::ledger::ChoreLedger;
use crate::core::week::{resolve_week_start, WeekRange};
use crate::domain::model::{CalendarDate, ChildId};
use crate::utils::error::{ChoreWeekError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

pub const NOT_APPROVED: &str = "Not Approved";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryLine {
    pub completed_on: CalendarDate,
    pub child: String,
    pub chore: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildTotal {
    pub child_id: ChildId,
    pub name: String,
    pub total: f64,
}

/// 一週內完成的家事與每個小孩的週總額
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekSummary {
    pub week: WeekRange,
    pub this_week: CalendarDate,
    pub chores: Vec<SummaryLine>,
    pub running_totals: Vec<ChildTotal>,
}

impl WeekSummary {
    pub fn build(ledger: &ChoreLedger, week: WeekRange, today: CalendarDate) -> Result<Self> {
        let mut completed: Vec<_> = ledger.completions_between(week.start(), week.end()).collect();
        completed.sort_by(|a, b| b.completed_on.cmp(&a.completed_on).then(b.id.cmp(&a.id)));

        let mut chores = Vec::with_capacity(completed.len());
        let mut totals: BTreeMap<ChildId, ChildTotal> = BTreeMap::new();

        for record in completed {
            let child = ledger.child(record.child_id)?;
            let chore = ledger.chore(record.chore_id)?;

            chores.push(SummaryLine {
                completed_on: record.completed_on,
                child: child.name.clone(),
                chore: chore.chore.clone(),
                value: record.value,
            });

            totals.entry(child.id).or_insert_with(|| ChildTotal {
                child_id: child.id,
                name: child.name.clone(),
                total: ledger.weekly_total(child.id, week.start()),
            });
        }

        tracing::debug!(%week, chores = chores.len(), children = totals.len(), "Built week summary");

        Ok(Self {
            week,
            this_week: resolve_week_start(today)?,
            chores,
            running_totals: totals.into_values().collect(),
        })
    }

    pub fn is_current_week(&self) -> bool {
        self.week.start() == self.this_week
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// CSV 欄位：completed_on,child,chore,value
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        if self.chores.is_empty() {
            writer.write_record(["completed_on", "child", "chore", "value"])?;
        }
        for line in &self.chores {
            writer.serialize(line)?;
        }
        finish_csv(writer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalLine {
    pub child_id: ChildId,
    pub child: String,
    pub total: f64,
    pub approved_by: String,
    pub approved_on: Option<CalendarDate>,
}

/// 某週的核准狀態
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalSheet {
    pub week_start: CalendarDate,
    /// 曾經有週總額的小孩，以及他們這週的總額
    pub running_totals: Vec<ChildTotal>,
    /// 這週有總額的小孩的核准狀態
    pub approvals: Vec<ApprovalLine>,
}

impl ApprovalSheet {
    pub fn build(ledger: &ChoreLedger, week_start: CalendarDate) -> Result<Self> {
        let week_start = resolve_week_start(week_start)?;

        let mut totals: BTreeMap<ChildId, ChildTotal> = BTreeMap::new();
        let mut approvals = Vec::new();

        for row in ledger.weekly_totals() {
            let child = ledger.child(row.child_id)?;
            totals.entry(child.id).or_insert_with(|| ChildTotal {
                child_id: child.id,
                name: child.name.clone(),
                total: ledger.weekly_total(child.id, week_start),
            });

            if row.week_start == week_start {
                let approved_by = match row.approved_by {
                    Some(user_id) => ledger.user(user_id)?.user_name.clone(),
                    None => NOT_APPROVED.to_string(),
                };
                approvals.push(ApprovalLine {
                    child_id: child.id,
                    child: child.name.clone(),
                    total: row.total,
                    approved_by,
                    approved_on: row.approved_on,
                });
            }
        }

        Ok(Self {
            week_start,
            running_totals: totals.into_values().collect(),
            approvals,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// CSV 欄位：child_id,child,total,approved_by,approved_on
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        if self.approvals.is_empty() {
            writer.write_record(["child_id", "child", "total", "approved_by", "approved_on"])?;
        }
        for line in &self.approvals {
            writer.serialize(line)?;
        }
        finish_csv(writer)
    }
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ChoreWeekError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| ChoreWeekError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
