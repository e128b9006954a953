use crate::core::week::{resolve_week_start, WeekRange};
use crate::domain::model::{parse_year, CalendarDate};
use crate::domain::ports::Clock;
use crate::utils::error::{ChoreWeekError, Result};
use chrono::{NaiveDate, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::form_urlencoded;

/// 表單中存放週一日期的欄位名稱
pub const START_OF_WEEK_FIELD: &str = "start_of_week";

static ISO_WEEK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?[0-9]{4,})-W([0-9]{2})$").expect("ISO week pattern is valid")
});

/// 解析日期選擇器的值。
///
/// 日期輸入框給 `YYYY-MM-DD`；週輸入框給 `YYYY-Www`，對應該 ISO 週的週一。
pub fn parse_picker_value(value: &str) -> Result<CalendarDate> {
    let trimmed = value.trim();

    if let Some(caps) = ISO_WEEK.captures(trimmed) {
        let year = parse_year(value, &caps[1])?;
        let week: u32 = caps[2]
            .parse()
            .map_err(|_| ChoreWeekError::invalid_date(value, "week is not a number"))?;

        return NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
            .map(CalendarDate::from_naive)
            .ok_or_else(|| {
                ChoreWeekError::invalid_date(value, format!("{} has no ISO week {}", year, week))
            });
    }

    CalendarDate::parse(trimmed).map_err(|e| match e {
        ChoreWeekError::InvalidDate { .. } => {
            ChoreWeekError::invalid_date(value, "expected YYYY-MM-DD or YYYY-Www")
        }
        other => other,
    })
}

/// 提交給查詢頁面的參數：一定是週一
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WeekQueryFields")]
pub struct WeekQuery {
    start_of_week: CalendarDate,
}

#[derive(Deserialize)]
struct WeekQueryFields {
    start_of_week: CalendarDate,
}

impl TryFrom<WeekQueryFields> for WeekQuery {
    type Error = ChoreWeekError;

    fn try_from(fields: WeekQueryFields) -> Result<Self> {
        let start_of_week = fields.start_of_week;
        if !start_of_week.is_monday() {
            return Err(ChoreWeekError::ValidationError {
                message: format!(
                    "{} must be a Monday, {} is a {}",
                    START_OF_WEEK_FIELD,
                    start_of_week,
                    start_of_week.weekday()
                ),
            });
        }
        Ok(Self { start_of_week })
    }
}

impl WeekQuery {
    pub fn for_date(date: CalendarDate) -> Result<Self> {
        Ok(Self {
            start_of_week: resolve_week_start(date)?,
        })
    }

    /// 本週 (依 clock 的「今天」)
    pub fn current(clock: &dyn Clock) -> Result<Self> {
        Self::for_date(clock.today())
    }

    pub fn start_of_week(&self) -> CalendarDate {
        self.start_of_week
    }

    pub fn range(&self) -> Result<WeekRange> {
        WeekRange::starting(self.start_of_week)
    }

    /// `start_of_week=YYYY-MM-DD`
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair(START_OF_WEEK_FIELD, &self.start_of_week.to_string())
            .finish()
    }

    /// 讀取查詢字串中的 `start_of_week`；沒有或空白時預設為本週。
    ///
    /// 非週一的日期會被調整到所在週的週一。
    pub fn from_query_string(query: &str, clock: &dyn Clock) -> Result<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let requested = form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == START_OF_WEEK_FIELD)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.trim().is_empty());

        match requested {
            Some(value) => Self::for_date(CalendarDate::parse(&value)?),
            None => {
                tracing::debug!("No {} in query, defaulting to the current week", START_OF_WEEK_FIELD);
                Self::current(clock)
            }
        }
    }
}

/// 週選擇器與隱藏的 `start_of_week` 欄位
#[derive(Debug, Clone, Default)]
pub struct WeekPicker {
    start_of_week: Option<WeekQuery>,
}

impl WeekPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 選擇器的值改變時呼叫。
    ///
    /// 成功時更新欄位並回傳要提交的查詢；失敗時欄位不變，呼叫端不應提交。
    pub fn on_change(&mut self, value: &str) -> Result<WeekQuery> {
        let query = parse_picker_value(value).and_then(WeekQuery::for_date);

        match query {
            Ok(query) => {
                tracing::debug!(value, start_of_week = %query.start_of_week(), "Week picker changed");
                self.start_of_week = Some(query);
                Ok(query)
            }
            Err(e) => {
                tracing::warn!(value, error = %e, "Ignoring week picker value");
                Err(e)
            }
        }
    }

    /// 隱藏欄位目前的值
    pub fn field_value(&self) -> Option<String> {
        self.start_of_week.map(|q| q.start_of_week().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;

    fn date(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    #[test]
    fn test_parse_iso_week() {
        assert_eq!(parse_picker_value("2024-W24").unwrap(), date("2024-06-10"));
        // ISO 週 1 可能從前一年開始
        assert_eq!(parse_picker_value("2025-W01").unwrap(), date("2024-12-30"));
        assert_eq!(parse_picker_value("2020-W53").unwrap(), date("2020-12-28"));
        assert!(matches!(
            parse_picker_value("2023-W53"),
            Err(ChoreWeekError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(parse_picker_value(" 2024-06-13 ").unwrap(), date("2024-06-13"));
        assert!(matches!(
            parse_picker_value("next week"),
            Err(ChoreWeekError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_query_string_round_trip_keeps_monday() {
        let query = WeekQuery::for_date(date("2024-06-16")).unwrap();
        assert_eq!(query.to_query_string(), "start_of_week=2024-06-10");

        let clock = FixedClock(date("2030-01-01"));
        let parsed = WeekQuery::from_query_string("?start_of_week=2024-06-10&x=1", &clock).unwrap();
        assert_eq!(parsed, query);
    }

    #[test]
    fn test_query_string_defaults_to_current_week() {
        let clock = FixedClock(date("2023-12-31"));
        for qs in ["", "start_of_week=", "other=2024-06-10"] {
            let query = WeekQuery::from_query_string(qs, &clock).unwrap();
            assert_eq!(query.start_of_week(), date("2023-12-25"), "query {qs:?}");
        }
    }

    #[test]
    fn test_query_string_rejects_bad_dates() {
        let clock = FixedClock(date("2024-06-13"));
        assert!(WeekQuery::from_query_string("start_of_week=13%2F06%2F2024", &clock).is_err());
    }

    #[test]
    fn test_deserialize_requires_monday() {
        let query: WeekQuery = serde_json::from_str(r#"{"start_of_week":"2024-06-10"}"#).unwrap();
        assert_eq!(query.start_of_week(), date("2024-06-10"));

        let thursday = serde_json::from_str::<WeekQuery>(r#"{"start_of_week":"2024-06-13"}"#);
        assert!(thursday.is_err());
        assert!(serde_json::from_str::<WeekQuery>(r#"{"start_of_week":"June"}"#).is_err());
    }

    #[test]
    fn test_picker_keeps_previous_value_on_error() {
        let mut picker = WeekPicker::new();
        assert_eq!(picker.field_value(), None);

        picker.on_change("2024-06-13").unwrap();
        assert_eq!(picker.field_value().as_deref(), Some("2024-06-10"));

        assert!(picker.on_change("garbage").is_err());
        assert_eq!(picker.field_value().as_deref(), Some("2024-06-10"));
    }
}
