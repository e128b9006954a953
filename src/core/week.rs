//! 週一為一週起點的日期計算 (週一到週日)。

use crate::domain::model::CalendarDate;
use crate::utils::error::{ChoreWeekError, Result};
use serde::Serialize;
use std::fmt;

pub const DAYS_PER_WEEK: i64 = 7;

/// 由星期索引 (Sunday = 0 ... Saturday = 6) 算出回到週一要加的天數。
///
/// 週日屬於前一個週一開始的那一週，所以是 -6；其餘為 `1 - index`。
pub fn week_offset(weekday_index: u32) -> i64 {
    if weekday_index == 0 {
        -6
    } else {
        1 - i64::from(weekday_index)
    }
}

/// 回傳 `date` 當天或之前最近的週一。
///
/// `date` 一定落在 `[result, result + 6]` 之內。若該週一早於可表示的最小日期，
/// 回傳 `DateRange`。
pub fn resolve_week_start(date: CalendarDate) -> Result<CalendarDate> {
    let offset = week_offset(date.weekday_index());
    let monday = date.checked_add_days(offset).ok_or_else(|| {
        ChoreWeekError::date_range(format!(
            "the Monday of the week containing {} is not representable",
            date
        ))
    })?;

    tracing::trace!(%date, offset, %monday, "Resolved week start");
    Ok(monday)
}

/// 解析 `YYYY-MM-DD` 後取得週一，並以同樣格式輸出
pub fn resolve_week_start_str(input: &str) -> Result<String> {
    let date = CalendarDate::parse(input)?;
    resolve_week_start(date).map(|monday| monday.to_string())
}

/// 一整週：`start` 為週一，`end` 為同週週日 (含)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WeekRange {
    start: CalendarDate,
    end: CalendarDate,
}

impl WeekRange {
    pub fn containing(date: CalendarDate) -> Result<Self> {
        Self::starting(resolve_week_start(date)?)
    }

    pub fn starting(monday: CalendarDate) -> Result<Self> {
        if !monday.is_monday() {
            return Err(ChoreWeekError::ValidationError {
                message: format!("week must start on a Monday, {} is a {}", monday, monday.weekday()),
            });
        }

        let end = monday.checked_add_days(DAYS_PER_WEEK - 1).ok_or_else(|| {
            ChoreWeekError::date_range(format!("the week starting {} runs past the calendar", monday))
        })?;

        Ok(Self { start: monday, end })
    }

    pub fn start(&self) -> CalendarDate {
        self.start
    }

    pub fn end(&self) -> CalendarDate {
        self.end
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = CalendarDate> + '_ {
        (0..DAYS_PER_WEEK).filter_map(|i| self.start.checked_add_days(i))
    }

    pub fn previous(&self) -> Result<Self> {
        let monday = self
            .start
            .checked_add_days(-DAYS_PER_WEEK)
            .ok_or_else(|| ChoreWeekError::date_range(format!("no week before {}", self)))?;
        Self::starting(monday)
    }

    pub fn next(&self) -> Result<Self> {
        let monday = self
            .start
            .checked_add_days(DAYS_PER_WEEK)
            .ok_or_else(|| ChoreWeekError::date_range(format!("no week after {}", self)))?;
        Self::starting(monday)
    }
}

impl fmt::Display for WeekRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    #[test]
    fn test_week_offset() {
        assert_eq!(week_offset(0), -6);
        assert_eq!(week_offset(1), 0);
        assert_eq!(week_offset(4), -3);
        assert_eq!(week_offset(6), -5);
    }

    #[test]
    fn test_resolve_known_dates() {
        assert_eq!(resolve_week_start(date("2024-06-10")).unwrap(), date("2024-06-10"));
        assert_eq!(resolve_week_start(date("2024-06-16")).unwrap(), date("2024-06-10"));
        assert_eq!(resolve_week_start(date("2024-06-13")).unwrap(), date("2024-06-10"));
        assert_eq!(resolve_week_start(date("2024-01-01")).unwrap(), date("2024-01-01"));
        assert_eq!(resolve_week_start(date("2023-12-31")).unwrap(), date("2023-12-25"));
    }

    #[test]
    fn test_resolve_rolls_back_over_month_boundary() {
        // 2024-03-02 是週六
        assert_eq!(resolve_week_start(date("2024-03-02")).unwrap(), date("2024-02-26"));
    }

    #[test]
    fn test_resolve_str() {
        assert_eq!(resolve_week_start_str("2024-06-13").unwrap(), "2024-06-10");
        assert!(matches!(
            resolve_week_start_str("June 13th"),
            Err(ChoreWeekError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_resolve_near_calendar_minimum() {
        // 最小日期 -262143-01-01 是週四，第一個週一是 01-05
        let first_day = CalendarDate::from_ymd(-262_143, 1, 1).unwrap();
        assert_eq!(first_day, CalendarDate::MIN);
        assert_eq!(first_day.weekday(), chrono::Weekday::Thu);

        assert!(matches!(
            resolve_week_start(first_day),
            Err(ChoreWeekError::DateRange { .. })
        ));
        let first_sunday = CalendarDate::from_ymd(-262_143, 1, 4).unwrap();
        assert!(matches!(
            resolve_week_start(first_sunday),
            Err(ChoreWeekError::DateRange { .. })
        ));

        let first_monday = CalendarDate::from_ymd(-262_143, 1, 5).unwrap();
        assert_eq!(resolve_week_start(first_monday).unwrap(), first_monday);
        let wednesday = CalendarDate::from_ymd(-262_143, 1, 7).unwrap();
        assert_eq!(resolve_week_start(wednesday).unwrap(), first_monday);
    }

    #[test]
    fn test_week_range() {
        let week = WeekRange::containing(date("2024-06-13")).unwrap();
        assert_eq!(week.start(), date("2024-06-10"));
        assert_eq!(week.end(), date("2024-06-16"));
        assert!(week.contains(date("2024-06-16")));
        assert!(!week.contains(date("2024-06-17")));
        assert_eq!(week.days().count(), 7);
        assert_eq!(week.to_string(), "2024-06-10..2024-06-16");
    }

    #[test]
    fn test_week_range_requires_monday() {
        assert!(matches!(
            WeekRange::starting(date("2024-06-11")),
            Err(ChoreWeekError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_previous_and_next_cross_year() {
        let week = WeekRange::containing(date("2024-01-03")).unwrap();
        assert_eq!(week.previous().unwrap().start(), date("2023-12-25"));
        assert_eq!(week.next().unwrap().start(), date("2024-01-08"));
    }

    #[test]
    fn test_week_range_past_calendar_maximum() {
        let last_monday = resolve_week_start(CalendarDate::MAX).unwrap();
        let result = WeekRange::starting(last_monday);
        if CalendarDate::MAX.weekday() == chrono::Weekday::Sun {
            assert!(result.is_ok());
        } else {
            assert!(matches!(result, Err(ChoreWeekError::DateRange { .. })));
        }
    }
}
