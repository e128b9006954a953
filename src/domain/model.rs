use crate::utils::error::{ChoreWeekError, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?[0-9]{4,})-([0-9]{2})-([0-9]{2})$").expect("ISO date pattern is valid")
});

/// 沒有時區、沒有時間的日曆日期 (午夜)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub const MIN: CalendarDate = CalendarDate(NaiveDate::MIN);
    pub const MAX: CalendarDate = CalendarDate(NaiveDate::MAX);

    /// 年份超出可表示範圍時回傳 `DateRange`，月日組合不存在時回傳 `InvalidDate`
    pub fn from_ymd(year: i64, month: u32, day: u32) -> Result<Self> {
        let year = checked_year(year)?;
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| ChoreWeekError::InvalidDate {
                input: format!("{:04}-{:02}-{:02}", year, month, day),
                reason: "no such day in the calendar".to_string(),
            })
    }

    /// 解析 `YYYY-MM-DD`，前後空白會被忽略
    pub fn parse(input: &str) -> Result<Self> {
        let caps = ISO_DATE
            .captures(input.trim())
            .ok_or_else(|| ChoreWeekError::invalid_date(input, "expected YYYY-MM-DD"))?;

        let year = parse_year(input, &caps[1])?;
        let month: u32 = caps[2]
            .parse()
            .map_err(|_| ChoreWeekError::invalid_date(input, "month is not a number"))?;
        let day: u32 = caps[3]
            .parse()
            .map_err(|_| ChoreWeekError::invalid_date(input, "day is not a number"))?;

        Self::from_ymd(i64::from(year), month, day).map_err(|e| match e {
            ChoreWeekError::InvalidDate { reason, .. } => ChoreWeekError::invalid_date(input, reason),
            other => other,
        })
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Sunday = 0 ... Saturday = 6
    pub fn weekday_index(&self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    pub fn is_monday(&self) -> bool {
        self.weekday() == Weekday::Mon
    }

    pub fn checked_add_days(&self, days: i64) -> Option<Self> {
        Duration::try_days(days)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(Self)
    }
}

/// 年份只接受 ASCII 數字；數字本身太大才算 `DateRange`
pub(crate) fn parse_year(input: &str, digits: &str) -> Result<i32> {
    let unsigned = digits.trim_start_matches(['+', '-']);
    if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ChoreWeekError::invalid_date(input, "year is not a number"));
    }

    let year: i64 = digits
        .parse()
        .map_err(|_| ChoreWeekError::date_range(format!("year in '{}' is out of range", input)))?;
    checked_year(year)
}

fn checked_year(year: i64) -> Result<i32> {
    let min = i64::from(NaiveDate::MIN.year());
    let max = i64::from(NaiveDate::MAX.year());
    if year < min || year > max {
        return Err(ChoreWeekError::date_range(format!(
            "year {} is outside {}..={}",
            year, min, max
        )));
    }
    // 上面已經檢查過範圍
    Ok(year as i32)
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for CalendarDate {
    type Err = ChoreWeekError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = ChoreWeekError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CalendarDate> for String {
    fn from(date: CalendarDate) -> Self {
        date.to_string()
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// 決定「今天」要用哪個時區
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockPolicy {
    #[default]
    Local,
    Utc,
}

impl fmt::Display for ClockPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockPolicy::Local => write!(f, "local"),
            ClockPolicy::Utc => write!(f, "utc"),
        }
    }
}

macro_rules! ledger_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

ledger_id!(UserId);
ledger_id!(ChildId);
ledger_id!(ChoreId);
ledger_id!(CompletedChoreId);
ledger_id!(WeeklyTotalId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub user_name: String,
    pub admin: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: ChildId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chore {
    pub id: ChoreId,
    pub chore: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedChore {
    pub id: CompletedChoreId,
    pub chore_id: ChoreId,
    pub child_id: ChildId,
    pub user_id: UserId,
    pub completed_on: CalendarDate,
    /// 完成當下的家事金額
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTotal {
    pub id: WeeklyTotalId,
    pub child_id: ChildId,
    pub week_start: CalendarDate,
    pub total: f64,
    pub approved_by: Option<UserId>,
    pub approved_on: Option<CalendarDate>,
}

impl WeeklyTotal {
    pub fn is_approved(&self) -> bool {
        self.approved_by.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let date = CalendarDate::parse("2024-06-13").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 6);
        assert_eq!(date.day(), 13);
        assert_eq!(date.to_string(), "2024-06-13");
        assert_eq!(CalendarDate::parse("  2024-06-13\n").unwrap(), date);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "yesterday", "2024/06/13", "2024-6-13", "13-06-2024", "2024-06-13T00:00"] {
            assert!(
                matches!(CalendarDate::parse(input), Err(ChoreWeekError::InvalidDate { .. })),
                "{input:?} should be an invalid date"
            );
        }
    }

    #[test]
    fn test_parse_rejects_impossible_days() {
        assert!(matches!(
            CalendarDate::parse("2023-02-29"),
            Err(ChoreWeekError::InvalidDate { .. })
        ));
        assert!(matches!(
            CalendarDate::parse("2024-13-01"),
            Err(ChoreWeekError::InvalidDate { .. })
        ));
        assert!(CalendarDate::parse("2024-02-29").is_ok());
    }

    #[test]
    fn test_out_of_range_year() {
        assert!(matches!(
            CalendarDate::parse("999999-01-01"),
            Err(ChoreWeekError::DateRange { .. })
        ));
        assert!(matches!(
            CalendarDate::from_ymd(-999_999, 1, 1),
            Err(ChoreWeekError::DateRange { .. })
        ));
    }

    #[test]
    fn test_non_ascii_digits_are_invalid() {
        for input in ["٢٠٢٤-06-13", "2024-٠٦-13", "２０２４-06-13"] {
            assert!(
                matches!(CalendarDate::parse(input), Err(ChoreWeekError::InvalidDate { .. })),
                "{input:?} should be an invalid date"
            );
        }
        assert!(matches!(
            parse_year("٢٠٢٤-W01", "٢٠٢٤"),
            Err(ChoreWeekError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_overflowing_year_digits_are_out_of_range() {
        assert!(matches!(
            CalendarDate::parse("99999999999999999999999-01-01"),
            Err(ChoreWeekError::DateRange { .. })
        ));
    }

    #[test]
    fn test_weekday_index_is_sunday_based() {
        assert_eq!(CalendarDate::parse("2024-06-16").unwrap().weekday_index(), 0);
        assert_eq!(CalendarDate::parse("2024-06-10").unwrap().weekday_index(), 1);
        assert_eq!(CalendarDate::parse("2024-06-15").unwrap().weekday_index(), 6);
    }

    #[test]
    fn test_checked_add_days_at_the_edges() {
        assert!(CalendarDate::MAX.checked_add_days(1).is_none());
        assert!(CalendarDate::MIN.checked_add_days(-1).is_none());
        assert_eq!(
            CalendarDate::parse("2024-02-28").unwrap().checked_add_days(1),
            Some(CalendarDate::parse("2024-02-29").unwrap())
        );
    }

    #[test]
    fn test_serde_as_iso_string() {
        let date = CalendarDate::parse("2023-12-25").unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2023-12-25\"");
        let back: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date);
        assert!(serde_json::from_str::<CalendarDate>("\"not-a-date\"").is_err());
    }
}
