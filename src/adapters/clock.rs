use crate::domain::model::{CalendarDate, ClockPolicy};
use crate::domain::ports::Clock;
use chrono::{Local, Utc};

/// 依設定的時區讀取系統時間
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    policy: ClockPolicy,
}

impl SystemClock {
    pub fn new(policy: ClockPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ClockPolicy {
        self.policy
    }
}

impl Clock for SystemClock {
    fn today(&self) -> CalendarDate {
        let today = match self.policy {
            ClockPolicy::Local => Local::now().date_naive(),
            ClockPolicy::Utc => Utc::now().date_naive(),
        };
        CalendarDate::from_naive(today)
    }
}

/// 永遠回傳同一天，給測試與重播使用
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub CalendarDate);

impl Clock for FixedClock {
    fn today(&self) -> CalendarDate {
        self.0
    }
}
