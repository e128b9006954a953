use crate::domain::model::{CalendarDate, ClockPolicy};

/// 提供「今天」的日期
pub trait Clock {
    fn today(&self) -> CalendarDate;
}

pub trait ConfigProvider {
    fn app_name(&self) -> &str;
    fn clock_policy(&self) -> ClockPolicy;
    fn recent_limit(&self) -> usize;
    fn name_max_length(&self) -> usize;
    fn log_level(&self) -> &str;
    fn log_format(&self) -> &str;
}
