pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{FixedClock, SystemClock};
pub use config::ChoreWeekConfig;
pub use core::{
    ledger::{ChoreLedger, LedgerSettings},
    picker::{parse_picker_value, WeekPicker, WeekQuery},
    summary::{ApprovalSheet, WeekSummary},
    week::{resolve_week_start, resolve_week_start_str, WeekRange},
};
pub use domain::model::{CalendarDate, ClockPolicy};
pub use domain::ports::{Clock, ConfigProvider};
pub use utils::error::{ChoreWeekError, Result};
