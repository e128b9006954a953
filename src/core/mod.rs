pub mod ledger;
pub mod picker;
pub mod summary;
pub mod week;

pub use crate::domain::model::CalendarDate;
pub use crate::domain::ports::{Clock, ConfigProvider};
pub use crate::utils::error::Result;
