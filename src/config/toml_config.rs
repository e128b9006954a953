use crate::core::ledger::{DEFAULT_NAME_MAX_LENGTH, DEFAULT_RECENT_LIMIT};
use crate::domain::model::ClockPolicy;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ChoreWeekError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
pub const LOG_FORMATS: [&str; 2] = ["compact", "json"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoreWeekConfig {
    pub app: AppConfig,
    pub calendar: CalendarConfig,
    pub ledger: LedgerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "chore_tracker".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// 「今天」使用本地時區或 UTC
    pub clock: ClockPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub recent_limit: usize,
    pub name_max_length: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
            name_max_length: DEFAULT_NAME_MAX_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `compact` 給終端機，`json` 給日誌收集
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl ChoreWeekConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ChoreWeekError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ChoreWeekError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 有指定檔案就讀取，沒有就用預設值
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                validate_path("config", &path.to_string_lossy())?;
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("app.name", &self.app.name)?;
        validate_range("ledger.recent_limit", self.ledger.recent_limit, 1, 100)?;
        validate_range("ledger.name_max_length", self.ledger.name_max_length, 1, 255)?;
        validate_one_of("logging.level", &self.logging.level, &LOG_LEVELS)?;
        validate_one_of("logging.format", &self.logging.format, &LOG_FORMATS)?;
        Ok(())
    }
}

impl ConfigProvider for ChoreWeekConfig {
    fn app_name(&self) -> &str {
        &self.app.name
    }

    fn clock_policy(&self) -> ClockPolicy {
        self.calendar.clock
    }

    fn recent_limit(&self) -> usize {
        self.ledger.recent_limit
    }

    fn name_max_length(&self) -> usize {
        self.ledger.name_max_length
    }

    fn log_level(&self) -> &str {
        &self.logging.level
    }

    fn log_format(&self) -> &str {
        &self.logging.format
    }
}

impl Validate for ChoreWeekConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
