use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChoreWeekError {
    #[error("Invalid date '{input}': {reason}")]
    InvalidDate { input: String, reason: String },

    #[error("Date out of range: {message}")]
    DateRange { message: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} '{value}' already exists")]
    Duplicate { entity: &'static str, value: String },

    #[error("User '{user}' is not allowed to {action}")]
    Unauthorized { user: String, action: String },

    #[error("No weekly total for child {child} in week starting {week_start}")]
    NoWeeklyTotal { child: String, week_start: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 使用者輸入的日期或週次
    Input,
    /// 帳本內的資料狀態
    Ledger,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ChoreWeekError {
    pub fn invalid_date(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn date_range(message: impl Into<String>) -> Self {
        Self::DateRange {
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDate { .. } | Self::DateRange { .. } | Self::ValidationError { .. } => {
                ErrorCategory::Input
            }
            Self::NotFound { .. }
            | Self::Duplicate { .. }
            | Self::Unauthorized { .. }
            | Self::NoWeeklyTotal { .. } => ErrorCategory::Ledger,
            Self::InvalidConfigValueError { .. } | Self::ConfigValidationError { .. } => {
                ErrorCategory::Configuration
            }
            Self::IoError(_) | Self::SerializationError(_) | Self::CsvError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Ledger => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidDate { .. } => "Use a calendar date (YYYY-MM-DD) or an ISO week (YYYY-Www)",
            Self::DateRange { .. } => "Pick a date inside the supported calendar range",
            Self::NotFound { .. } => "Check the id against the current ledger contents",
            Self::Duplicate { .. } => "Choose a different name",
            Self::Unauthorized { .. } => "Ask an admin to perform this action or grant admin rights",
            Self::NoWeeklyTotal { .. } => "Record at least one chore for that week before approving it",
            Self::ValidationError { .. } => "Correct the highlighted value and try again",
            Self::InvalidConfigValueError { .. } | Self::ConfigValidationError { .. } => {
                "Review the configuration file"
            }
            Self::IoError(_) => "Check that the file exists and is readable",
            Self::SerializationError(_) | Self::CsvError(_) => "Report this as a bug",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidDate { input, .. } => format!("'{}' is not a date we understand", input),
            Self::DateRange { .. } => "That date is too far in the past or future".to_string(),
            Self::Unauthorized { .. } => "You must be an admin to do that".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChoreWeekError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_errors_are_input_category() {
        let err = ChoreWeekError::invalid_date("tomorrow", "not a date");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.to_string().contains("tomorrow"));

        let err = ChoreWeekError::date_range("before the earliest Monday");
        assert_eq!(err.category(), ErrorCategory::Input);
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err: ChoreWeekError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_every_error_has_a_failing_severity() {
        let config_err = ChoreWeekError::InvalidConfigValueError {
            field: "config".to_string(),
            value: String::new(),
            reason: "Path cannot be empty".to_string(),
        };
        assert_eq!(config_err.category(), ErrorCategory::Configuration);
        assert!(config_err.severity() > ErrorSeverity::Medium);
        assert!(ChoreWeekError::date_range("x").severity() >= ErrorSeverity::Medium);
    }

    #[test]
    fn test_not_found_message() {
        let err = ChoreWeekError::not_found("Child", 7);
        assert_eq!(err.to_string(), "Child 7 not found");
        assert_eq!(err.category(), ErrorCategory::Ledger);
    }
}
