use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatusError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP request to {url} returned status {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Failed to parse HTML ({context}): {message}")]
    HtmlParseError { context: String, message: String },

    #[error("Invalid CSS selector '{selector}': {message}")]
    SelectorError { selector: String, message: String },

    #[error("Cannot parse {kind} from '{input}'")]
    ValueParseError { kind: String, input: String },

    #[error("Field '{field}': {source}")]
    FieldError {
        field: String,
        #[source]
        source: Box<StatusError>,
    },

    #[error("Island '{title}' ({component_id}): {source}")]
    IslandError {
        title: String,
        component_id: String,
        #[source]
        source: Box<StatusError>,
    },

    #[error("Placeholder '{component_id}' carries no usable request id")]
    MissingRequestIdError { component_id: String },

    #[error("Container '{selector}' not found in page")]
    ContainerNotFoundError { selector: String },

    #[error("Resolved fragment has no element with id '{component_id}'")]
    ResolvedElementNotFoundError { component_id: String },

    #[error("No island titled like '{label}'")]
    IslandNotFoundError { label: String },

    #[error("Island '{component_id}' still pending after {attempts} attempts")]
    PollBudgetExhaustedError { component_id: String, attempts: u32 },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

pub type Result<T> = std::result::Result<T, StatusError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Parse,
    Contract,
    Resolution,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl StatusError {
    /// 包裝為欄位層級錯誤
    pub fn in_field(self, field: impl Into<String>) -> Self {
        StatusError::FieldError {
            field: field.into(),
            source: Box::new(self),
        }
    }

    /// 包裝為島嶼層級錯誤
    pub fn in_island(self, title: impl Into<String>, component_id: impl Into<String>) -> Self {
        StatusError::IslandError {
            title: title.into(),
            component_id: component_id.into(),
            source: Box::new(self),
        }
    }

    /// 取出最內層的錯誤（穿過欄位/島嶼包裝）
    pub fn root_cause(&self) -> &StatusError {
        match self {
            StatusError::FieldError { source, .. } | StatusError::IslandError { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.root_cause() {
            StatusError::HttpError(_) | StatusError::HttpStatusError { .. } => {
                ErrorCategory::Network
            }
            StatusError::HtmlParseError { .. }
            | StatusError::SelectorError { .. }
            | StatusError::ValueParseError { .. } => ErrorCategory::Parse,
            StatusError::MissingRequestIdError { .. }
            | StatusError::ContainerNotFoundError { .. }
            | StatusError::ResolvedElementNotFoundError { .. }
            | StatusError::IslandNotFoundError { .. } => ErrorCategory::Contract,
            StatusError::PollBudgetExhaustedError { .. } => ErrorCategory::Resolution,
            StatusError::ConfigError { .. }
            | StatusError::MissingConfigError { .. }
            | StatusError::InvalidConfigValueError { .. }
            | StatusError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            StatusError::IoError(_)
            | StatusError::SerializationError(_)
            | StatusError::CsvError(_)
            | StatusError::FieldError { .. }
            | StatusError::IslandError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Resolution => ErrorSeverity::Medium,
            ErrorCategory::Parse | ErrorCategory::Contract => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 只有整體狀態檢查值得重試：網路錯誤與輪詢次數耗盡
    pub fn is_retryable(&self) -> bool {
        match self.root_cause() {
            StatusError::PollBudgetExhaustedError { .. } => true,
            StatusError::HttpError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            StatusError::HttpStatusError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the network connection and the portal URL, then retry",
            ErrorCategory::Resolution => {
                "The portal is slow to render the dashboard; run the check again later"
            }
            ErrorCategory::Parse => {
                "The portal returned data in an unexpected format; the page layout may have changed"
            }
            ErrorCategory::Contract => {
                "The dashboard structure no longer matches expectations; the extractor needs updating"
            }
            ErrorCategory::Configuration => "Fix the configuration file or command line arguments",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the portal: {}", self),
            ErrorCategory::Resolution => format!("Dashboard did not finish loading: {}", self),
            ErrorCategory::Parse => format!("Could not read the account status: {}", self),
            ErrorCategory::Contract => format!("Unexpected page structure: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}
