use thiserror::Error;

#[derive(Error, Debug)]
pub enum PruneError {
    #[error("Credential rejected: {message}")]
    CredentialError { message: String },

    #[error("API request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("API responded with status {status}: {body}")]
    ResponseError { status: u16, body: String },

    #[error("Invalid selection: {message}")]
    SelectionInputError { message: String },

    #[error("No members fetched for group {group_id}")]
    NoMembersError { group_id: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Credential,
    Network,
    Input,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PruneError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PruneError::CredentialError { .. } => ErrorCategory::Credential,
            PruneError::TransportError(_) | PruneError::ResponseError { .. } => {
                ErrorCategory::Network
            }
            PruneError::SelectionInputError { .. } => ErrorCategory::Input,
            PruneError::NoMembersError { .. } | PruneError::SerializationError(_) => {
                ErrorCategory::Data
            }
            PruneError::ConfigError { .. } | PruneError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            PruneError::IoError(_) => ErrorCategory::System,
        }
    }

    /// 決定程序結束碼，見 `main.rs`
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PruneError::SelectionInputError { .. } => ErrorSeverity::Low,
            PruneError::TransportError(_)
            | PruneError::ResponseError { .. }
            | PruneError::SerializationError(_) => ErrorSeverity::Medium,
            PruneError::CredentialError { .. }
            | PruneError::NoMembersError { .. }
            | PruneError::ConfigError { .. }
            | PruneError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            PruneError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PruneError::CredentialError { .. } => {
                "Invalid Access Token. Please check your credentials.".to_string()
            }
            PruneError::TransportError(_) => {
                "Could not reach the API. Check the error log for details.".to_string()
            }
            PruneError::ResponseError { status, .. } => {
                format!("The API rejected the request (HTTP {}).", status)
            }
            PruneError::SelectionInputError { .. } => {
                "Invalid input. Please enter valid indices separated by commas, 'all', or 'none'."
                    .to_string()
            }
            PruneError::NoMembersError { .. } => "No members fetched. Exiting.".to_string(),
            PruneError::IoError(e) => format!("File system error: {}", e),
            PruneError::SerializationError(_) => {
                "Received a response that could not be parsed.".to_string()
            }
            PruneError::ConfigError { message } => format!("Configuration problem: {}", message),
            PruneError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Credential => {
                "Generate a fresh access token with group admin permissions and try again"
            }
            ErrorCategory::Network => "Check network connectivity and the API URL",
            ErrorCategory::Input => "Enter indices like 1,3,5 or 'all' / 'none'",
            ErrorCategory::Data => "Verify the group ID and that the token can read its members",
            ErrorCategory::Configuration => "Review the command-line flags and settings file",
            ErrorCategory::System => "Check file permissions for the error log path",
        }
    }
}

pub type Result<T> = std::result::Result<T, PruneError>;
