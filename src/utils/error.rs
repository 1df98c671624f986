use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid part count ({count_a} x {count_b}): {reason}")]
    InvalidCount {
        count_a: usize,
        count_b: usize,
        reason: String,
    },

    #[error("Source plate overflow: {parts} parts need more than {capacity} reservoir wells")]
    SourcePlateOverflow { parts: usize, capacity: usize },

    #[error("Malformed template: no line starts with any of [{prefixes}]")]
    MalformedTemplate { prefixes: String },

    #[error("Parts file has no column named '{column}'")]
    MissingColumn { column: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Template,
    Configuration,
    Storage,
    Serialization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl AssemblyError {
    pub fn invalid_count(count_a: usize, count_b: usize, reason: impl Into<String>) -> Self {
        Self::InvalidCount {
            count_a,
            count_b,
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidCount { .. }
            | Self::SourcePlateOverflow { .. }
            | Self::MissingColumn { .. }
            | Self::CsvError(_) => ErrorCategory::Input,
            Self::MalformedTemplate { .. } => ErrorCategory::Template,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::ZipError(_) => ErrorCategory::Storage,
            Self::SerializationError(_) => ErrorCategory::Serialization,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Template => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Serialization => ErrorSeverity::Medium,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::InvalidCount { .. } => {
                "Reduce the number of parts so every combination fits on one plate, or split the library across plates".to_string()
            }
            Self::SourcePlateOverflow { .. } => {
                "Place the parts on the source plate by hand or split them across two reservoir plates".to_string()
            }
            Self::MalformedTemplate { .. } => {
                "Check that the template contains a function definition (e.g. `def run(protocol):`) at the start of a line".to_string()
            }
            Self::MissingColumn { column } => {
                format!("Add a '{}' column to the parts file or set [parts] column names in the config", column)
            }
            Self::CsvError(_) => "Make sure the parts file is a valid comma-separated file with a header row".to_string(),
            Self::IoError(_) => "Check that the input files exist and the output directories are writable".to_string(),
            Self::ZipError(_) => "Check free disk space and permissions for the archive path".to_string(),
            Self::SerializationError(_) => "Re-run with --verbose and report the summary contents".to_string(),
            Self::ConfigValidationError { field, .. }
            | Self::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting in the configuration file or command line", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidCount { count_a, count_b, reason } => format!(
                "{} promoter(s) x {} UTR(s) cannot be laid out: {}",
                count_a, count_b, reason
            ),
            Self::SourcePlateOverflow { parts, capacity } => format!(
                "{} parts do not fit on a {}-well source plate; no pipetting plan was made",
                parts, capacity
            ),
            Self::MalformedTemplate { .. } => {
                "The protocol template has no function definition to insert parameters before".to_string()
            }
            Self::MissingColumn { column } => format!("The parts file is missing the '{}' column", column),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AssemblyError>;
