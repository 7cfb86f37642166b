use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlanningError>;

#[derive(Error, Debug)]
pub enum PlanningError {
    #[error("Invalid sprint number `{input}`: {reason}")]
    InvalidSprintNumber { input: String, reason: String },

    #[error("No valid sprint number entered after {attempts} attempts")]
    PromptExhausted { attempts: usize },

    #[error("Input closed before a sprint number was entered")]
    InputClosed,

    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Not found '{field}' field in `{entry}`")]
    MissingField { entry: String, field: String },

    #[error("Invalid '{field}' field in `{entry}`: {reason}")]
    InvalidField {
        entry: String,
        field: String,
        reason: String,
    },

    #[error("Not a valid date: {0}")]
    InvalidDate(String),

    #[error("Failed to render markdown table: {0}")]
    Markdown(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

impl PlanningError {
    pub fn missing_field(entry: impl ToString, field: impl ToString) -> Self {
        Self::MissingField {
            entry: entry.to_string(),
            field: field.to_string(),
        }
    }

    pub fn invalid_field(entry: impl ToString, field: impl ToString, reason: impl ToString) -> Self {
        Self::InvalidField {
            entry: entry.to_string(),
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}
