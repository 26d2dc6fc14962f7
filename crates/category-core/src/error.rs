use thiserror::Error;

pub type CategoryResult<T> = Result<T, CategoryError>;

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("category {0} not found")]
    NotFound(i64),

    #[error("category graph is malformed: {0}")]
    Structural(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage task join error: {0}")]
    Task(String),
}

impl CategoryError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn duplicate_name() -> Self {
        Self::validation("name", "category with this name already exists.")
    }
}
