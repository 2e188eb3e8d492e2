use thiserror::Error;

/// Error types for the batch-import module
#[derive(Error, Debug)]
pub enum ImportError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Error from reading the CSV input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The three batch sequences disagree on length
    #[error("Batch shape error: {0}")]
    Shape(String),
}

impl ImportError {
    /// Short class name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ImportError::Database(_) => "Database",
            ImportError::Csv(_) => "Csv",
            ImportError::Shape(_) => "Shape",
        }
    }
}

/// Reduced diagnostic for persistence failures: the error class, the
/// originating message, and the failing call site, one tagged line each.
pub fn reduced_error(call_site: &str, error: &ImportError) -> String {
    format!(
        "\nReducedError [name]: {}\nReducedError [message]: {}\nReducedError [lastName]: {}",
        error.name(),
        error,
        call_site
    )
}

/// Type alias for Result with ImportError
pub type Result<T> = std::result::Result<T, ImportError>;
