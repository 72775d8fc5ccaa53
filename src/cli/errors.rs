use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required argument: {arg}")]
    MissingArgument { arg: String },

    #[error("Product rejected with {violations} violations")]
    Rejected { violations: usize },

    #[error("Batch incomplete: {rejected} rejected, {errors} failed")]
    BatchIncomplete { rejected: usize, errors: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Certification(#[from] nrbmeta::Error),
}
