//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, XML, JSON and temp-file errors, and provides semantic
//! variants for rejected records, malformed documents and serializer failures.
use thiserror::Error;

use crate::core::report::ValidationReport;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not persist output file: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// The record failed validation; the report lists every violation
    #[error("Record rejected with {} violations", .0.failure_count())]
    Rejected(ValidationReport),

    #[error("Malformed metadata document: {0}")]
    Document(String),

    /// The serializer produced a document that does not reproduce its record.
    /// Never a data error: the product must not be emitted.
    #[error("Serialization invariant failure: {0}")]
    SerializationInvariant(String),
}

impl Error {
    pub fn document<E: std::fmt::Display>(e: E) -> Self {
        Error::Document(e.to_string())
    }

    /// The violation report, if this is a rejection
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Error::Rejected(report) => Some(report),
            _ => None,
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(e.into())
    }
}
