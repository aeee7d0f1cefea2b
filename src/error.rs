//! Error taxonomy for catalog operations.
//!
//! All three kinds are handled at the handler boundary: recorded on the
//! active span, counted by route and error type, logged, then surfaced to
//! the user as a flash message with a redirect to a fallback view. None of
//! them propagate to the request dispatcher.

use crate::store::StoreError;

/// A domain failure inside a catalog operation.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Required form fields were absent or empty. Lists every missing
    /// field, not just the first.
    #[error("Missing fields: {}", .fields.join(", "))]
    Validation { fields: Vec<String> },

    /// No course matched the requested code.
    #[error("No course found with code '{code}'.")]
    NotFound { code: String },

    /// The backing store exists but could not be read or written.
    #[error("The course catalog is currently unavailable.")]
    Store(#[from] StoreError),
}

impl CatalogError {
    /// Stable label used to tag error metrics and span attributes.
    pub fn error_type(&self) -> &'static str {
        match self {
            CatalogError::Validation { .. } => "missing_fields",
            CatalogError::NotFound { .. } => "not_found",
            CatalogError::Store(_) => "store_unavailable",
        }
    }

    /// View to redirect to after surfacing the failure.
    pub fn fallback_path(&self) -> &'static str {
        match self {
            CatalogError::Validation { .. } => "/add_course",
            CatalogError::NotFound { .. } | CatalogError::Store(_) => "/catalog",
        }
    }
}
