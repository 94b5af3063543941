use crate::domain::ship::ShipField;

/// Failures surfaced by the ship catalog.
///
/// The HTTP layer maps these onto status codes; nothing in the catalog
/// recovers from them.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid {field}: {reason}")]
    Validation { field: ShipField, reason: String },

    #[error("ship {0} not found")]
    NotFound(i64),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn validation(field: ShipField, reason: impl Into<String>) -> Self {
        CatalogError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        CatalogError::BadRequest(detail.into())
    }

    /// The rejected field, for validation failures.
    pub fn field(&self) -> Option<ShipField> {
        match self {
            CatalogError::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }
}
