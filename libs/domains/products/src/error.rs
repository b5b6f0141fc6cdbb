use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found with filter: {filter}")]
    NotFound { filter: String },

    /// Carries the full client-facing message, cause included
    #[error("{0}")]
    Insertion(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Store(#[from] StoreError),

    /// A stored value could not be represented in the application types
    #[error("Conversion error: {0}")]
    Conversion(String),
}

impl ProductError {
    pub fn not_found(id: Uuid) -> Self {
        ProductError::NotFound {
            filter: id.to_string(),
        }
    }

    pub fn insertion(cause: impl std::fmt::Display) -> Self {
        ProductError::Insertion(format!("Failed to insert product into database: {cause}"))
    }
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        let message = err.to_string();
        match err {
            ProductError::NotFound { .. } => AppError::NotFound(message),
            ProductError::Insertion(_) => AppError::BadRequest(message),
            ProductError::Validation(_) => AppError::UnprocessableEntity(message),
            ProductError::Store(_) | ProductError::Conversion(_) => {
                AppError::InternalServerError(message)
            }
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
