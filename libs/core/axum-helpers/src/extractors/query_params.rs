//! Query string extractor that answers bad input with a `{"detail"}` body.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// Like [`Query`], but a malformed query string is a 422 through
/// [`AppError`] instead of axum's plain-text 400.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::QueryParams;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Page {
///     limit: Option<u32>,
/// }
///
/// async fn list(QueryParams(page): QueryParams<Page>) -> String {
///     format!("limit: {:?}", page.limit)
/// }
/// ```
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;
        Ok(QueryParams(params))
    }
}
