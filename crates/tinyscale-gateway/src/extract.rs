use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use crate::error::AppError;

/// Query string parameters in request order.
///
/// A repeated parameter keeps all of its values; [`QueryParams::first`]
/// picks the first one. Malformed query strings are rejected with an
/// [`AppError`] so the body keeps the `{Code, Msg}` shape.
#[derive(Debug, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// The first non-empty value of `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for QueryParams {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::InvalidQuery(rejection.body_text()))?;
        Ok(Self(pairs))
    }
}
