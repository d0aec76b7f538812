use crate::error::{AppError, Result};
use crate::extract::QueryParams;
use crate::model::ApiResponse;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tinyscale_core::{Alias, ResolutionSource};
use tracing::{debug, info};

pub async fn shorten_handler(
    State(state): State<AppState>,
    query: QueryParams,
) -> Result<(StatusCode, Json<ApiResponse>)> {
    let long_url = query
        .first("longUrl")
        .ok_or(AppError::MissingParameter("missing tinyURL parameter"))?;

    let alias = state.shortener().shorten(long_url).await?;
    info!(alias = %alias, "shortened url");

    let status = StatusCode::CREATED;
    Ok((status, Json(ApiResponse::new(status, alias.to_string()))))
}

pub async fn resolve_handler(
    State(state): State<AppState>,
    query: QueryParams,
) -> Result<(StatusCode, Json<ApiResponse>)> {
    let tiny_url = query
        .first("tinyUrl")
        .ok_or(AppError::MissingParameter("missing longURL parameter"))?;

    // a string that can never be an alias can never be found
    let alias = Alias::new(tiny_url).map_err(|e| {
        debug!(error = %e, "rejecting malformed alias");
        AppError::NotFound
    })?;

    let resolution = state
        .redirector()
        .resolve(&alias)
        .await?
        .ok_or(AppError::NotFound)?;

    let status = match resolution.source {
        ResolutionSource::Cache => StatusCode::OK,
        ResolutionSource::Store => StatusCode::CREATED,
    };
    Ok((status, Json(ApiResponse::new(status, resolution.long_url))))
}
