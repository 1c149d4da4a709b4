use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use lil_redirector::{Resolution, ResolveMode};

/// Serves both `/{code}` and `/p/{code}`; the path decides the mode.
pub async fn resolve_handler(State(state): State<AppState>, uri: Uri) -> Result<Response> {
    match state.redirector.lookup(uri.path()).await? {
        Resolution::Hit {
            record,
            mode: ResolveMode::Direct,
        } => Ok((StatusCode::FOUND, [(header::LOCATION, record.target_url)]).into_response()),
        Resolution::Hit {
            record,
            mode: ResolveMode::Interstitial,
        } => Ok(Html(state.page.render(&record.target_url)).into_response()),
        Resolution::Miss => Err(AppError::LinkNotFound),
    }
}
