use crate::error::Result;
use crate::model::{CreateLinkRequest, LinkResponse, SearchParams, SearchResponse};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lil_core::SearchQuery;
use lil_shortener::CreateLink;
use std::time::Duration;
use tracing::info;

pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>)> {
    let record = state
        .shortener
        .create_link(CreateLink {
            code: request.code,
            target_url: request.url,
            ttl: request.ttl.map(Duration::from_secs),
        })
        .await?;

    info!(code = %record.code, url = %record.target_url, "Created short link");
    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::new(record, &state.base_url)),
    ))
}

pub async fn get_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>> {
    let record = state.shortener.get_link(&code).await?;
    Ok(Json(LinkResponse::new(record, &state.base_url)))
}

pub async fn search_links_handler(
    Query(params): Query<SearchParams>,
    State(state): State<AppState>,
) -> Result<Json<SearchResponse>> {
    let query = SearchQuery::new(
        params.query.unwrap_or_default(),
        params.cursor.filter(|cursor| !cursor.is_empty()),
        params.limit.unwrap_or(state.default_search_limit),
    );

    let page = state.shortener.search_links(query).await?;
    Ok(Json(SearchResponse::new(page, &state.base_url)))
}

pub async fn delete_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    state.shortener.delete_link(&code).await?;
    info!(code = %code, "Deleted short link");
    Ok(StatusCode::NO_CONTENT)
}
