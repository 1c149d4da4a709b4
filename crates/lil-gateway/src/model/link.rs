use jiff::Timestamp;
use lil_core::{LinkRecord, SearchPage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub url: String,
    pub code: Option<String>,
    /// Lifetime in seconds.
    pub ttl: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub code: String,
    pub url: String,
    pub short_url: String,
    pub created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
}

impl LinkResponse {
    pub fn new(record: LinkRecord, base_url: &str) -> Self {
        Self {
            short_url: record.code.to_url(base_url),
            code: record.code.to_string(),
            url: record.target_url,
            created_at: record.created_at,
            expires_at: record.expires_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub links: Vec<LinkResponse>,
    pub next_cursor: Option<String>,
}

impl SearchResponse {
    pub fn new(page: SearchPage, base_url: &str) -> Self {
        Self {
            links: page
                .links
                .into_iter()
                .map(|record| LinkResponse::new(record, base_url))
                .collect(),
            next_cursor: page.next_cursor,
        }
    }
}
