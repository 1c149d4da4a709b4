mod health;
mod link;

pub use health::{ErrorResponse, HealthResponse};
pub use link::{CreateLinkRequest, LinkResponse, SearchParams, SearchResponse};
