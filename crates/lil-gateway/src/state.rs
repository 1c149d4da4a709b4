use std::sync::Arc;

use crate::page::InterstitialPage;
use lil_redirector::Redirector;
use lil_shortener::Shortener;

#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<dyn Shortener>,
    pub redirector: Arc<dyn Redirector>,
    pub page: Arc<InterstitialPage>,
    pub base_url: String,
    /// Page size used when a search request gives no `limit`.
    pub default_search_limit: usize,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        redirector: Arc<dyn Redirector>,
        page: InterstitialPage,
        public_base_url: impl Into<String>,
        default_search_limit: usize,
    ) -> Self {
        Self {
            shortener,
            redirector,
            page: Arc::new(page),
            base_url: public_base_url.into(),
            default_search_limit,
        }
    }
}
