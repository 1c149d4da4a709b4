//! HTTP gateway for the lil URL shortener.
//!
//! Serves redirects, interstitial pages and the management API on top of the
//! shortener and redirector services.

pub mod app;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod model;
pub mod page;
pub mod settings;
pub mod state;

pub use app::App;
pub use page::InterstitialPage;
pub use settings::{Settings, StorageBackend};
pub use state::AppState;
