//! Link management service.
//!
//! This crate provides the [`Shortener`] facade used by the HTTP gateway to
//! create, look up, search and delete links, and the [`ShortenerService`]
//! implementation that drives a code generator and a link store.

pub mod error;
pub mod service;
pub mod shortener;

pub use error::{Result, ShortenerError};
pub use service::{ShortenerService, ShortenerSettings};
pub use shortener::{CreateLink, Shortener};
