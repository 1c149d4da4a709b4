//! Core types and traits for the lil URL shortener.
//!
//! This crate provides the short code format, the link record model and the
//! storage abstraction shared by the shortener, the redirector and every
//! storage backend.

pub mod error;
pub mod link;
pub mod search;
pub mod shortcode;
pub mod store;

pub use error::{CoreError, StoreError};
pub use link::{LinkRecord, NewLink, MAX_TTL};
pub use search::{SearchPage, SearchQuery};
pub use shortcode::{CodeFormat, ShortCode, ALPHABET, INTERSTITIAL_SEGMENT, RESERVED_SEGMENTS};
pub use store::{LinkStore, ReadLinkStore};
