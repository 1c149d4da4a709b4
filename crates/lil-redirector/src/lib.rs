//! Redirector service library.
//!
//! This crate provides a [`RedirectorService`] that resolves an incoming
//! path to a [`Resolution`]: either a hit carrying the stored record and the
//! response mode (direct redirect or interstitial page), or a miss.
//!
//! # Example
//!
//! ```rust
//! use lil_core::CodeFormat;
//! use lil_redirector::{Redirector, RedirectorService, Resolution};
//! use lil_storage::InMemoryLinkStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = RedirectorService::new(InMemoryLinkStore::new(), CodeFormat::default());
//!
//! match service.lookup("/p/abc12345").await? {
//!     Resolution::Hit { record, mode } => println!("{mode:?} -> {}", record.target_url),
//!     Resolution::Miss => println!("not found"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod redirector;
pub mod service;

pub use error::{RedirectorError, Result};
pub use redirector::{Redirector, Resolution, ResolveMode};
pub use service::RedirectorService;
