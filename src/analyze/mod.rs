//! Page analysis pipeline
//!
//! The only part of the system with real logic: turning a raw user-supplied
//! string into a canonical host, fetching that host once, and pulling SEO
//! signals out of whatever HTML comes back.
//!
//! Key components:
//! - `normalize`: validation + canonicalization to `scheme://host`
//! - `PageFetcher`: single bounded HTTP GET with redirect following
//! - `extract`: tolerant HTML to heading/title/description fields

pub mod extractor;
pub mod fetcher;
pub mod normalizer;

pub use extractor::extract;
pub use fetcher::{FetchError, FetchedPage, PageFetcher};
pub use normalizer::{normalize, NormalizeError};
