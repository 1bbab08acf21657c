//! PageCheck: self-hosted SEO page analyzer
//!
//! Stores user-submitted URLs and runs on-demand checks against them:
//! - URL validation and canonicalization (scheme + host only)
//! - Single best-effort HTTP fetch with redirect following and a timeout
//! - SEO signal extraction from HTML (first H1, title, meta description)
//! - Append-only per-URL check history in an embedded sled store
//!
//! Exposed as a small server-rendered web UI (axum) and a CLI.

pub mod analyze;
pub mod config;
pub mod http;
pub mod service;
pub mod store;
pub mod types;

pub use config::Config;
pub use service::Analyzer;
pub use store::UrlStore;
pub use types::*;
