//! Web UI
//!
//! Axum-based server-rendered frontend: a submission form, the URL list, and
//! per-URL detail pages with check history. Workflow outcomes surface as
//! redirects carrying a one-shot flash cookie.

mod flash;
mod handlers;
mod render;
mod routes;
mod server;

pub use flash::{Flash, FlashLevel};
pub use handlers::AppState;
pub use routes::create_router;
pub use server::HttpServer;
