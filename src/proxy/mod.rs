//! CORS-friendly reverse proxy: everything under `/api` is replayed against the upstream origin.

mod routes;
mod server;

pub use routes::{create_router, ProxyError, ProxyState};
pub use server::{serve, serve_with_listener};
