pub mod client;
pub mod config;
pub mod error;
pub mod mapping;
pub mod proxy;
pub mod transport;
mod types;

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::client::{CatalogClient, ChapterFeed, MangaPage, MangaQuery, SortDirection};
    pub use crate::config::{ClientConfig, Config, ProxyConfig};
    pub use crate::error::CatalogError;
    pub use crate::transport::{HttpTransport, Transport, UpstreamResponse};
    pub use pixeldex_interface::model::{Chapter, ChapterPages, ChapterTarget, Manga};
}
