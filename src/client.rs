use std::fmt;
use std::str::FromStr;

use pixeldex_interface::model::{Chapter, ChapterPages, ChapterTarget, Manga};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::CatalogError;
use crate::mapping::{chapter_from_record, manga_from_record, pages_from_at_home, readable_unique, Normalizer};
use crate::transport::{HttpTransport, Query, Transport};
use crate::types::{AtHomeServer, FeedPage, MangaEnvelope, MangaListEnvelope};

pub const FEED_PAGE_SIZE: u64 = 100;
pub const CONTENT_RATINGS: [&str; 4] = ["safe", "suggestive", "erotica", "pornographic"];
const RELATIONSHIP_INCLUDES: [&str; 2] = ["cover_art", "author"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction `{}` (expected asc or desc)", other)),
        }
    }
}

/// Filters for the manga listing. Zero `limit`/`offset` are left to upstream defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MangaQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub title: Option<String>,
    pub included_tags: Vec<String>,
    /// Sort fields in priority order, e.g. `("followedCount", Desc)`.
    pub order: Vec<(String, SortDirection)>,
}

impl MangaQuery {
    pub fn to_query(&self) -> Query {
        let mut q: Query = Vec::new();
        if let Some(limit) = self.limit.filter(|n| *n > 0) {
            q.push(("limit".into(), limit.to_string()));
        }
        if let Some(offset) = self.offset.filter(|n| *n > 0) {
            q.push(("offset".into(), offset.to_string()));
        }
        if let Some(title) = self.title.as_ref().filter(|t| !t.is_empty()) {
            q.push(("title".into(), title.clone()));
        }
        for tag in &self.included_tags {
            q.push(("includedTags[]".into(), tag.clone()));
        }
        for (field, dir) in &self.order {
            q.push((format!("order[{}]", field), dir.as_str().to_string()));
        }
        push_includes(&mut q);
        q
    }
}

fn push_includes(q: &mut Query) {
    for rel in RELATIONSHIP_INCLUDES {
        q.push(("includes[]".into(), rel.to_string()));
    }
}

fn feed_query(offset: u64, language: Option<&str>) -> Query {
    let mut q: Query = vec![
        ("limit".into(), FEED_PAGE_SIZE.to_string()),
        ("offset".into(), offset.to_string()),
    ];
    if let Some(lang) = language.filter(|l| !l.is_empty()) {
        q.push(("translatedLanguage[]".into(), lang.to_string()));
    }
    q.push(("order[chapter]".into(), "asc".into()));
    for rating in CONTENT_RATINGS {
        q.push(("contentRating[]".into(), rating.to_string()));
    }
    q.push(("includeFutureUpdates".into(), "1".into()));
    q.push(("includeUnavailable".into(), "1".into()));
    q
}

#[derive(Debug, Clone, PartialEq)]
pub struct MangaPage {
    pub data: Vec<Manga>,
    /// Upstream total, or `data.len()` when the upstream did not report one.
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChapterFeed {
    /// Readable chapters in feed order, one per `volume-chapter` key.
    pub chapters: Vec<Chapter>,
    /// `chapters.len()`.
    pub total: usize,
    /// What the upstream reported before filtering; pagination runs against this.
    pub upstream_total: u64,
}

/// Typed access to the manga catalog, normally through the reverse proxy.
pub struct CatalogClient<T = HttpTransport> {
    transport: T,
    config: ClientConfig,
}

impl CatalogClient<HttpTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, CatalogError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self { transport, config })
    }
}

impl<T: Transport> CatalogClient<T> {
    pub fn with_transport(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn normalizer(&self) -> Normalizer<'_> {
        Normalizer::from(&self.config)
    }

    pub async fn fetch_manga_list(&self, query: &MangaQuery) -> Result<MangaPage, CatalogError> {
        let result: Result<MangaPage, CatalogError> = async {
            let body = self.transport.get("/manga", &query.to_query()).await?.into_success()?;
            let envelope: MangaListEnvelope = serde_json::from_value(body)?;
            let norm = self.normalizer();
            let data: Vec<Manga> = envelope
                .data
                .into_iter()
                .map(|record| manga_from_record(record, norm))
                .collect();
            let total = envelope
                .total
                .filter(|t| *t > 0)
                .unwrap_or(data.len() as u64);
            Ok(MangaPage { data, total })
        }
        .await;
        result.inspect_err(|e| tracing::error!("Error fetching manga list: {}", e))
    }

    /// Most-followed first.
    pub async fn fetch_trending_manga(&self, limit: Option<u32>) -> Result<Vec<Manga>, CatalogError> {
        let query = MangaQuery {
            limit: Some(limit.unwrap_or(self.config.trending_limit)),
            order: vec![("followedCount".to_string(), SortDirection::Desc)],
            ..MangaQuery::default()
        };
        Ok(self.fetch_manga_list(&query).await?.data)
    }

    pub async fn fetch_manga_details(&self, manga_id: &str) -> Result<Manga, CatalogError> {
        let result: Result<Manga, CatalogError> = async {
            let mut q: Query = Vec::new();
            push_includes(&mut q);
            let path = format!("/manga/{}", manga_id);
            let body = self.transport.get(&path, &q).await?.into_success()?;
            let envelope: MangaEnvelope = serde_json::from_value(body)?;
            Ok(manga_from_record(envelope.data, self.normalizer()))
        }
        .await;
        result.inspect_err(|e| tracing::error!("Error fetching manga details for {}: {}", manga_id, e))
    }

    /// Walks the whole feed in order, `FEED_PAGE_SIZE` chapters per request, then keeps
    /// readable chapters and drops repeated `volume-chapter` pairs (earliest wins).
    pub async fn fetch_manga_chapters(
        &self,
        manga_id: &str,
        language: Option<&str>,
    ) -> Result<ChapterFeed, CatalogError> {
        let path = format!("/manga/{}/feed", manga_id);
        let mut offset = 0u64;
        let mut collected: Vec<Chapter> = Vec::new();
        let mut upstream_total = 0u64;

        loop {
            let response = self.transport.get(&path, &feed_query(offset, language)).await?;
            if !response.body.get("data").is_some_and(Value::is_array) {
                tracing::debug!(manga_id, offset, "feed page without data, stopping");
                break;
            }
            let page: FeedPage = serde_json::from_value(response.body)?;
            let records = page.data.unwrap_or_default();
            if records.is_empty() {
                break;
            }
            collected.extend(records.into_iter().map(chapter_from_record));
            upstream_total = page
                .total
                .filter(|t| *t > 0)
                .unwrap_or(collected.len() as u64);
            tracing::debug!(manga_id, offset, fetched = collected.len(), upstream_total, "feed page");

            offset += FEED_PAGE_SIZE;
            if collected.len() as u64 >= upstream_total {
                break;
            }
        }

        let chapters = readable_unique(collected);
        Ok(ChapterFeed {
            total: chapters.len(),
            chapters,
            upstream_total,
        })
    }

    pub async fn fetch_chapter_pages(&self, chapter_id: &str) -> Result<ChapterPages, CatalogError> {
        let result: Result<ChapterPages, CatalogError> = async {
            let path = format!("/at-home/server/{}", chapter_id);
            let body = self.transport.get(&path, &[]).await?.into_success()?;
            let server: AtHomeServer = serde_json::from_value(body)?;
            pages_from_at_home(server)
        }
        .await;
        result.inspect_err(|e| tracing::error!("Error fetching chapter pages for {}: {}", chapter_id, e))
    }

    /// External-only chapters redirect without touching the page-delivery endpoint.
    pub async fn open_chapter(&self, chapter: &Chapter) -> Result<ChapterTarget, CatalogError> {
        match chapter.external_url.as_ref() {
            Some(url) if chapter.should_redirect_to_external() => Ok(ChapterTarget::External(url.clone())),
            _ => Ok(ChapterTarget::Hosted(self.fetch_chapter_pages(&chapter.id).await?)),
        }
    }
}
