use std::collections::HashSet;

use pixeldex_interface::model::{Chapter, ChapterPages, Manga};
use pixeldex_interface::utils::resolve_localized;

use crate::config::ClientConfig;
use crate::error::CatalogError;
use crate::types::{
    AtHomeServer, AuthorAttributes, ChapterRecord, CoverAttributes, MangaRecord, Relationship,
};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const UNKNOWN_TAG: &str = "Unknown tag";
pub const UNKNOWN_STATUS: &str = "unknown";
pub const MISSING_CHAPTER_NUMBER: &str = "N/A";
pub const MAX_TAGS: usize = 5;
pub const COVER_SIZE_SUFFIX: &str = ".256.jpg";

/// Settings normalization depends on, borrowed from the client config.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    pub preferred_language: &'a str,
    pub cover_host: &'a str,
    pub placeholder_cover: &'a str,
}

impl<'a> From<&'a ClientConfig> for Normalizer<'a> {
    fn from(cfg: &'a ClientConfig) -> Self {
        Self {
            preferred_language: &cfg.preferred_language,
            cover_host: cfg.cover_host.trim_end_matches('/'),
            placeholder_cover: &cfg.placeholder_cover,
        }
    }
}

fn find_cover(relationships: &[Relationship]) -> Option<&CoverAttributes> {
    relationships.iter().find_map(|rel| match rel {
        Relationship::CoverArt { attributes } => Some(attributes.as_ref()),
        _ => None,
    })
    .flatten()
}

fn find_author(relationships: &[Relationship]) -> Option<&AuthorAttributes> {
    relationships.iter().find_map(|rel| match rel {
        Relationship::Author { attributes } => Some(attributes.as_ref()),
        _ => None,
    })
    .flatten()
}

pub fn cover_url(cover_host: &str, manga_id: &str, file_name: &str) -> String {
    format!("{}/covers/{}/{}{}", cover_host, manga_id, file_name, COVER_SIZE_SUFFIX)
}

pub(crate) fn manga_from_record(record: MangaRecord, norm: Normalizer<'_>) -> Manga {
    let attrs = record.attributes;
    let lang = norm.preferred_language;

    let cover_url = find_cover(&record.relationships)
        .and_then(|cover| cover.file_name.as_deref())
        .filter(|name| !name.is_empty())
        .map(|name| cover_url(norm.cover_host, &record.id, name))
        .unwrap_or_else(|| norm.placeholder_cover.to_string());

    let author = find_author(&record.relationships)
        .and_then(|author| author.name.clone())
        .filter(|name| !name.is_empty());

    let tags = attrs
        .tags
        .iter()
        .take(MAX_TAGS)
        .map(|tag| {
            let name = tag.attributes.as_ref().and_then(|a| a.name.as_ref());
            resolve_localized(name, lang, UNKNOWN_TAG)
        })
        .collect();

    Manga {
        title: resolve_localized(attrs.title.as_ref(), lang, UNKNOWN_TITLE),
        description: resolve_localized(attrs.description.as_ref(), lang, NO_DESCRIPTION),
        cover_url,
        status: attrs
            .status
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN_STATUS.to_string()),
        tags,
        author,
        year: attrs.year,
        id: record.id,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

pub(crate) fn chapter_from_record(record: ChapterRecord) -> Chapter {
    let attrs = record.attributes;
    let chapter = non_empty(attrs.chapter).unwrap_or_else(|| MISSING_CHAPTER_NUMBER.to_string());
    let title = non_empty(attrs.title).unwrap_or_else(|| format!("Chapter {}", chapter));

    Chapter {
        id: record.id,
        title,
        chapter,
        volume: non_empty(attrs.volume),
        pages: attrs.pages.unwrap_or(0),
        translated_language: attrs.translated_language.unwrap_or_default(),
        publish_at: attrs.publish_at.unwrap_or_default(),
        external_url: non_empty(attrs.external_url),
    }
}

/// Drops unreadable chapters, then keeps the first chapter seen for each `volume-chapter` key.
pub fn readable_unique(chapters: Vec<Chapter>) -> Vec<Chapter> {
    let mut seen = HashSet::new();
    chapters
        .into_iter()
        .filter(Chapter::is_readable)
        .filter(|ch| seen.insert(ch.dedup_key()))
        .collect()
}

/// Full-quality filenames, else data-saver ones. Both empty is `NoPagesAvailable`.
pub(crate) fn pages_from_at_home(server: AtHomeServer) -> Result<ChapterPages, CatalogError> {
    let chapter = server.chapter;
    let pages = match chapter.data {
        Some(data) if !data.is_empty() => data,
        _ => chapter.data_saver.unwrap_or_default(),
    };
    if pages.is_empty() {
        return Err(CatalogError::NoPagesAvailable);
    }
    Ok(ChapterPages {
        base_url: server.base_url,
        hash: chapter.hash,
        pages,
    })
}
