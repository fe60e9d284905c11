//! Wire shapes of the upstream catalog API.
//!
//! Only the fields the reader uses are modeled, and nearly all of them are optional:
//! normalization in [`crate::mapping`] supplies the fallbacks.

use pixeldex_interface::utils::LocalizedText;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct MangaListEnvelope {
    #[serde(default)]
    pub data: Vec<MangaRecord>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MangaEnvelope {
    pub data: MangaRecord,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MangaRecord {
    pub id: String,
    #[serde(default)]
    pub attributes: MangaAttributes,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct MangaAttributes {
    pub title: Option<LocalizedText>,
    pub description: Option<LocalizedText>,
    pub status: Option<String>,
    pub year: Option<i32>,
    pub tags: Vec<TagRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagRecord {
    #[serde(default)]
    pub attributes: Option<TagAttributes>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagAttributes {
    #[serde(default)]
    pub name: Option<LocalizedText>,
}

/// A related entity, discriminated by its `type` field.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum Relationship {
    CoverArt {
        #[serde(default)]
        attributes: Option<CoverAttributes>,
    },
    Author {
        #[serde(default)]
        attributes: Option<AuthorAttributes>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CoverAttributes {
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthorAttributes {
    #[serde(default)]
    pub name: Option<String>,
}

/// One page of `/manga/{id}/feed`. `data` stays optional: its absence ends pagination.
#[derive(Debug, Deserialize)]
pub(crate) struct FeedPage {
    #[serde(default)]
    pub data: Option<Vec<ChapterRecord>>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChapterRecord {
    pub id: String,
    #[serde(default)]
    pub attributes: ChapterAttributes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ChapterAttributes {
    pub title: Option<String>,
    pub chapter: Option<String>,
    pub volume: Option<String>,
    pub pages: Option<u32>,
    pub translated_language: Option<String>,
    pub publish_at: Option<String>,
    pub external_url: Option<String>,
}

/// `/at-home/server/{chapterId}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AtHomeServer {
    pub base_url: String,
    pub chapter: AtHomeChapter,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AtHomeChapter {
    pub hash: String,
    #[serde(default)]
    pub data: Option<Vec<String>>,
    #[serde(default)]
    pub data_saver: Option<Vec<String>>,
}
