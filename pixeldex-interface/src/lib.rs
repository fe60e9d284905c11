//! View models shared between the pixeldex catalog client and whatever renders it.
//!
//! Everything here is plain data plus pure functions; no I/O happens in this crate.

// Flat shapes handed to the UI
pub mod model {
    use serde::{Deserialize, Serialize};

    use crate::utils::build_page_url;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Manga {
        pub id: String,
        pub title: String,
        pub description: String,
        pub cover_url: String,
        pub status: String,
        pub tags: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub author: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub year: Option<i32>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Chapter {
        pub id: String,
        pub title: String,
        /// Chapter number as published; not necessarily numeric.
        pub chapter: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub volume: Option<String>,
        /// Hosted page count; 0 means nothing is hosted upstream.
        pub pages: u32,
        pub translated_language: String,
        pub publish_at: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub external_url: Option<String>,
    }

    impl Chapter {
        /// A chapter can be opened if it has hosted pages or points somewhere else.
        pub fn is_readable(&self) -> bool {
            self.pages > 0 || self.external_url.is_some()
        }

        /// Only external with nothing hosted sends the reader off-site.
        pub fn should_redirect_to_external(&self) -> bool {
            self.external_url.is_some() && self.pages == 0
        }

        /// `volume-chapter`, with an empty volume when none is set.
        pub fn dedup_key(&self) -> String {
            format!("{}-{}", self.volume.as_deref().unwrap_or(""), self.chapter)
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ChapterPages {
        pub base_url: String,
        pub hash: String,
        pub pages: Vec<String>,
    }

    impl ChapterPages {
        pub fn page_urls(&self) -> Vec<String> {
            self.pages
                .iter()
                .map(|page| build_page_url(&self.base_url, &self.hash, page))
                .collect()
        }
    }

    /// Where a reader should go when a chapter is opened.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "kind", content = "target", rename_all = "camelCase")]
    pub enum ChapterTarget {
        External(String),
        Hosted(ChapterPages),
    }
}

// Common utilities and helper functions
pub mod utils {
    use std::fmt;

    use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};

    /// Language-keyed text (`{"en": "...", "ja-ro": "..."}`) kept in document order.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct LocalizedText(Vec<(String, String)>);

    impl LocalizedText {
        pub fn get(&self, lang: &str) -> Option<&str> {
            self.0
                .iter()
                .find(|(key, _)| key == lang)
                .map(|(_, text)| text.as_str())
        }

        /// Value under the first key, whatever language it is.
        pub fn first(&self) -> Option<&str> {
            self.0.first().map(|(_, text)| text.as_str())
        }

        pub fn is_empty(&self) -> bool {
            self.0.is_empty()
        }
    }

    impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocalizedText {
        fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
            Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
        }
    }

    impl<'de> Deserialize<'de> for LocalizedText {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct LocalizedVisitor;

            impl<'de> Visitor<'de> for LocalizedVisitor {
                type Value = LocalizedText;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str("a language-keyed map of strings")
                }

                fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                    let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                    while let Some((lang, text)) = map.next_entry::<String, Option<String>>()? {
                        entries.push((lang, text.unwrap_or_default()));
                    }
                    Ok(LocalizedText(entries))
                }

                // empty maps come over the wire as []
                fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                    while seq.next_element::<IgnoredAny>()?.is_some() {}
                    Ok(LocalizedText::default())
                }

                fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                    Ok(LocalizedText::default())
                }
            }

            deserializer.deserialize_any(LocalizedVisitor)
        }
    }

    /// Preferred language, else the first key, else `fallback`. Empty strings count as missing.
    pub fn resolve_localized(map: Option<&LocalizedText>, preferred: &str, fallback: &str) -> String {
        map.and_then(|m| {
            m.get(preferred)
                .filter(|text| !text.is_empty())
                .or_else(|| m.first().filter(|text| !text.is_empty()))
        })
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
    }

    pub fn build_page_url(base_url: &str, hash: &str, page: &str) -> String {
        format!("{}/data/{}/{}", base_url, hash, page)
    }
}
