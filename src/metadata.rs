//! Records that flow through the quiz pipeline.
//!
//! The fetch cache keeps full upstream payloads; everything downstream works
//! on the small projection in [`VideoRecord`]. The quiz table is what the quiz
//! app consumes, so its field names mirror that app's JSON.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::QuizError;
use crate::labels::{Atmosphere, Category, Language, Polygon, RegionalLanguage, Sorcerer};
use crate::persist::{read_json, write_json_atomic};

/// Video id -> raw `videos.list` item, in fetch order.
pub type FetchCache = Map<String, Value>;

pub fn load_fetch_cache(path: &Path) -> Result<FetchCache> {
    read_json(path)
}

pub fn save_fetch_cache(path: &Path, cache: &FetchCache) -> Result<()> {
    write_json_atomic(path, cache)
}

/// The subset of a cached payload the ranker needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    pub videoid: String,
    pub title: String,
    pub description: String,
    pub view_count: u64,
}

#[derive(Deserialize)]
struct CachedItem {
    snippet: CachedSnippet,
    statistics: CachedStatistics,
}

#[derive(Deserialize)]
struct CachedSnippet {
    title: String,
    #[serde(default)]
    description: String,
}

/// The API reports counters as decimal strings.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedStatistics {
    view_count: String,
}

impl VideoRecord {
    pub fn from_payload(videoid: &str, payload: &Value) -> Result<Self, QuizError> {
        let malformed = |reason: String| QuizError::MalformedPayload {
            video_id: videoid.to_string(),
            reason,
        };
        let item = CachedItem::deserialize(payload).map_err(|err| malformed(err.to_string()))?;
        let view_count = item
            .statistics
            .view_count
            .trim()
            .parse::<u64>()
            .map_err(|err| malformed(format!("viewCount {:?}: {err}", item.statistics.view_count)))?;
        Ok(Self {
            videoid: videoid.to_string(),
            title: item.snippet.title,
            description: item.snippet.description,
            view_count,
        })
    }
}

/// Projects every cache entry, keeping cache order.
pub fn project_cache(cache: &FetchCache) -> Result<Vec<VideoRecord>, QuizError> {
    cache
        .iter()
        .map(|(videoid, payload)| VideoRecord::from_payload(videoid, payload))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAttributes {
    pub language: Language,
    pub category: Category,
    pub atmosphere: Atmosphere,
    pub language_chinese: RegionalLanguage,
    pub polygon: Polygon,
    pub sorcerer: Sorcerer,
    #[serde(rename = "viewCount")]
    pub view_count: u64,
}

/// The part of the attributes that must be near-unique across the dataset.
pub type AttributeKey = (
    Language,
    Category,
    Atmosphere,
    RegionalLanguage,
    Polygon,
    Sorcerer,
);

impl QuizAttributes {
    pub fn key(&self) -> AttributeKey {
        (
            self.language,
            self.category,
            self.atmosphere,
            self.language_chinese,
            self.polygon,
            self.sorcerer,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub title: String,
    pub quiz: QuizAttributes,
}

/// Video id -> output record, in ranking order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizTable {
    entries: Vec<(String, OutputRecord)>,
}

impl QuizTable {
    pub fn push(&mut self, videoid: String, record: OutputRecord) {
        self.entries.push((videoid, record));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OutputRecord)> {
        self.entries
            .iter()
            .map(|(videoid, record)| (videoid.as_str(), record))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw: Map<String, Value> = read_json(path)?;
        let mut table = Self::default();
        for (videoid, value) in raw {
            let record = serde_json::from_value(value).map_err(|err| {
                anyhow::anyhow!("record {videoid} in {}: {err}", path.display())
            })?;
            table.push(videoid, record);
        }
        Ok(table)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut raw = Map::new();
        for (videoid, record) in &self.entries {
            raw.insert(videoid.clone(), serde_json::to_value(record)?);
        }
        write_json_atomic(path, &raw)
    }
}
