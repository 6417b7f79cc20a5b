//! Build stage: fetch cache -> ranked, normalized, classified quiz table.

use anyhow::Result;
use std::cmp::Reverse;
use tracing::info;

use crate::attributes::assign;
use crate::config::Settings;
use crate::error::QuizError;
use crate::mapping::MappingTables;
use crate::metadata::{OutputRecord, QuizTable, VideoRecord, load_fetch_cache, project_cache};
use crate::normalize::{DescriptionCleaner, normalize_title};

/// Number of most-viewed videos that make it into the quiz.
pub const TOP_VIDEO_LIMIT: usize = 200;

/// Sorts by view count, highest first, and keeps at most `limit` records.
/// Equal counts keep their incoming order.
pub fn rank_top(mut records: Vec<VideoRecord>, limit: usize) -> Vec<VideoRecord> {
    records.sort_by_key(|record| Reverse(record.view_count));
    records.truncate(limit);
    records
}

/// Normalizes and classifies already-ranked records. The first title missing
/// from any table aborts the whole build.
pub fn build_table(
    ranked: &[VideoRecord],
    tables: &MappingTables,
    cleaner: &DescriptionCleaner,
) -> Result<QuizTable, QuizError> {
    let mut table = QuizTable::default();
    for record in ranked {
        let title = normalize_title(&record.title);
        let description = cleaner.clean(&record.description);
        let quiz = assign(tables, &title, &description, record.view_count)?;
        table.push(record.videoid.clone(), OutputRecord { title, quiz });
    }
    Ok(table)
}

/// Runs the build stage end to end and writes the quiz table.
///
/// Mapping tables are loaded and validated before the cache is touched, so a
/// bad table never leaves a new output file behind.
pub fn run_build(settings: &Settings) -> Result<QuizTable> {
    let tables = MappingTables::load(|kind| settings.mapping_path(kind))?;
    let cleaner = DescriptionCleaner::new()?;

    let cache_path = settings.cache_path();
    let cache = load_fetch_cache(&cache_path)?;
    let records = project_cache(&cache)?;
    let total = records.len();
    let ranked = rank_top(records, TOP_VIDEO_LIMIT);
    info!(cached = total, ranked = ranked.len(), "ranked videos by view count");

    let table = build_table(&ranked, &tables, &cleaner)?;
    let table_path = settings.table_path();
    table.save(&table_path)?;
    info!(path = %table_path.display(), records = table.len(), "wrote quiz table");
    Ok(table)
}
