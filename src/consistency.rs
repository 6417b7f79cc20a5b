//! Collision check over the written quiz table.
//!
//! Records sharing all six attributes are indistinguishable to the quiz. A
//! few such pairs are tolerated and reported; larger groups abort.

use anyhow::Result;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

use crate::error::QuizError;
use crate::metadata::{AttributeKey, QuizTable};

/// Largest number of records allowed to share one attribute tuple.
pub const MAX_COLLISION_GROUP: usize = 3;

/// Records that share one attribute tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionGroup {
    pub key: AttributeKey,
    pub titles: Vec<String>,
}

impl CollisionGroup {
    pub fn size(&self) -> usize {
        self.titles.len()
    }
}

/// Formats an attribute tuple as `language | category | ... | sorcerer`.
pub struct KeyLabel<'a>(pub &'a AttributeKey);

impl fmt::Display for KeyLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (language, category, atmosphere, regional, polygon, sorcerer) = self.0;
        write!(
            f,
            "{language} | {category} | {atmosphere} | {regional} | {polygon} | {sorcerer}"
        )
    }
}

/// Groups the table by attribute tuple and returns every group with more than
/// one member, largest first. Fails if any group exceeds `limit`.
pub fn check_table(table: &QuizTable, limit: usize) -> Result<Vec<CollisionGroup>, QuizError> {
    let mut groups: BTreeMap<AttributeKey, Vec<String>> = BTreeMap::new();
    for (_, record) in table.iter() {
        groups
            .entry(record.quiz.key())
            .or_default()
            .push(record.title.clone());
    }

    let mut collisions: Vec<CollisionGroup> = groups
        .into_iter()
        .filter(|(_, titles)| titles.len() > 1)
        .map(|(key, titles)| CollisionGroup { key, titles })
        .collect();
    collisions.sort_by(|a, b| b.size().cmp(&a.size()).then_with(|| a.key.cmp(&b.key)));

    if let Some(worst) = collisions.first()
        && worst.size() > limit
    {
        return Err(QuizError::CollisionLimit {
            key: KeyLabel(&worst.key).to_string(),
            size: worst.size(),
            limit,
        });
    }
    Ok(collisions)
}

/// Reloads the written table from disk and checks it, logging every tolerated
/// collision.
pub fn run_check(table_path: &Path) -> Result<Vec<CollisionGroup>> {
    let table = QuizTable::load(table_path)?;
    let collisions = check_table(&table, MAX_COLLISION_GROUP)?;
    for group in &collisions {
        warn!(
            size = group.size(),
            titles = ?group.titles,
            "[{}] shared by {} records",
            KeyLabel(&group.key),
            group.size()
        );
    }
    info!(
        records = table.len(),
        collisions = collisions.len(),
        "consistency check passed"
    );
    Ok(collisions)
}
