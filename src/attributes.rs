//! Quiz attribute assignment: four table lookups plus two hash-derived
//! buckets.

use md5::{Digest, Md5};

use crate::error::QuizError;
use crate::labels::{Polygon, Sorcerer};
use crate::mapping::MappingTables;
use crate::metadata::QuizAttributes;

/// Reduces the MD5 digest of `text`, read as a big-endian integer, modulo
/// `modulus`. Existing mapping tables were curated against these buckets.
pub fn content_bucket(text: &str, modulus: usize) -> usize {
    assert!(modulus > 0, "bucket modulus must be positive");
    let digest = Md5::digest(text.as_bytes());
    let modulus = modulus as u64;
    digest
        .iter()
        .fold(0u64, |acc, byte| (acc * 256 + u64::from(*byte)) % modulus) as usize
}

pub fn polygon_for(description: &str) -> Polygon {
    Polygon::ALL[content_bucket(description, Polygon::ALL.len())]
}

pub fn sorcerer_for(title: &str) -> Sorcerer {
    Sorcerer::ALL[content_bucket(title, Sorcerer::ALL.len())]
}

/// Builds the attribute set for one normalized video.
///
/// `title` is both the lookup key and the sorcerer input; `description` is the
/// cleaned description that feeds the polygon bucket.
pub fn assign(
    tables: &MappingTables,
    title: &str,
    description: &str,
    view_count: u64,
) -> Result<QuizAttributes, QuizError> {
    Ok(QuizAttributes {
        language: tables.language.lookup(title)?,
        category: tables.category.lookup(title)?,
        atmosphere: tables.atmosphere.lookup(title)?,
        language_chinese: tables.regional_language.lookup(title)?,
        polygon: polygon_for(description),
        sorcerer: sorcerer_for(title),
        view_count,
    })
}
