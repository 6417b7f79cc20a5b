//! Hand-curated `title -> label` tables that classify each video.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::QuizError;
use crate::labels::{Atmosphere, Category, Language, RegionalLanguage};

const SEPARATOR: &str = "->";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Language,
    Category,
    Atmosphere,
    RegionalLanguage,
}

impl TableKind {
    pub fn name(self) -> &'static str {
        match self {
            TableKind::Language => "language",
            TableKind::Category => "category",
            TableKind::Atmosphere => "atmosphere",
            TableKind::RegionalLanguage => "language-chinese",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            TableKind::Language => "language.txt",
            TableKind::Category => "category.txt",
            TableKind::Atmosphere => "atmosphere.txt",
            TableKind::RegionalLanguage => "language-chinese.txt",
        }
    }
}

/// One parsed table. Values are validated against `T`'s closed label set
/// while parsing, so a loaded table never holds an unexpected label.
#[derive(Debug, Clone)]
pub struct MappingTable<T> {
    kind: TableKind,
    entries: HashMap<String, T>,
}

impl<T: Copy + FromStr> MappingTable<T> {
    pub fn load(kind: TableKind, path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading {} mapping {}", kind.name(), path.display()))?;
        Ok(Self::parse(kind, &raw)?)
    }

    pub fn parse(kind: TableKind, raw: &str) -> Result<Self, QuizError> {
        let mut entries = HashMap::new();
        for (index, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let line_no = index + 1;
            let Some((key, value)) = line.split_once(SEPARATOR) else {
                return Err(QuizError::MalformedMappingLine {
                    table: kind.name(),
                    line_no,
                    line: line.to_string(),
                });
            };
            let value = value.trim();
            let label = value
                .parse::<T>()
                .map_err(|_| QuizError::UnexpectedLabel {
                    table: kind.name(),
                    line_no,
                    value: value.to_string(),
                })?;
            entries.insert(key.trim().to_string(), label);
        }
        Ok(Self { kind, entries })
    }

    /// A missing title means the tables are out of sync with the channel.
    pub fn lookup(&self, title: &str) -> Result<T, QuizError> {
        self.entries
            .get(title)
            .copied()
            .ok_or_else(|| QuizError::MissingMapping {
                table: self.kind.name(),
                title: title.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The four lookup tables, loaded together before any output is produced.
#[derive(Debug, Clone)]
pub struct MappingTables {
    pub language: MappingTable<Language>,
    pub category: MappingTable<Category>,
    pub atmosphere: MappingTable<Atmosphere>,
    pub regional_language: MappingTable<RegionalLanguage>,
}

impl MappingTables {
    pub fn load(path_for: impl Fn(TableKind) -> std::path::PathBuf) -> Result<Self> {
        let tables = Self {
            language: MappingTable::load(
                TableKind::Language,
                &path_for(TableKind::Language),
            )?,
            category: MappingTable::load(
                TableKind::Category,
                &path_for(TableKind::Category),
            )?,
            atmosphere: MappingTable::load(
                TableKind::Atmosphere,
                &path_for(TableKind::Atmosphere),
            )?,
            regional_language: MappingTable::load(
                TableKind::RegionalLanguage,
                &path_for(TableKind::RegionalLanguage),
            )?,
        };
        tracing::debug!(
            language = tables.language.len(),
            category = tables.category.len(),
            atmosphere = tables.atmosphere.len(),
            regional_language = tables.regional_language.len(),
            "loaded mapping tables"
        );
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_trims_both_sides() {
        let table =
            MappingTable::<Language>::parse(TableKind::Language, "  Ave Maria   ->  歐洲 \n")
                .unwrap();
        assert_eq!(table.lookup("Ave Maria").unwrap(), Language::European);
    }

    #[test]
    fn parse_skips_blank_lines_and_keeps_last_duplicate() {
        let raw = "Song -> 中文\n\n   \nSong -> 英文\n";
        let table = MappingTable::<Language>::parse(TableKind::Language, raw).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("Song").unwrap(), Language::English);
    }

    #[test]
    fn parse_rejects_value_outside_enumeration() {
        let raw = "Song -> 流行編曲\nOther -> 搖滾\n";
        let err = MappingTable::<Category>::parse(TableKind::Category, raw).unwrap_err();
        match err {
            QuizError::UnexpectedLabel {
                table,
                line_no,
                value,
            } => {
                assert_eq!(table, "category");
                assert_eq!(line_no, 2);
                assert_eq!(value, "搖滾");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_rejects_line_without_separator() {
        let err = MappingTable::<Atmosphere>::parse(TableKind::Atmosphere, "Song 創意或新體驗\n")
            .unwrap_err();
        assert!(matches!(
            err,
            QuizError::MalformedMappingLine { line_no: 1, .. }
        ));
    }

    #[test]
    fn parse_splits_on_first_separator_only() {
        let err = MappingTable::<Language>::parse(TableKind::Language, "A -> B -> 中文\n")
            .unwrap_err();
        assert!(matches!(err, QuizError::UnexpectedLabel { .. }));
    }

    #[test]
    fn lookup_missing_title_names_table() {
        let table =
            MappingTable::<RegionalLanguage>::parse(TableKind::RegionalLanguage, "A -> 無\n")
                .unwrap();
        let err = table.lookup("B").unwrap_err();
        assert_eq!(
            err.to_string(),
            "language-chinese mapping has no entry for title \"B\""
        );
    }

    #[test]
    fn load_reads_all_four_tables_from_directory() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("language.txt"), "Song -> 中文\n")?;
        fs::write(dir.path().join("category.txt"), "Song -> 民謠與傳統歌謠\n")?;
        fs::write(dir.path().join("atmosphere.txt"), "Song -> 熱鬧快樂或輕快\n")?;
        fs::write(dir.path().join("language-chinese.txt"), "Song -> 台語\n")?;

        let tables = MappingTables::load(|kind| dir.path().join(kind.file_name()))?;
        assert_eq!(tables.language.lookup("Song")?, Language::Chinese);
        assert_eq!(tables.category.lookup("Song")?, Category::FolkTraditional);
        assert_eq!(tables.atmosphere.lookup("Song")?, Atmosphere::Lively);
        assert_eq!(
            tables.regional_language.lookup("Song")?,
            RegionalLanguage::Taiwanese
        );
        Ok(())
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempdir().unwrap();
        let err = MappingTable::<Language>::load(
            TableKind::Language,
            &dir.path().join("language.txt"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("reading language mapping"));
    }
}
