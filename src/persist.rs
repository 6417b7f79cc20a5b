//! JSON file helpers shared by the fetch cache and the quiz table.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

const INDENT: &[u8] = b"    ";

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Writes `value` as four-space indented JSON. The file is staged next to the
/// target and renamed into place, so readers never see a partial file.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;

    let staged = NamedTempFile::new_in(parent)
        .with_context(|| format!("staging {}", path.display()))?;
    {
        let mut writer = BufWriter::new(staged.as_file());
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(INDENT));
        value
            .serialize(&mut serializer)
            .with_context(|| format!("serializing {}", path.display()))?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    staged
        .persist(path)
        .with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use tempfile::tempdir;

    #[test]
    fn writes_four_space_indent_and_raw_unicode() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out.json");
        write_json_atomic(&path, &json!({"title": "望春風"}))?;
        let raw = fs::read_to_string(&path)?;
        assert_eq!(raw, "{\n    \"title\": \"望春風\"\n}\n");
        Ok(())
    }

    #[test]
    fn creates_missing_parent_and_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested/out.json");
        write_json_atomic(&path, &json!({"a": 1}))?;
        let value: Value = read_json(&path)?;
        assert_eq!(value, json!({"a": 1}));
        let leftovers: Vec<_> = fs::read_dir(dir.path().join("nested"))?.collect();
        assert_eq!(leftovers.len(), 1, "staging file should be renamed away");
        Ok(())
    }

    #[test]
    fn read_json_names_the_file_on_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = read_json::<Value>(&path).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }
}
