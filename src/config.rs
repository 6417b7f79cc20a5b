#![forbid(unsafe_code)]

use anyhow::{Context, Result, anyhow};
use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
};

use crate::mapping::TableKind;

pub const DEFAULT_ENV_PATH: &str = ".env";
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_CHANNEL_HANDLE: &str = "@NTUChorus";
pub const DEFAULT_DATA_DIR: &str = ".";

pub const FETCH_CACHE_FILE: &str = "video_infos.json";
pub const QUIZ_TABLE_FILE: &str = "table.json";

/// Everything a run needs, resolved once at startup and handed to each stage.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub api_base: String,
    pub channel_handle: String,
    pub data_dir: PathBuf,
}

impl Settings {
    /// The fetch stage is the only consumer of the key, so its absence is
    /// reported lazily rather than at load time.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| anyhow!("API_KEY not set"))
    }

    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join(FETCH_CACHE_FILE)
    }

    pub fn table_path(&self) -> PathBuf {
        self.data_dir.join(QUIZ_TABLE_FILE)
    }

    pub fn mapping_path(&self, kind: TableKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub channel_handle: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub env_path: Option<PathBuf>,
}

pub fn resolve_settings(overrides: SettingsOverrides) -> Result<Settings> {
    let env_path = overrides
        .env_path
        .as_deref()
        .unwrap_or_else(|| Path::new(DEFAULT_ENV_PATH));
    let file_vars = read_env_file(env_path)?;
    Ok(build_settings_with_overrides(
        &file_vars,
        env_var_string,
        overrides,
    ))
}

#[cfg(test)]
fn build_settings(
    file_vars: &HashMap<String, String>,
    env_lookup: impl Fn(&str) -> Option<String>,
) -> Settings {
    build_settings_with_overrides(file_vars, env_lookup, SettingsOverrides::default())
}

fn build_settings_with_overrides(
    file_vars: &HashMap<String, String>,
    env_lookup: impl Fn(&str) -> Option<String>,
    overrides: SettingsOverrides,
) -> Settings {
    let api_key = lookup_value("API_KEY", file_vars, &env_lookup);
    let api_base = lookup_value("YOUTUBE_API_BASE", file_vars, &env_lookup)
        .map(|value| value.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    let channel_handle = overrides
        .channel_handle
        .and_then(non_blank)
        .or_else(|| lookup_value("CHANNEL_HANDLE", file_vars, &env_lookup))
        .unwrap_or_else(|| DEFAULT_CHANNEL_HANDLE.to_string());
    let data_dir = overrides
        .data_dir
        .or_else(|| lookup_value("QUIZ_DATA_DIR", file_vars, &env_lookup).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    Settings {
        api_key,
        api_base,
        channel_handle,
        data_dir,
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn env_var_string(key: &str) -> Option<String> {
    env::var(key).ok().and_then(non_blank)
}

fn lookup_value(
    key: &str,
    file_vars: &HashMap<String, String>,
    env_lookup: &impl Fn(&str) -> Option<String>,
) -> Option<String> {
    env_lookup(key).or_else(|| {
        file_vars
            .get(key)
            .cloned()
            .and_then(non_blank)
    })
}

pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let mut vars = HashMap::new();
    if !path.exists() {
        return Ok(vars);
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let line = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        let Some((key, value_raw)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = value_raw.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|value| value.strip_suffix('"'))
            .or_else(|| {
                value
                    .strip_prefix('\'')
                    .and_then(|value| value.strip_suffix('\''))
            })
            .unwrap_or(value);
        vars.insert(key.to_string(), value.to_string());
    }
    Ok(vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn make_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    fn settings_from(contents: &str) -> Settings {
        let cfg = make_config(contents);
        let vars = read_env_file(cfg.path()).unwrap();
        build_settings(&vars, |_| None)
    }

    #[test]
    fn build_settings_reads_api_key() {
        let settings = settings_from("API_KEY=\"secret\"\n");
        assert_eq!(settings.require_api_key().unwrap(), "secret");
    }

    #[test]
    fn build_settings_defaults_everything_else() {
        let settings = settings_from("");
        assert!(settings.api_key.is_none());
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
        assert_eq!(settings.channel_handle, DEFAULT_CHANNEL_HANDLE);
        assert_eq!(settings.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
    }

    #[test]
    fn require_api_key_reports_missing_key() {
        let settings = settings_from("API_KEY=\"   \"\n");
        let err = settings.require_api_key().unwrap_err();
        assert!(err.to_string().contains("API_KEY not set"));
    }

    #[test]
    fn build_settings_trims_trailing_slash_from_api_base() {
        let settings = settings_from("YOUTUBE_API_BASE=\"http://127.0.0.1:9000/v3/\"\n");
        assert_eq!(settings.api_base, "http://127.0.0.1:9000/v3");
    }

    #[test]
    fn build_settings_prefers_env_over_file() {
        let vars = read_env_file(make_config("CHANNEL_HANDLE=\"@file\"\n").path()).unwrap();
        let settings = build_settings(&vars, |key| {
            if key == "CHANNEL_HANDLE" {
                Some("@env".to_string())
            } else {
                None
            }
        });
        assert_eq!(settings.channel_handle, "@env");
    }

    #[test]
    fn read_env_file_handles_export_and_quotes() {
        let cfg = make_config(
            r#"
            export API_KEY="abc"
            CHANNEL_HANDLE='@Choir'
            QUIZ_DATA_DIR =  "/data"
            # comment
            INVALID_LINE
            "#,
        );
        let vars = read_env_file(cfg.path()).unwrap();
        assert_eq!(vars.get("API_KEY").unwrap(), "abc");
        assert_eq!(vars.get("CHANNEL_HANDLE").unwrap(), "@Choir");
        assert_eq!(vars.get("QUIZ_DATA_DIR").unwrap(), "/data");
        assert!(!vars.contains_key("INVALID_LINE"));
    }

    #[test]
    fn read_env_file_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let vars = read_env_file(&dir.path().join("missing.env")).unwrap();
        assert!(vars.is_empty());
    }

    #[test]
    fn build_settings_override_precedence() {
        let mut vars = HashMap::new();
        vars.insert("CHANNEL_HANDLE".to_string(), "@file".to_string());
        vars.insert("QUIZ_DATA_DIR".to_string(), "/file-data".to_string());

        let overrides = SettingsOverrides {
            channel_handle: Some("@override".into()),
            data_dir: None,
            env_path: None,
        };

        let settings = build_settings_with_overrides(
            &vars,
            |key| {
                if key == "QUIZ_DATA_DIR" {
                    Some("/env-data".to_string())
                } else {
                    None
                }
            },
            overrides,
        );

        assert_eq!(settings.channel_handle, "@override");
        assert_eq!(settings.data_dir, PathBuf::from("/env-data"));
    }

    #[test]
    fn build_settings_ignores_blank_handle_override() {
        let settings = build_settings_with_overrides(
            &HashMap::new(),
            |_| None,
            SettingsOverrides {
                channel_handle: Some("   ".into()),
                ..SettingsOverrides::default()
            },
        );
        assert_eq!(settings.channel_handle, DEFAULT_CHANNEL_HANDLE);
    }

    #[test]
    fn settings_place_every_file_in_data_dir() {
        let settings = build_settings_with_overrides(
            &HashMap::new(),
            |_| None,
            SettingsOverrides {
                data_dir: Some(PathBuf::from("/quiz")),
                ..SettingsOverrides::default()
            },
        );
        assert_eq!(settings.cache_path(), PathBuf::from("/quiz/video_infos.json"));
        assert_eq!(settings.table_path(), PathBuf::from("/quiz/table.json"));
        assert_eq!(
            settings.mapping_path(TableKind::RegionalLanguage),
            PathBuf::from("/quiz/language-chinese.txt")
        );
    }

    #[cfg(unix)]
    #[test]
    fn data_dir_override_keeps_non_utf8_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = PathBuf::from(OsStr::from_bytes(b"/quiz/\xff-data"));
        let settings = build_settings_with_overrides(
            &HashMap::new(),
            |_| None,
            SettingsOverrides {
                data_dir: Some(raw.clone()),
                ..SettingsOverrides::default()
            },
        );
        assert_eq!(settings.data_dir, raw);
        assert_eq!(settings.table_path(), raw.join("table.json"));
    }

    #[test]
    fn resolve_settings_reads_explicit_env_file() {
        let cfg = make_config("QUIZ_DATA_DIR=\"/from-file\"\n");
        let settings = resolve_settings(SettingsOverrides {
            env_path: Some(cfg.path().to_path_buf()),
            data_dir: Some(PathBuf::from("/cli")),
            ..SettingsOverrides::default()
        })
        .unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("/cli"));
    }
}
