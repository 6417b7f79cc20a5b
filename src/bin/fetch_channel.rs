#![forbid(unsafe_code)]

//! Downloads snippet, content details and statistics for every video of a
//! channel into the fetch cache. Run this only when the cache should be
//! refreshed; `build_quiz` never touches the network.

use anyhow::Result;
use chorus_quiz_tools::config::{Settings, SettingsOverrides, resolve_settings};
use chorus_quiz_tools::fetch::{progress_bar, run_fetch};
use chorus_quiz_tools::init_logging;
use chorus_quiz_tools::youtube::YouTubeClient;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "fetch_channel", version)]
#[command(about = "Fetch raw metadata for every video of a YouTube channel")]
struct FetchArgs {
    /// Channel handle, with or without the leading `@` (defaults to CHANNEL_HANDLE)
    handle: Option<String>,

    /// Env file holding API_KEY and the other settings
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Directory the cache file is written to (defaults to QUIZ_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

impl FetchArgs {
    fn settings(self) -> Result<Settings> {
        resolve_settings(SettingsOverrides {
            channel_handle: self.handle,
            data_dir: self.data_dir,
            env_path: Some(self.env_file),
        })
    }
}

fn main() -> Result<()> {
    init_logging("fetch_channel");

    let settings = FetchArgs::parse().settings()?;
    let client = YouTubeClient::from_settings(&settings)?;
    let progress = progress_bar(0);
    run_fetch(
        &client,
        &settings.channel_handle,
        &settings.cache_path(),
        &progress,
    )?;
    Ok(())
}
