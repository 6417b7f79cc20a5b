//! Fetch stage: handle -> channel id -> video ids -> raw payloads on disk.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use crate::error::QuizError;
use crate::metadata::{FetchCache, save_fetch_cache};
use crate::youtube::VideoApi;

/// Resolves `@handle` (or a bare handle) to the first matching channel id.
pub fn resolve_channel_id(api: &dyn VideoApi, handle: &str) -> Result<String> {
    let bare = handle.strip_prefix('@').unwrap_or(handle);
    let channel_id = api
        .channels_for_handle(bare)
        .with_context(|| format!("looking up handle {handle}"))?
        .into_iter()
        .next()
        .ok_or_else(|| QuizError::ChannelNotFound {
            handle: handle.to_string(),
        })?;
    info!(handle, channel_id = %channel_id, "resolved channel");
    Ok(channel_id)
}

/// Follows `nextPageToken` until the listing runs out. Ids that show up on
/// more than one page are kept once, at their first position.
pub fn list_channel_videos(api: &dyn VideoApi, channel_id: &str) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut video_ids = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = api
            .search_channel_videos(channel_id, page_token.as_deref())
            .with_context(|| format!("listing videos of channel {channel_id} (page {})", pages + 1))?;
        pages += 1;
        for video_id in page.video_ids {
            if seen.insert(video_id.clone()) {
                video_ids.push(video_id);
            }
        }
        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    info!(channel_id, pages, videos = video_ids.len(), "listed channel videos");
    Ok(video_ids)
}

/// Fetches every payload in order. Ids the API no longer returns are omitted.
pub fn fetch_video_payloads(
    api: &dyn VideoApi,
    video_ids: &[String],
    progress: &ProgressBar,
) -> Result<FetchCache> {
    let mut cache = FetchCache::new();
    progress.set_length(video_ids.len() as u64);
    for video_id in video_ids {
        match api
            .video_details(video_id)
            .with_context(|| format!("fetching details for {video_id}"))?
        {
            Some(payload) => {
                cache.insert(video_id.clone(), payload);
            }
            None => debug!(video_id = %video_id, "no item returned; skipping"),
        }
        progress.inc(1);
    }
    progress.finish_and_clear();
    Ok(cache)
}

pub fn progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}<{eta}]")
    {
        bar.set_style(style);
    }
    bar
}

/// Runs the whole fetch stage and writes the cache file.
pub fn run_fetch(
    api: &dyn VideoApi,
    handle: &str,
    cache_path: &Path,
    progress: &ProgressBar,
) -> Result<FetchCache> {
    let channel_id = resolve_channel_id(api, handle)?;
    let video_ids = list_channel_videos(api, &channel_id)?;
    let cache = fetch_video_payloads(api, &video_ids, progress)?;
    save_fetch_cache(cache_path, &cache)?;
    info!(
        path = %cache_path.display(),
        listed = video_ids.len(),
        cached = cache.len(),
        "wrote fetch cache"
    );
    Ok(cache)
}
