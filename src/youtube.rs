//! YouTube Data API v3 access for the fetch stage.
//!
//! Every call is a single blocking request with no timeout. Errors (transport,
//! HTTP status, quota) propagate unchanged; nothing here retries.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;

use crate::config::Settings;

/// Page size used when listing a channel's uploads.
pub const SEARCH_PAGE_SIZE: u32 = 50;

const API_KEY_HEADER: &str = "X-Goog-Api-Key";

/// Query parameters as sent on the wire, in order.
pub type QueryParams = Vec<(&'static str, String)>;

/// `channels.list` lookup by handle. A leading `@` is dropped.
pub fn channel_params(handle: &str) -> QueryParams {
    let bare = handle.strip_prefix('@').unwrap_or(handle);
    vec![("part", "id".into()), ("forHandle", bare.into())]
}

/// `search.list` over one channel's videos, newest first. The page token is
/// only sent once the previous page handed one out.
pub fn search_params(channel_id: &str, page_token: Option<&str>) -> QueryParams {
    let mut params = vec![
        ("part", "snippet".into()),
        ("channelId", channel_id.into()),
        ("maxResults", SEARCH_PAGE_SIZE.to_string()),
        ("order", "date".into()),
        ("type", "video".into()),
    ];
    if let Some(token) = page_token {
        params.push(("pageToken", token.into()));
    }
    params
}

pub fn video_params(video_id: &str) -> QueryParams {
    vec![
        ("part", "snippet,contentDetails,statistics".into()),
        ("id", video_id.into()),
    ]
}

/// One page of `search.list` results, reduced to what the lister needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub video_ids: Vec<String>,
    pub next_page_token: Option<String>,
}

/// The three endpoints the fetch stage relies on.
pub trait VideoApi {
    /// Channel ids registered for `handle` (without the leading `@`).
    fn channels_for_handle(&self, handle: &str) -> Result<Vec<String>>;

    /// One page of the channel's videos, newest first.
    fn search_channel_videos(&self, channel_id: &str, page_token: Option<&str>)
    -> Result<SearchPage>;

    /// The raw `videos.list` item, or `None` when the API returns no item.
    fn video_details(&self, video_id: &str) -> Result<Option<Value>>;
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ItemList<T> {
    #[serde(default)]
    items: Vec<T>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct ChannelItem {
    id: String,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

/// Reduces a decoded `search.list` body to a page. Results that are not
/// videos carry no `videoId` and are skipped.
fn search_page(list: ItemList<SearchItem>) -> SearchPage {
    SearchPage {
        video_ids: list
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect(),
        next_page_token: list.next_page_token,
    }
}

/// Blocking client bound to one API key.
pub struct YouTubeClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new().build();
        Self {
            agent,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(
            settings.api_base.clone(),
            settings.require_api_key()?,
        ))
    }

    fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        let url = format!("{}/{endpoint}", self.base_url);
        // The key travels as a header so it never shows up in URLs echoed by
        // transport errors.
        let mut request = self.agent.get(&url).set(API_KEY_HEADER, &self.api_key);
        for (name, value) in params {
            request = request.query(name, value);
        }
        let response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                bail!("{endpoint} request {params:?} failed with HTTP {code}: {body}");
            }
            Err(err) => {
                return Err(err).with_context(|| format!("requesting {endpoint} {params:?}"));
            }
        };
        response
            .into_json()
            .with_context(|| format!("decoding {endpoint} response"))
    }
}

impl VideoApi for YouTubeClient {
    fn channels_for_handle(&self, handle: &str) -> Result<Vec<String>> {
        let list: ItemList<ChannelItem> = self.get("channels", &channel_params(handle))?;
        Ok(list.items.into_iter().map(|item| item.id).collect())
    }

    fn search_channel_videos(
        &self,
        channel_id: &str,
        page_token: Option<&str>,
    ) -> Result<SearchPage> {
        let list = self.get("search", &search_params(channel_id, page_token))?;
        Ok(search_page(list))
    }

    fn video_details(&self, video_id: &str) -> Result<Option<Value>> {
        let list: ItemList<Value> = self.get("videos", &video_params(video_id))?;
        Ok(list.items.into_iter().next())
    }
}
