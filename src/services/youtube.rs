// src/services/youtube.rs
//! Thin client for the three YouTube Data API v3 endpoints the aggregator needs.

use crate::config::YouTubeConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Fixed page size of the list endpoints; also caps ids per `videos.list` call.
pub const MAX_RESULTS: usize = 50;

#[derive(Debug, Error)]
pub enum YouTubeError {
    #[error("YouTube request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("YouTube API returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("invalid YouTube API base url: {0}")]
    BaseUrl(#[from] url::ParseError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistDetails {
    pub title: Option<String>,
    pub channel_title: Option<String>,
    pub item_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistEntry {
    pub video_id: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaylistItemsPage {
    pub entries: Vec<PlaylistEntry>,
    pub next_page_token: Option<String>,
}

#[async_trait]
pub trait PlaylistApi: Send + Sync {
    /// Playlist metadata, `None` when the API knows no such playlist.
    async fn playlist_details(
        &self,
        playlist_id: &str,
    ) -> Result<Option<PlaylistDetails>, YouTubeError>;

    /// One page of playlist items in playlist order.
    async fn playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemsPage, YouTubeError>;

    /// ISO 8601 durations for at most [`MAX_RESULTS`] video ids.
    async fn video_durations(&self, video_ids: &[String]) -> Result<Vec<String>, YouTubeError>;
}

/// Returns the `list` query parameter of a playlist (or watch) URL.
pub fn playlist_id_from_url(playlist_url: &str) -> Option<String> {
    let parsed = Url::parse(playlist_url.trim()).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "list")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub struct YouTubeClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(config: &YouTubeConfig) -> Result<Self, YouTubeError> {
        // Url::join drops the last segment unless the base ends with a slash
        let base_url = Url::parse(&format!("{}/", config.base_url.trim_end_matches('/')))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("certifyt/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<T, YouTubeError> {
        let url = self.base_url.join(resource)?;

        log::debug!("GET {} {:?}", url, params);

        let response = self
            .http
            .get(url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(YouTubeError::Api { status, message });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PlaylistApi for YouTubeClient {
    async fn playlist_details(
        &self,
        playlist_id: &str,
    ) -> Result<Option<PlaylistDetails>, YouTubeError> {
        let res: ListResponse<PlaylistResource> = self
            .get(
                "playlists",
                &[("part", "snippet,contentDetails"), ("id", playlist_id)],
            )
            .await?;

        Ok(res.items.into_iter().next().map(|playlist| {
            let snippet = playlist.snippet.unwrap_or_default();
            PlaylistDetails {
                title: snippet.title,
                channel_title: snippet.channel_title,
                item_count: playlist.content_details.and_then(|cd| cd.item_count),
            }
        }))
    }

    async fn playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemsPage, YouTubeError> {
        let max_results = MAX_RESULTS.to_string();
        let mut params = vec![
            ("part", "snippet,contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let res: ListResponse<PlaylistItemResource> = self.get("playlistItems", &params).await?;

        let entries = res
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.content_details?.video_id?;
                let title = item.snippet.and_then(|s| s.title).unwrap_or_default();
                Some(PlaylistEntry { video_id, title })
            })
            .collect();

        Ok(PlaylistItemsPage {
            entries,
            next_page_token: res.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    async fn video_durations(&self, video_ids: &[String]) -> Result<Vec<String>, YouTubeError> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = video_ids.join(",");
        let res: ListResponse<VideoResource> = self
            .get("videos", &[("part", "contentDetails"), ("id", ids.as_str())])
            .await?;

        Ok(res
            .items
            .into_iter()
            .map(|video| {
                video
                    .content_details
                    .and_then(|cd| cd.duration)
                    .unwrap_or_default()
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistResource {
    snippet: Option<PlaylistSnippet>,
    content_details: Option<PlaylistContentDetails>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistSnippet {
    title: Option<String>,
    channel_title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistContentDetails {
    item_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemResource {
    snippet: Option<ItemSnippet>,
    content_details: Option<ItemContentDetails>,
}

#[derive(Debug, Deserialize)]
struct ItemSnippet {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemContentDetails {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResource {
    content_details: Option<VideoContentDetails>,
}

#[derive(Debug, Deserialize)]
struct VideoContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
