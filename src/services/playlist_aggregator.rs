// src/services/playlist_aggregator.rs
use crate::services::youtube::{PlaylistApi, PlaylistEntry, YouTubeError, MAX_RESULTS};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

const SECONDS_PER_YEAR: f64 = 31_536_000.0;
const SECONDS_PER_MONTH: f64 = 2_628_000.0;
const SECONDS_PER_WEEK: f64 = 604_800.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

const UNKNOWN: &str = "Unknown";

static ISO_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^P(?:(\d+)Y)?(?:(\d+)M)?(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
    )
    .expect("duration pattern is valid")
});

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlaylistSummary {
    pub playlist_title: String,
    pub channel_name: String,
    pub video_count: usize,
    /// Item count the API reports for the playlist, which can include
    /// private or deleted videos that never show up as entries.
    pub declared_video_count: Option<u32>,
    pub total_duration_seconds: u64,
    pub video_list: Vec<String>,
}

/// Parses an ISO 8601 duration (`P1DT2H3M4.5S`) into seconds, fractions kept.
///
/// Missing components count as zero and anything that does not match the
/// grammar yields zero.
pub fn parse_iso8601_duration(duration: &str) -> f64 {
    let Some(caps) = ISO_DURATION.captures(duration.trim()) else {
        return 0.0;
    };

    let component = |idx: usize| -> f64 {
        caps.get(idx)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };

    component(1) * SECONDS_PER_YEAR
        + component(2) * SECONDS_PER_MONTH
        + component(3) * SECONDS_PER_WEEK
        + component(4) * SECONDS_PER_DAY
        + component(5) * SECONDS_PER_HOUR
        + component(6) * SECONDS_PER_MINUTE
        + component(7)
}

/// Collects every entry of a playlist, following continuation tokens until the
/// API stops returning one.
async fn fetch_entries(
    api: &dyn PlaylistApi,
    playlist_id: &str,
) -> Result<Vec<PlaylistEntry>, YouTubeError> {
    let mut entries = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = api.playlist_items(playlist_id, page_token.as_deref()).await?;
        pages += 1;
        entries.extend(page.entries);

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    log::debug!(
        "Fetched {} entries over {} page(s) for playlist {}",
        entries.len(),
        pages,
        playlist_id
    );

    Ok(entries)
}

/// Sums durations batch by batch and truncates the playlist total once, so
/// fractional seconds carry across videos. The float-to-int cast saturates.
async fn sum_durations(api: &dyn PlaylistApi, video_ids: &[String]) -> Result<u64, YouTubeError> {
    let mut total_seconds = 0.0f64;

    for (batch_no, batch) in video_ids.chunks(MAX_RESULTS).enumerate() {
        let durations = api.video_durations(batch).await?;
        let batch_seconds: f64 = durations.iter().map(|d| parse_iso8601_duration(d)).sum();
        log::debug!(
            "Duration batch {} ({} ids): {}s",
            batch_no + 1,
            batch.len(),
            batch_seconds
        );
        total_seconds += batch_seconds;
    }

    Ok(total_seconds as u64)
}

/// Fetches playlist metadata, every item and every item's duration, and sums
/// it all up. Any failing call fails the whole aggregation.
pub async fn aggregate_playlist(
    api: &dyn PlaylistApi,
    playlist_id: &str,
) -> Result<PlaylistSummary, YouTubeError> {
    log::info!("Aggregating YouTube playlist {}", playlist_id);

    let details = api.playlist_details(playlist_id).await?;
    let entries = fetch_entries(api, playlist_id).await?;

    let (video_ids, video_list): (Vec<String>, Vec<String>) = entries
        .into_iter()
        .map(|entry| (entry.video_id, entry.title))
        .unzip();

    let total_duration_seconds = sum_durations(api, &video_ids).await?;

    let (playlist_title, channel_name, declared_video_count) = match details {
        Some(d) => (d.title, d.channel_title, d.item_count),
        None => (None, None, None),
    };

    let summary = PlaylistSummary {
        playlist_title: playlist_title.unwrap_or_else(|| UNKNOWN.to_string()),
        channel_name: channel_name.unwrap_or_else(|| UNKNOWN.to_string()),
        video_count: video_ids.len(),
        declared_video_count,
        total_duration_seconds,
        video_list,
    };

    log::info!(
        "Playlist {} ({}): {} videos, {}s total",
        playlist_id,
        summary.playlist_title,
        summary.video_count,
        summary.total_duration_seconds
    );

    Ok(summary)
}
