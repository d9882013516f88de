// src/test_utils.rs
//! In-memory stand-ins for the YouTube API and the certificate table.

use crate::config::AppConfig;
use crate::db::models::Certificate;
use crate::db::store::{CertificateStore, StoreError};
use crate::services::youtube::{
    PlaylistApi, PlaylistDetails, PlaylistEntry, PlaylistItemsPage, YouTubeError,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.site.public_url = "https://certifyt.example".to_string();
    config
}

pub fn sample_certificate() -> Certificate {
    Certificate {
        id: Uuid::parse_str("6f1c1f4e-2a4b-4c1d-9e2f-0a1b2c3d4e5f").unwrap(),
        user_name: "Ada Lovelace".to_string(),
        user_email: "temp@temp.com".to_string(),
        playlist_id: "PL123".to_string(),
        playlist_title: "Rust for <Beginners>".to_string(),
        channel_name: "Ferris".to_string(),
        video_count: 2,
        total_duration_seconds: 3_725,
        video_list: vec!["Intro".to_string(), "Ownership".to_string()],
        created_at: NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap(),
    }
}

/// Playlist API backed by pre-built pages. Page `n` hands out token
/// `page-{n+1}` unless it is the last one.
pub struct FakePlaylistApi {
    details: Option<PlaylistDetails>,
    pages: Vec<PlaylistItemsPage>,
    durations: HashMap<String, String>,
    fail_durations: bool,
    page_tokens: Mutex<Vec<Option<String>>>,
    batch_sizes: Mutex<Vec<usize>>,
    calls: Mutex<usize>,
}

impl FakePlaylistApi {
    pub fn with_pages(page_sizes: &[usize], duration: &str) -> Self {
        let mut pages = Vec::new();
        let mut durations = HashMap::new();
        let mut n = 0;

        for (page_no, &size) in page_sizes.iter().enumerate() {
            let mut entries = Vec::new();
            for _ in 0..size {
                let video_id = format!("vid{n}");
                durations.insert(video_id.clone(), duration.to_string());
                entries.push(PlaylistEntry {
                    video_id,
                    title: format!("Video {n}"),
                });
                n += 1;
            }
            let next_page_token = if page_no + 1 < page_sizes.len() {
                Some(format!("page-{}", page_no + 1))
            } else {
                None
            };
            pages.push(PlaylistItemsPage {
                entries,
                next_page_token,
            });
        }

        Self {
            details: Some(PlaylistDetails {
                title: Some("Fake Playlist".to_string()),
                channel_title: Some("Fake Channel".to_string()),
                item_count: Some(n as u32),
            }),
            pages,
            durations,
            fail_durations: false,
            page_tokens: Mutex::new(Vec::new()),
            batch_sizes: Mutex::new(Vec::new()),
            calls: Mutex::new(0),
        }
    }

    pub fn without_details(mut self) -> Self {
        self.details = None;
        self
    }

    pub fn failing_durations(mut self) -> Self {
        self.fail_durations = true;
        self
    }

    pub fn set_duration(&mut self, video_id: &str, duration: &str) {
        self.durations
            .insert(video_id.to_string(), duration.to_string());
    }

    pub fn duration_of(&self, video_id: &str) -> String {
        self.durations.get(video_id).cloned().unwrap_or_default()
    }

    pub fn all_video_ids(&self) -> Vec<String> {
        self.pages
            .iter()
            .flat_map(|p| p.entries.iter().map(|e| e.video_id.clone()))
            .collect()
    }

    pub fn page_tokens(&self) -> Vec<Option<String>> {
        self.page_tokens.lock().unwrap().clone()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap().clone()
    }

    /// Total number of API calls of any kind.
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    fn record_call(&self) {
        *self.calls.lock().unwrap() += 1;
    }
}

#[async_trait]
impl PlaylistApi for FakePlaylistApi {
    async fn playlist_details(
        &self,
        _playlist_id: &str,
    ) -> Result<Option<PlaylistDetails>, YouTubeError> {
        self.record_call();
        Ok(self.details.clone())
    }

    async fn playlist_items(
        &self,
        _playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemsPage, YouTubeError> {
        self.record_call();
        self.page_tokens
            .lock()
            .unwrap()
            .push(page_token.map(str::to_string));

        let index = match page_token {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| YouTubeError::Api {
                    status: StatusCode::BAD_REQUEST,
                    message: format!("bad page token {token}"),
                })?,
        };

        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| YouTubeError::Api {
                status: StatusCode::BAD_REQUEST,
                message: "page out of range".to_string(),
            })
    }

    async fn video_durations(&self, video_ids: &[String]) -> Result<Vec<String>, YouTubeError> {
        self.record_call();
        self.batch_sizes.lock().unwrap().push(video_ids.len());

        if self.fail_durations {
            return Err(YouTubeError::Api {
                status: StatusCode::FORBIDDEN,
                message: "quotaExceeded".to_string(),
            });
        }

        Ok(video_ids.iter().map(|id| self.duration_of(id)).collect())
    }
}

/// Certificate table kept in a vector.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Certificate>>,
    fail: bool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn with(certificate: Certificate) -> Self {
        Self {
            rows: Mutex::new(vec![certificate]),
            fail: false,
        }
    }

    pub fn rows(&self) -> Vec<Certificate> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl CertificateStore for MemoryStore {
    async fn insert(&self, certificate: Certificate) -> Result<Uuid, StoreError> {
        if self.fail {
            return Err(StoreError::Query(diesel::result::Error::BrokenTransactionManager));
        }
        let id = certificate.id;
        self.rows.lock().unwrap().push(certificate);
        Ok(id)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Certificate>, StoreError> {
        if self.fail {
            return Err(StoreError::Query(diesel::result::Error::BrokenTransactionManager));
        }
        Ok(self.rows.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }
}
