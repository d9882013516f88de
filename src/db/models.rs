use crate::services::playlist_aggregator::PlaylistSummary;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored in `user_email`; the generation form never asks for an address.
pub const PLACEHOLDER_EMAIL: &str = "temp@temp.com";

#[derive(Debug, Serialize, Deserialize, Queryable, Selectable, Insertable, Clone, PartialEq)]
#[diesel(table_name = crate::db::schema::certificates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Certificate {
    pub id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub playlist_id: String,
    pub playlist_title: String,
    pub channel_name: String,
    pub video_count: i32,
    pub total_duration_seconds: i64,
    pub video_list: Vec<String>,
    pub created_at: NaiveDateTime,
}

impl Certificate {
    /// Builds a fresh record for `user_name` from an aggregated playlist.
    pub fn issue(user_name: &str, playlist_id: &str, summary: &PlaylistSummary) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_name: user_name.to_string(),
            user_email: PLACEHOLDER_EMAIL.to_string(),
            playlist_id: playlist_id.to_string(),
            playlist_title: summary.playlist_title.clone(),
            channel_name: summary.channel_name.clone(),
            video_count: i32::try_from(summary.video_count).unwrap_or(i32::MAX),
            total_duration_seconds: i64::try_from(summary.total_duration_seconds)
                .unwrap_or(i64::MAX),
            video_list: summary.video_list.clone(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
