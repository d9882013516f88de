// src/services/certificate_renderer.rs
//! Text formatting, links and the verification QR code shown on a certificate.

use crate::db::models::Certificate;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{Datelike, NaiveDateTime};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;
use thiserror::Error;
use url::form_urlencoded;
use uuid::Uuid;

const QR_MODULE_SIZE: u32 = 6;
const YOUTUBE_PLAYLIST: &str = "https://www.youtube.com/playlist";
const LINKEDIN_ADD_PROFILE: &str = "https://www.linkedin.com/profile/add";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to build QR code: {0}")]
    Qr(#[from] qrcode::types::QrError),

    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to render template: {0}")]
    Template(#[from] askama::Error),
}

/// `3725` -> `"1h 2m"`.
pub fn format_duration(total_seconds: i64) -> String {
    let total_seconds = total_seconds.max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    format!("{}h {}m", hours, minutes)
}

pub fn format_issue_date(created_at: &NaiveDateTime) -> String {
    created_at.format("%B %-d, %Y").to_string()
}

pub fn certificate_url(public_origin: &str, id: Uuid) -> String {
    format!("{}/certificates/{}", public_origin.trim_end_matches('/'), id)
}

pub fn preview_image_url(public_origin: &str, id: Uuid) -> String {
    format!("{}/opengraph-image", certificate_url(public_origin, id))
}

pub fn playlist_url(playlist_id: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("list", playlist_id)
        .finish();
    format!("{}?{}", YOUTUBE_PLAYLIST, query)
}

/// LinkedIn "add certification to profile" deep link.
pub fn linkedin_add_url(certificate: &Certificate, cert_url: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("startTask", "CERTIFICATION_NAME")
        .append_pair(
            "name",
            &format!("Completed Playlist: {}", certificate.playlist_title),
        )
        .append_pair(
            "organizationName",
            &format!("CertifYT (via {})", certificate.channel_name),
        )
        .append_pair("issueYear", &certificate.created_at.year().to_string())
        .append_pair("issueMonth", &certificate.created_at.month().to_string())
        .append_pair("certUrl", cert_url)
        .append_pair("certId", &certificate.id.to_string())
        .finish();
    format!("{}?{}", LINKEDIN_ADD_PROFILE, query)
}

/// PNG QR code for `content` as a `data:` URL, high error correction.
pub fn qr_code_data_url(content: &str) -> Result<String, RenderError> {
    let code = QrCode::with_error_correction_level(content.as_bytes(), EcLevel::H)?;
    let img = code
        .render::<Luma<u8>>()
        .module_dimensions(QR_MODULE_SIZE, QR_MODULE_SIZE)
        .build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(img).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}
