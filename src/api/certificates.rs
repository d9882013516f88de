use crate::api::shared::{ApiError, ResponseType};
use crate::db::models::Certificate;
use crate::db::store::CertificateStore;
use crate::services::playlist_aggregator::{aggregate_playlist, PlaylistSummary};
use crate::services::youtube::{playlist_id_from_url, PlaylistApi};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/certificates")
            .app_data(
                web::JsonConfig::default()
                    .error_handler(|err, _req| ApiError::InvalidInput(err.to_string()).into()),
            )
            .route("", web::post().to(generate_certificate)),
    );
}

#[derive(Deserialize, Debug)]
pub struct GenerateRequest {
    pub user_name: String,
    pub playlist_url: String,
}

#[derive(Serialize, Debug)]
pub struct GenerateResponse {
    #[serde(flatten)]
    pub playlist: PlaylistSummary,
    pub certificate_id: Uuid,
}

pub async fn generate_certificate(
    body: web::Json<GenerateRequest>,
    youtube: web::Data<dyn PlaylistApi>,
    store: web::Data<dyn CertificateStore>,
) -> Result<HttpResponse, ApiError> {
    let GenerateRequest {
        user_name,
        playlist_url,
    } = body.into_inner();

    let user_name = user_name.trim();
    if user_name.is_empty() {
        return Err(ApiError::InvalidInput("Recipient name is required.".to_string()));
    }

    let playlist_id = playlist_id_from_url(&playlist_url)
        .ok_or_else(|| ApiError::InvalidInput("Invalid YouTube playlist URL.".to_string()))?;

    let summary = aggregate_playlist(youtube.get_ref(), &playlist_id).await?;

    let certificate = Certificate::issue(user_name, &playlist_id, &summary);
    let certificate_id = store.insert(certificate).await?;

    Ok(HttpResponse::Ok().json(ResponseType::ok(GenerateResponse {
        playlist: summary,
        certificate_id,
    })))
}
