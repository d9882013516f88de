use crate::api::shared::ApiError;
use crate::config::AppConfig;
use crate::db::models::Certificate;
use crate::db::store::CertificateStore;
use crate::services::certificate_renderer::{
    certificate_url, format_duration, format_issue_date, linkedin_add_url, playlist_url,
    preview_image_url, qr_code_data_url, RenderError,
};
use crate::services::preview_image::PreviewRenderer;
use actix_web::http::header::{CacheControl, CacheDirective, ContentType};
use actix_web::{web, HttpResponse};
use askama::Template;
use uuid::Uuid;

#[derive(Template)]
#[template(path = "certificate.html")]
struct CertificatePage<'a> {
    certificate: &'a Certificate,
    duration: String,
    issued_on: String,
    certificate_url: String,
    preview_image_url: String,
    playlist_url: String,
    linkedin_url: String,
    qr_code: Option<String>,
}

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundPage<'a> {
    requested_id: &'a str,
}

/// Ids that are not UUIDs never reach the database.
async fn lookup(store: &dyn CertificateStore, id: &str) -> Result<Option<Certificate>, ApiError> {
    let Ok(id) = Uuid::parse_str(id) else {
        log::debug!("Rejected malformed certificate id {:?}", id);
        return Ok(None);
    };
    Ok(store.find(id).await?)
}

fn not_found(requested_id: &str) -> Result<HttpResponse, ApiError> {
    let page = NotFoundPage { requested_id }
        .render()
        .map_err(RenderError::from)?;
    Ok(HttpResponse::NotFound()
        .content_type(ContentType::html())
        .body(page))
}

pub async fn show(
    path: web::Path<String>,
    store: web::Data<dyn CertificateStore>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let Some(certificate) = lookup(store.get_ref(), &id).await? else {
        return not_found(&id);
    };

    let origin = config.site.public_origin();
    let cert_url = certificate_url(origin, certificate.id);

    // QR failures degrade to a page without the code
    let qr_code = match qr_code_data_url(&cert_url) {
        Ok(data_url) => Some(data_url),
        Err(e) => {
            log::error!("QR code generation failed for {}: {}", certificate.id, e);
            None
        }
    };

    let page = CertificatePage {
        duration: format_duration(certificate.total_duration_seconds),
        issued_on: format_issue_date(&certificate.created_at),
        preview_image_url: preview_image_url(origin, certificate.id),
        playlist_url: playlist_url(&certificate.playlist_id),
        linkedin_url: linkedin_add_url(&certificate, &cert_url),
        certificate_url: cert_url,
        qr_code,
        certificate: &certificate,
    }
    .render()
    .map_err(RenderError::from)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(page))
}

pub async fn preview_image(
    path: web::Path<String>,
    store: web::Data<dyn CertificateStore>,
    renderer: web::Data<PreviewRenderer>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    match lookup(store.get_ref(), &id).await? {
        Some(certificate) => {
            let png = renderer.render(&certificate)?;
            // records never change once written
            Ok(HttpResponse::Ok()
                .content_type(ContentType::png())
                .insert_header(CacheControl(vec![
                    CacheDirective::Public,
                    CacheDirective::MaxAge(86_400),
                ]))
                .body(png))
        }
        None => {
            let png = renderer.render_not_found()?;
            Ok(HttpResponse::NotFound()
                .content_type(ContentType::png())
                .body(png))
        }
    }
}
