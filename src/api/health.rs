use crate::config::AppConfig;
use actix_web::{web, HttpResponse};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health_check)));
}

async fn health_check(config: web::Data<AppConfig>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "youtube_api_key": !config.youtube.api_key.is_empty(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
