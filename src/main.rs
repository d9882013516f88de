use actix_files::Files;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use std::sync::Arc;

use crate::db::store::{CertificateStore, PgCertificateStore};
use crate::services::preview_image::PreviewRenderer;
use crate::services::youtube::{PlaylistApi, YouTubeClient};

mod api;
mod config;
mod db;
mod pages;
mod services;
#[cfg(test)]
mod test_utils;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Arc::new(config::AppConfig::new().context("Failed to load configuration")?);

    log::info!(
        "Starting server on {}:{} (public url {})",
        config.server.host,
        config.server.port,
        config.site.public_origin()
    );

    if config.youtube.api_key.is_empty() {
        log::warn!("APP__YOUTUBE__API_KEY is not set; certificate generation will fail");
    }

    let pool = db::create_pool(&config.database).context("Failed to create database pool")?;
    let store: Arc<dyn CertificateStore> = Arc::new(PgCertificateStore::new(pool));

    let youtube: Arc<dyn PlaylistApi> =
        Arc::new(YouTubeClient::new(&config.youtube).context("Failed to build YouTube client")?);

    let preview = web::Data::new(PreviewRenderer::from_config(&config.preview));

    let c = config.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(actix_cors::Cors::permissive()) // Configure properly in production
            .app_data(web::Data::from(c.clone()))
            .app_data(web::Data::from(store.clone()))
            .app_data(web::Data::from(youtube.clone()))
            .app_data(preview.clone())
            .service(Files::new("/static", &c.site.static_path))
            .configure(api::configure)
            .configure(pages::configure)
    })
    .bind((config.server.host.clone(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
