// src/pages/mod.rs
pub mod certificate;
pub mod home;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home::index)).service(
        web::scope("/certificates")
            .route("/{id}", web::get().to(certificate::show))
            .route("/{id}/opengraph-image", web::get().to(certificate::preview_image)),
    );
}
