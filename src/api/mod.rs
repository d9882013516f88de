// src/api/mod.rs
pub mod certificates;
pub mod health;
pub mod shared;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(certificates::configure)
            .configure(health::configure),
    );
}
