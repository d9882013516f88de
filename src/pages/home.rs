use crate::api::shared::ApiError;
use crate::services::certificate_renderer::RenderError;
use actix_web::http::header::ContentType;
use actix_web::HttpResponse;
use askama::Template;

const GENERATE_ENDPOINT: &str = "/api/v1/certificates";

#[derive(Template)]
#[template(path = "home.html")]
struct HomePage<'a> {
    api_endpoint: &'a str,
}

pub async fn index() -> Result<HttpResponse, ApiError> {
    let page = HomePage {
        api_endpoint: GENERATE_ENDPOINT,
    }
    .render()
    .map_err(RenderError::from)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(page))
}
