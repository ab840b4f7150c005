use actix_files::NamedFile;
use actix_web::{web, HttpResponse, Responder};
use chrono::Local;

use crate::AppState;

pub const STYLESHEET_FILE: &str = "style.css";

/// GET / - the catalog order form
pub async fn index(state: web::Data<AppState>) -> impl Responder {
    log::info!("Executing index handler");

    let sections = match state.articles.load() {
        Ok(sections) => sections,
        Err(e) => {
            log::error!("Article catalog unavailable: {}", e);
            return HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body(e.to_string());
        }
    };

    match state.catalog_page.render(&sections, Local::now().naive_local()) {
        Ok(body) => HttpResponse::Ok()
            .content_type("application/xhtml+xml")
            .body(body),
        Err(e) => {
            log::error!("Failed to render catalog page: {}", e);
            HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body(e.to_string())
        }
    }
}

/// GET /style.css
pub async fn stylesheet(state: web::Data<AppState>) -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open_async(state.static_dir.join(STYLESHEET_FILE)).await?)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/style.css").route(web::get().to(stylesheet)));
}
