use actix_web::body::SizedStream;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};

use super::{assemble, FormFields, OrderError};
use crate::document::common::sanitize_filename;
use crate::AppState;

/// POST /order - typeset the submitted order for one supplier
pub async fn submit_order(
    state: web::Data<AppState>,
    form: web::Form<Vec<(String, String)>>,
) -> Result<HttpResponse, OrderError> {
    log::info!("Executing submit_order handler");

    let fields = FormFields::new(form.into_inner());
    if fields.is_empty() {
        return Err(OrderError::EmptyForm);
    }
    let supplier = fields
        .get("supplier")
        .ok_or(OrderError::MissingField("supplier"))?;
    let date = fields.get("date").ok_or(OrderError::MissingField("date"))?;

    let mut orders = assemble(&fields)?;
    let articles = orders
        .swap_remove(supplier)
        .ok_or_else(|| OrderError::NoOrderLines(supplier.to_string()))?;
    log::debug!("{} order line(s) for {}", articles.len(), supplier);

    let directory = state.suppliers.load_directory()?;
    let info = directory
        .get(supplier)
        .ok_or_else(|| OrderError::UnknownSupplier(supplier.to_string()))?;

    let pdf = match state.engine.render(&articles, date, info).await {
        Ok(pdf) => pdf,
        Err(e) => {
            log::error!("Failed to render order for {}: {}", supplier, e);
            return Err(e.into());
        }
    };
    log::info!("Order for {} rendered ({} bytes)", supplier, pdf.len());

    let filename = format!(
        "{}.pdf",
        sanitize_filename(&format!("order {} {}", supplier, date), "order")
    );
    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Inline,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .body(SizedStream::new(pdf.len(), pdf.into_stream())))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/order").route(web::post().to(submit_order)))
        .service(web::resource("/order/{tail:.*}").route(web::post().to(submit_order)));
}
