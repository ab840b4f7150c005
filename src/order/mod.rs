//! Order module - order form submission and per-supplier order lines.
//!
//! - `model` - Order lines and ordered form fields
//! - `assembler` - Form fields to per-supplier order lines
//! - `handlers` - `POST /order` producing the order PDF

pub mod assembler;
pub mod handlers;
pub mod model;

pub use assembler::{assemble, AssembleError};
pub use model::{FormFields, Order, OrderArticle};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::catalog::ConfigError;
use crate::document::RenderError;

/// Everything that can stop an order submission.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("empty order form")]
    EmptyForm,
    #[error("missing field {0}")]
    MissingField(&'static str),
    #[error(transparent)]
    Assemble(#[from] AssembleError),
    #[error("order for supplier {0} not found")]
    NoOrderLines(String),
    #[error("supplier info for {0} not found")]
    UnknownSupplier(String),
    #[error("configuration unavailable: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ResponseError for OrderError {
    fn status_code(&self) -> StatusCode {
        match self {
            OrderError::Config(_) | OrderError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            // the typesetter log, byte for byte
            OrderError::Render(RenderError::Failed { log, .. }) => log.clone(),
            other => other.to_string().into_bytes(),
        };
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_client_errors_are_bad_requests() {
        for err in [
            OrderError::EmptyForm,
            OrderError::MissingField("date"),
            OrderError::Assemble(AssembleError::MissingField("1_supplier".to_string())),
            OrderError::NoOrderLines("acme".to_string()),
            OrderError::UnknownSupplier("acme".to_string()),
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{}", err);
        }
    }

    #[test]
    fn test_render_errors_are_server_errors() {
        let err = OrderError::Render(RenderError::Timeout(Duration::from_secs(30)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "typesetter did not finish within 30s");
    }

    #[test]
    fn test_messages_name_the_problem() {
        assert_eq!(OrderError::MissingField("supplier").to_string(), "missing field supplier");
        assert_eq!(
            OrderError::Assemble(AssembleError::MissingField("2_acme_name".to_string())).to_string(),
            "missing field 2_acme_name"
        );
        assert_eq!(
            OrderError::NoOrderLines("acme".to_string()).to_string(),
            "order for supplier acme not found"
        );
    }
}
