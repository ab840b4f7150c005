use actix_web::middleware::Logger;
use actix_web::{error, web, App, HttpResponse, HttpServer};

pub mod catalog;
pub mod cli;
pub mod document;
pub mod html;
pub mod net;
pub mod order;
pub mod state;

pub use crate::state::AppState;

use crate::cli::Cli;
use crate::net::{ListenAddress, ListenSocket};

/// Largest accepted order form body.
pub const FORM_LIMIT: usize = 1024 * 1024;

pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Register every route of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let form_config = web::FormConfig::default()
        .limit(FORM_LIMIT)
        .error_handler(|err, _req| {
            log::warn!("Rejected order form: {}", err);
            let response = HttpResponse::BadRequest()
                .content_type("text/plain; charset=utf-8")
                .body(err.to_string());
            error::InternalError::from_response(err, response).into()
        });

    cfg.app_data(form_config)
        .configure(html::handlers::config)
        .configure(order::handlers::config);
}

pub async fn run(cli: Cli, sockets: Vec<ListenSocket>) -> anyhow::Result<()> {
    let static_dir = cli.static_dir();
    let app_state = web::Data::new(AppState::new(
        &cli.articles,
        &cli.suppliers,
        cli.typesetter_config(),
        &static_dir,
    )?);
    log::info!(
        "Serving {} and {} with typesetter {}",
        cli.articles.display(),
        cli.suppliers.display(),
        cli.typesetter
    );

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(configure)
    });

    for socket in sockets {
        server = match socket {
            ListenSocket::Address(address) => {
                log::info!("Starting server at {}", address);
                match address {
                    ListenAddress::Tcp { host, port } => {
                        server.bind((ListenAddress::bind_host(&host), port))?
                    }
                    ListenAddress::Unix(path) => server.bind_uds(path)?,
                }
            }
            ListenSocket::Tcp(listener) => {
                log::info!("Starting server on inherited socket {:?}", listener.local_addr()?);
                server.listen(listener)?
            }
            ListenSocket::Unix(listener) => {
                log::info!("Starting server on inherited unix socket");
                server.listen_uds(listener)?
            }
        };
    }

    server.run().await?;
    Ok(())
}
