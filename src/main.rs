use aquaorder::cli::Cli;
use aquaorder::net::{systemd, ListenSocket};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    aquaorder::init_logging();

    let sockets = if cli.systemd {
        match systemd::listen_sockets() {
            Ok(sockets) => sockets,
            Err(e) => Cli::command()
                .error(ErrorKind::ArgumentConflict, format!("--systemd: {}", e))
                .exit(),
        }
    } else {
        cli.listen
            .iter()
            .cloned()
            .map(ListenSocket::Address)
            .collect()
    };

    aquaorder::run(cli, sockets).await
}
