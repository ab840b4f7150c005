use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use std::time::Duration;

use crate::document::TypesetterConfig;
use crate::net::ListenAddress;
use crate::state::default_static_dir;

#[derive(Debug, Parser)]
#[command(name = "aquaorder")]
#[command(about = "Order form service for supplier catalogs", long_about = None)]
#[command(group(ArgGroup::new("sockets").required(true).args(["systemd", "listen"])))]
pub struct Cli {
    /// YAML file with the article catalog
    #[arg(long, value_name = "PATH")]
    pub articles: PathBuf,

    /// YAML file with the supplier directory
    #[arg(long, value_name = "PATH")]
    pub suppliers: PathBuf,

    /// Use the sockets passed by systemd
    #[arg(long)]
    pub systemd: bool,

    /// HOST:PORT, [IPV6]:PORT or a unix socket path; may be repeated
    #[arg(short, long, value_name = "ADDR")]
    pub listen: Vec<ListenAddress>,

    /// Typesetter program run in the document directory
    #[arg(long, env = "AQUAORDER_TYPESETTER", default_value = "latexmk")]
    pub typesetter: String,

    /// Extra typesetter argument, placed before the document name
    #[arg(long = "typesetter-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub typesetter_args: Vec<String>,

    /// Seconds a typesetter run may take
    #[arg(long, env = "AQUAORDER_RENDER_TIMEOUT", default_value_t = 30, value_name = "SECONDS")]
    pub render_timeout: u64,

    /// Seconds between SIGTERM and SIGKILL for a typesetter that timed out
    #[arg(long, default_value_t = 1, value_name = "SECONDS")]
    pub kill_grace: u64,

    /// Directory holding the page template and stylesheet
    #[arg(long, env = "AQUAORDER_STATIC_DIR", value_name = "DIR")]
    pub static_dir: Option<PathBuf>,
}

impl Cli {
    pub fn typesetter_config(&self) -> TypesetterConfig {
        TypesetterConfig {
            program: self.typesetter.clone(),
            args: self.typesetter_args.clone(),
            timeout: Duration::from_secs(self.render_timeout),
            kill_grace: Duration::from_secs(self.kill_grace),
        }
    }

    pub fn static_dir(&self) -> PathBuf {
        self.static_dir.clone().unwrap_or_else(default_static_dir)
    }
}
