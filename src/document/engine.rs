//! LaTeX rendering engine.
//!
//! Handles the low-level details of writing the document to a scratch
//! directory, supervising the typesetter process, and handing the output PDF
//! to the caller.

use actix_web::web::Bytes;
use futures_util::{Stream, StreamExt};
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tempfile::TempDir;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tokio_util::io::ReaderStream;

use super::template::{render_order_tex, LATEXMKRC};
use super::RenderError;
use crate::catalog::SupplierInfo;
use crate::order::OrderArticle;

const DOCUMENT_FILE: &str = "order.tex";
const PDF_FILE: &str = "order.pdf";
const BUILD_CONFIG_FILE: &str = ".latexmkrc";
const LOG_FILE: &str = ".log";
const CHUNK_SIZE: usize = 64 * 1024;

/// How the external typesetter is invoked.
#[derive(Debug, Clone)]
pub struct TypesetterConfig {
    pub program: String,
    /// Passed before the document file name.
    pub args: Vec<String>,
    pub timeout: Duration,
    /// Time between SIGTERM and SIGKILL after a timeout.
    pub kill_grace: Duration,
}

impl Default for TypesetterConfig {
    fn default() -> Self {
        Self {
            program: "latexmk".to_string(),
            args: Vec::new(),
            timeout: Duration::from_secs(30),
            kill_grace: Duration::from_secs(1),
        }
    }
}

/// A rendered order document.
///
/// Owns the scratch directory it was built in; the directory and everything
/// in it is removed when this value, or the stream made from it, is dropped.
#[derive(Debug)]
pub struct OrderPdf {
    file: tokio::fs::File,
    len: u64,
    workdir: TempDir,
}

impl OrderPdf {
    /// Size of the PDF in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn workdir(&self) -> &Path {
        self.workdir.path()
    }

    /// Stream the PDF in 64 KiB chunks.
    pub fn into_stream(self) -> impl Stream<Item = io::Result<Bytes>> {
        let OrderPdf { file, workdir, .. } = self;
        ReaderStream::with_capacity(file, CHUNK_SIZE).map(move |chunk| {
            let _ = &workdir;
            chunk
        })
    }

    /// Read the whole PDF into memory.
    pub async fn into_bytes(mut self) -> io::Result<Vec<u8>> {
        use tokio::io::AsyncReadExt;

        let mut pdf = Vec::with_capacity(self.len as usize);
        self.file.read_to_end(&mut pdf).await?;
        Ok(pdf)
    }
}

/// Stateless engine for rendering order documents to PDF.
#[derive(Debug, Clone, Default)]
pub struct LatexRenderEngine {
    config: TypesetterConfig,
}

impl LatexRenderEngine {
    pub fn new(config: TypesetterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TypesetterConfig {
        &self.config
    }

    /// Render the order for one supplier to PDF.
    pub async fn render(
        &self,
        articles: &[OrderArticle],
        date: &str,
        info: &SupplierInfo,
    ) -> Result<OrderPdf, RenderError> {
        let workdir = tempfile::Builder::new()
            .prefix("aquaorder-")
            .tempdir()
            .map_err(RenderError::TempDir)?;

        write_new(&workdir.path().join(BUILD_CONFIG_FILE), LATEXMKRC).await?;
        write_new(
            &workdir.path().join(DOCUMENT_FILE),
            &render_order_tex(articles, date, info),
        )
        .await?;

        self.run_typesetter(workdir.path(), DOCUMENT_FILE).await?;

        let pdf_path = workdir.path().join(PDF_FILE);
        let file = tokio::fs::File::open(&pdf_path)
            .await
            .map_err(RenderError::OpenPdf)?;
        let len = file.metadata().await.map_err(RenderError::OpenPdf)?.len();
        log::debug!("Rendered {} ({} bytes)", pdf_path.display(), len);

        Ok(OrderPdf { file, len, workdir })
    }

    /// Run the typesetter on `name` inside `dir`.
    ///
    /// Both output streams go to one log file which must not exist yet. On a
    /// non-zero exit the complete log is returned as the error payload.
    pub async fn run_typesetter(&self, dir: &Path, name: &str) -> Result<(), RenderError> {
        let log_path = dir.join(LOG_FILE);
        let log = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&log_path)
            .await
            .map_err(|source| RenderError::LogFile {
                path: log_path.clone(),
                source,
            })?
            .into_std()
            .await;
        let stdout = log.try_clone().map_err(|source| RenderError::LogFile {
            path: log_path.clone(),
            source,
        })?;
        let stderr = log.try_clone().map_err(|source| RenderError::LogFile {
            path: log_path.clone(),
            source,
        })?;

        let mut child = Command::new(&self.config.program)
            .args(&self.config.args)
            .arg(name)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: self.config.program.clone(),
                source,
            })?;
        drop(log);
        log::info!(
            "Started {} {} (pid {:?})",
            self.config.program,
            name,
            child.id()
        );

        let status = match tokio::time::timeout(self.config.timeout, child.wait()).await {
            Ok(status) => status.map_err(RenderError::Wait)?,
            Err(_) => {
                log::error!(
                    "{} did not finish within {:?}, terminating",
                    self.config.program,
                    self.config.timeout
                );
                terminate(&mut child, self.config.kill_grace).await;
                return Err(RenderError::Timeout(self.config.timeout));
            }
        };

        if !status.success() {
            log::error!("{} exited with {}", self.config.program, status);
            let output = tokio::fs::read(&log_path)
                .await
                .map_err(|source| RenderError::LogFile {
                    path: log_path,
                    source,
                })?;
            return Err(RenderError::Failed {
                code: status.code(),
                log: output,
            });
        }

        log::debug!("{} exited successfully", self.config.program);
        Ok(())
    }
}

/// Ask the child to stop, and kill it if it is still alive after `grace`.
async fn terminate(child: &mut Child, grace: Duration) {
    if let Some(pid) = child.id() {
        if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            log::warn!("Failed to send SIGTERM to pid {}: {}", pid, e);
        }
    }

    if tokio::time::timeout(grace, child.wait()).await.is_err() {
        log::warn!("Typesetter ignored SIGTERM, killing it");
        if let Err(e) = child.kill().await {
            log::error!("Failed to kill typesetter: {}", e);
        }
    }
}

async fn write_new(path: &Path, content: &str) -> Result<(), RenderError> {
    let write_error = |source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(write_error)?;
    file.write_all(content.as_bytes()).await.map_err(write_error)?;
    file.flush().await.map_err(write_error)
}
