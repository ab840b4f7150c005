mod common;

use futures_util::StreamExt;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use std::path::Path;
use std::time::{Duration, Instant};

use aquaorder::catalog::{Scalar, SupplierInfo};
use aquaorder::document::{LatexRenderEngine, RenderError, TypesetterConfig};
use aquaorder::order::OrderArticle;
use common::{shell_typesetter, COPY_SCRIPT};

const PID_FILE: &str = "typesetter.pid";

fn supplier() -> SupplierInfo {
    SupplierInfo {
        name: "ACME Corp.".to_string(),
        customer_id: Scalar::Integer(4711),
        tax_id: "DE123456789".to_string(),
        from_address: "Hauptstraße 1, 12345 Berlin".to_string(),
        from_name: "Aqua Shop".to_string(),
        from_phone: "030 123456".to_string(),
    }
}

fn articles() -> Vec<OrderArticle> {
    let mut widget = OrderArticle::new("Widget", "5");
    widget.id = Some("17".to_string());
    widget.size = Some("2x3.5".to_string());
    vec![widget, OrderArticle::new("Bolt & Nut", "2")]
}

fn is_running(pid_file: &Path) -> bool {
    let pid: i32 = std::fs::read_to_string(pid_file)
        .unwrap()
        .trim()
        .parse()
        .unwrap();
    kill(Pid::from_raw(pid), None).is_ok()
}

fn timing_out(script: &str) -> TypesetterConfig {
    TypesetterConfig {
        timeout: Duration::from_millis(300),
        kill_grace: Duration::from_millis(200),
        ..shell_typesetter(script)
    }
}

#[tokio::test]
async fn test_render_returns_pdf_and_cleans_up() {
    let engine = LatexRenderEngine::new(shell_typesetter(COPY_SCRIPT));
    let pdf = engine
        .render(&articles(), "2024-03-01", &supplier())
        .await
        .unwrap();

    let workdir = pdf.workdir().to_path_buf();
    assert!(workdir.join(".latexmkrc").is_file());
    assert!(workdir.join(".log").is_file());
    assert!(!pdf.is_empty());

    let len = pdf.len();
    let bytes = pdf.into_bytes().await.unwrap();
    assert_eq!(bytes.len() as u64, len);
    let tex = String::from_utf8(bytes).unwrap();
    assert!(tex.starts_with(r"\documentclass"));
    assert!(tex.contains(r"Bolt \& Nut"));
    assert!(!workdir.exists());
}

#[tokio::test]
async fn test_stream_keeps_workdir_until_dropped() {
    let engine = LatexRenderEngine::new(shell_typesetter(COPY_SCRIPT));
    let pdf = engine
        .render(&articles(), "2024-03-01", &supplier())
        .await
        .unwrap();
    let workdir = pdf.workdir().to_path_buf();
    let len = pdf.len();

    let mut stream = Box::pin(pdf.into_stream());
    let mut received = 0;
    while let Some(chunk) = stream.next().await {
        assert!(workdir.exists());
        received += chunk.unwrap().len() as u64;
    }
    assert_eq!(received, len);

    drop(stream);
    assert!(!workdir.exists());
}

#[tokio::test]
async fn test_each_render_gets_its_own_directory() {
    let engine = LatexRenderEngine::new(shell_typesetter(COPY_SCRIPT));
    let (articles_a, supplier_a) = (articles(), supplier());
    let (articles_b, supplier_b) = (articles(), supplier());
    let (a, b) = tokio::join!(
        engine.render(&articles_a, "2024-03-01", &supplier_a),
        engine.render(&articles_b, "2024-03-02", &supplier_b),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_ne!(a.workdir(), b.workdir());
}

#[tokio::test]
async fn test_failed_run_returns_raw_log() {
    let engine = LatexRenderEngine::new(shell_typesetter(
        r"printf 'bad\377output\n'; echo oops >&2; exit 3",
    ));
    let dir = tempfile::tempdir().unwrap();
    match engine.run_typesetter(dir.path(), "order.tex").await {
        Err(RenderError::Failed { code, log }) => {
            assert_eq!(code, Some(3));
            assert_eq!(log, b"bad\xffoutput\noops\n".to_vec());
        }
        other => panic!("expected failed run, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_render_removes_workdir() {
    let marker_dir = tempfile::tempdir().unwrap();
    let marker_file = marker_dir.path().join("workdir");
    let engine = LatexRenderEngine::new(shell_typesetter(&format!(
        "pwd > '{}'; exit 1",
        marker_file.display()
    )));
    let result = engine.render(&articles(), "2024-03-01", &supplier()).await;
    assert!(matches!(result, Err(RenderError::Failed { code: Some(1), .. })));

    let workdir = std::fs::read_to_string(&marker_file).unwrap();
    assert!(!Path::new(workdir.trim()).exists());
}

#[tokio::test]
async fn test_missing_pdf_is_reported() {
    let engine = LatexRenderEngine::new(shell_typesetter("true"));
    let result = engine.render(&articles(), "2024-03-01", &supplier()).await;
    assert!(matches!(result, Err(RenderError::OpenPdf(_))));
}

#[tokio::test]
async fn test_timeout_terminates_typesetter() {
    let engine = LatexRenderEngine::new(timing_out(&format!("echo $$ > {}; exec sleep 30", PID_FILE)));
    let dir = tempfile::tempdir().unwrap();

    let started = Instant::now();
    let result = engine.run_typesetter(dir.path(), "order.tex").await;
    assert!(matches!(result, Err(RenderError::Timeout(t)) if t == Duration::from_millis(300)));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(!is_running(&dir.path().join(PID_FILE)));
}

#[tokio::test]
async fn test_timeout_kills_typesetter_ignoring_sigterm() {
    let engine = LatexRenderEngine::new(timing_out(&format!(
        "trap '' TERM; echo $$ > {}; while :; do sleep 0.05; done",
        PID_FILE
    )));
    let dir = tempfile::tempdir().unwrap();

    let started = Instant::now();
    let result = engine.run_typesetter(dir.path(), "order.tex").await;
    assert!(matches!(result, Err(RenderError::Timeout(_))));
    assert!(started.elapsed() >= Duration::from_millis(500));
    assert!(!is_running(&dir.path().join(PID_FILE)));
}
