//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

use aquaorder::document::TypesetterConfig;
use aquaorder::AppState;

pub const ARTICLES: &str = r#"
- acme: {name: Widget, id: 17, size: 2x3.5}
  globex: {name: Gizmo}
- hint: seasonal
  acme: {name: "Bolt & Nut", size: 8}
---
- globex: {name: Screw, id: S-1}
"#;

pub const SUPPLIERS: &str = r#"
acme:
  name: ACME Corp.
  customer_id: 4711
  tax_id: DE123456789
  from_address: Hauptstraße 1, 12345 Berlin
  from_name: Aqua Shop
  from_phone: 030 123456
---
globex:
  name: Globex GmbH
  customer_id: G-42
  tax_id: DE987654321
  from_address: Hauptstraße 1, 12345 Berlin
  from_name: Aqua Shop
  from_phone: 030 123456
"#;

/// Copies the document to the PDF; stands in for latexmk.
pub const COPY_SCRIPT: &str = r#"echo "typesetting $1"; cp "$1" order.pdf"#;

/// Scratch directory holding both configuration files.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let fixture = Fixture {
            dir: tempfile::tempdir().unwrap(),
        };
        fixture.write("articles.yaml", ARTICLES);
        fixture.write("suppliers.yaml", SUPPLIERS);
        fixture
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn state(&self, typesetter: TypesetterConfig) -> AppState {
        AppState::new(
            self.path("articles.yaml"),
            self.path("suppliers.yaml"),
            typesetter,
            &static_dir(),
        )
        .unwrap()
    }
}

pub fn static_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("static")
}

/// A typesetter running `script` under `sh`, with the document name as `$1`.
pub fn shell_typesetter(script: &str) -> TypesetterConfig {
    TypesetterConfig {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string(), "typesetter".to_string()],
        timeout: Duration::from_secs(10),
        kill_grace: Duration::from_millis(200),
    }
}
