//! End-to-end pipeline test with a scripted translation tool.
//!
//! Drives auth -> setup -> config -> translate -> stage against a fake
//! external CLI that "translates" by copying the source specs, then checks
//! the staged index and the viewer's initial selection.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::time::Duration;

use speclingo_core::auth::{RecheckConfig, ensure_authenticated_with};
use speclingo_core::config::{LocaleConfig, generate_config};
use speclingo_core::error::Result;
use speclingo_core::lingo::{AUTH_SUCCESS_MARKER, TranslationTool};
use speclingo_core::openapi::{Document, dereference};
use speclingo_core::project::Project;
use speclingo_core::setup::copy_spec;
use speclingo_core::site::stage_site_with;
use speclingo_core::translate::run_translation;
use speclingo_core::viewer::state::{Applied, SpecBrowser, ViewerEvent, ViewerState};

const WIDGETS_SPEC: &str = r#"
openapi: 3.0.0
info:
  title: Widget API
  version: "1.0"
paths:
  /widgets:
    get:
      tags: [Widgets]
      summary: List widgets
      responses:
        "200":
          description: OK
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Widget'
components:
  schemas:
    Widget:
      type: object
      properties:
        name:
          type: string
"#;

/// Mimics the external CLI: reads `i18n.json` from the project root and
/// copies every source spec into each target language directory.
struct FakeLingo;

impl TranslationTool for FakeLingo {
    async fn auth_probe(&self) -> Result<String> {
        Ok(format!("{AUTH_SUCCESS_MARKER} fake@example.com"))
    }

    async fn login(&self) -> Result<()> {
        Ok(())
    }

    async fn run_translation(&self, project_root: &Path) -> Result<()> {
        let raw = fs::read_to_string(project_root.join("i18n.json")).unwrap();
        let config: LocaleConfig = serde_json::from_str(&raw).unwrap();
        let source_dir = project_root.join("i18n").join(&config.locale.source);
        for target in &config.locale.targets {
            let target_dir = project_root.join("i18n").join(target);
            fs::create_dir_all(&target_dir).unwrap();
            for entry in fs::read_dir(&source_dir).unwrap() {
                let entry = entry.unwrap();
                fs::copy(entry.path(), target_dir.join(entry.file_name())).unwrap();
            }
        }
        Ok(())
    }
}

#[tokio::test]
async fn generate_then_stage_yields_index_and_initial_selection() {
    let dir = tempfile::tempdir().unwrap();
    let project = Project::new(dir.path().join(".speclingo"));
    let spec_path = dir.path().join("spec.yaml");
    fs::write(&spec_path, WIDGETS_SPEC).unwrap();

    let tool = FakeLingo;
    let recheck = RecheckConfig {
        attempts: 1,
        delay: Duration::from_millis(1),
    };
    ensure_authenticated_with(&tool, &recheck).await.unwrap();
    copy_spec(&project, &spec_path, "en").unwrap();
    let targets = generate_config(&project, "en", "es").unwrap();
    assert_eq!(targets, ["es"]);
    run_translation(&tool, &project).await.unwrap();

    let index = stage_site_with(&project, None).unwrap();
    assert_eq!(index["en"], vec!["api.yaml"]);
    assert_eq!(index["es"], vec!["api.yaml"]);

    // The staged Spanish copy parses, dereferences, and selects the first
    // operation under its declared tag.
    let raw = fs::read_to_string(project.assets_dir().join("i18n/es/api.yaml")).unwrap();
    let value: serde_yaml::Value = serde_yaml::from_str(&raw).unwrap();
    let document = Document::from_value(&dereference(&value).unwrap());

    let mut browser = SpecBrowser::new();
    let seq = match browser.apply(ViewerEvent::LanguageChanged {
        language: "es".to_string(),
        file: "api.yaml".to_string(),
    }) {
        Applied::LoadStarted { seq } => seq,
        other => panic!("expected LoadStarted, got {other:?}"),
    };
    browser.apply(ViewerEvent::SpecLoaded { seq, document });

    let ViewerState::Ready(view) = browser.state() else {
        panic!("expected ready state");
    };
    let selected = view.selected.clone().unwrap();
    assert_eq!(selected.path, "/widgets");
    assert_eq!(selected.method, "get");
    assert_eq!(
        view.document.operation("/widgets", "get").unwrap().tags,
        ["Widgets"]
    );
}
