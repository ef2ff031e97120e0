//! The `generate` command: auth, setup, config, translate.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::debug;

use speclingo_core::Result;
use speclingo_core::auth::ensure_authenticated;
use speclingo_core::config::generate_config;
use speclingo_core::lingo::LingoCli;
use speclingo_core::project::{I18N_DIR, Project, SPEC_FILENAME};
use speclingo_core::setup::copy_spec;
use speclingo_core::translate::run_translation;

use crate::{run_cli_async, run_step_with_spinner, spinner};

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(long, value_name = "PATH", help = "Path to your OpenAPI spec file")]
    pub spec: PathBuf,
    #[arg(
        long,
        value_name = "LANGUAGES",
        help = "Target languages, e.g. es,fr,de"
    )]
    pub languages: String,
    #[arg(
        long,
        value_name = "LANG",
        default_value = "en",
        help = "Source language of the spec file"
    )]
    pub source: String,
}

pub async fn run(args: GenerateArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: GenerateArgs) -> Result<()> {
    println!("\n{}\n", style("🌍 Speclingo").bold());
    let project = Project::from_env();
    debug!(root = %project.root().display(), "Using project root");
    let tool = LingoCli::new()?;

    // Step 1: make sure the external CLI has an authenticated session.
    println!("Checking authentication (first run may download the lingo.dev CLI)...");
    ensure_authenticated(&tool).await?;

    // Step 2: folder structure and spec copy.
    run_step_with_spinner("Setting up project...", "Project setup complete", || {
        copy_spec(&project, &args.spec, &args.source).map(|_| ())
    })?;

    // Step 3: locale configuration.
    let config_spinner = spinner("Generating config...");
    let targets = generate_config(&project, &args.source, &args.languages);
    config_spinner.finish_and_clear();
    let targets = targets?;
    println!("✓ Config generated for: {}", targets.join(", "));

    // Step 4: translation. The external tool streams its own progress.
    println!("Translating...");
    run_translation(&tool, &project).await?;
    println!("✓ Translation complete");

    println!("\n{}\n", style("✔ Done! Your translated specs are in:").bold());
    for language in &targets {
        println!(
            "  {}",
            style(format!(
                "{}/{I18N_DIR}/{language}/{SPEC_FILENAME}",
                project.root().display()
            ))
            .cyan()
        );
    }
    println!("\nTo view your docs, run:");
    println!("  {}\n", style("speclingo serve").cyan());

    Ok(())
}
