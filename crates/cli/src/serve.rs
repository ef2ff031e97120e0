//! The `serve` command: stage static assets and run the viewer server.

use clap::Args;
use console::style;
use tokio::net::TcpListener;
use tracing::debug;

use speclingo_core::error::{Error, Result};
use speclingo_core::project::Project;
use speclingo_core::server::{BIND_HOST, DEFAULT_PORT, run_server};
use speclingo_core::site::stage_site;

use crate::run_cli_async;

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(
        short = 'p',
        long,
        default_value_t = DEFAULT_PORT,
        help = "Port for the viewer server"
    )]
    pub port: u16,
}

pub async fn run(args: ServeArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: ServeArgs) -> Result<()> {
    let project = Project::from_env();
    debug!(root = %project.root().display(), "Using project root");

    let index = stage_site(&project)?;
    let specs: usize = index.values().map(Vec::len).sum();
    println!(
        "✓ Staged {specs} spec file(s) across {} language(s)",
        index.len()
    );

    let listener = TcpListener::bind((BIND_HOST, args.port))
        .await
        .map_err(|err| Error::ServerStartFailed {
            reason: format!("could not bind {BIND_HOST}:{}: {err}", args.port),
        })?;
    println!(
        "\n📖 API docs available at {}\n",
        style(format!("http://localhost:{}", args.port)).cyan()
    );

    // Foreground server; runs until the process is terminated.
    run_server(project.assets_dir(), listener).await
}
