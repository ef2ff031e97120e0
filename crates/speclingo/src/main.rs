use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use speclingo_cli::{generate, serve};

#[derive(Parser, Debug)]
#[command(
    name = "speclingo",
    version,
    about = "Translate your OpenAPI spec into multiple languages and browse the results"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate an OpenAPI spec into multiple languages
    Generate(generate::GenerateArgs),
    /// Stage the translated specs and serve the documentation viewer
    Serve(serve::ServeArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("speclingo=warn")),
        )
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Generate(args) => generate::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
    };
    std::process::exit(code);
}
