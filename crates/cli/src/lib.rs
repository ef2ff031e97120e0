//! Command implementations for the `speclingo` binary.

pub mod generate;
pub mod serve;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use speclingo_core::Error;

/// Run a command future, print any fatal error together with its recovery
/// hint, and map the outcome to a process exit code.
pub async fn run_cli_async<F, Fut>(f: F) -> i32
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<(), Error>>,
{
    match f().await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{}", console::style(format!("✖ {err}")).red());
            if let Some(hint) = err.recovery_hint() {
                eprintln!("{hint}");
            }
            1
        }
    }
}

pub(crate) fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());
    spinner
}

pub(crate) fn run_step_with_spinner<T>(
    description: &str,
    success_message: &str,
    f: impl FnOnce() -> Result<T, Error>,
) -> Result<T, Error> {
    let spinner = spinner(description);
    let result = f();
    spinner.finish_and_clear();
    if result.is_ok() {
        println!("✓ {success_message}");
    }
    result
}
