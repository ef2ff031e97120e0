//! Wrapper around the external `lingo.dev` CLI.
//!
//! The tool is modeled as an injected capability so the orchestration
//! (retry, sequencing) can be exercised with fakes in tests.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

/// Marker the auth probe's output must contain for an authenticated session.
pub const AUTH_SUCCESS_MARKER: &str = "Authenticated as";

const NPX_BINARY: &str = "npx";
const LINGO_PACKAGE: &str = "lingo.dev@latest";

#[allow(async_fn_in_trait)]
pub trait TranslationTool {
    /// Captured output of the authentication status probe. An error means
    /// the probe could not complete (spawn failure or non-zero exit);
    /// interpreting the output is the caller's business.
    async fn auth_probe(&self) -> Result<String>;

    /// Interactive login flow, wired to the controlling terminal.
    async fn login(&self) -> Result<()>;

    /// One translation run from `project_root`; output streams to the
    /// terminal so the external tool's progress stays visible.
    async fn run_translation(&self, project_root: &Path) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct LingoCli {
    npx: PathBuf,
}

impl LingoCli {
    /// Resolve `npx` up front so missing tooling surfaces before any
    /// pipeline stage runs.
    pub fn new() -> Result<Self> {
        let npx = which::which(NPX_BINARY).map_err(|err| {
            Error::io(
                "npx not found on PATH (install Node.js to use the lingo.dev CLI)",
                std::io::Error::other(err),
            )
        })?;
        Ok(Self { npx })
    }

    fn command(&self, subcommand: &str) -> Command {
        let mut cmd = Command::new(&self.npx);
        cmd.arg(LINGO_PACKAGE).arg(subcommand);
        cmd
    }

    fn display(subcommand: &str) -> String {
        format!("{NPX_BINARY} {LINGO_PACKAGE} {subcommand}")
    }
}

impl TranslationTool for LingoCli {
    async fn auth_probe(&self) -> Result<String> {
        let output = self
            .command("auth")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|err| Error::io("Failed to spawn lingo.dev auth probe", err))?;

        debug!(code = ?output.status.code(), "Auth probe finished");
        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: Self::display("auth"),
                code: output.status.code(),
            });
        }

        // The CLI reports on either stream depending on version.
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(combined)
    }

    async fn login(&self) -> Result<()> {
        let status = self
            .command("login")
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|err| Error::io("Failed to spawn lingo.dev login", err))?;

        if !status.success() {
            return Err(Error::CommandFailed {
                command: Self::display("login"),
                code: status.code(),
            });
        }
        Ok(())
    }

    async fn run_translation(&self, project_root: &Path) -> Result<()> {
        let status = self
            .command("run")
            .current_dir(project_root)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|err| Error::io("Failed to spawn lingo.dev run", err))?;

        if !status.success() {
            return Err(Error::CommandFailed {
                command: Self::display("run"),
                code: status.code(),
            });
        }
        Ok(())
    }
}
