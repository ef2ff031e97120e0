//! Error taxonomy shared by the pipeline and the viewer.

use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Spec file not found: {}", path.display())]
    SpecNotFound { path: PathBuf },

    #[error("No target languages provided")]
    NoTargetLanguages,

    #[error("Login failed: {reason}")]
    LoginFailed { reason: String },

    #[error("Authentication failed after login")]
    AuthVerificationFailed,

    #[error("Translation failed after {attempts} attempts")]
    TranslationFailed { attempts: u32 },

    #[error("Project not set up at {}", root.display())]
    ProjectNotSetUp { root: PathBuf },

    #[error("Failed to start viewer server: {reason}")]
    ServerStartFailed { reason: String },

    #[error("Failed to fetch {url}: {reason}")]
    SpecFetchFailed { url: String, reason: String },

    #[error("Failed to parse {name}: {reason}")]
    SpecParseFailed { name: String, reason: String },

    #[error("Failed to resolve reference {pointer}: {reason}")]
    SpecDereferenceFailed { pointer: String, reason: String },

    #[error("Command `{command}` exited with {}", exit_description(.code))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl Error {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Manual-recovery instructions printed alongside fatal errors.
    pub fn recovery_hint(&self) -> Option<&'static str> {
        match self {
            Self::AuthVerificationFailed => {
                Some("Please run `npx lingo.dev@latest login` manually and try again.")
            }
            Self::TranslationFailed { .. } => {
                Some("Please try running manually: npx lingo.dev@latest run")
            }
            Self::ProjectNotSetUp { .. } => {
                Some("Run `speclingo generate --spec <path> --languages <codes>` first.")
            }
            _ => None,
        }
    }
}
