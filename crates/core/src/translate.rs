//! Translation runner: bounded retries around the external CLI.

use tracing::warn;

use crate::error::{Error, Result};
use crate::lingo::TranslationTool;
use crate::project::Project;
use crate::retry::{RetryPolicy, with_retry};

/// Total attempts for the translation subprocess; failures re-spawn
/// immediately, the external tool owns any per-file partial progress.
pub const TRANSLATION_ATTEMPTS: u32 = 2;

/// Invoke the external translation run from the project root. Succeeds on
/// the first clean exit; all-or-nothing per invocation.
pub async fn run_translation<T: TranslationTool>(tool: &T, project: &Project) -> Result<()> {
    let policy = RetryPolicy::translation();
    with_retry(policy, "translation run", || {
        tool.run_translation(project.root())
    })
    .await
    .map_err(|err| {
        warn!(%err, "Translation attempts exhausted");
        Error::TranslationFailed {
            attempts: policy.max_attempts,
        }
    })
}
