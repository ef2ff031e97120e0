//! Authentication gate for the external translation CLI.

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::error::{Error, Result};
use crate::lingo::{AUTH_SUCCESS_MARKER, TranslationTool};

/// Re-probe attempts after an interactive login.
const RECHECK_ATTEMPTS: u32 = 2;
/// Delay before each post-login re-probe.
const RECHECK_DELAY: Duration = Duration::from_secs(2);

/// How long and how often to re-probe after login.
#[derive(Debug, Clone)]
pub struct RecheckConfig {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RecheckConfig {
    fn default() -> Self {
        Self {
            attempts: RECHECK_ATTEMPTS,
            delay: RECHECK_DELAY,
        }
    }
}

/// Probe the external tool and match the success marker in its output.
/// Probe failures count as "not authenticated", never as fatal errors.
pub async fn is_authenticated<T: TranslationTool>(tool: &T) -> bool {
    match tool.auth_probe().await {
        Ok(output) => output.contains(AUTH_SUCCESS_MARKER),
        Err(err) => {
            debug!(%err, "Auth probe failed");
            false
        }
    }
}

/// Ensure an authenticated session, launching the interactive login flow
/// when needed. The pipeline blocks until this resolves.
pub async fn ensure_authenticated<T: TranslationTool>(tool: &T) -> Result<()> {
    ensure_authenticated_with(tool, &RecheckConfig::default()).await
}

pub async fn ensure_authenticated_with<T: TranslationTool>(
    tool: &T,
    recheck: &RecheckConfig,
) -> Result<()> {
    if is_authenticated(tool).await {
        println!("✓ Authenticated");
        return Ok(());
    }

    println!("Opening browser for authentication...");
    tool.login().await.map_err(|err| Error::LoginFailed {
        reason: err.to_string(),
    })?;
    println!("✓ Login complete");

    for attempt in 1..=recheck.attempts {
        sleep(recheck.delay).await;
        if is_authenticated(tool).await {
            println!("✓ Successfully authenticated");
            return Ok(());
        }
        if attempt < recheck.attempts {
            println!("Auth check failed. Retrying ({attempt}/{})...", recheck.attempts);
        }
    }

    Err(Error::AuthVerificationFailed)
}
