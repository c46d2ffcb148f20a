use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use nerdhub_client::ApiSettings;
use nerdhub_core::version::DEV_PRERELEASE;
use nerdhub_core::PollPolicy;

use crate::cli::GlobalOptions;

const PREFS_FILENAME: &str = ".nerdhub_prefs.ron";
const IDENTITY_FILENAME: &str = ".nerdhub_identity.json";
const LOG_FILENAME: &str = "nerdhub.log";

/// Resolved runtime configuration for one invocation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    api_root: Option<String>,
    pub state_dir: PathBuf,
    pub poll_policy: PollPolicy,
    pub client_version: String,
}

impl AppConfig {
    pub fn from_options(options: &GlobalOptions) -> Result<Self> {
        let state_dir = match &options.state_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Cannot determine the current directory")?,
        };

        let defaults = PollPolicy::default();
        let poll_policy = PollPolicy {
            default_delay: Duration::from_millis(options.poll_default_ms),
            max_delay: defaults.max_delay,
            max_attempts: (options.poll_max_attempts > 0).then_some(options.poll_max_attempts),
        };

        Ok(Self {
            api_root: options
                .api_root
                .as_ref()
                .map(|root| root.trim().to_string())
                .filter(|root| !root.is_empty()),
            state_dir,
            poll_policy,
            client_version: option_env!("NERDHUB_VERSION")
                .unwrap_or(DEV_PRERELEASE)
                .to_string(),
        })
    }

    /// Settings for commands that talk to the backend.
    pub fn api_settings(&self) -> Result<ApiSettings> {
        let root = self
            .api_root
            .clone()
            .context("No API root configured; pass --api-root or set NERDHUB_API_ROOT")?;
        Ok(ApiSettings::new(root))
    }

    pub fn prefs_path(&self) -> PathBuf {
        self.state_dir.join(PREFS_FILENAME)
    }

    pub fn identity_path(&self) -> PathBuf {
        self.state_dir.join(IDENTITY_FILENAME)
    }
}

pub fn log_path() -> PathBuf {
    PathBuf::from(".").join(LOG_FILENAME)
}
