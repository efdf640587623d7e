//! 標準環境変数解決実装（std::env を委譲）

use crate::domain::HomeDir;
use crate::error::Error;
use crate::ports::outbound::EnvResolver;
use std::env;
use std::path::PathBuf;

/// 標準環境変数解決実装
#[derive(Debug, Clone, Default)]
pub struct StdEnvResolver;

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

impl EnvResolver for StdEnvResolver {
    fn resolve_home_dir(&self) -> Result<HomeDir, Error> {
        if let Some(home) = non_empty_var("DOCSH_HOME") {
            return Ok(HomeDir::new(PathBuf::from(home)));
        }

        let config_base = non_empty_var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| non_empty_var("HOME").map(|h| PathBuf::from(h).join(".config")))
            .ok_or_else(|| Error::env("HOME is not set"))?;

        let mut path = config_base;
        path.push("docsh");
        Ok(HomeDir::new(path))
    }

    fn webhook_base_override(&self) -> Option<String> {
        non_empty_var("DOCSH_WEBHOOK_BASE")
    }

    fn user_id_override(&self) -> Option<String> {
        non_empty_var("DOCSH_USER_ID")
    }

    fn timeout_secs_override(&self) -> Option<u64> {
        non_empty_var("DOCSH_TIMEOUT_SECS").and_then(|s| s.trim().parse::<u64>().ok())
    }
}
