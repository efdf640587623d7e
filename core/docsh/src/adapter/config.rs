//! 設定の読み込み（adapter 層）
//!
//! 優先順位: CLI > 環境変数 > $DOCSH_HOME/config/docsh.json > 既定値

use crate::domain::DocshConfig;
use common::domain::{BaseUrl, Dirs};
use common::error::Error;
use common::ports::outbound::{EnvResolver, FileSystem};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// docsh.json の内容（すべて省略可）
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    user_id: Option<String>,
    timeout_secs: Option<u64>,
    #[serde(default)]
    endpoints: BTreeMap<String, String>,
}

/// CLI で指定された上書き値
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub user_id: Option<String>,
}

fn read_config_file(fs: &dyn FileSystem, dirs: &Dirs) -> Result<ConfigFile, Error> {
    let path = dirs.config_file();
    if !fs.exists(&path) {
        return Ok(ConfigFile::default());
    }
    let content = fs.read_to_string(&path)?;
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_json::from_str(&content)
        .map_err(|e| Error::env(format!("Invalid config file {}: {}", path.display(), e)))
}

pub fn load_config(
    fs: &dyn FileSystem,
    env: &dyn EnvResolver,
    dirs: &Dirs,
    cli: &CliOverrides,
) -> Result<DocshConfig, Error> {
    let file = read_config_file(fs, dirs)?;
    let mut config = DocshConfig::default();

    if let Some(base) = cli
        .base_url
        .clone()
        .or_else(|| env.webhook_base_override())
        .or(file.base_url)
        .filter(|s| !s.trim().is_empty())
    {
        config.base_url = BaseUrl::new(base.trim());
    }
    if let Some(user) = cli
        .user_id
        .clone()
        .or_else(|| env.user_id_override())
        .or(file.user_id)
        .filter(|s| !s.trim().is_empty())
    {
        config.user_id = user.trim().to_string();
    }
    match env.timeout_secs_override().or(file.timeout_secs) {
        Some(0) => return Err(Error::env("timeout_secs must be greater than 0")),
        Some(secs) => config.timeout = Duration::from_secs(secs),
        None => {}
    }
    config.endpoint_overrides = file.endpoints;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentKind, Endpoint};
    use common::adapter::StdFileSystem;
    use common::domain::HomeDir;

    struct FakeEnv {
        base: Option<String>,
        user: Option<String>,
        timeout: Option<u64>,
    }

    impl EnvResolver for FakeEnv {
        fn resolve_home_dir(&self) -> Result<HomeDir, Error> {
            Err(Error::env("not used"))
        }
        fn webhook_base_override(&self) -> Option<String> {
            self.base.clone()
        }
        fn user_id_override(&self) -> Option<String> {
            self.user.clone()
        }
        fn timeout_secs_override(&self) -> Option<u64> {
            self.timeout
        }
    }

    fn no_env() -> FakeEnv {
        FakeEnv {
            base: None,
            user: None,
            timeout: None,
        }
    }

    fn dirs_in(tmp: &tempfile::TempDir) -> Dirs {
        Dirs {
            config_dir: tmp.path().join("config"),
            state_dir: tmp.path().join("state"),
        }
    }

    #[test]
    fn test_defaults_without_file() {
        let tmp = tempfile::tempdir().unwrap();
        let c = load_config(&StdFileSystem, &no_env(), &dirs_in(&tmp), &CliOverrides::default()).unwrap();
        assert_eq!(c, DocshConfig::default());
    }

    #[test]
    fn test_file_then_env_then_cli() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = dirs_in(&tmp);
        std::fs::create_dir_all(&dirs.config_dir).unwrap();
        std::fs::write(
            dirs.config_file(),
            r#"{"base_url":"http://file/webhook","user_id":"file-user","timeout_secs":30,
                "endpoints":{"report_message":"custom/report"}}"#,
        )
        .unwrap();

        let c = load_config(&StdFileSystem, &no_env(), &dirs, &CliOverrides::default()).unwrap();
        assert_eq!(c.user_id, "file-user");
        assert_eq!(c.timeout, Duration::from_secs(30));
        assert_eq!(
            c.url_for(Endpoint::Message(DocumentKind::Report)),
            "http://file/webhook/custom/report"
        );

        let env = FakeEnv {
            base: Some("http://env/hook/".to_string()),
            user: Some("env-user".to_string()),
            timeout: Some(5),
        };
        let c = load_config(&StdFileSystem, &env, &dirs, &CliOverrides::default()).unwrap();
        assert_eq!(c.url_for(Endpoint::List), "http://env/hook/mydocuments");
        assert_eq!(c.user_id, "env-user");
        assert_eq!(c.timeout, Duration::from_secs(5));

        let cli = CliOverrides {
            base_url: Some("http://cli".to_string()),
            user_id: Some("cli-user".to_string()),
        };
        let c = load_config(&StdFileSystem, &env, &dirs, &cli).unwrap();
        assert_eq!(c.url_for(Endpoint::Get), "http://cli/mydocument");
        assert_eq!(c.user_id, "cli-user");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = dirs_in(&tmp);
        std::fs::create_dir_all(&dirs.config_dir).unwrap();
        std::fs::write(dirs.config_file(), "{ not json").unwrap();
        let err = load_config(&StdFileSystem, &no_env(), &dirs, &CliOverrides::default()).unwrap_err();
        assert_eq!(err.exit_code(), 78);
    }
}
