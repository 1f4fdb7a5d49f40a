//! Configuration file handling.
//!
//! The configuration file is stored at `$BUDGET_HOME/config.json` and holds the URL of the
//! budgeting service. The session token obtained by `budget login` is kept separately in
//! `$BUDGET_HOME/.secrets/session.json`.

use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

const APP_NAME: &str = "budget";
const CONFIG_VERSION: u8 = 1;
const SECRETS: &str = ".secrets";
const SESSION_JSON: &str = "session.json";
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$BUDGET_HOME` and from there it loads `$BUDGET_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    secrets: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    api_url: Url,
    session: Option<Session>,
}

impl Config {
    /// Creates the data directory, its secrets subdirectory and an initial `config.json` pointing
    /// at `api_url`.
    ///
    /// # Errors
    /// - Returns an error if `api_url` is not a valid URL.
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>, api_url: &str) -> Result<Self> {
        let api_url = parse_api_url(api_url)?;

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the budget home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let secrets = root.join(SECRETS);
        utils::make_dir(&secrets).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            api_url: api_url.to_string(),
            session_path: None,
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            secrets,
            config_path,
            config_file,
            api_url,
            session: None,
        })
    }

    /// This will
    /// - validate that `budget_home` and its config file exist
    /// - load the config file and, if present, the session file
    /// - return the loaded configuration object
    pub async fn load(budget_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = budget_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The budget home directory is missing, run 'budget init'")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run 'budget init'",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let api_url = parse_api_url(&config_file.api_url)?;

        let mut config = Self {
            root: root.clone(),
            secrets: root.join(SECRETS),
            config_path,
            config_file,
            api_url,
            session: None,
        };
        if !config.secrets.is_dir() {
            bail!(
                "The secrets directory is missing '{}'",
                config.secrets.display()
            )
        }

        let session_path = config.session_path();
        if session_path.is_file() {
            config.session = Some(
                utils::deserialize(&session_path)
                    .await
                    .context("Unable to load the session, run 'budget login'")?,
            );
            debug!("Loaded session from {}", session_path.display());
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn secrets(&self) -> &Path {
        &self.secrets
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// The token of the current session, if logged in.
    pub fn session_token(&self) -> Option<String> {
        self.session.as_ref().map(|s| s.token.clone())
    }

    /// Returns the stored `session_path` if it is absolute, otherwise resolves it against the root.
    pub fn session_path(&self) -> PathBuf {
        let p = self.config_file.session_path();
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }

    /// Writes `token` to the session file with owner-only permissions.
    pub async fn save_session(&mut self, token: impl Into<String>) -> Result<()> {
        let session = Session {
            token: token.into(),
        };
        let path = self.session_path();
        let data = serde_json::to_string_pretty(&session).context("Unable to serialize session")?;
        utils::write(&path, data).await?;
        utils::restrict_permissions(&path)?;
        self.session = Some(session);
        Ok(())
    }

    /// Removes the session file. Not having one is fine.
    pub async fn clear_session(&mut self) -> Result<()> {
        let path = self.session_path();
        if path.is_file() {
            tokio::fs::remove_file(&path)
                .await
                .with_context(|| format!("Unable to remove {}", path.display()))?;
        }
        self.session = None;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct Session {
    token: String,
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "budget",
///   "config_version": 1,
///   "api_url": "https://budget.example.com/api",
///   "session_path": ".secrets/session.json"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "budget"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Base URL of the budgeting service
    api_url: String,

    /// Path to the session file (optional, relative to the budget home or absolute)
    /// Defaults to $BUDGET_HOME/.secrets/session.json if not specified
    #[serde(skip_serializing_if = "Option::is_none")]
    session_path: Option<PathBuf>,
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or belongs to another app.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;
        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        Ok(config)
    }

    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    fn session_path(&self) -> PathBuf {
        self.session_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(SECRETS).join(SESSION_JSON))
    }
}

/// Parses the service URL. Only http and https are accepted.
fn parse_api_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).with_context(|| format!("Invalid API URL '{url}'"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => bail!("Unsupported API URL scheme '{other}', expected http or https"),
    }
}
