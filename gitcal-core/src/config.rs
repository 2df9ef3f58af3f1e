//! Configuration: an optional TOML config file plus command-line overrides.
//!
//! ```toml
//! [gitlab]
//! url = "https://gitlab.example.com"
//! private_token = "glpat-..."
//!
//! [export]
//! projects = "12, 34"
//! groups = [7]
//! combine = "All"
//! reminder = 2
//! directory = "~/calendars"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::collect::RecordKinds;
use crate::error::{ConfigError, ConfigResult};
use crate::export::ExportOptions;
use crate::gitlab::{Auth, Connection};
use crate::ids::parse_ids;

const CONFIG_DIR_NAME: &str = "gitcal";
const CONFIG_FILE_NAME: &str = "config.toml";
const GITLAB_SECTION: &str = "gitlab";
const DEFAULT_DIRECTORY: &str = ".";

/// Disk-backed configuration schema.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub gitlab: Option<GitlabSection>,
    #[serde(default)]
    pub export: ExportSection,
}

/// `[gitlab]`: how to reach the instance
#[derive(Debug, Deserialize)]
pub struct GitlabSection {
    pub url: Option<String>,
    pub private_token: Option<String>,
    pub oauth_token: Option<String>,
    #[serde(default = "default_ssl_verify")]
    pub ssl_verify: bool,
    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

fn default_ssl_verify() -> bool {
    true
}

/// `[export]`: what to export and where
#[derive(Debug, Default, Deserialize)]
pub struct ExportSection {
    pub projects: Option<IdList>,
    pub groups: Option<IdList>,
    #[serde(default)]
    pub issues: bool,
    #[serde(default)]
    pub milestones: bool,
    pub combine: Option<String>,
    /// Kept loose so a bad value only disables reminders
    pub reminder: Option<toml::Value>,
    pub directory: Option<String>,
}

/// Identifiers as a delimited string, a single number or an array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdList {
    Text(String),
    Single(i64),
    List(Vec<toml::Value>),
}

impl IdList {
    /// Flatten to the comma separated form the identifier parser reads.
    fn to_raw(&self) -> String {
        match self {
            IdList::Text(text) => text.clone(),
            IdList::Single(id) => id.to_string(),
            IdList::List(values) => values
                .iter()
                .map(|value| match value {
                    toml::Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl ConfigFile {
    /// `<config dir>/gitcal/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|err| {
            let message = err.to_string().trim().to_string();
            if message.contains("duplicate") {
                ConfigError::DuplicateOption {
                    path: path.to_path_buf(),
                    message,
                }
            } else {
                ConfigError::Parse {
                    path: path.to_path_buf(),
                    message,
                }
            }
        })
    }

    fn connection(&self) -> ConfigResult<Connection> {
        let section = self
            .gitlab
            .as_ref()
            .ok_or(ConfigError::MissingSection(GITLAB_SECTION))?;

        let url = section.url.clone().ok_or(ConfigError::MissingOption {
            section: GITLAB_SECTION,
            option: "url",
        })?;

        let auth = match (&section.private_token, &section.oauth_token) {
            (Some(token), _) => Auth::PrivateToken(token.clone()),
            (None, Some(token)) => Auth::OAuth(token.clone()),
            (None, None) => {
                return Err(ConfigError::MissingOption {
                    section: GITLAB_SECTION,
                    option: "private_token",
                });
            }
        };

        Ok(Connection {
            url,
            auth,
            ssl_verify: section.ssl_verify,
            timeout: section.timeout.map(Duration::from_secs),
        })
    }
}

/// Values given on the command line. Set values win over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub url: Option<String>,
    pub token: Option<String>,
    pub projects: Vec<String>,
    pub groups: Vec<String>,
    pub issues: bool,
    pub milestones: bool,
    pub combine: Option<String>,
    pub reminder: Option<u32>,
    pub directory: Option<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug)]
pub struct Settings {
    pub connection: Connection,
    pub export: ExportOptions,
}

impl Settings {
    /// Load the config file (explicit, or the default one when no URL and
    /// token are given) and apply the overrides.
    pub fn resolve(overrides: Overrides) -> ConfigResult<Self> {
        let file = match &overrides.config {
            Some(path) => Some(ConfigFile::load(path)?),
            None if overrides.url.is_some() && overrides.token.is_some() => None,
            None => match ConfigFile::default_path().filter(|path| path.exists()) {
                Some(path) => Some(ConfigFile::load(&path)?),
                None => None,
            },
        };

        Self::from_parts(overrides, file)
    }

    pub fn from_parts(overrides: Overrides, file: Option<ConfigFile>) -> ConfigResult<Self> {
        let connection = match (overrides.url, overrides.token) {
            (Some(url), Some(token)) => Connection::new(url, Auth::PrivateToken(token)),
            _ => match &file {
                Some(file) => file.connection()?,
                None => return Err(ConfigError::NoCredentials),
            },
        };

        let section = file.map(|file| file.export).unwrap_or_default();

        let projects = resolve_ids(&overrides.projects, section.projects.as_ref());
        let groups = resolve_ids(&overrides.groups, section.groups.as_ref());
        if projects.is_empty() && groups.is_empty() {
            return Err(ConfigError::NoTargets);
        }

        let kinds = RecordKinds::from_flags(
            overrides.issues || section.issues,
            overrides.milestones || section.milestones,
        );

        let combine = overrides
            .combine
            .or(section.combine)
            .filter(|name| !name.trim().is_empty());

        let reminder_days = match overrides.reminder {
            Some(days) => days,
            None => section.reminder.as_ref().map_or(0, reminder_days),
        };

        let directory = overrides
            .directory
            .or(section.directory)
            .filter(|dir| !dir.trim().is_empty())
            .map(|dir| expand_path(&dir))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIRECTORY));

        Ok(Settings {
            connection,
            export: ExportOptions {
                projects,
                groups,
                kinds,
                reminder_days,
                combine,
                directory,
            },
        })
    }
}

/// Command-line identifiers replace the config file's list entirely.
fn resolve_ids(cli: &[String], file: Option<&IdList>) -> std::collections::BTreeSet<u64> {
    let raw = if cli.is_empty() {
        file.map(IdList::to_raw).unwrap_or_default()
    } else {
        cli.join(",")
    };
    parse_ids(&raw).map(|parsed| parsed.ids).unwrap_or_default()
}

/// A reminder that is not a whole number of days disables reminders.
fn reminder_days(value: &toml::Value) -> u32 {
    let days = match value {
        toml::Value::Integer(days) => u32::try_from(*days).ok(),
        toml::Value::Float(days) if days.fract() == 0.0 && *days >= 0.0 => {
            u32::try_from(*days as i64).ok()
        }
        toml::Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    days.unwrap_or_else(|| {
        warn!("Wrong value {value} for \"reminder\", reminders are disabled");
        0
    })
}

/// Expand ~ in paths to the home directory
fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
