//! Runtime configuration.
//!
//! Precedence: CLI flag > environment > config file > built-in default.
//!
//!   --santactl PATH        SANTACTL_PATH        santactl_path
//!   --elevate-with CMD     SANTA_MCP_ELEVATE    elevate_with
//!   --config FILE          SANTA_MCP_CONFIG     (JSON or YAML, by extension)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use serde::Deserialize;

use crate::santactl::{CommandBuilder, DEFAULT_ELEVATION, DEFAULT_SANTACTL_PATH};

pub const ENV_SANTACTL_PATH: &str = "SANTACTL_PATH";
pub const ENV_ELEVATE: &str = "SANTA_MCP_ELEVATE";
pub const ENV_CONFIG: &str = "SANTA_MCP_CONFIG";

/// Global CLI flags feeding [`Settings`].
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Config file (JSON or YAML). Falls back to SANTA_MCP_CONFIG env.
    #[arg(long = "config", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Absolute path to santactl. Falls back to SANTACTL_PATH env.
    #[arg(long = "santactl", global = true, value_name = "PATH")]
    pub santactl: Option<String>,

    /// Privilege elevation command for sync (shell-style words, e.g. "sudo -n").
    #[arg(long = "elevate-with", global = true, value_name = "CMD")]
    pub elevate_with: Option<String>,
}

/// On-disk configuration. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub santactl_path: Option<String>,
    pub elevate_with: Option<String>,
}

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub santactl_path: String,
    pub elevate_with: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            santactl_path: DEFAULT_SANTACTL_PATH.to_string(),
            elevate_with: vec![DEFAULT_ELEVATION.to_string()],
        }
    }
}

impl Settings {
    pub fn resolve(args: &ConfigArgs) -> Result<Self> {
        Self::resolve_with(args, env_nonempty)
    }

    /// Same as [`Settings::resolve`] with an injectable environment lookup.
    pub fn resolve_with(args: &ConfigArgs, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config_path = args
            .config
            .clone()
            .or_else(|| env(ENV_CONFIG).map(PathBuf::from));
        let file = match &config_path {
            Some(path) => load_file(path)?,
            None => FileConfig::default(),
        };

        let santactl_path = args
            .santactl
            .clone()
            .or_else(|| env(ENV_SANTACTL_PATH))
            .or(file.santactl_path)
            .unwrap_or_else(|| DEFAULT_SANTACTL_PATH.to_string());
        if !Path::new(&santactl_path).is_absolute() {
            bail!("santactl path must be absolute: '{santactl_path}'");
        }

        let elevate_raw = args
            .elevate_with
            .clone()
            .or_else(|| env(ENV_ELEVATE))
            .or(file.elevate_with)
            .unwrap_or_else(|| DEFAULT_ELEVATION.to_string());
        let elevate_with = shell_words::split(&elevate_raw)
            .with_context(|| format!("Failed to parse elevation command: '{elevate_raw}'"))?;
        if elevate_with.is_empty() {
            bail!("elevation command is empty");
        }

        Ok(Self {
            santactl_path,
            elevate_with,
        })
    }

    pub fn command_builder(&self) -> CommandBuilder {
        CommandBuilder::new(self.santactl_path.clone(), self.elevate_with.clone())
    }
}

/// Read a config file; `.yaml`/`.yml` is YAML, anything else JSON.
pub fn load_file(path: &Path) -> Result<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let lower = path.to_string_lossy().to_ascii_lowercase();

    if lower.ends_with(".yaml") || lower.ends_with(".yml") {
        serde_yaml::from_str(&raw).context("failed to parse YAML config file")
    } else {
        serde_json::from_str(&raw).context("failed to parse JSON config file")
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn temp_file(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("santa_mcp_{}_{name}", std::process::id()));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn defaults() {
        let s = Settings::resolve_with(&ConfigArgs::default(), no_env).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.command_builder(), CommandBuilder::default());
    }

    #[test]
    fn cli_beats_env_beats_file() {
        let path = temp_file(
            "precedence.yaml",
            "santactl_path: /file/santactl\nelevate_with: doas\n",
        );
        let env: HashMap<&str, &str> = [(ENV_SANTACTL_PATH, "/env/santactl")].into();
        let lookup = |k: &str| env.get(k).map(|v| v.to_string());

        let args = ConfigArgs {
            config: Some(path.clone()),
            ..Default::default()
        };
        let s = Settings::resolve_with(&args, lookup).unwrap();
        assert_eq!(s.santactl_path, "/env/santactl");
        assert_eq!(s.elevate_with, vec!["doas"]);

        let args = ConfigArgs {
            config: Some(path),
            santactl: Some("/cli/santactl".into()),
            elevate_with: Some("sudo -n".into()),
        };
        let s = Settings::resolve_with(&args, lookup).unwrap();
        assert_eq!(s.santactl_path, "/cli/santactl");
        assert_eq!(s.elevate_with, vec!["sudo", "-n"]);
    }

    #[test]
    fn config_path_from_env() {
        let path = temp_file("env.json", r#"{ "santactl_path": "/opt/santa/santactl" }"#);
        let path_str = path.to_string_lossy().to_string();
        let lookup = |k: &str| (k == ENV_CONFIG).then(|| path_str.clone());
        let s = Settings::resolve_with(&ConfigArgs::default(), lookup).unwrap();
        assert_eq!(s.santactl_path, "/opt/santa/santactl");
        assert_eq!(s.elevate_with, vec!["sudo"]);
    }

    #[test]
    fn unknown_keys_rejected() {
        let path = temp_file("unknown.json", r#"{ "santactl": "/x" }"#);
        assert!(load_file(&path).is_err());
    }

    #[test]
    fn relative_binary_rejected() {
        let args = ConfigArgs {
            santactl: Some("santactl".into()),
            ..Default::default()
        };
        let err = Settings::resolve_with(&args, no_env).unwrap_err();
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn empty_elevation_rejected() {
        let args = ConfigArgs {
            elevate_with: Some("   ".into()),
            ..Default::default()
        };
        assert!(Settings::resolve_with(&args, no_env).is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = ConfigArgs {
            config: Some(PathBuf::from("/nonexistent/santa-mcp.yaml")),
            ..Default::default()
        };
        let err = Settings::resolve_with(&args, no_env).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
