//! Config file loading and merging with command-line arguments
//!
//! The config file is optional TOML. Every key can also be given on the
//! command line, which always wins.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::debug;

use kubetables_logs::CompiledFilter;

use crate::Args;

/// Environment variable naming a config file
const CONFIG_ENV: &str = "KUBETABLES_CONFIG";

/// Pattern used when no container or source filter is configured
const MATCH_ALL: &str = ".*";

/// Values read from the config file
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub namespace: Option<String>,
    pub container: Option<String>,
    pub source: Option<String>,
    /// Relative duration such as "15m"
    pub since: Option<String>,
    pub context: Option<String>,
}

impl FileConfig {
    /// Load the config file.
    ///
    /// An explicit path must exist. Otherwise `$KUBETABLES_CONFIG` or the
    /// per-user config file is read when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::read(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::read(&path),
            _ => Ok(Self::default()),
        }
    }

    fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        Some(dirs::config_dir()?.join("kubetables").join("config.toml"))
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&content)
            .context(format!("Invalid config file {}", path.display()))?;

        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Fully resolved run settings
#[derive(Debug)]
pub struct Settings {
    pub namespace: String,
    pub container_filter: CompiledFilter,
    pub source_filter: CompiledFilter,
    pub since: Option<Duration>,
    pub context: Option<String>,
}

impl Settings {
    /// Merge arguments over the config file and compile both filters
    pub fn resolve(args: &Args, file: FileConfig) -> Result<Self> {
        let Some(namespace) = args.namespace.clone().or(file.namespace) else {
            bail!("a namespace is required (-n/--namespace or `namespace` in the config file)");
        };

        let container = args
            .container
            .clone()
            .or(file.container)
            .unwrap_or_else(|| MATCH_ALL.to_string());
        let container_filter =
            CompiledFilter::new(&container).context(format!("-c {}", container))?;

        let source = args
            .source
            .clone()
            .or(file.source)
            .unwrap_or_else(|| MATCH_ALL.to_string());
        let source_filter = CompiledFilter::new(&source).context(format!("-s {}", source))?;

        let since = match (args.since, file.since) {
            (Some(since), _) => Some(since),
            (None, Some(text)) => Some(
                humantime::parse_duration(&text)
                    .context(format!("Invalid `since` in config file: {}", text))?,
            ),
            (None, None) => None,
        };

        Ok(Self {
            namespace,
            container_filter,
            source_filter,
            since,
            context: args.context.clone().or(file.context),
        })
    }
}
