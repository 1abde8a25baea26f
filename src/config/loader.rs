// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::config::consts::DEFAULT_CHAIN_NAME;
use crate::config::registry::{ComponentRegistry, Options};
use crate::config::validation::validate_chain;
use crate::errors::ConfigError;
use crate::observability::messages::{config::ChainLoaded, StructuredLog};

/// A declarative chain: a name and the stages piped onto it, in order.
///
/// # Example
/// ```yaml
/// name: greeting
/// stages:
///   - type: task
///     execute_in: { name: append, options: { text: "-in" } }
///     execute_out: { name: uppercase }
///   - type: filter
///     matcher: { name: contains, options: { needle: "x" } }
///     stages:
///       - type: task
///         execute_in: { name: reverse }
///   - type: parallel
///     merge_up: { name: concatenate }
///     stages:
///       - type: task
///         execute_in: { name: append, options: { text: "-a" } }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChainConfig {
    #[serde(default = "default_chain_name")]
    pub name: String,
    #[serde(default)]
    pub stages: Vec<StageConfig>,
}

fn default_chain_name() -> String {
    DEFAULT_CHAIN_NAME.to_string()
}

/// One stage of a chain definition, tagged by its `type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StageConfig {
    Task {
        #[serde(default)]
        execute_in: Option<ComponentRef>,
        #[serde(default)]
        execute_out: Option<ComponentRef>,
    },
    Filter {
        #[serde(default)]
        matcher: Option<ComponentRef>,
        #[serde(default)]
        stages: Vec<StageConfig>,
    },
    Parallel {
        #[serde(default)]
        merge_up: Option<ComponentRef>,
        #[serde(default)]
        merge_down: Option<ComponentRef>,
        #[serde(default)]
        stages: Vec<StageConfig>,
    },
    Pipeline {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        stages: Vec<StageConfig>,
    },
}

impl StageConfig {
    /// Nested stages, empty for tasks.
    pub fn sub_stages(&self) -> &[StageConfig] {
        match self {
            StageConfig::Task { .. } => &[],
            StageConfig::Filter { stages, .. }
            | StageConfig::Parallel { stages, .. }
            | StageConfig::Pipeline { stages, .. } => stages,
        }
    }
}

/// Reference to a registered component plus the options it is built with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComponentRef {
    pub name: String,
    #[serde(default)]
    pub options: Options,
}

/// On-disk formats a chain definition can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from a file extension (`yaml`, `yml`, `json`, `toml`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }
}

/// Parse a chain definition from text.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<ChainConfig, ConfigError> {
    let config = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    };
    Ok(config)
}

/// Load a chain definition, choosing the parser by file extension.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ChainConfig, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = parse_config(&content, format)?;

    ChainLoaded {
        path: &path.display().to_string(),
        name: &config.name,
        stage_count: config.stages.len(),
    }
    .log();

    Ok(config)
}

/// Load a chain definition and check every component it names against `registry`.
///
/// All validation problems are reported together in [`ConfigError::Invalid`].
pub fn load_and_validate_config<P, T>(path: P, registry: &ComponentRegistry<T>) -> Result<ChainConfig, ConfigError>
where
    P: AsRef<Path>,
    T: Send + 'static,
{
    let config = load_config(path)?;
    validate_chain(&config, registry).map_err(ConfigError::Invalid)?;
    Ok(config)
}
