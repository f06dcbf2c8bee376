//! Resolver configuration.
//!
//! Handles:
//! - Global settings from flags and `ARK_*` variables
//! - The TOML project registry (`[defaults]` plus `[projects.<id>]` tables)

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use arkr_id::{Section, SettingKey, Settings, SettingsBuilder};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::CliError;

/// Global resolver configuration, before the registry is read.
#[derive(Debug, Clone)]
pub struct Config {
    pub naan: String,
    pub external_host: String,
    pub https_proxy: bool,
    pub dialect_version: u32,
    pub registry: Option<PathBuf>,
}

impl Config {
    /// Builds the resolver settings, reading the registry if one is configured.
    pub fn load_settings(&self) -> Result<Settings> {
        let registry = match &self.registry {
            Some(path) => Registry::load(path)?,
            None => {
                debug!("No registry configured; only check digits and minting will work");
                Registry::default()
            }
        };

        let builder = Settings::builder(&self.naan, &self.external_host)
            .https_proxy(self.https_proxy)
            .dialect_version(self.dialect_version);
        let settings = registry.apply(builder).build().map_err(CliError::from)?;

        debug!(
            naan = %settings.naan(),
            external_host = %settings.external_host(),
            project_count = settings.project_ids().count(),
            "Settings loaded"
        );
        Ok(settings)
    }
}

/// Project registry file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryFile {
    #[serde(default)]
    defaults: BTreeMap<String, toml::Value>,
    #[serde(default)]
    projects: BTreeMap<String, BTreeMap<String, toml::Value>>,
}

/// Registry with every value stringified.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Registry {
    pub defaults: Section,
    pub projects: BTreeMap<String, Section>,
}

impl Registry {
    /// Reads and parses a registry file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| CliError::RegistryRead {
            path: path.display().to_string(),
            source,
        })?;
        let registry = Self::from_toml_str(&contents).map_err(|err| match err {
            RegistryError::Parse(source) => CliError::RegistryParse {
                path: path.display().to_string(),
                source,
            },
            RegistryError::Cli(err) => err,
        })?;
        Ok(registry)
    }

    /// Parses registry TOML.
    pub fn from_toml_str(contents: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = toml::from_str(contents).map_err(RegistryError::Parse)?;

        let defaults = stringify_section("defaults", file.defaults)?;
        let projects = file
            .projects
            .into_iter()
            .map(|(id, section)| {
                let section = stringify_section(&format!("projects.{id}"), section)?;
                Ok((id, section))
            })
            .collect::<Result<_, RegistryError>>()?;

        Ok(Self { defaults, projects })
    }

    /// Adds the registry's sections to `builder`.
    pub fn apply(self, builder: SettingsBuilder) -> SettingsBuilder {
        self.projects
            .into_iter()
            .fold(builder.defaults(self.defaults), |builder, (id, section)| {
                builder.project(id, section)
            })
    }
}

/// Why a registry could not be read.
#[derive(Debug)]
pub enum RegistryError {
    Parse(toml::de::Error),
    Cli(CliError),
}

impl From<CliError> for RegistryError {
    fn from(err: CliError) -> Self {
        Self::Cli(err)
    }
}

fn stringify_section(
    section: &str,
    entries: BTreeMap<String, toml::Value>,
) -> Result<Section, RegistryError> {
    entries
        .into_iter()
        .map(|(key, value)| {
            if SettingKey::from_name(&key).is_none() {
                warn!(section, key = %key, "Unknown registry key");
            }
            let value = match value {
                toml::Value::String(s) => s,
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                _ => {
                    return Err(RegistryError::Cli(CliError::UnsupportedValue {
                        section: section.to_string(),
                        key,
                    }))
                }
            };
            Ok((key, value))
        })
        .collect()
}
