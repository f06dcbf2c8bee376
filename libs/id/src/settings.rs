//! Resolver settings and the per-project registry.
//!
//! [`Settings`] is immutable once built. Reloading means building a new
//! value and swapping it in through [`crate::SharedSettings`].

use std::collections::{BTreeMap, HashMap};

use crate::define_setting_keys;
use crate::error::{ArkError, ArkResult};
use crate::grammar::is_project_id;

/// Dialect version written into newly minted identifiers.
pub const DEFAULT_DIALECT_VERSION: u32 = 1;

/// A registry section: raw key/value pairs as read from configuration.
pub type Section = BTreeMap<String, String>;

define_setting_keys! {
    /// Keys understood in the registry's default and project sections.
    pub enum SettingKey {
        /// Redirect target of the top-level object (`ark:/NAAN/VERSION`).
        TopLevelObjectUrl => "TopLevelObjectUrl",
        /// Host of the application serving resources and values.
        Host => "Host",
        /// Host serving project metadata pages.
        ProjectHost => "ProjectHost",
        /// Whether V0 identifiers are accepted for a project.
        AllowVersion0 => "AllowVersion0",
        /// Whether a project's redirects go to the legacy system.
        UsePhp => "UsePhp",
        ResourceIri => "DSPResourceIri",
        ProjectIri => "DSPProjectIri",
        ProjectRedirectUrl => "DSPProjectRedirectUrl",
        ResourceRedirectUrl => "DSPResourceRedirectUrl",
        ResourceVersionRedirectUrl => "DSPResourceVersionRedirectUrl",
        ValueRedirectUrl => "DSPValueRedirectUrl",
        ValueVersionRedirectUrl => "DSPValueVersionRedirectUrl",
        LegacyResourceRedirectUrl => "PhpResourceRedirectUrl",
        LegacyResourceVersionRedirectUrl => "PhpResourceVersionRedirectUrl",
    }
}

/// Parses a configuration boolean.
///
/// Accepts `true/false`, `yes/no`, `on/off`, and `1/0`, ignoring case.
#[must_use]
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Normalizes a project ID for registry lookup.
fn registry_key(project_id: &str) -> String {
    project_id.to_ascii_uppercase()
}

/// Global settings plus the project registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    naan: String,
    external_host: String,
    https_proxy: bool,
    dialect_version: u32,
    defaults: Section,
    projects: HashMap<String, Section>,
}

impl Settings {
    /// Starts building settings for the given NAAN and external host.
    pub fn builder(naan: impl Into<String>, external_host: impl Into<String>) -> SettingsBuilder {
        SettingsBuilder::new(naan, external_host)
    }

    /// Name Assigning Authority Number embedded in every identifier.
    pub fn naan(&self) -> &str {
        &self.naan
    }

    /// Public host under which ARK URLs are served.
    pub fn external_host(&self) -> &str {
        &self.external_host
    }

    /// Whether minted ARK URLs use `https`.
    pub fn use_https(&self) -> bool {
        self.https_proxy
    }

    /// The current dialect version.
    pub fn dialect_version(&self) -> u32 {
        self.dialect_version
    }

    /// Looks up a key in the default section.
    pub fn get_default(&self, key: SettingKey) -> ArkResult<&str> {
        self.defaults
            .get(key.as_str())
            .map(String::as_str)
            .ok_or_else(|| ArkError::MissingSetting {
                scope: "defaults".to_string(),
                key: key.as_str(),
            })
    }

    /// Redirect target for the top-level object.
    pub fn top_level_object_url(&self) -> ArkResult<&str> {
        self.get_default(SettingKey::TopLevelObjectUrl)
    }

    /// Returns true if the registry has a section for `project_id` (any case).
    pub fn has_project(&self, project_id: &str) -> bool {
        self.projects.contains_key(&registry_key(project_id))
    }

    /// Returns the configuration of `project_id`, or `None` if it is not registered.
    pub fn project(&self, project_id: &str) -> Option<ProjectConfig<'_>> {
        self.projects
            .get_key_value(&registry_key(project_id))
            .map(|(id, section)| ProjectConfig {
                id: id.as_str(),
                section,
                defaults: &self.defaults,
            })
    }

    /// Returns the configuration of `project_id`, failing with
    /// [`ArkError::UnknownProject`] if it is not registered.
    pub fn get_project_config(&self, project_id: &str) -> ArkResult<ProjectConfig<'_>> {
        self.project(project_id)
            .ok_or_else(|| ArkError::unknown_project(project_id))
    }

    /// Registered project IDs (normalized), in no particular order.
    pub fn project_ids(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(String::as_str)
    }
}

/// View of one project's section, falling back to the default section.
#[derive(Debug, Clone, Copy)]
pub struct ProjectConfig<'a> {
    id: &'a str,
    section: &'a Section,
    defaults: &'a Section,
}

impl<'a> ProjectConfig<'a> {
    /// The normalized project ID.
    pub fn id(&self) -> &'a str {
        self.id
    }

    /// Returns the value for `key`, inherited from the defaults if the
    /// project does not set it.
    pub fn get(&self, key: SettingKey) -> Option<&'a str> {
        self.section
            .get(key.as_str())
            .or_else(|| self.defaults.get(key.as_str()))
            .map(String::as_str)
    }

    /// Like [`get`](Self::get), but a missing key is an error.
    pub fn require(&self, key: SettingKey) -> ArkResult<&'a str> {
        self.get(key).ok_or_else(|| ArkError::MissingSetting {
            scope: format!("project {}", self.id),
            key: key.as_str(),
        })
    }

    /// Reads a boolean flag. An absent flag is `false`.
    pub fn flag(&self, key: SettingKey) -> ArkResult<bool> {
        match self.get(key) {
            None => Ok(false),
            Some(value) => parse_flag(value).ok_or_else(|| ArkError::InvalidSetting {
                scope: format!("project {}", self.id),
                key: key.as_str(),
                value: value.to_string(),
            }),
        }
    }

    /// Whether legacy (V0) identifiers are accepted for this project.
    pub fn allows_version_0(&self) -> ArkResult<bool> {
        self.flag(SettingKey::AllowVersion0)
    }

    /// Whether redirects for this project go to the legacy system.
    pub fn uses_legacy_system(&self) -> ArkResult<bool> {
        self.flag(SettingKey::UsePhp)
    }
}

/// Builder for [`Settings`].
#[derive(Debug, Clone)]
pub struct SettingsBuilder {
    naan: String,
    external_host: String,
    https_proxy: bool,
    dialect_version: u32,
    defaults: Section,
    projects: Vec<(String, Section)>,
}

impl SettingsBuilder {
    /// Creates a builder with HTTPS enabled and the default dialect version.
    pub fn new(naan: impl Into<String>, external_host: impl Into<String>) -> Self {
        Self {
            naan: naan.into(),
            external_host: external_host.into(),
            https_proxy: true,
            dialect_version: DEFAULT_DIALECT_VERSION,
            defaults: Section::new(),
            projects: Vec::new(),
        }
    }

    /// Sets whether minted ARK URLs use `https`.
    #[must_use]
    pub fn https_proxy(mut self, enabled: bool) -> Self {
        self.https_proxy = enabled;
        self
    }

    /// Overrides the current dialect version.
    #[must_use]
    pub fn dialect_version(mut self, version: u32) -> Self {
        self.dialect_version = version;
        self
    }

    /// Sets one key of the default section.
    #[must_use]
    pub fn default_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    /// Merges `entries` into the default section.
    #[must_use]
    pub fn defaults<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.defaults
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Adds a project section.
    #[must_use]
    pub fn project<I, K, V>(mut self, project_id: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let section = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.projects.push((project_id.into(), section));
        self
    }

    /// Validates and builds the settings.
    pub fn build(self) -> ArkResult<Settings> {
        let invalid = |message: String| ArkError::InvalidSettings { message };

        if self.naan.is_empty() || !self.naan.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(format!(
                "NAAN must be a non-empty string of digits, got '{}'",
                self.naan
            )));
        }
        if self.external_host.is_empty() {
            return Err(invalid("external host cannot be empty".to_string()));
        }
        if self.dialect_version == 0 {
            return Err(invalid(
                "dialect version 0 is reserved for legacy identifiers".to_string(),
            ));
        }

        let mut projects = HashMap::with_capacity(self.projects.len());
        for (project_id, section) in self.projects {
            if !is_project_id(&project_id) {
                return Err(invalid(format!(
                    "project ID must be four hexadecimal digits, got '{project_id}'"
                )));
            }
            if projects.insert(registry_key(&project_id), section).is_some() {
                return Err(invalid(format!("duplicate project section '{project_id}'")));
            }
        }

        Ok(Settings {
            naan: self.naan,
            external_host: self.external_host,
            https_proxy: self.https_proxy,
            dialect_version: self.dialect_version,
            defaults: self.defaults,
            projects,
        })
    }
}
