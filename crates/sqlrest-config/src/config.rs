use std::{collections::HashMap, fs, path::Path};

use documented::{Documented, DocumentedFields};
use serde::{Deserialize, Serialize};
use toml_edit::{DocumentMut, Item};
use tracing::{debug, info};

use crate::{
    annotations::annotate_toml_table,
    error::{ConfigError, ErrorContext, Result},
    profile::Profile,
};

pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:3000";

/// Client configuration
#[derive(Clone, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct Config {
    /// The name of the default profile to use.
    pub default_profile: String,

    /// A map of profile names to their gateway settings.
    pub profile: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    /// Configuration with a single `default` profile pointing at a local gateway.
    pub fn default_config() -> Self {
        let mut profile = HashMap::new();
        profile.insert("default".to_string(), Profile::new(DEFAULT_GATEWAY_URL));

        Self {
            default_profile: "default".to_string(),
            profile,
        }
    }

    /// Loads the configuration from `path`.
    ///
    /// A missing file yields the default configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no config at {}, using defaults", path.display());
                Self::default_config()
            }
            Err(err) => {
                return Err(ConfigError::IoError {
                    action: format!("reading config file {}", path.display()),
                    source: err,
                })
            }
        };

        config.resolve()?;

        Ok(config)
    }

    /// Loads the configuration from the default location.
    pub fn new() -> Result<Self> {
        Self::load(&crate::paths::config_path())
    }

    /// Checks that the default profile exists.
    ///
    /// Profile URLs are validated by [`Config::select_profile`], after environment
    /// overrides, so `SQLREST_URL` can stand in for a broken `url` in the file.
    pub fn resolve(&mut self) -> Result<()> {
        if !self.profile.contains_key(&self.default_profile) {
            return Err(ConfigError::MissingDefaultProfile(
                self.default_profile.clone(),
            ));
        }

        Ok(())
    }

    pub fn default_profile(&self) -> Result<&Profile> {
        self.profile
            .get(&self.default_profile)
            .ok_or_else(|| ConfigError::MissingDefaultProfile(self.default_profile.clone()))
    }

    pub fn get_profile(&self, name: &str) -> Result<&Profile> {
        self.profile
            .get(name)
            .ok_or(ConfigError::MissingProfile(name.to_string()))
    }

    /// Returns the named profile (or the default one) with environment overrides applied.
    pub fn select_profile(&self, name: Option<&str>) -> Result<Profile> {
        let name = name.unwrap_or(&self.default_profile);
        let profile = self.get_profile(name)?.clone().with_env_overrides();
        profile.validate(name)?;
        Ok(profile)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        fs::write(path, serialized)
            .with_context(|| format!("writing config file {}", path.display()))?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    pub fn to_annotated_document(&self) -> Result<DocumentMut> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut doc = toml_string.parse::<DocumentMut>()?;

        annotate_toml_table::<Config>(doc.as_table_mut(), true)?;

        if let Some(profiles_map_table) = doc.get_mut("profile").and_then(Item::as_table_mut) {
            for (_profile_name, profile_item) in profiles_map_table.iter_mut() {
                if let Item::Table(profile_table) = profile_item {
                    annotate_toml_table::<Profile>(profile_table, false)?;
                }
            }
        }

        Ok(doc)
    }
}

/// Writes the default configuration, annotated with field docs, to `path`.
pub fn generate_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(ConfigError::ConfigAlreadyExists(path.to_path_buf()));
    }

    let annotated_doc = Config::default_config().to_annotated_document()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }

    fs::write(path, annotated_doc.to_string())
        .with_context(|| format!("writing config file {}", path.display()))?;
    info!(
        "Default configuration file generated with documentation at: {}",
        path.display()
    );
    Ok(())
}
