//! Configuration model loaded from external sources.

use std::path::Path;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use url::Url;

use crate::DEFAULT_BASE_URL;

/// File looked up in the working directory by [`Settings::load`].
pub const DEFAULT_CONFIG_FILE: &str = "fakestore.yaml";

/// Prefix of the environment variables overriding file values.
pub const ENV_PREFIX: &str = "FAKESTORE";

pub const DEFAULT_USER_AGENT: &str = concat!("fakestore-suite/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug, Deserialize)]
/// Where the suite points and how it identifies itself.
pub struct Settings {
    pub base_url: Url,
    pub user_agent: String,
}

impl Settings {
    /// Loads settings from `.env`, [`DEFAULT_CONFIG_FILE`] and the
    /// environment, in increasing order of precedence.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Loads settings from a YAML file at `path`, which may be missing.
    ///
    /// `FAKESTORE_*` environment variables still take precedence over the
    /// file's values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: &Path, env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .add_source(File::from(path).format(FileFormat::Yaml).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}
