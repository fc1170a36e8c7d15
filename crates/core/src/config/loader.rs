//! Configuration sources: a TOML file, then `BRIEFING_` environment overrides.
//!
//! Nested keys use a double underscore, so `BRIEFING_BACKEND__BASE_URL`
//! overrides `[backend] base_url` and `BRIEFING_WORKFLOW__VERIFY_TRIGGER_STATUS`
//! overrides `[workflow] verify_trigger_status`. A single underscore stays
//! part of the key name.

use std::path::Path;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};

use super::{types::Config, ConfigError};

const ENV_PREFIX: &str = "BRIEFING_";
const ENV_SEPARATOR: &str = "__";

/// File layer first, environment on top.
fn sources(path: &Path) -> Figment {
    Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR))
}

/// Load the service configuration from `path`.
///
/// The file must exist, but every section and key in it is optional.
/// Parse errors name the offending file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    sources(path)
        .extract()
        .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
}

/// Parse a TOML document directly, without environment overrides.
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
