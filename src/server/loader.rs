//! Configuration loading
//!
//! Sources, lowest precedence first:
//! 1. `config/default.toml`, compiled into the binary
//! 2. `config/default`, `config/$CMDTERM_ENV` and `config/local` under the working directory
//! 3. the file named by `CMDTERM_CONFIG`, which must exist when set
//! 4. `CMDTERM_*` variables, e.g. `CMDTERM_ENGINE__PROFILE=restricted`

use super::config::AppConfig;
use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use std::path::{Path, PathBuf};

/// Embedded default configuration
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

const ENV_PREFIX: &str = "CMDTERM";
const DEFAULT_ENVIRONMENT: &str = "development";

/// Load the application configuration from every source
pub fn load_config() -> Result<AppConfig> {
    let environment =
        std::env::var("CMDTERM_ENV").unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string());
    let explicit = std::env::var_os("CMDTERM_CONFIG").map(PathBuf::from);

    let builder = file_layers(&environment, explicit.as_deref()).add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );
    finish(builder)
}

fn file_layers(environment: &str, explicit: Option<&Path>) -> ConfigBuilder<DefaultState> {
    let mut builder =
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

    for name in [
        "config/default".to_string(),
        format!("config/{}", environment),
        "config/local".to_string(),
    ] {
        builder = builder.add_source(File::with_name(&name).required(false));
    }

    if let Some(path) = explicit {
        builder = builder.add_source(File::from(path).required(true));
    }
    builder
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig> {
    builder
        .build()
        .context("Failed to build configuration")?
        .try_deserialize()
        .context("Failed to deserialize configuration")
}
