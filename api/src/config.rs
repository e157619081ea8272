//! Layered configuration loading for the server binary
//!
//! Sources, lowest precedence first:
//! 1. `AppConfig::from_env()` (presets plus the plain environment variables)
//! 2. `config/default.toml` (optional)
//! 3. `config/<environment>.toml` (optional)
//! 4. `MP__`-prefixed environment variables, e.g. `MP__OTP__MAX_ATTEMPTS=3`

use config::{Config, ConfigError, Environment as EnvSource, File};

use mp_shared::AppConfig;

/// Prefix for the highest-precedence environment overrides
pub const ENV_PREFIX: &str = "MP";

/// Build the application configuration from every source
pub fn load() -> Result<AppConfig, ConfigError> {
    load_from(AppConfig::from_env(), "config")
}

/// Build the configuration layering files from `dir` over `base`
pub fn load_from(base: AppConfig, dir: &str) -> Result<AppConfig, ConfigError> {
    let environment = base.environment;
    let env_file = environment
        .config_file()
        .trim_start_matches("config/")
        .to_string();

    let settings = Config::builder()
        .add_source(Config::try_from(&base)?)
        .add_source(File::with_name(&format!("{}/default", dir)).required(false))
        .add_source(File::with_name(&format!("{}/{}", dir, env_file)).required(false))
        .add_source(
            EnvSource::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
