use std::path::Path;

use serde::de::DeserializeOwned;

use crate::environment::Environment;

/// Directory, relative to the working directory, holding the configuration files.
const CONFIGURATION_DIR: &str = "configuration";

/// File loaded for every environment before the environment-specific one.
const BASE_CONFIG_FILE: &str = "base.yaml";

const ENV_PREFIX: &str = "APP";
const ENV_PREFIX_SEPARATOR: &str = "_";

/// Separator for nested keys, e.g. `APP_APPLICATION__PORT` sets `application.port`.
const ENV_SEPARATOR: &str = "__";

/// Separator for list values, e.g. `APP_NODE_SELECTOR=zone=us-east,disk=ssd`.
const LIST_SEPARATOR: &str = ",";

/// Implemented by every top-level configuration type that can be loaded with [`load_config`].
pub trait Config {
    /// Keys whose environment variable values are split on [`LIST_SEPARATOR`].
    const LIST_PARSE_KEYS: &'static [&'static str];
}

/// Loads configuration from `./configuration` for the environment named by `APP_ENVIRONMENT`.
///
/// Sources are layered in this order, later ones winning:
/// 1. `configuration/base.yaml`
/// 2. `configuration/{environment}.yaml`, if present
/// 3. environment variables prefixed with `APP_`
pub fn load_config<T>() -> Result<T, config::ConfigError>
where
    T: Config + DeserializeOwned,
{
    let base_path = std::env::current_dir().map_err(|err| {
        config::ConfigError::Message(format!("failed to determine the current directory: {err}"))
    })?;
    let environment = Environment::load()
        .map_err(|err| config::ConfigError::Message(format!("invalid APP_ENVIRONMENT: {err}")))?;

    load_config_from_dir(&base_path.join(CONFIGURATION_DIR), environment)
}

/// Same as [`load_config`] but reads the files from `directory` for the given `environment`.
pub fn load_config_from_dir<T>(
    directory: &Path,
    environment: Environment,
) -> Result<T, config::ConfigError>
where
    T: Config + DeserializeOwned,
{
    let mut environment_source = config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_PREFIX_SEPARATOR)
        .separator(ENV_SEPARATOR);

    if !T::LIST_PARSE_KEYS.is_empty() {
        environment_source = environment_source
            .try_parsing(true)
            .list_separator(LIST_SEPARATOR);

        for key in T::LIST_PARSE_KEYS {
            environment_source = environment_source.with_list_parse_key(key);
        }
    }

    let settings = config::Config::builder()
        .add_source(config::File::from(directory.join(BASE_CONFIG_FILE)))
        .add_source(
            config::File::from(directory.join(format!("{environment}.yaml"))).required(false),
        )
        .add_source(environment_source)
        .build()?;

    settings.try_deserialize::<T>()
}
