use podlogs_config::load_config;
use podlogs_config::shared::ServerConfig;

/// Loads the [`ServerConfig`] and validates it.
pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    let config = load_config::<ServerConfig>()?;
    config.validate()?;

    Ok(config)
}
