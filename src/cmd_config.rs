//! `config` subcommands.

use std::path::Path;

use proofmark_config::{Config, ConfigLoader, ConfigValidator};

use crate::cli::ConfigAction;

pub(crate) fn handle_config_command(
    action: ConfigAction,
    path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::load_or_default(path)?;
    match action {
        ConfigAction::Validate => config_validate(&config),
        ConfigAction::Show => {
            print!("{}", toml_string(&config)?);
            Ok(())
        }
    }
}

fn config_validate(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let result = ConfigValidator::validate(config);

    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }

    if result.is_valid() {
        println!("Configuration is valid.");
        Ok(())
    } else {
        Err(format!("{} configuration error(s)", result.errors.len()).into())
    }
}

fn toml_string(config: &Config) -> Result<String, Box<dyn std::error::Error>> {
    let mut config = config.clone();
    if config.provider.api_key.is_some() {
        config.provider.api_key = Some("********".to_string());
    }
    Ok(toml::to_string(&config)?)
}
