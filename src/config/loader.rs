//! YAML config loading
//!
//! Every loaded config is validated before it is returned, so callers never
//! see an `AppConfig` that breaks a rule in `AppConfig::validate`.

use std::path::Path;

use crate::error::AppError;

use super::types::AppConfig;

/// Read, parse and validate a config file.
///
/// ```ignore
/// use std::path::Path;
/// use perp_spread_monitor::config::load_config;
///
/// let config = load_config(Path::new("config.yaml"))?;
/// ```
pub fn load_config(path: &Path) -> Result<AppConfig, AppError> {
    if !path.is_file() {
        return Err(AppError::Config(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    parse_and_validate(&content, Some(path))
}

/// Parse and validate YAML held in memory
pub fn load_config_from_str(yaml_content: &str) -> Result<AppConfig, AppError> {
    parse_and_validate(yaml_content, None)
}

fn parse_and_validate(content: &str, origin: Option<&Path>) -> Result<AppConfig, AppError> {
    let config: AppConfig = serde_yaml::from_str(content).map_err(|e| match origin {
        Some(path) => AppError::Config(format!(
            "YAML parse error in '{}': {}",
            path.display(),
            e
        )),
        None => AppError::Config(format!("YAML parse error: {}", e)),
    })?;

    config.validate()?;
    Ok(config)
}

// ============================================================================
// Tests
// ============================================================================
