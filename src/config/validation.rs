use crate::config::types::{AuditConfig, CollectorConfig, Config, CrawlerConfig, OutputConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_audit_config(&config.audit)?;
    validate_collector_config(&config.collector)?;

    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.threads < 1 {
        return Err(ConfigError::Validation(format!(
            "threads must be at least 1, got {}",
            config.threads
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.download_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "download_path cannot be empty".to_string(),
        ));
    }

    if config.keywords_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "keywords_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_audit_config(config: &AuditConfig) -> Result<(), ConfigError> {
    // NaN fails both comparisons and is rejected here as well
    if !(config.threshold_ratio > 0.0 && config.threshold_ratio <= 1.0) {
        return Err(ConfigError::Validation(format!(
            "threshold_ratio must be in (0, 1], got {}",
            config.threshold_ratio
        )));
    }

    Ok(())
}

fn validate_collector_config(config: &CollectorConfig) -> Result<(), ConfigError> {
    if config.command.trim().is_empty() {
        return Err(ConfigError::Validation(
            "collector command cannot be empty".to_string(),
        ));
    }

    Ok(())
}
