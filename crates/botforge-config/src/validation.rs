// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, non-empty paths, and sane
//! orchestrator thresholds.

use crate::diagnostic::ConfigError;
use crate::model::BotforgeConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &BotforgeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.storage.runtime_log_cap == 0 {
        errors.push(ConfigError::Validation {
            message: "storage.runtime_log_cap must be at least 1".to_string(),
        });
    }

    if config.orchestrator.phase_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "orchestrator.phase_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.orchestrator.idle_threshold_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "orchestrator.idle_threshold_secs must be at least 1".to_string(),
        });
    }

    for (section, url) in [
        ("builder.base_url", &config.builder.base_url),
        ("deployer.base_url", &config.deployer.base_url),
        ("codegen.base_url", &config.codegen.base_url),
        ("telegram.api_base", &config.telegram.api_base),
        ("telegram.webhook_base", &config.telegram.webhook_base),
    ] {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            errors.push(ConfigError::Validation {
                message: format!("{section} must be an http(s) URL, got `{url}`"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
