//! Configuration validation logic.

use regex::Regex;
use url::Url;

use crate::api::Category;
use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Minimum length for a client secret.
const MIN_SECRET_LENGTH: usize = 8;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_credentials(
        config.credentials.client_id,
        &config.credentials.client_secret,
    )?;
    validate_base_url("api_base_url", &config.options.api_base_url)?;
    validate_base_url("mirror_url", &config.options.mirror_url)?;
    validate_endpoint_url("token_url", &config.options.token_url)?;

    if config.options.request_timeout_seconds == 0 {
        return Err(Error::ConfigValidation {
            field: "request_timeout_seconds".to_string(),
            message: "Timeout must be at least 1 second".to_string(),
        });
    }

    Ok(())
}

/// Validate the OAuth client credentials.
pub fn validate_credentials(client_id: u64, client_secret: &str) -> Result<()> {
    if client_id == 0 {
        return Err(Error::MissingConfig(
            "client_id (create an OAuth application in your osu! account settings)".to_string(),
        ));
    }

    if client_secret.is_empty() {
        return Err(Error::MissingConfig("client_secret".to_string()));
    }

    if client_secret.len() < MIN_SECRET_LENGTH {
        return Err(Error::ConfigValidation {
            field: "client_secret".to_string(),
            message: format!(
                "Client secret must be at least {} characters (got {})",
                MIN_SECRET_LENGTH,
                client_secret.len()
            ),
        });
    }

    let placeholder = Regex::new(r"(?i)^(replace_?me|your_?(client_?)?secret|x+)$").unwrap();
    if placeholder.is_match(client_secret) {
        return Err(Error::ConfigValidation {
            field: "client_secret".to_string(),
            message: "Client secret appears to be a placeholder. Please provide your actual secret."
                .to_string(),
        });
    }

    Ok(())
}

/// Validate a base URL that paths get appended to.
///
/// Must be http(s) and end with `/`, otherwise `Url::join` would drop the
/// last path segment.
pub fn validate_base_url(field: &str, value: &str) -> Result<()> {
    validate_endpoint_url(field, value)?;

    if !value.ends_with('/') {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!("Base URL must end with '/': {}", value),
        });
    }

    Ok(())
}

/// Validate an absolute http(s) URL.
pub fn validate_endpoint_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| Error::ConfigValidation {
        field: field.to_string(),
        message: format!("Invalid URL '{}': {}", value, e),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!("Unsupported URL scheme '{}'", url.scheme()),
        });
    }

    Ok(())
}

/// Validate the target user ID.
pub fn validate_user_id(user_id: u64) -> Result<()> {
    if user_id == 0 {
        return Err(Error::ConfigValidation {
            field: "user".to_string(),
            message: "User ID must be a positive number".to_string(),
        });
    }
    Ok(())
}

/// Validate the recursion depth.
pub fn validate_depth(depth: u32) -> Result<()> {
    if depth == 0 {
        return Err(Error::ConfigValidation {
            field: "depth".to_string(),
            message: "Depth must be at least 1 (1 = only the start user's favourites)".to_string(),
        });
    }
    Ok(())
}

/// Validate that at least one category was requested.
pub fn validate_categories(categories: &[Category]) -> Result<()> {
    if categories.is_empty() {
        return Err(Error::MissingConfig(
            "beatmapset category (specify at least one, e.g. --favorite)".to_string(),
        ));
    }
    Ok(())
}
