use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Largest review count the store can page through for one app.
const MAX_REVIEW_COUNT: usize = 500;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is malformed or out of range.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is malformed or out of range.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a
/// `HashMap` lookup instead of `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("APPSENT_ENV", "development"));

    let bind_addr = parse_addr("APPSENT_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("APPSENT_LOG_LEVEL", "info");
    let cors_origins = parse_origins(&or_default("APPSENT_CORS_ORIGINS", "http://localhost:3000"));

    let store_base_url = or_default("APPSENT_STORE_BASE_URL", "https://itunes.apple.com");
    let store_country = or_default("APPSENT_STORE_COUNTRY", "us");
    let store_lang = or_default("APPSENT_STORE_LANG", "en");
    let store_timeout_secs = parse_u64("APPSENT_STORE_TIMEOUT_SECS", "30")?;
    let review_count = parse_usize("APPSENT_REVIEW_COUNT", "100")?;
    let suggestion_limit = parse_usize("APPSENT_SUGGESTION_LIMIT", "5")?;

    let ollama_url = or_default("APPSENT_OLLAMA_URL", "http://localhost:11434");
    let llm_model = or_default("APPSENT_LLM_MODEL", "mistral");
    let llm_timeout_secs = parse_u64("APPSENT_LLM_TIMEOUT_SECS", "60")?;
    let max_concurrent_scores = parse_usize("APPSENT_MAX_CONCURRENT_SCORES", "8")?;

    let user_agent = or_default("APPSENT_USER_AGENT", "appsent/0.1 (review-sentiment)");

    if review_count == 0 || review_count > MAX_REVIEW_COUNT {
        return Err(ConfigError::Validation(format!(
            "APPSENT_REVIEW_COUNT must be between 1 and {MAX_REVIEW_COUNT}, got {review_count}"
        )));
    }
    if suggestion_limit == 0 {
        return Err(ConfigError::Validation(
            "APPSENT_SUGGESTION_LIMIT must be at least 1".to_string(),
        ));
    }
    if max_concurrent_scores == 0 {
        return Err(ConfigError::Validation(
            "APPSENT_MAX_CONCURRENT_SCORES must be at least 1".to_string(),
        ));
    }
    if llm_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "APPSENT_LLM_TIMEOUT_SECS must be at least 1".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        cors_origins,
        store_base_url,
        store_country,
        store_lang,
        store_timeout_secs,
        review_count,
        suggestion_limit,
        ollama_url,
        llm_model,
        llm_timeout_secs,
        max_concurrent_scores,
        user_agent,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

/// Split a comma-separated origin list, dropping blanks and trailing slashes.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_owned())
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
