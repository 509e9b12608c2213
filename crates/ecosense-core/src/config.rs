use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let gemini_api_key = require("GEMINI_API_KEY")?;
    let env = parse_environment(&or_default("ECOSENSE_ENV", "development"))?;

    let bind_addr = or_default("ECOSENSE_BIND_ADDR", "0.0.0.0:5000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("ECOSENSE_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("ECOSENSE_LOG_LEVEL", "info");

    let llm_base_url = or_default(
        "ECOSENSE_LLM_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );
    let llm_model = or_default("ECOSENSE_LLM_MODEL", "gemini-2.0-flash");
    let llm_temperature = parse_temperature(&or_default("ECOSENSE_LLM_TEMPERATURE", "0.1"))
        .map_err(|reason| invalid("ECOSENSE_LLM_TEMPERATURE", reason))?;
    let llm_timeout_secs = parse_u64("ECOSENSE_LLM_TIMEOUT_SECS", "60")?;
    if llm_timeout_secs == 0 {
        return Err(invalid(
            "ECOSENSE_LLM_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    let max_body_bytes = parse_usize("ECOSENSE_MAX_BODY_BYTES", "5242880")?;
    let prompt_html_max_chars = parse_usize("ECOSENSE_PROMPT_HTML_MAX_CHARS", "100000")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        gemini_api_key,
        llm_base_url,
        llm_model,
        llm_temperature,
        llm_timeout_secs,
        max_body_bytes,
        prompt_html_max_chars,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ECOSENSE_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other:?}"),
        }),
    }
}

fn parse_temperature(raw: &str) -> Result<f32, String> {
    let value = raw.trim().parse::<f32>().map_err(|e| e.to_string())?;
    if !value.is_finite() || !(0.0..=2.0).contains(&value) {
        return Err(format!("temperature must be within 0.0..=2.0, got {value}"));
    }
    Ok(value)
}
