use crate::app_config::{AppConfig, NotifyConfig};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can use a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
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

    let non_empty = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let facilities_path = PathBuf::from(or_default("TEETIMES_FACILITIES_PATH", "./facilities.csv"));
    let output_path = PathBuf::from(or_default("TEETIMES_OUTPUT_PATH", "./results.csv"));
    let log_level = or_default("TEETIMES_LOG_LEVEL", "info");

    let site_host = or_default("TEETIMES_SITE_HOST", "golfnow.co.uk");
    if site_host.trim().is_empty() || site_host.contains('/') {
        return Err(invalid(
            "TEETIMES_SITE_HOST",
            format!("\"{site_host}\" is not a bare host name"),
        ));
    }

    let webdriver_url = or_default("TEETIMES_WEBDRIVER_URL", "http://localhost:9515");
    let headless = parse_bool("TEETIMES_HEADLESS", &or_default("TEETIMES_HEADLESS", "true"))?;

    let max_concurrent_facilities = parse_usize("TEETIMES_MAX_CONCURRENT_FACILITIES", "5")?;
    if max_concurrent_facilities == 0 {
        return Err(invalid(
            "TEETIMES_MAX_CONCURRENT_FACILITIES",
            "must be at least 1".to_string(),
        ));
    }

    let wait_budget_secs = parse_u64("TEETIMES_WAIT_BUDGET_SECS", "5")?;
    if wait_budget_secs == 0 {
        return Err(invalid(
            "TEETIMES_WAIT_BUDGET_SECS",
            "must be greater than 0".to_string(),
        ));
    }

    let poll_interval_ms = parse_u64("TEETIMES_POLL_INTERVAL_MS", "250")?;
    let navigation_timeout_secs = parse_u64("TEETIMES_NAVIGATION_TIMEOUT_SECS", "30")?;
    let marker_selector = or_default("TEETIMES_MARKER_SELECTOR", ".time-meridian");
    let renderer_max_retries = parse_u32("TEETIMES_RENDERER_MAX_RETRIES", "2")?;
    let renderer_retry_backoff_ms = parse_u64("TEETIMES_RENDERER_RETRY_BACKOFF_MS", "500")?;
    let report_schedule = or_default("TEETIMES_REPORT_SCHEDULE", "0 0 6 * * *");

    let notify = NotifyConfig {
        relay_url: non_empty("TEETIMES_NOTIFY_RELAY_URL"),
        token: non_empty("TEETIMES_NOTIFY_TOKEN"),
        sender: or_default("TEETIMES_NOTIFY_SENDER", "teetimes@localhost"),
        recipient: non_empty("TEETIMES_NOTIFY_RECIPIENT"),
    };
    if notify.relay_url.is_some() && notify.recipient.is_none() {
        return Err(ConfigError::MissingEnvVar(
            "TEETIMES_NOTIFY_RECIPIENT".to_string(),
        ));
    }

    Ok(AppConfig {
        facilities_path,
        output_path,
        log_level,
        site_host,
        webdriver_url,
        headless,
        max_concurrent_facilities,
        wait_budget_secs,
        poll_interval_ms,
        navigation_timeout_secs,
        marker_selector,
        renderer_max_retries,
        renderer_retry_backoff_ms,
        report_schedule,
        notify,
    })
}

/// Parse a boolean flag. Accepts `true/false`, `1/0`, `yes/no` (case-insensitive).
fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("\"{other}\" is not a boolean"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
