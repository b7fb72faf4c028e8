use std::env::VarError;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load configuration from `VITRINE_*` environment variables, reading a
/// `.env` file first if one exists.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Like [`load_app_config`] without touching `.env`.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Typed reads over an env-var lookup. Unset and whitespace-only values
/// both count as absent.
struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    fn optional(&self, var: &str) -> Option<String> {
        (self.lookup)(var)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
    }

    fn string(&self, var: &str, default: &str) -> String {
        self.optional(var).unwrap_or_else(|| default.to_string())
    }

    fn path(&self, var: &str, default: &str) -> PathBuf {
        PathBuf::from(self.string(var, default))
    }

    fn parse<T>(&self, var: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.string(var, default)
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Builds the configuration from an arbitrary lookup so tests can pass a
/// `HashMap` instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let env = EnvReader { lookup };

    Ok(AppConfig {
        env: parse_environment(&env.string("VITRINE_ENV", "development"))?,
        bind_addr: env.parse::<SocketAddr>("VITRINE_BIND_ADDR", "0.0.0.0:3000")?,
        log_level: env.string("VITRINE_LOG_LEVEL", "info"),
        workbook_path: env.path("VITRINE_WORKBOOK_PATH", "./data/prices.xlsx"),
        color_mods_path: env.path("VITRINE_COLOR_MODS_PATH", "./data/color_mods.json"),
        featured_path: env.path("VITRINE_FEATURED_PATH", "./data/featured.json"),
        public_dir: env.path("VITRINE_PUBLIC_DIR", "./public"),
        subscriptions_path: env.path("VITRINE_SUBSCRIPTIONS_PATH", "./data/subscriptions.csv"),
        webhook_url: env.optional("VITRINE_WEBHOOK_URL"),
        webhook_timeout_secs: env.parse("VITRINE_WEBHOOK_TIMEOUT_SECS", "10")?,
        default_market: parse_market(&env.string("VITRINE_DEFAULT_MARKET", "AO"))?,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "VITRINE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Markets are two-letter codes; stored upper-cased.
fn parse_market(s: &str) -> Result<String, ConfigError> {
    let market = s.trim().to_ascii_uppercase();
    if market.len() == 2 && market.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(market)
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: "VITRINE_DEFAULT_MARKET".to_string(),
            reason: format!("expected a two-letter market code, got '{s}'"),
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
