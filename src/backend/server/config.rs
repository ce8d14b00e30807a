/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration.
 *
 * # Configuration Sources
 *
 * Configuration is loaded from environment variables (after `.env` is read
 * by the binary), with defaults for local development where one makes sense.
 *
 * | Variable             | Required | Default                   |
 * |----------------------|----------|---------------------------|
 * | `DATABASE_URL`       | yes      |                           |
 * | `REDIS_URL`          | no       | `redis://127.0.0.1:6379`  |
 * | `JWT_SECRET`         | yes      |                           |
 * | `JWT_REFRESH_SECRET` | yes      | must differ from `JWT_SECRET` |
 * | `EMAIL_ADDRESS`      | yes      |                           |
 * | `EMAIL_PASSWORD`     | yes      |                           |
 * | `SMTP_HOST`          | no       | `smtp.gmail.com`          |
 * | `SMTP_PORT`          | no       | `587`                     |
 * | `APP_URL`            | no       | `http://localhost:5173`   |
 * | `APP_LANG`           | no       | `en`                      |
 * | `CORS_ORIGIN`        | no       | value of `APP_URL`        |
 * | `SERVER_PORT`        | no       | `8080`                    |
 * | `BCRYPT_COST`        | no       | `bcrypt::DEFAULT_COST`    |
 *
 * # Error Handling
 *
 * Unlike optional services, a bad configuration is fatal: the binary logs
 * the `ConfigError` and exits before binding a port.
 */

use std::fmt;

use axum::http::HeaderValue;
use thiserror::Error;

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_APP_URL: &str = "http://localhost:5173";
const DEFAULT_APP_LANG: &str = "en";
const DEFAULT_SERVER_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("JWT_SECRET and JWT_REFRESH_SECRET must differ")]
    SharedSecret,
}

/// Immutable runtime configuration, built once at start-up
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub jwt_secret: String,
    pub jwt_refresh_secret: String,
    pub email_address: String,
    pub email_password: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Frontend base URL, used to build password-reset links
    pub app_url: String,
    /// Sent as `Content-Language` on every response
    pub app_lang: HeaderValue,
    pub cors_origin: HeaderValue,
    pub server_port: u16,
    pub bcrypt_cost: u32,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("redis_url", &self.redis_url)
            .field("email_address", &self.email_address)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("app_url", &self.app_url)
            .field("app_lang", &self.app_lang)
            .field("cors_origin", &self.cors_origin)
            .field("server_port", &self.server_port)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let jwt_secret = required("JWT_SECRET")?;
        let jwt_refresh_secret = required("JWT_REFRESH_SECRET")?;
        if jwt_secret == jwt_refresh_secret {
            return Err(ConfigError::SharedSecret);
        }

        let app_url = get("APP_URL").unwrap_or_else(|| DEFAULT_APP_URL.to_string());
        let cors_origin = get("CORS_ORIGIN").unwrap_or_else(|| app_url.clone());
        let app_lang = get("APP_LANG").unwrap_or_else(|| DEFAULT_APP_LANG.to_string());

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            redis_url: get("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            jwt_secret,
            jwt_refresh_secret,
            email_address: required("EMAIL_ADDRESS")?,
            email_password: required("EMAIL_PASSWORD")?,
            smtp_host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            smtp_port: parse_or(get("SMTP_PORT"), "SMTP_PORT", DEFAULT_SMTP_PORT)?,
            app_lang: header_value("APP_LANG", app_lang)?,
            cors_origin: header_value("CORS_ORIGIN", cors_origin)?,
            app_url,
            server_port: parse_or(get("SERVER_PORT"), "SERVER_PORT", DEFAULT_SERVER_PORT)?,
            bcrypt_cost: parse_or(get("BCRYPT_COST"), "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn header_value(key: &'static str, value: String) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(&value).map_err(|_| ConfigError::Invalid { key, value })
}
