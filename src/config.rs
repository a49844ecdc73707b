/*
 * Responsibility
 * - read settings from the environment (DATABASE_URL, introspection endpoint, allow-list ...)
 * - validate them (startup fails when something required is missing)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

const INTROSPECT_PATH: &str = "oauth2/introspect";

const DEFAULT_PUBLIC_PATHS: &str = "/api/user/new,/api/user/login,/api/v1/health";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout: Duration,

    // Full endpoint, i.e. `{INTROSPECTION_BASE_URL}/oauth2/introspect`
    pub introspection_url: Url,
    pub introspection_timeout: Duration,

    pub request_timeout: Duration,

    // Exact-match paths served without a bearer token
    pub public_paths: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    ///
    /// `from_env` is the production entry point; tests pass a map instead of
    /// touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8085,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let database_url = lookup("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections =
            parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10u32)?;
        if database_max_connections == 0 {
            return Err(ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"));
        }

        let database_acquire_timeout =
            Duration::from_secs(parse_or(&lookup, "DATABASE_ACQUIRE_TIMEOUT_SECONDS", 5u64)?);

        let introspection_base = lookup("INTROSPECTION_BASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("INTROSPECTION_BASE_URL"))?;
        let introspection_url = introspection_endpoint(&introspection_base)?;

        let introspection_timeout =
            Duration::from_secs(parse_or(&lookup, "INTROSPECTION_TIMEOUT_SECONDS", 5u64)?);

        let request_timeout =
            Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECONDS", 30u64)?);

        let public_paths = lookup("AUTH_PUBLIC_PATHS")
            .unwrap_or_else(|| DEFAULT_PUBLIC_PATHS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            database_acquire_timeout,
            introspection_url,
            introspection_timeout,
            request_timeout,
            public_paths,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

// `http://hydra:4445` and `http://hydra:4445/` both end up at `.../oauth2/introspect`
fn introspection_endpoint(base: &str) -> Result<Url, ConfigError> {
    let joined = format!("{}/{}", base.trim().trim_end_matches('/'), INTROSPECT_PATH);
    let url = Url::parse(&joined).map_err(|_| ConfigError::Invalid("INTROSPECTION_BASE_URL"))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::Invalid("INTROSPECTION_BASE_URL")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://gateway@localhost/gateway"),
        ("INTROSPECTION_BASE_URL", "http://127.0.0.1:4445"),
    ];

    #[test]
    fn defaults_are_applied() {
        let config = Config::from_lookup(lookup_from(&REQUIRED)).unwrap();

        assert_eq!(config.addr.port(), 8085);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.introspection_timeout, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(
            config.introspection_url.as_str(),
            "http://127.0.0.1:4445/oauth2/introspect"
        );
        assert_eq!(
            config.public_paths,
            vec!["/api/user/new", "/api/user/login", "/api/v1/health"]
        );
    }

    #[test]
    fn trailing_slash_on_base_url_is_tolerated() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/db"),
            ("INTROSPECTION_BASE_URL", "https://auth.internal/admin/"),
        ]))
        .unwrap();

        assert_eq!(
            config.introspection_url.as_str(),
            "https://auth.internal/admin/oauth2/introspect"
        );
    }

    #[test]
    fn missing_required_values_fail() {
        let err = Config::from_lookup(lookup_from(&[(
            "INTROSPECTION_BASE_URL",
            "http://127.0.0.1:4445",
        )]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));

        let err = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("INTROSPECTION_BASE_URL"));
    }

    #[test]
    fn invalid_values_fail() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "not-a-port"));
        assert_eq!(
            Config::from_lookup(lookup_from(&pairs)).unwrap_err(),
            ConfigError::Invalid("PORT")
        );

        let pairs = [
            ("DATABASE_URL", "postgres://x"),
            ("INTROSPECTION_BASE_URL", "ftp://hydra"),
        ];
        assert_eq!(
            Config::from_lookup(lookup_from(&pairs)).unwrap_err(),
            ConfigError::Invalid("INTROSPECTION_BASE_URL")
        );

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DATABASE_MAX_CONNECTIONS", "0"));
        assert_eq!(
            Config::from_lookup(lookup_from(&pairs)).unwrap_err(),
            ConfigError::Invalid("DATABASE_MAX_CONNECTIONS")
        );
    }

    #[test]
    fn public_paths_are_trimmed_and_filtered() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("AUTH_PUBLIC_PATHS", " /api/user/login , ,/status "));
        pairs.push(("APP_ENV", "PROD"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.public_paths, vec!["/api/user/login", "/status"]);
        assert!(config.app_env.is_production());
    }
}
