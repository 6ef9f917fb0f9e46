use secrecy::{ExposeSecret, Secret};
use service_core::config::{self as core_config, get_env, get_optional_env, parse_env};
use service_core::error::AppError;

pub use service_core::config::Environment;

/// Placeholder signing key accepted only outside production.
const DEV_SESSION_SIGNING_KEY: &str = "dev-only-session-signing-key-change-me-0000";

pub const WILDCARD_ORIGIN: &str = "*";

/// Minimum signing key length accepted in production.
const MIN_SIGNING_KEY_BYTES: usize = 32;

#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub signing_key: Secret<String>,
    pub cookie_secure: CookieSecure,
    /// When set, login requires this password.
    pub admin_password: Option<Secret<String>>,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

/// `COOKIE_SECURE` setting: an explicit override, or `auto` to follow the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieSecure {
    Always,
    Never,
    Auto,
}

impl CookieSecure {
    /// Resolve to the flag actually set on the cookie.
    pub fn resolve(self, environment: &Environment) -> bool {
        match self {
            CookieSecure::Always => true,
            CookieSecure::Never => false,
            CookieSecure::Auto => environment.is_prod(),
        }
    }
}

impl std::str::FromStr for CookieSecure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "true" => Ok(CookieSecure::Always),
            "false" => Ok(CookieSecure::Never),
            "auto" => Ok(CookieSecure::Auto),
            _ => Err(format!("Invalid cookie secure mode: {}", s)),
        }
    }
}

impl AdminConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let environment = Environment::from_env()?;
        let is_prod = environment.is_prod();

        let config = AdminConfig {
            common: common_config,
            environment: environment.clone(),
            service_name: get_env("SERVICE_NAME", Some("admin-service"), is_prod)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
            database: DatabaseConfig {
                url: Secret::new(get_env("DATABASE_URL", None, is_prod)?),
                max_connections: parse_env(
                    "DATABASE_MAX_CONNECTIONS",
                    &get_optional_env("DATABASE_MAX_CONNECTIONS").unwrap_or_else(|| "10".into()),
                )?,
                min_connections: parse_env(
                    "DATABASE_MIN_CONNECTIONS",
                    &get_optional_env("DATABASE_MIN_CONNECTIONS").unwrap_or_else(|| "1".into()),
                )?,
            },
            session: SessionConfig {
                signing_key: Secret::new(get_env(
                    "SESSION_SIGNING_KEY",
                    Some(DEV_SESSION_SIGNING_KEY),
                    is_prod,
                )?),
                cookie_secure: match get_optional_env("COOKIE_SECURE") {
                    Some(raw) => parse_env("COOKIE_SECURE", &raw)?,
                    None => CookieSecure::Auto,
                },
                admin_password: get_optional_env("ADMIN_PASSWORD").map(Secret::new),
            },
            security: SecurityConfig {
                allowed_origins: get_env(
                    "ALLOWED_ORIGINS",
                    Some("http://localhost:3000"),
                    is_prod,
                )?
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Whether the session cookie carries the `Secure` attribute.
    pub fn secure_cookie(&self) -> bool {
        self.session.cookie_secure.resolve(&self.environment)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.common.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "DATABASE_MIN_CONNECTIONS must not exceed DATABASE_MAX_CONNECTIONS"
            )));
        }

        if self.session.signing_key.expose_secret().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "SESSION_SIGNING_KEY must not be empty"
            )));
        }

        // Credentialed CORS cannot use a wildcard origin.
        if self.security.allowed_origins.iter().any(|o| o == WILDCARD_ORIGIN) {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Wildcard CORS origin is not allowed; list origins explicitly"
            )));
        }

        if self.environment == Environment::Prod {
            let key = self.session.signing_key.expose_secret();
            if key == DEV_SESSION_SIGNING_KEY || key.len() < MIN_SIGNING_KEY_BYTES {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "SESSION_SIGNING_KEY must be a unique value of at least {} bytes in production",
                    MIN_SIGNING_KEY_BYTES
                )));
            }

            if !self.secure_cookie() {
                tracing::warn!("Session cookie is not marked Secure in production");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> AdminConfig {
    AdminConfig {
        common: core_config::Config { port: 8080 },
        environment: Environment::Dev,
        service_name: "admin-service-test".to_string(),
        service_version: "0.0.0".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        database: DatabaseConfig {
            url: Secret::new("postgres://localhost/admin_test".to_string()),
            max_connections: 5,
            min_connections: 1,
        },
        session: SessionConfig {
            signing_key: Secret::new("unit-test-signing-key-0123456789abcdef".to_string()),
            cookie_secure: CookieSecure::Auto,
            admin_password: None,
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
    }
}
