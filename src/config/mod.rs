use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::grid::PageSize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub grid: GridConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Prefix prepended to every resource collection path ("/api" -> "/api/cars")
    pub prefix: String,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub default_page_size: PageSize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the persisted credential record; None means $HOME/.config/rental-admin
    pub config_dir: Option<PathBuf>,
    pub token_cookie: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("RENTAL_ADMIN_API_URL") {
            self.api.base_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("RENTAL_ADMIN_API_PREFIX") {
            self.api.prefix = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("RENTAL_ADMIN_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("RENTAL_ADMIN_DEFAULT_PAGE_SIZE") {
            if let Some(size) = v.parse::<usize>().ok().and_then(|n| PageSize::try_from(n).ok()) {
                self.grid.default_page_size = size;
            }
        }
        if let Ok(v) = env::var("RENTAL_ADMIN_CONFIG_DIR") {
            self.session.config_dir = Some(PathBuf::from(v));
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:8080".to_string(),
                prefix: "/api".to_string(),
                enable_request_logging: true,
            },
            grid: GridConfig {
                default_page_size: PageSize::Ten,
            },
            session: SessionConfig {
                config_dir: None,
                token_cookie: "administrator-token".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://staging.rental.example.com".to_string(),
                prefix: "/api".to_string(),
                enable_request_logging: true,
            },
            grid: GridConfig {
                default_page_size: PageSize::TwentyFive,
            },
            session: SessionConfig {
                config_dir: None,
                token_cookie: "administrator-token".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://rental.example.com".to_string(),
                prefix: "/api".to_string(),
                enable_request_logging: false,
            },
            grid: GridConfig {
                default_page_size: PageSize::TwentyFive,
            },
            session: SessionConfig {
                config_dir: None,
                token_cookie: "administrator-token".to_string(),
            },
        }
    }

    /// Resolve the credential directory, creating nothing.
    pub fn config_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(dir) = &self.session.config_dir {
            return Ok(dir.clone());
        }
        let home = env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        Ok(PathBuf::from(home).join(".config").join("rental-admin"))
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.grid.default_page_size, PageSize::Ten);
        assert!(config.api.enable_request_logging);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(!config.api.enable_request_logging);
        assert_eq!(config.session.token_cookie, "administrator-token");
    }

    #[test]
    fn test_explicit_config_dir_wins() {
        let mut config = AppConfig::development();
        config.session.config_dir = Some(PathBuf::from("/tmp/rental-admin-test"));
        assert_eq!(config.config_dir().unwrap(), PathBuf::from("/tmp/rental-admin-test"));
    }
}
