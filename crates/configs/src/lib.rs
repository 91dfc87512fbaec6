use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storefront: StorefrontConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            access_token: String::new(),
            api_version: default_api_version(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { token_path: default_token_path(), token_ttl_days: default_token_ttl_days() }
    }
}

/// Ten years; keeps `now + ttl` well inside chrono's range.
pub const MAX_TOKEN_TTL_DAYS: i64 = 3650;

fn default_api_version() -> String { "2021-01".into() }
fn default_request_timeout() -> u64 { 30 }
fn default_token_path() -> PathBuf { PathBuf::from("data/customer_token.json") }
fn default_token_ttl_days() -> i64 { 30 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the
    /// file is absent, then fill gaps from the environment and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    /// `lookup` resolves environment keys; tests pass a closure over a map.
    pub fn normalize_and_validate<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.storefront.normalize_from_env(&lookup);
        self.storefront.validate()?;
        self.session.validate()?;
        Ok(())
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

impl StorefrontConfig {
    pub fn normalize_from_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // values in the TOML file win over the environment
        if self.domain.trim().is_empty() {
            if let Some(domain) = lookup("SHOPIFY_STORE_DOMAIN") {
                self.domain = domain;
            }
        }
        if self.access_token.trim().is_empty() {
            if let Some(token) = lookup("SHOPIFY_STOREFRONT_ACCESS_TOKEN") {
                self.access_token = token;
            }
        }
        if let Some(version) = lookup("SHOPIFY_API_VERSION") {
            if !version.trim().is_empty() {
                self.api_version = version;
            }
        }

        let domain = self.domain.trim().trim_end_matches('/');
        self.domain = if domain.is_empty() || domain.contains("://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        };
    }

    pub fn validate(&self) -> Result<()> {
        if self.domain.is_empty() {
            return Err(anyhow!("storefront.domain is empty; set it in config.toml or SHOPIFY_STORE_DOMAIN"));
        }
        if self.access_token.trim().is_empty() {
            return Err(anyhow!("storefront.access_token is empty; set it in config.toml or SHOPIFY_STOREFRONT_ACCESS_TOKEN"));
        }
        if self.api_version.trim().is_empty() {
            return Err(anyhow!("storefront.api_version must not be empty"));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("storefront.request_timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }

    /// Full GraphQL endpoint, e.g. `https://shop.myshopify.com/api/2021-01/graphql.json`.
    pub fn graphql_endpoint(&self) -> String {
        format!("{}/api/{}/graphql.json", self.domain, self.api_version)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.token_path.as_os_str().is_empty() {
            return Err(anyhow!("session.token_path must not be empty"));
        }
        if !(1..=MAX_TOKEN_TTL_DAYS).contains(&self.token_ttl_days) {
            return Err(anyhow!("session.token_ttl_days must be in 1..={MAX_TOKEN_TTL_DAYS}"));
        }
        Ok(())
    }
}
