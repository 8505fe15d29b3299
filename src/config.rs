use serde::Deserialize;
use std::env;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub shutdown_timeout_ms: u64,

    // Database
    pub database_url: String,
    pub database_max_connections: u32,

    // Blockchain
    pub starknet_rpc_url: String,
    pub starknet_chain_id: String,

    // Cartridge authentication
    pub cartridge_auth_url: String,

    // Dojo account (optional, stub mode without it)
    pub dojo_account_address: Option<String>,
    pub dojo_private_key: Option<String>,

    // CORS
    pub cors_origin: String,
    pub cors_credentials: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            shutdown_timeout_ms: env::var("SHUTDOWN_TIMEOUT_MS")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()?,

            database_url: required("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,

            starknet_rpc_url: required("STARKNET_RPC_URL")?,
            starknet_chain_id: env::var("STARKNET_CHAIN_ID").unwrap_or_else(|_| "SN_MAIN".to_string()),

            cartridge_auth_url: required("CARTRIDGE_AUTH_URL")?,

            dojo_account_address: optional("DOJO_ACCOUNT_ADDRESS"),
            dojo_private_key: optional("DOJO_PRIVATE_KEY"),

            cors_origin: env::var("CORS_ORIGIN").unwrap_or_default(),
            cors_credentials: env::var("CORS_CREDENTIALS")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database_url.trim().is_empty() {
            anyhow::bail!("DATABASE_URL is empty");
        }
        if self.database_max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be > 0");
        }
        Url::parse(&self.starknet_rpc_url)
            .map_err(|e| anyhow::anyhow!("STARKNET_RPC_URL is not a valid URL: {}", e))?;
        Url::parse(&self.cartridge_auth_url)
            .map_err(|e| anyhow::anyhow!("CARTRIDGE_AUTH_URL is not a valid URL: {}", e))?;
        if self.shutdown_timeout_ms == 0 {
            anyhow::bail!("SHUTDOWN_TIMEOUT_MS must be > 0");
        }

        if !self.has_dojo_account() {
            tracing::warn!(
                "DOJO_ACCOUNT_ADDRESS or DOJO_PRIVATE_KEY missing; chain calls run in stub mode"
            );
        }

        Ok(())
    }

    pub fn has_dojo_account(&self) -> bool {
        self.dojo_account_address.is_some() && self.dojo_private_key.is_some()
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Allowed CORS origins; empty means any origin.
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_origin
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty() && *s != "*")
            .map(str::to_string)
            .collect()
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("Missing required environment variable: {}", key))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: &str) -> bool {
    let normalized = value.trim().to_ascii_lowercase();
    normalized == "1" || normalized == "true" || normalized == "yes" || normalized == "on"
}

#[cfg(test)]
pub fn test_config(database_url: &str) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        shutdown_timeout_ms: 500,
        database_url: database_url.to_string(),
        database_max_connections: 1,
        starknet_rpc_url: "http://localhost:5050".to_string(),
        starknet_chain_id: "SN_SEPOLIA".to_string(),
        cartridge_auth_url: "https://x.cartridge.gg".to_string(),
        dojo_account_address: None,
        dojo_private_key: None,
        cors_origin: String::new(),
        cors_credentials: true,
    }
}
