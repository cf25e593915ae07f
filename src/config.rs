use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub loyalty: LoyaltyConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64,  // seconds
    pub refresh_token_expires_in: i64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoyaltyConfig {
    /// Order total (cents) needed for one point
    pub cents_per_point: i64,
    pub expiration_days: i64,
    /// Interval of the background expiration sweep
    pub sweep_interval_secs: u64,
}

impl Default for LoyaltyConfig {
    fn default() -> Self {
        Self {
            cents_per_point: 1000,
            expiration_days: 365,
            sweep_interval_secs: 3600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,
    pub branch_code: String,
    pub branch_name: String,
    pub delivery_days: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_email: "admin@dla.com".to_string(),
            admin_password: "Admin12345".to_string(),
            admin_name: "Administrador".to_string(),
            branch_code: "MATRIZ".to_string(),
            branch_name: "Sucursal Matriz".to_string(),
            delivery_days: "MON,TUE,WED,THU,FRI,SAT".to_string(),
        }
    }
}

fn get_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_toml() -> AppResult<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // Without a config file everything comes from the environment
        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::from_env_only()?,
            Err(e) => {
                return Err(AppError::ConfigError(format!(
                    "Cannot read config file {config_path}: {e}"
                )));
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn parse(config_str: &str) -> AppResult<Self> {
        toml::from_str(config_str)
            .map_err(|e| AppError::ConfigError(format!("Invalid config file: {e}")))
    }

    fn from_env_only() -> AppResult<Self> {
        let database_url = get_env("DATABASE_URL").ok_or_else(|| {
            AppError::ConfigError(
                "DATABASE_URL is not set and no config.toml was found".to_string(),
            )
        })?;

        Ok(Config {
            server: ServerConfig {
                host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: get_env_parse("SERVER_PORT", 8080u16),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
            },
            jwt: JwtConfig {
                secret: get_env("JWT_SECRET")
                    .unwrap_or_else(|| "change-me-in-production".to_string()),
                access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 7200i64),
                refresh_token_expires_in: get_env_parse("JWT_REFRESH_EXPIRES_IN", 2_592_000i64),
            },
            loyalty: LoyaltyConfig::default(),
            seed: SeedConfig::default(),
        })
    }

    /// Environment wins over the file
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            self.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("JWT_REFRESH_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            self.jwt.refresh_token_expires_in = n;
        }
        if let Ok(v) = env::var("LOYALTY_CENTS_PER_POINT")
            && let Ok(n) = v.parse()
        {
            self.loyalty.cents_per_point = n;
        }
        if let Ok(v) = env::var("LOYALTY_EXPIRATION_DAYS")
            && let Ok(n) = v.parse()
        {
            self.loyalty.expiration_days = n;
        }
        if let Ok(v) = env::var("LOYALTY_SWEEP_INTERVAL_SECS")
            && let Ok(n) = v.parse()
        {
            self.loyalty.sweep_interval_secs = n;
        }
        if let Ok(v) = env::var("SEED_ADMIN_EMAIL") {
            self.seed.admin_email = v;
        }
        if let Ok(v) = env::var("SEED_ADMIN_PASSWORD") {
            self.seed.admin_password = v;
        }
        if let Ok(v) = env::var("SEED_ADMIN_NAME") {
            self.seed.admin_name = v;
        }
        if let Ok(v) = env::var("SEED_BRANCH_CODE") {
            self.seed.branch_code = v;
        }
        if let Ok(v) = env::var("SEED_BRANCH_NAME") {
            self.seed.branch_name = v;
        }
        if let Ok(v) = env::var("SEED_DELIVERY_DAYS") {
            self.seed.delivery_days = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_file_uses_section_defaults() {
        let config = Config::parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [database]
            url = "sqlite::memory:"
            max_connections = 1

            [jwt]
            secret = "s"
            access_token_expires_in = 60
            refresh_token_expires_in = 120
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.loyalty.cents_per_point, 1000);
        assert_eq!(config.seed.branch_code, "MATRIZ");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Config::parse("not = [toml"),
            Err(AppError::ConfigError(_))
        ));
    }
}
