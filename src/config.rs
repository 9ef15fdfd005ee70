use rocket::figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_PATH: &str = "/api";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    pub store: StoreConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
    pub api: ApiConfig,
    pub pricing: PricingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreConfig {
    /// Location of the JSON document holding cars, users and bookings.
    pub path: String,
    /// Seed sample cars and users when the document holds neither.
    pub seed_sample_data: bool,
    pub pretty: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub address: String,
    /// Upper bound for JSON request bodies, in mebibytes. Car images and documents travel inline.
    pub json_limit_mib: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_path: String,
    pub additional_base_paths: Vec<String>,
    pub enable_swagger: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PricingConfig {
    /// Per-day surcharge when a professional driver is requested.
    pub driver_daily_fee: i64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "db.json".to_string(),
            seed_sample_data: true,
            pretty: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            address: "127.0.0.1".to_string(),
            json_limit_mib: 50,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allow_credentials: false,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_API_BASE_PATH.to_string(),
            additional_base_paths: Vec::new(),
            enable_swagger: true,
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self { driver_daily_fee: 500 }
    }
}

impl Config {
    /// Load configuration from multiple sources in priority order:
    /// 1. Built-in defaults
    /// 2. DriveEasy.toml (base configuration file)
    /// 3. Environment variables prefixed with DRIVEEASY_, `__` separating sections
    ///    (e.g. DRIVEEASY_STORE__PATH=/var/lib/drive-easy/db.json)
    /// 4. PORT environment variable, for hosts that inject it
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file("DriveEasy.toml"))
            .merge(Env::prefixed("DRIVEEASY_").split("__"))
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.api.base_path, "/api");
        assert_eq!(config.pricing.driver_daily_fee, 500);
        assert_eq!(config.store.path, "db.json");
        assert!(config.store.seed_sample_data);
    }

    #[test]
    fn env_overrides_nested_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DRIVEEASY_STORE__PATH", "/tmp/fleet.json");
            jail.set_env("DRIVEEASY_PRICING__DRIVER_DAILY_FEE", "750");
            let config = Config::load()?;
            assert_eq!(config.store.path, "/tmp/fleet.json");
            assert_eq!(config.pricing.driver_daily_fee, 750);
            Ok(())
        });
    }

    #[test]
    fn toml_file_is_layered_over_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "DriveEasy.toml",
                r#"
                [server]
                port = 8080

                [logging]
                json_format = true
                "#,
            )?;
            let config = Config::load()?;
            assert_eq!(config.server.port, 8080);
            assert!(config.logging.json_format);
            assert_eq!(config.server.address, "127.0.0.1");
            Ok(())
        });
    }
}
