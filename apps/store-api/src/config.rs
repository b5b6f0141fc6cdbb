use core_config::{AppInfo, FromEnv, app_info, env_or_default, server::ServerConfig};

// Import MongoDB config from the database library
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Store API configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    /// Human-facing service name, used as the OpenAPI title
    pub project_name: String,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub products_collection: String,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            project_name: env_or_default("PROJECT_NAME", "Store API"),
            mongodb,
            server,
            products_collection: env_or_default(
                "PRODUCTS_COLLECTION",
                domain_products::DEFAULT_COLLECTION,
            ),
            environment,
        })
    }
}
