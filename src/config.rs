use serde::Deserialize;

/// Missing required environment configuration. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// Connection details for the hosted data/auth service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    pub service_role_key: String,
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    /// Base under which uploaded objects are publicly reachable.
    pub public_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let service = ServiceConfig {
            base_url: required("SERVICE_BASE_URL")?,
            service_role_key: required("SERVICE_ROLE_KEY")?,
            jwt_secret: required("SERVICE_JWT_SECRET")?,
        };
        let endpoint = required("STORAGE_ENDPOINT")?;
        let storage = StorageConfig {
            public_base_url: std::env::var("STORAGE_PUBLIC_URL")
                .unwrap_or_else(|_| endpoint.clone()),
            endpoint,
            bucket: std::env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| "payment-proofs".into()),
            access_key: required("STORAGE_ACCESS_KEY")?,
            secret_key: required("STORAGE_SECRET_KEY")?,
        };
        Ok(Self { service, storage })
    }
}
