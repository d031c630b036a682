use std::sync::Arc;

use crate::auth::services::RegistrationStore;
use crate::config::AppConfig;
use crate::remote::identity::{AuthAdminClient, IdentityAdmin};
use crate::remote::storage::{Storage, StorageClient};
use crate::remote::table::TableClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tables: TableClient,
    pub identity: Arc<dyn IdentityAdmin>,
    pub registry: Arc<dyn RegistrationStore>,
    pub storage: Arc<dyn StorageClient>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let tables = TableClient::new(&config.service.base_url, &config.service.service_role_key)?;
        let identity = Arc::new(AuthAdminClient::new(
            &config.service.base_url,
            &config.service.service_role_key,
        )?) as Arc<dyn IdentityAdmin>;

        let storage = Arc::new(
            Storage::new(
                &config.storage.endpoint,
                &config.storage.bucket,
                &config.storage.access_key,
                &config.storage.secret_key,
                "us-east-1",
                &config.storage.public_base_url,
            )
            .await?,
        ) as Arc<dyn StorageClient>;

        Ok(Self {
            registry: Arc::new(tables.clone()),
            config,
            tables,
            identity,
            storage,
        })
    }

    /// Offline state for unit tests: remote collaborators replaced with
    /// always-succeeding fakes, table client pointed at nothing.
    pub fn fake() -> Self {
        use crate::auth::services::{NewProfile, NewRoleAssignment};
        use crate::remote::identity::{Identity, IdentityError, NewIdentity};
        use async_trait::async_trait;
        use bytes::Bytes;

        struct FakeStorage;
        #[async_trait]
        impl StorageClient for FakeStorage {
            async fn upload(&self, _k: &str, _b: Bytes, _ct: &str) -> anyhow::Result<()> {
                Ok(())
            }
            fn public_url(&self, key: &str) -> String {
                format!("https://fake.local/{key}")
            }
        }

        struct FakeIdentity;
        #[async_trait]
        impl IdentityAdmin for FakeIdentity {
            async fn create_identity(&self, new: &NewIdentity) -> Result<Identity, IdentityError> {
                Ok(Identity {
                    id: uuid::Uuid::new_v4(),
                    email: new.email.clone(),
                    user_metadata: serde_json::json!({ "full_name": new.full_name }),
                })
            }
        }

        struct FakeRegistry;
        #[async_trait]
        impl RegistrationStore for FakeRegistry {
            async fn insert_profile(&self, _profile: &NewProfile) -> anyhow::Result<()> {
                Ok(())
            }
            async fn insert_role(&self, _assignment: &NewRoleAssignment) -> anyhow::Result<()> {
                Ok(())
            }
        }

        let config = Arc::new(AppConfig {
            service: crate::config::ServiceConfig {
                base_url: "http://localhost:54321".into(),
                service_role_key: "test-service-key".into(),
                jwt_secret: "test-secret".into(),
            },
            storage: crate::config::StorageConfig {
                endpoint: "http://localhost:9000".into(),
                bucket: "payment-proofs".into(),
                access_key: "fake".into(),
                secret_key: "fake".into(),
                public_base_url: "http://localhost:9000".into(),
            },
        });

        let tables = TableClient::new(&config.service.base_url, &config.service.service_role_key)
            .expect("table client for tests");

        Self {
            config,
            tables,
            identity: Arc::new(FakeIdentity),
            registry: Arc::new(FakeRegistry),
            storage: Arc::new(FakeStorage),
        }
    }
}
