//! Builds a ready-to-use store from configuration.

use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;

use super::HybridSessionStore;
use crate::adapters::local::LocalSessionAdapter;
use crate::adapters::postgres::PostgresSessionRecords;
use crate::adapters::remote::RemoteSessionAdapter;
use crate::adapters::storage::FileDeviceStorage;
use crate::config::AppConfig;
use crate::ports::{IdentityProvider, StorageError};

/// Wires file-backed local storage and, when a database URL is configured,
/// the PostgreSQL backend.
///
/// The pool connects lazily, so an unreachable database does not fail
/// startup; the store falls back to local storage per call instead.
pub async fn build_store(
    config: &AppConfig,
    identity: Arc<dyn IdentityProvider>,
) -> Result<HybridSessionStore, StorageError> {
    let storage = FileDeviceStorage::new(&config.storage.data_dir);
    let local = LocalSessionAdapter::with_key(Arc::new(storage), config.storage.storage_key.clone());
    let mut store = HybridSessionStore::new(Arc::new(local), Arc::clone(&identity))
        .with_remote_timeout(config.remote.timeout());

    if let Some(url) = &config.remote.database_url {
        let pool = PgPoolOptions::new()
            .max_connections(config.remote.max_connections)
            .acquire_timeout(config.remote.timeout())
            .connect_lazy(url.expose_secret())
            .map_err(|e| StorageError::remote(format!("Invalid database configuration: {}", e)))?;
        let records = PostgresSessionRecords::new(pool);
        if config.remote.run_migrations {
            records.migrate().await?;
            tracing::info!("Session table migrations applied");
        }
        store = store.with_remote(Arc::new(RemoteSessionAdapter::new(Arc::new(records), identity)));
        tracing::info!(timeout_ms = config.remote.timeout_ms, "Remote session backend enabled");
    } else {
        tracing::info!("No remote backend configured, sessions stay on this device");
    }

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockIdentityProvider;
    use crate::config::StorageConfig;
    use crate::domain::session::SessionOrigin;

    #[tokio::test]
    async fn local_only_store_writes_to_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            storage: StorageConfig {
                data_dir: dir.path().to_path_buf(),
                storage_key: "sessions".to_string(),
            },
            ..Default::default()
        };
        let identity = Arc::new(MockIdentityProvider::new().with_test_user("user-1"));

        let store = build_store(&config, identity).await.unwrap();
        let session = store.create_new_session("From config").await.unwrap();

        assert_eq!(session.origin(), SessionOrigin::Local);
        assert!(dir.path().join("sessions.json").exists());
    }
}
