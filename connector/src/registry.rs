//! MongoDB connection registry.
//!
//! Maps logical connection names to pooled client handles. A handle is
//! constructed lazily on first resolution from its registered descriptor and
//! reused by every subsequent resolution of the same name; construction is
//! single-flight per name. Handles live until the registry is torn down or
//! the descriptor is explicitly removed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use common::config::ConnectorConfig;
use common::errors::{classify_driver_error, ConnectorError, ConnectorResult};
use common::models::connection::{ConnectionConfig, ConnectionItem, CreateConnectionRequest};
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, Tls, TlsOptions};
use mongodb::{Client, Collection};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

/// Connection name used when the invocation context does not supply one.
pub const DEFAULT_CONNECTION_NAME: &str = "default";

const NOT_INSTANTIATED_MESSAGE: &str = "MongoDB connection has not been instantiated.";
const CONNECT_ERROR_MESSAGE: &str = "Error occurred while establishing the MongoDB connection.";
const PING_ERROR_MESSAGE: &str = "Error occurred while testing the MongoDB connection.";

/// Live, shareable handle to one logical connection.
///
/// Cloning shares the underlying driver client and its pool.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: Uuid,
    client: Client,
    database: String,
}

impl ConnectionHandle {
    /// Identifier of this handle, for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Database this handle operates on.
    pub fn database_name(&self) -> &str {
        &self.database
    }

    /// Typed collection accessor on the handle's database.
    pub fn collection(&self, name: &str) -> Collection<Document> {
        self.client.database(&self.database).collection(name)
    }

    /// Round-trips a `ping` command to the server.
    pub async fn ping(&self) -> ConnectorResult<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|error| classify_driver_error(error, PING_ERROR_MESSAGE))?;
        Ok(())
    }
}

/// Registry statistics.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryStats {
    /// Number of registered connection descriptors.
    pub registered: usize,
    /// Number of live handles.
    pub active: usize,
    /// Total handle constructions since the registry was created.
    pub constructed: u64,
}

/// Registry of connection descriptors and the handles built from them.
///
/// Constructed once at the composition root and shared by reference with
/// every handler invocation; there is no ambient singleton.
pub struct ConnectionRegistry {
    config: ConnectorConfig,
    /// Registered descriptors, keyed by logical connection name.
    descriptors: RwLock<HashMap<String, ConnectionConfig>>,
    /// Lazily constructed handles (cache only).
    handles: RwLock<HashMap<String, ConnectionHandle>>,
    constructed: AtomicU64,
}

impl ConnectionRegistry {
    /// Creates an empty registry with the given defaults.
    pub fn new(config: ConnectorConfig) -> Self {
        Self {
            config,
            descriptors: RwLock::new(HashMap::new()),
            handles: RwLock::new(HashMap::new()),
            constructed: AtomicU64::new(0),
        }
    }

    /// Registers a new connection descriptor.
    ///
    /// Descriptors are immutable: registering a name twice is rejected
    /// rather than silently replacing the earlier configuration.
    pub async fn register(
        &self,
        request: CreateConnectionRequest,
    ) -> ConnectorResult<ConnectionItem> {
        request
            .validate()
            .map_err(|error| ConnectorError::Validation(error.to_string()))?;

        let config = request.into_config(Utc::now().to_rfc3339());
        let mut descriptors = self.descriptors.write().await;
        if descriptors.contains_key(&config.name) {
            return Err(ConnectorError::Validation(format!(
                "Connection '{}' is already registered",
                config.name
            )));
        }

        let item = ConnectionItem::from(config.clone());
        descriptors.insert(config.name.clone(), config);
        Ok(item)
    }

    /// Removes a descriptor and drops its live handle, if any.
    pub async fn remove(&self, name: &str) -> ConnectorResult<()> {
        self.handles.write().await.remove(name);
        if self.descriptors.write().await.remove(name).is_none() {
            return Err(ConnectorError::Connectivity(
                NOT_INSTANTIATED_MESSAGE.to_string(),
            ));
        }
        Ok(())
    }

    /// Lists registered descriptors (without credentials).
    pub async fn list(&self) -> Vec<ConnectionItem> {
        let mut items: Vec<ConnectionItem> = self
            .descriptors
            .read()
            .await
            .values()
            .cloned()
            .map(ConnectionItem::from)
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }

    /// Resolves a logical connection name to a live handle.
    ///
    /// `None` selects [`DEFAULT_CONNECTION_NAME`]. The first resolution for
    /// a name constructs its handle; concurrent first resolutions serialize
    /// on the write lock and re-check the cache, so exactly one handle is
    /// ever constructed per name.
    pub async fn resolve(&self, name: Option<&str>) -> ConnectorResult<ConnectionHandle> {
        let name = name.unwrap_or(DEFAULT_CONNECTION_NAME);

        {
            let handles = self.handles.read().await;
            if let Some(handle) = handles.get(name) {
                return Ok(handle.clone());
            }
        }

        let mut handles = self.handles.write().await;
        if let Some(handle) = handles.get(name) {
            return Ok(handle.clone());
        }

        let config = self
            .descriptors
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| ConnectorError::Connectivity(NOT_INSTANTIATED_MESSAGE.to_string()))?;

        let handle = self.build_handle(&config).await?;
        self.constructed.fetch_add(1, Ordering::Relaxed);
        tracing::info!(name = %name, handle = %handle.id(), "connection handle constructed");
        handles.insert(name.to_string(), handle.clone());
        Ok(handle)
    }

    /// Tests a connection with a `ping` round-trip, returning the latency.
    pub async fn test(&self, name: Option<&str>) -> ConnectorResult<Duration> {
        let handle = self.resolve(name).await?;
        let start = std::time::Instant::now();
        handle.ping().await?;
        Ok(start.elapsed())
    }

    /// Current registry statistics.
    pub async fn stats(&self) -> RegistryStats {
        RegistryStats {
            registered: self.descriptors.read().await.len(),
            active: self.handles.read().await.len(),
            constructed: self.constructed.load(Ordering::Relaxed),
        }
    }

    /// Builds a client handle from a descriptor, applying registry-wide
    /// defaults for anything the descriptor leaves unset.
    async fn build_handle(&self, config: &ConnectionConfig) -> ConnectorResult<ConnectionHandle> {
        let uri = config.build_connection_string()?;
        let mut options = ClientOptions::parse(&uri)
            .await
            .map_err(|error| classify_driver_error(error, CONNECT_ERROR_MESSAGE))?;

        options.max_pool_size = Some(config.max_pool_size.unwrap_or(self.config.max_pool_size));
        options.min_pool_size = Some(config.min_pool_size.unwrap_or(self.config.min_pool_size));
        options.connect_timeout = Some(Duration::from_secs(
            config
                .connect_timeout_secs
                .unwrap_or(self.config.connect_timeout_secs),
        ));
        options.server_selection_timeout = Some(Duration::from_secs(
            config
                .server_selection_timeout_secs
                .unwrap_or(self.config.server_selection_timeout_secs),
        ));
        if config.tls == Some(true) {
            options.tls = Some(Tls::Enabled(TlsOptions::default()));
        }

        let client = Client::with_options(options)
            .map_err(|error| classify_driver_error(error, CONNECT_ERROR_MESSAGE))?;

        Ok(ConnectionHandle {
            id: Uuid::new_v4(),
            client,
            database: config.database_name(&self.config),
        })
    }
}
