//! Recorded provisioning state
//!
//! Tracks the `.netweave/state.json` file mapping planned entity keys
//! to the identifiers the provisioning engine reported back. The
//! planner never sees this file; it only matters once a plan has been
//! applied and downstream consumers need concrete ids.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use netweave_topology::TopologyGraph;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{CloudError, Result};

const STATE_VERSION: u32 = 1;
const STATE_DIR: &str = ".netweave";
const STATE_FILE: &str = "state.json";
const STATE_BACKUP: &str = "state.json.backup";
const LOCK_FILE: &str = "lock.json";

/// Everything the engine has recorded about applied resources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalState {
    /// State file version
    pub version: u32,

    /// Last modified timestamp
    pub updated_at: DateTime<Utc>,

    /// Resources indexed by entity key (`type:name`)
    pub resources: HashMap<String, ResourceState>,
}

impl Default for GlobalState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            updated_at: Utc::now(),
            resources: HashMap::new(),
        }
    }
}

impl GlobalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the identifier an engine assigned to a planned entity
    pub fn record_applied(
        &mut self,
        key: impl Into<String>,
        id: impl Into<String>,
        resource_type: impl Into<String>,
    ) {
        self.resources.insert(
            key.into(),
            ResourceState::new(id, resource_type).with_status(ResourceStatus::Available),
        );
        self.updated_at = Utc::now();
    }

    pub fn remove_resource(&mut self, key: &str) -> Option<ResourceState> {
        let result = self.resources.remove(key);
        if result.is_some() {
            self.updated_at = Utc::now();
        }
        result
    }

    pub fn get_resource(&self, key: &str) -> Option<&ResourceState> {
        self.resources.get(key)
    }

    /// View of the recorded resources as a provider-state snapshot
    pub fn as_provider_state(&self) -> ProviderState {
        ProviderState {
            resources: self.resources.clone(),
        }
    }
}

/// Snapshot of the resources one provider currently holds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderState {
    pub resources: HashMap<String, ResourceState>,
}

impl ProviderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: String, state: ResourceState) {
        self.resources.insert(key, state);
    }

    pub fn get(&self, key: &str) -> Option<&ResourceState> {
        self.resources.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ResourceState> {
        self.resources.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ResourceState)> {
        self.resources.iter()
    }
}

/// State of a single applied resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceState {
    /// Provider-assigned identifier
    pub id: String,

    /// Resource type
    pub resource_type: String,

    /// Current status
    pub status: ResourceStatus,

    /// Resource attributes (allocation ids, gateway addresses, ...)
    pub attributes: HashMap<String, serde_json::Value>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResourceState {
    pub fn new(id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
            status: ResourceStatus::Unknown,
            attributes: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_status(mut self, status: ResourceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn get_attribute<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// Status of an applied resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    /// Resource is being created
    Creating,
    /// Resource is live and usable
    Available,
    /// Resource is being deleted
    Deleting,
    /// Resource has been deleted
    Deleted,
    /// Resource is in error state
    Error,
    /// Status is unknown
    Unknown,
}

impl std::fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceStatus::Creating => write!(f, "creating"),
            ResourceStatus::Available => write!(f, "available"),
            ResourceStatus::Deleting => write!(f, "deleting"),
            ResourceStatus::Deleted => write!(f, "deleted"),
            ResourceStatus::Error => write!(f, "error"),
            ResourceStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Identifiers downstream consumers bind to, resolved from state.
///
/// Subnet id ordering matches the zone-index ordering the plan
/// established; consumers may rely on position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedValues {
    pub vpc_id: String,
    pub public_subnet_ids: Vec<String>,
    pub private_subnet_ids: Vec<String>,
}

/// Resolve the published values of a topology from recorded state.
///
/// Fails if any referenced entity has not been applied yet; the values
/// are never partially resolved.
pub fn published_values(state: &GlobalState, topology: &TopologyGraph) -> Result<PublishedValues> {
    let resolve = |key: String| -> Result<String> {
        state
            .resources
            .get(&key)
            .map(|r| r.id.clone())
            .ok_or(CloudError::ResourceNotFound(key))
    };

    let outputs = topology.outputs();
    Ok(PublishedValues {
        vpc_id: resolve(format!("vpc:{}", outputs.vpc))?,
        public_subnet_ids: outputs
            .public_subnets
            .iter()
            .map(|name| resolve(format!("subnet:{name}")))
            .collect::<Result<_>>()?,
        private_subnet_ids: outputs
            .private_subnets
            .iter()
            .map(|name| resolve(format!("subnet:{name}")))
            .collect::<Result<_>>()?,
    })
}

/// Reads and writes the state file under a project root
pub struct StateManager {
    project_root: PathBuf,
}

impl StateManager {
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
        }
    }

    fn state_dir(&self) -> PathBuf {
        self.project_root.join(STATE_DIR)
    }

    fn state_path(&self) -> PathBuf {
        self.state_dir().join(STATE_FILE)
    }

    fn backup_path(&self) -> PathBuf {
        self.state_dir().join(STATE_BACKUP)
    }

    fn lock_path(&self) -> PathBuf {
        self.state_dir().join(LOCK_FILE)
    }

    async fn ensure_state_dir(&self) -> Result<()> {
        let dir = self.state_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir).await?;
            tracing::debug!("Created state directory: {}", dir.display());
        }
        Ok(())
    }

    /// Load the current state, or an empty one if none exists yet
    pub async fn load(&self) -> Result<GlobalState> {
        let path = self.state_path();
        if !path.exists() {
            tracing::debug!("State file not found, returning empty state");
            return Ok(GlobalState::new());
        }

        let content = fs::read_to_string(&path).await?;
        let state: GlobalState = serde_json::from_str(&content)?;

        if state.version > STATE_VERSION {
            return Err(CloudError::StateError(format!(
                "State file version {} is newer than supported version {}",
                state.version, STATE_VERSION
            )));
        }

        tracing::debug!("Loaded state with {} resources", state.resources.len());
        Ok(state)
    }

    /// Save the state, keeping the previous file as a backup
    pub async fn save(&self, state: &GlobalState) -> Result<()> {
        self.ensure_state_dir().await?;

        let path = self.state_path();
        let backup = self.backup_path();

        if path.exists() {
            if backup.exists() {
                fs::remove_file(&backup).await?;
            }
            fs::rename(&path, &backup).await?;
        }

        let content = serde_json::to_string_pretty(state)?;
        fs::write(&path, content).await?;

        tracing::debug!("Saved state with {} resources", state.resources.len());
        Ok(())
    }

    /// Acquire the exclusive state lock.
    ///
    /// A lock left behind by a crashed run goes stale after one hour
    /// and is replaced with a warning.
    pub async fn acquire_lock(&self) -> Result<StateLock> {
        self.ensure_state_dir().await?;

        let lock_path = self.lock_path();
        if lock_path.exists() {
            let content = fs::read_to_string(&lock_path).await?;
            let lock_info: LockInfo = serde_json::from_str(&content)?;

            let age = Utc::now().signed_duration_since(lock_info.acquired_at);
            if age.num_hours() < 1 {
                return Err(CloudError::LockError(format!(
                    "State is locked by {} since {}",
                    lock_info.holder, lock_info.acquired_at
                )));
            }

            tracing::warn!("Removing stale lock from {}", lock_info.holder);
        }

        let lock_info = LockInfo {
            holder: std::env::var("HOSTNAME")
                .or_else(|_| std::env::var("HOST"))
                .unwrap_or_else(|_| "unknown".to_string()),
            acquired_at: Utc::now(),
        };

        let content = serde_json::to_string_pretty(&lock_info)?;
        fs::write(&lock_path, content).await?;

        Ok(StateLock {
            lock_path,
            released: false,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LockInfo {
    holder: String,
    acquired_at: DateTime<Utc>,
}

/// RAII guard for the state lock
pub struct StateLock {
    lock_path: PathBuf,
    released: bool,
}

impl StateLock {
    pub async fn release(mut self) -> Result<()> {
        if !self.released {
            if self.lock_path.exists() {
                fs::remove_file(&self.lock_path).await?;
            }
            self.released = true;
        }
        Ok(())
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        if !self.released && self.lock_path.exists() {
            // Synchronous cleanup in drop - not ideal but necessary
            let _ = std::fs::remove_file(&self.lock_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netweave_topology::{NetworkConfig, ZoneCatalog, plan};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_state_save_load() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let mut state = GlobalState::new();
        state.record_applied("vpc:demo-vpc", "vpc-0a1b2c", "vpc");

        manager.save(&state).await.unwrap();

        let loaded = manager.load().await.unwrap();
        assert_eq!(loaded.resources.len(), 1);
        assert_eq!(loaded.get_resource("vpc:demo-vpc").unwrap().id, "vpc-0a1b2c");
    }

    #[tokio::test]
    async fn test_empty_state() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let state = manager.load().await.unwrap();
        assert!(state.resources.is_empty());
    }

    #[tokio::test]
    async fn test_lock_blocks_second_holder() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let lock = manager.acquire_lock().await.unwrap();
        assert!(matches!(
            manager.acquire_lock().await,
            Err(CloudError::LockError(_))
        ));
        lock.release().await.unwrap();

        let lock = manager.acquire_lock().await.unwrap();
        lock.release().await.unwrap();
    }

    #[test]
    fn test_published_values_in_zone_order() {
        let config = NetworkConfig::new("demo").with_zone_count(2);
        let catalog = ZoneCatalog::new(["us-east-1b", "us-east-1a"]);
        let topology = plan(&config, &catalog).unwrap();

        let mut state = GlobalState::new();
        state.record_applied("vpc:demo-vpc", "vpc-1", "vpc");
        state.record_applied("subnet:demo-public-1", "subnet-pub1", "subnet");
        state.record_applied("subnet:demo-public-2", "subnet-pub2", "subnet");
        state.record_applied("subnet:demo-private-1", "subnet-priv1", "subnet");
        state.record_applied("subnet:demo-private-2", "subnet-priv2", "subnet");

        let values = published_values(&state, &topology).unwrap();
        assert_eq!(values.vpc_id, "vpc-1");
        assert_eq!(values.public_subnet_ids, ["subnet-pub1", "subnet-pub2"]);
        assert_eq!(values.private_subnet_ids, ["subnet-priv1", "subnet-priv2"]);
    }

    #[test]
    fn test_published_values_require_full_application() {
        let config = NetworkConfig::new("demo").with_zone_count(1);
        let catalog = ZoneCatalog::new(["us-east-1a"]);
        let topology = plan(&config, &catalog).unwrap();

        let mut state = GlobalState::new();
        state.record_applied("vpc:demo-vpc", "vpc-1", "vpc");

        assert!(matches!(
            published_values(&state, &topology),
            Err(CloudError::ResourceNotFound(_))
        ));
    }
}
