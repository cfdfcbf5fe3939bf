//! Role descriptor lookup from an external key-value store.

use crate::config::MissingRolePolicy;
use crate::permissions::RoleDescriptor;
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Key the current actor's descriptor is stored under
pub const ROLE_STORE_KEY: &str = "currentUser";

/// A string key-value store holding serialized role descriptors
pub trait RoleStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryRoleStore {
    entries: HashMap<String, String>,
}

impl MemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    pub fn with_role(role: &RoleDescriptor) -> Result<Self> {
        let mut store = Self::new();
        store.insert(ROLE_STORE_KEY, &serde_json::to_string(role)?);
        Ok(store)
    }
}

impl RoleStore for MemoryRoleStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }
}

/// A JSON object file mapping keys to values. A missing file is an empty store.
///
/// Values may be strings holding serialized JSON (as browser storage keeps them)
/// or inline JSON objects.
#[derive(Debug, Clone)]
pub struct JsonFileRoleStore {
    path: PathBuf,
}

impl JsonFileRoleStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RoleStore for JsonFileRoleStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading role store {}", self.path.display()))?;
        let entries: HashMap<String, Value> = serde_json::from_str(&content)
            .with_context(|| format!("parsing role store {}", self.path.display()))?;

        Ok(entries.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }
}

/// The descriptor the legacy console assumed when nothing was stored
pub fn full_access_descriptor() -> RoleDescriptor {
    RoleDescriptor::new(
        "admin",
        "admin",
        ["read", "write", "edit", "delete", "admin"],
    )
}

/// Fetch and parse the current actor's descriptor.
///
/// A missing entry yields `None` under [`MissingRolePolicy::Deny`] and the full-access
/// descriptor under [`MissingRolePolicy::FullAccess`]. A malformed entry is an error.
pub fn load_role<S: RoleStore + ?Sized>(
    store: &S,
    policy: MissingRolePolicy,
) -> Result<Option<RoleDescriptor>> {
    match store.get(ROLE_STORE_KEY)? {
        Some(raw) => {
            let role: RoleDescriptor =
                serde_json::from_str(&raw).context("malformed role descriptor")?;
            tracing::debug!(username = %role.username, role = %role.role, "loaded role");
            Ok(Some(role))
        }
        None => match policy {
            MissingRolePolicy::Deny => {
                tracing::debug!("no stored role, denying all capabilities");
                Ok(None)
            }
            MissingRolePolicy::FullAccess => {
                tracing::warn!("no stored role, granting full access (missing_role = full_access)");
                Ok(Some(full_access_descriptor()))
            }
        },
    }
}
