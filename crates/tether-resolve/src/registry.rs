//! The concurrent FQDN→address registry.
//!
//! One writer (the event monitor) and any number of readers (resolution
//! requests) share a handle. Keys are stored lower-cased; lookups are
//! case-insensitive. No I/O ever happens under the lock.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

/// Cloneable handle to the in-memory name registry.
#[derive(Clone, Default)]
pub struct NameRegistry {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map every FQDN in the list to `address`, overwriting prior values.
    ///
    /// An empty address is a no-op: an empty value in the registry would
    /// shadow the resolver's system-DNS fallback for that name.
    pub fn upsert(&self, fqdns: &[String], address: &str) {
        if address.is_empty() {
            return;
        }
        let mut entries = self.entries.write().expect("registry lock");
        for fqdn in fqdns {
            let key = fqdn.to_lowercase();
            debug!(fqdn = %key, %address, "registered name");
            entries.insert(key, address.to_string());
        }
    }

    /// Delete every listed FQDN; absent keys are ignored.
    pub fn remove(&self, fqdns: &[String]) {
        let mut entries = self.entries.write().expect("registry lock");
        for fqdn in fqdns {
            let key = fqdn.to_lowercase();
            if entries.remove(&key).is_some() {
                debug!(fqdn = %key, "deregistered name");
            }
        }
    }

    /// Case-insensitive lookup.
    pub fn lookup(&self, name: &str) -> Option<String> {
        let entries = self.entries.read().expect("registry lock");
        entries.get(&name.to_lowercase()).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("registry lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
