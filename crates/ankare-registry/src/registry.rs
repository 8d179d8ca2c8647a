#![forbid(unsafe_code)]

//! Mapping from key-type identifier to key manager.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ankare_core::{key_type, Error};
use ankare_crypto::Verifier;
use ankare_keys::{KeyManager, SerializedKey};

/// Outcome of a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// A manager was newly installed.
    Installed,
    /// An equivalent manager was already present; nothing changed.
    AlreadyRegistered,
    /// There was nothing to register.
    Empty,
}

impl Registration {
    pub fn is_installed(self) -> bool {
        self == Self::Installed
    }
}

/// Thread-safe mapping from key-type identifier to a single key manager.
///
/// A registry is normally built once, shared behind an `Arc`, and handed
/// to the components that need verifiers. [`Registry::global`] provides
/// the one process-wide instance for callers that do not inject their own.
///
/// A manager, once installed, is never replaced for the lifetime of the
/// registry.
pub struct Registry {
    managers: RwLock<HashMap<String, Arc<dyn KeyManager>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            managers: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide registry, created on first use and never torn down.
    pub fn global() -> Arc<Registry> {
        static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(Registry::new())).clone()
    }

    // The map is only mutated by a single insert, so a panic elsewhere while
    // holding the lock cannot leave it inconsistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<dyn KeyManager>>> {
        self.managers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<dyn KeyManager>>> {
        self.managers.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `manager` under its key type.
    ///
    /// Re-registering an equivalent manager is a no-op. A different
    /// manager for an already registered key type fails with
    /// [`Error::DuplicateKeyType`] and the original stays in place.
    pub fn register_key_manager(
        &self,
        manager: Arc<dyn KeyManager>,
    ) -> Result<Registration, Error> {
        let type_url = manager.key_type();
        let mut managers = self.write();
        match managers.entry(type_url.to_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(manager);
                tracing::debug!("registered key manager for {}", key_type::short_name(type_url));
                Ok(Registration::Installed)
            }
            Entry::Occupied(existing) => {
                if existing.get().same_configuration(manager.as_ref()) {
                    tracing::debug!(
                        "key manager for {} already registered",
                        key_type::short_name(type_url)
                    );
                    Ok(Registration::AlreadyRegistered)
                } else {
                    tracing::warn!(
                        "refusing to replace key manager for {}",
                        key_type::short_name(type_url)
                    );
                    Err(Error::DuplicateKeyType(type_url.to_owned()))
                }
            }
        }
    }

    /// Look up the manager registered for `type_url`.
    pub fn get_key_manager(&self, type_url: &str) -> Result<Arc<dyn KeyManager>, Error> {
        self.read()
            .get(type_url)
            .cloned()
            .ok_or_else(|| Error::UnknownKeyType(type_url.to_owned()))
    }

    /// Validate `key` with the manager registered for its type.
    pub fn validate_key(&self, key: &SerializedKey) -> Result<(), Error> {
        self.get_key_manager(&key.type_url)?.validate_key(key)
    }

    /// Build a verifier for `key` with the manager registered for its type.
    pub fn new_primitive(&self, key: &SerializedKey) -> Result<Box<dyn Verifier>, Error> {
        // The lock is released before the manager does any work.
        let manager = self.get_key_manager(&key.type_url)?;
        manager.new_primitive(key)
    }

    pub fn contains(&self, type_url: &str) -> bool {
        self.read().contains_key(type_url)
    }

    /// Registered key types, sorted.
    pub fn key_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.read().keys().cloned().collect();
        types.sort();
        types
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("key_types", &self.key_types())
            .finish()
    }
}
