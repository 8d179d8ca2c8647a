#![forbid(unsafe_code)]

//! Verify catalogs: curated sets of key managers registered as a unit.
//!
//! Key types are split in two groups:
//! - standard: safe to use in new code, registered by
//!   [`VerifyConfig::register_standard_key_types`];
//! - legacy: kept only to read data produced by older systems, registered
//!   solely by an explicit [`VerifyConfig::register_legacy_key_types`] call.
//!
//! Over time a standard key type may be moved to the legacy group. The
//! built-in legacy group is currently empty.

use std::sync::{Arc, OnceLock};

use crate::registry::{Registration, Registry};
use ankare_core::Error;
use ankare_keys::{
    EcdsaVerifyKeyManager, Ed25519VerifyKeyManager, KeyManager, KeyPolicy,
    RsaSsaPkcs1VerifyKeyManager, RsaSsaPssVerifyKeyManager,
};

/// Builds a key manager under the given policy.
pub type ManagerConstructor = fn(&KeyPolicy) -> Arc<dyn KeyManager>;

const STANDARD: &[ManagerConstructor] = &[ecdsa, ed25519, rsa_ssa_pkcs1, rsa_ssa_pss];

/// The standard and legacy manager sets of a catalog.
#[derive(Clone, Default)]
pub struct Catalog {
    pub standard: Vec<ManagerConstructor>,
    pub legacy: Vec<ManagerConstructor>,
}

impl Catalog {
    /// The built-in signature verification catalog.
    pub fn builtin() -> Self {
        Self {
            standard: STANDARD.to_vec(),
            legacy: Vec::new(),
        }
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Catalog({} standard, {} legacy)",
            self.standard.len(),
            self.legacy.len()
        )
    }
}

fn ecdsa(_: &KeyPolicy) -> Arc<dyn KeyManager> {
    Arc::new(EcdsaVerifyKeyManager::new())
}

fn ed25519(_: &KeyPolicy) -> Arc<dyn KeyManager> {
    Arc::new(Ed25519VerifyKeyManager::new())
}

fn rsa_ssa_pkcs1(policy: &KeyPolicy) -> Arc<dyn KeyManager> {
    Arc::new(RsaSsaPkcs1VerifyKeyManager::new(*policy))
}

fn rsa_ssa_pss(policy: &KeyPolicy) -> Arc<dyn KeyManager> {
    Arc::new(RsaSsaPssVerifyKeyManager::new(*policy))
}

/// Registers catalog key managers into a registry.
#[derive(Debug)]
pub struct VerifyConfig {
    registry: Arc<Registry>,
    catalog: Catalog,
    policy: KeyPolicy,
}

impl VerifyConfig {
    /// The shared instance bound to [`Registry::global`].
    ///
    /// Built exactly once, on first call; every caller, concurrent or
    /// later, observes the same fully constructed instance. Nothing is
    /// registered until one of the `register_*` methods is called.
    pub fn global() -> &'static VerifyConfig {
        static INSTANCE: OnceLock<VerifyConfig> = OnceLock::new();
        Self::shared_in(&INSTANCE, || VerifyConfig::new(Registry::global()))
    }

    /// The instance held by `cell`, built by `init` on first access only.
    pub(crate) fn shared_in(
        cell: &OnceLock<VerifyConfig>,
        init: impl FnOnce() -> VerifyConfig,
    ) -> &VerifyConfig {
        cell.get_or_init(|| {
            tracing::debug!("initializing shared verify config");
            init()
        })
    }

    /// A config over `registry` with the built-in catalog.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_catalog(registry, Catalog::builtin())
    }

    pub fn with_catalog(registry: Arc<Registry>, catalog: Catalog) -> Self {
        Self {
            registry,
            catalog,
            policy: KeyPolicy::default(),
        }
    }

    /// Use `policy` for the managers this config builds.
    pub fn with_policy(mut self, policy: KeyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn policy(&self) -> &KeyPolicy {
        &self.policy
    }

    /// Register every standard key manager.
    ///
    /// Returns [`Registration::Installed`] if at least one manager was
    /// newly installed. Stops at the first conflict.
    pub fn register_standard_key_types(&self) -> Result<Registration, Error> {
        self.register_all("standard", &self.catalog.standard)
    }

    /// Register every legacy key manager. Never called implicitly.
    ///
    /// An empty legacy set registers nothing and succeeds with
    /// [`Registration::Empty`].
    pub fn register_legacy_key_types(&self) -> Result<Registration, Error> {
        self.register_all("legacy", &self.catalog.legacy)
    }

    /// Register a manager outside the curated catalogs.
    pub fn register_key_manager(
        &self,
        manager: Arc<dyn KeyManager>,
    ) -> Result<Registration, Error> {
        self.registry.register_key_manager(manager)
    }

    fn register_all(
        &self,
        group: &str,
        constructors: &[ManagerConstructor],
    ) -> Result<Registration, Error> {
        if constructors.is_empty() {
            tracing::debug!("{group} verify catalog is empty");
            return Ok(Registration::Empty);
        }
        let mut outcome = Registration::AlreadyRegistered;
        for construct in constructors {
            if self.register_key_manager(construct(&self.policy))?.is_installed() {
                outcome = Registration::Installed;
            }
        }
        tracing::debug!(
            "applied {group} verify catalog ({} key types)",
            constructors.len()
        );
        Ok(outcome)
    }
}
