#![forbid(unsafe_code)]

//! Key manager registry and verify catalogs.
//!
//! The [`Registry`] maps key-type identifiers to key managers and is the
//! factory callers use to turn a serialized key into a verifier.
//! [`VerifyConfig`] registers the curated standard and legacy catalogs
//! into a registry. [`VerifierSet`] verifies against several keys at once.

pub mod config;
pub mod keyset;
pub mod registry;

pub use config::{Catalog, ManagerConstructor, VerifyConfig};
pub use keyset::{KeyEntry, OutputPrefix, VerifierSet};
pub use registry::{Registration, Registry};
