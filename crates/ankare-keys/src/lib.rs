#![forbid(unsafe_code)]

//! Serialized keys and verify key managers.
//!
//! A [`KeyManager`] owns exactly one key-type identifier: it validates a
//! [`SerializedKey`] of that type against its [`KeyPolicy`] and turns it
//! into a verifier primitive.

pub mod key;
pub mod manager;
pub mod policy;

pub use key::{KeyMessage, SerializedKey};
pub use manager::{
    EcdsaVerifyKeyManager, Ed25519VerifyKeyManager, KeyManager, RsaSsaPkcs1VerifyKeyManager,
    RsaSsaPssVerifyKeyManager,
};
pub use policy::KeyPolicy;
