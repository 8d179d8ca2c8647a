#![forbid(unsafe_code)]

//! Signature verifier primitives for the Ankare registry.
//!
//! Each verifier is bound to one already-validated public key and is
//! handed to the caller by a key manager. Verifiers hold no shared
//! mutable state, so a single instance may be used from many threads.

pub mod hash;
pub mod verify;

pub use verify::{
    rsa_public_key, EcdsaVerifier, Ed25519Verifier, RsaSsaPkcs1Verifier, RsaSsaPssVerifier,
    Verifier,
};
