#![forbid(unsafe_code)]

//! Key-type identifiers of the built-in verify key managers.
//!
//! Each constant is the type URL a `SerializedKey` carries and the key a
//! manager is registered under. The URLs follow the widely deployed Tink
//! naming so keys exported by other implementations resolve unchanged.

const TYPE_URL_PREFIX: &str = "type.googleapis.com/google.crypto.tink.";

// ── Standard key types ───────────────────────────────────────────────

pub const ECDSA_PUBLIC_KEY: &str = "type.googleapis.com/google.crypto.tink.EcdsaPublicKey";
pub const ED25519_PUBLIC_KEY: &str = "type.googleapis.com/google.crypto.tink.Ed25519PublicKey";
pub const RSA_SSA_PKCS1_PUBLIC_KEY: &str =
    "type.googleapis.com/google.crypto.tink.RsaSsaPkcs1PublicKey";
pub const RSA_SSA_PSS_PUBLIC_KEY: &str =
    "type.googleapis.com/google.crypto.tink.RsaSsaPssPublicKey";

/// All key types registered by the standard verify catalog.
pub const STANDARD: &[&str] = &[
    ECDSA_PUBLIC_KEY,
    ED25519_PUBLIC_KEY,
    RSA_SSA_PKCS1_PUBLIC_KEY,
    RSA_SSA_PSS_PUBLIC_KEY,
];

/// Key types registered by the legacy verify catalog. None are enabled.
pub const LEGACY: &[&str] = &[];

/// Strip the common type URL prefix, for log output.
pub fn short_name(type_url: &str) -> &str {
    type_url.strip_prefix(TYPE_URL_PREFIX).unwrap_or(type_url)
}
