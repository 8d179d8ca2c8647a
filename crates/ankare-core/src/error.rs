#![forbid(unsafe_code)]

/// Errors produced by the Ankare signature verification registry.
///
/// A signature that simply does not match is never an error; verifiers
/// report it as `Ok(false)`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("a different key manager is already registered for key type: {0}")]
    DuplicateKeyType(String),

    #[error("no key manager registered for key type: {0}")]
    UnknownKeyType(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("unsupported key version {version} for {type_url} (max supported: {max})")]
    UnsupportedKeyVersion {
        type_url: String,
        version: u32,
        max: u32,
    },

    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    #[error("keyset contains no keys")]
    EmptyKeyset,
}

pub type Result<T> = std::result::Result<T, Error>;
