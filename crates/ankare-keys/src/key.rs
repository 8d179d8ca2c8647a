#![forbid(unsafe_code)]

//! Serialized keys and the key messages they carry.

use ankare_core::{key_type, EllipticCurve, Error, HashType, SignatureEncoding};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// An opaque key as handed over by key storage: a type URL naming the key
/// format plus the encoded key message.
#[derive(Clone, PartialEq, Eq)]
pub struct SerializedKey {
    pub type_url: String,
    pub value: Vec<u8>,
}

impl std::fmt::Debug for SerializedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SerializedKey({}, {} bytes)",
            key_type::short_name(&self.type_url),
            self.value.len()
        )
    }
}

impl SerializedKey {
    /// Wrap already-encoded key bytes.
    pub fn new(type_url: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            type_url: type_url.into(),
            value,
        }
    }

    /// Encode a key message (MessagePack, named fields).
    pub fn encode<M: KeyMessage>(message: &M) -> Result<Self, Error> {
        let value = rmp_serde::to_vec_named(message).map_err(|e| {
            Error::InvalidKey(format!(
                "failed to encode {}: {e}",
                key_type::short_name(M::TYPE_URL)
            ))
        })?;
        Ok(Self::new(M::TYPE_URL, value))
    }

    /// Decode the key message, checking the type URL first.
    pub fn decode<M: KeyMessage>(&self) -> Result<M, Error> {
        if self.type_url != M::TYPE_URL {
            return Err(Error::InvalidKey(format!(
                "key type mismatch: expected {}, got {}",
                M::TYPE_URL,
                self.type_url
            )));
        }
        rmp_serde::from_slice(&self.value).map_err(|e| {
            Error::InvalidKey(format!(
                "failed to decode {}: {e}",
                key_type::short_name(M::TYPE_URL)
            ))
        })
    }
}

/// A key message with a fixed type URL and a format version.
pub trait KeyMessage: Serialize + DeserializeOwned {
    const TYPE_URL: &'static str;

    fn version(&self) -> u32;
}

// ── ECDSA ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcdsaParams {
    pub hash: HashType,
    pub curve: EllipticCurve,
    pub encoding: SignatureEncoding,
}

/// ECDSA public key; `x` and `y` are big-endian affine coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcdsaPublicKey {
    pub version: u32,
    pub params: EcdsaParams,
    pub x: Vec<u8>,
    pub y: Vec<u8>,
}

impl KeyMessage for EcdsaPublicKey {
    const TYPE_URL: &'static str = key_type::ECDSA_PUBLIC_KEY;

    fn version(&self) -> u32 {
        self.version
    }
}

// ── Ed25519 ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ed25519PublicKey {
    pub version: u32,
    /// Compressed Edwards point, 32 bytes.
    pub key_value: Vec<u8>,
}

impl KeyMessage for Ed25519PublicKey {
    const TYPE_URL: &'static str = key_type::ED25519_PUBLIC_KEY;

    fn version(&self) -> u32 {
        self.version
    }
}

// ── RSA ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaSsaPkcs1Params {
    pub hash: HashType,
}

/// RSASSA-PKCS1-v1_5 public key; `n` and `e` are big-endian.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaSsaPkcs1PublicKey {
    pub version: u32,
    pub params: RsaSsaPkcs1Params,
    pub n: Vec<u8>,
    pub e: Vec<u8>,
}

impl KeyMessage for RsaSsaPkcs1PublicKey {
    const TYPE_URL: &'static str = key_type::RSA_SSA_PKCS1_PUBLIC_KEY;

    fn version(&self) -> u32 {
        self.version
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaSsaPssParams {
    pub sig_hash: HashType,
    pub mgf1_hash: HashType,
    pub salt_length: u32,
}

/// RSASSA-PSS public key; `n` and `e` are big-endian.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaSsaPssPublicKey {
    pub version: u32,
    pub params: RsaSsaPssParams,
    pub n: Vec<u8>,
    pub e: Vec<u8>,
}

impl KeyMessage for RsaSsaPssPublicKey {
    const TYPE_URL: &'static str = key_type::RSA_SSA_PSS_PUBLIC_KEY;

    fn version(&self) -> u32 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_checks_type_url() {
        let key = SerializedKey::encode(&Ed25519PublicKey {
            version: 0,
            key_value: vec![7; 32],
        })
        .expect("encode");
        assert_eq!(key.type_url, key_type::ED25519_PUBLIC_KEY);

        let decoded: Ed25519PublicKey = key.decode().expect("decode");
        assert_eq!(decoded.key_value, vec![7; 32]);

        let err = key.decode::<EcdsaPublicKey>().unwrap_err();
        assert!(matches!(err, Error::InvalidKey(msg) if msg.contains("mismatch")));
    }

    #[test]
    fn test_decode_garbage_is_invalid_key() {
        let key = SerializedKey::new(key_type::ECDSA_PUBLIC_KEY, vec![0xc1, 0xff, 0x00]);
        assert!(matches!(
            key.decode::<EcdsaPublicKey>(),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn test_debug_hides_key_bytes() {
        let key = SerializedKey::new(key_type::ED25519_PUBLIC_KEY, vec![1, 2, 3]);
        assert_eq!(format!("{key:?}"), "SerializedKey(Ed25519PublicKey, 3 bytes)");
    }
}
