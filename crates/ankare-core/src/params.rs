#![forbid(unsafe_code)]

//! Parameter enumerations carried inside serialized keys.

use serde::{Deserialize, Serialize};

/// Hash function used to digest the message before verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashType {
    Sha256,
    Sha384,
    Sha512,
}

impl HashType {
    /// Digest output length in bytes.
    pub fn output_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

/// NIST prime curves accepted for ECDSA keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EllipticCurve {
    NistP256,
    NistP384,
}

impl EllipticCurve {
    /// Size of one field element (and of `r` or `s`) in bytes.
    pub fn field_len(self) -> usize {
        match self {
            Self::NistP256 => 32,
            Self::NistP384 => 48,
        }
    }
}

/// Wire encoding of an ECDSA signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureEncoding {
    /// ASN.1 DER `SEQUENCE { r INTEGER, s INTEGER }`.
    Der,
    /// Fixed-width big-endian `r || s`.
    IeeeP1363,
}
