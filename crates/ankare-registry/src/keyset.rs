#![forbid(unsafe_code)]

//! Verification against a set of keys, e.g. during key rotation.
//!
//! Signatures may carry a five-byte output prefix identifying the key that
//! produced them: a one-byte marker followed by the big-endian key id.
//! Raw keys carry no prefix and are tried against every signature.

use crate::registry::Registry;
use ankare_core::Error;
use ankare_crypto::Verifier;
use ankare_keys::SerializedKey;

/// Length of a non-raw output prefix.
pub const PREFIX_LEN: usize = 5;

const TINK_START_BYTE: u8 = 0x01;
const LEGACY_START_BYTE: u8 = 0x00;

/// How signatures made with a key are prefixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputPrefix {
    /// `0x01 || key_id`.
    Tink,
    /// `0x00 || key_id`; the signed message has a trailing zero byte.
    Legacy,
    /// `0x00 || key_id`.
    Crunchy,
    /// No prefix.
    Raw,
}

impl OutputPrefix {
    /// The prefix bytes for `key_id`; empty for [`OutputPrefix::Raw`].
    pub fn prefix(self, key_id: u32) -> Vec<u8> {
        let start = match self {
            Self::Tink => TINK_START_BYTE,
            Self::Legacy | Self::Crunchy => LEGACY_START_BYTE,
            Self::Raw => return Vec::new(),
        };
        let mut out = Vec::with_capacity(PREFIX_LEN);
        out.push(start);
        out.extend_from_slice(&key_id.to_be_bytes());
        out
    }
}

/// One key of a set.
#[derive(Debug, Clone)]
pub struct KeyEntry {
    pub key_id: u32,
    pub prefix: OutputPrefix,
    pub key: SerializedKey,
}

struct Member {
    prefix: Vec<u8>,
    append_zero: bool,
    verifier: Box<dyn Verifier>,
}

impl Member {
    fn verify(&self, data: &[u8], sig_bytes: &[u8]) -> Result<bool, Error> {
        if self.append_zero {
            let mut message = Vec::with_capacity(data.len() + 1);
            message.extend_from_slice(data);
            message.push(0);
            self.verifier.verify(&message, sig_bytes)
        } else {
            self.verifier.verify(data, sig_bytes)
        }
    }
}

/// A verifier that accepts a signature made by any key of the set.
pub struct VerifierSet {
    prefixed: Vec<Member>,
    raw: Vec<Member>,
}

impl VerifierSet {
    /// Build verifiers for every entry through `registry`.
    ///
    /// Fails if `entries` is empty or if any key is rejected.
    pub fn new(
        registry: &Registry,
        entries: impl IntoIterator<Item = KeyEntry>,
    ) -> Result<Self, Error> {
        let mut prefixed = Vec::new();
        let mut raw = Vec::new();
        for entry in entries {
            let member = Member {
                prefix: entry.prefix.prefix(entry.key_id),
                append_zero: entry.prefix == OutputPrefix::Legacy,
                verifier: registry.new_primitive(&entry.key)?,
            };
            if entry.prefix == OutputPrefix::Raw {
                raw.push(member);
            } else {
                prefixed.push(member);
            }
        }
        if prefixed.is_empty() && raw.is_empty() {
            return Err(Error::EmptyKeyset);
        }
        tracing::debug!(
            "built verifier set ({} prefixed, {} raw)",
            prefixed.len(),
            raw.len()
        );
        Ok(Self { prefixed, raw })
    }

    pub fn len(&self) -> usize {
        self.prefixed.len() + self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Verifier for VerifierSet {
    /// Members whose prefix matches are tried first, then raw members with
    /// the whole signature. A member reporting the signature as malformed
    /// does not stop the search. If no member decoded it, including when
    /// no member was tried at all, the signature is malformed.
    fn verify(&self, data: &[u8], sig_bytes: &[u8]) -> Result<bool, Error> {
        let mut decoded = false;
        let mut malformed = None;

        let mut record = |outcome: Result<bool, Error>| -> bool {
            match outcome {
                Ok(valid) => {
                    decoded = true;
                    valid
                }
                Err(e) => {
                    malformed = Some(e);
                    false
                }
            }
        };

        if sig_bytes.len() >= PREFIX_LEN {
            let (prefix, rest) = sig_bytes.split_at(PREFIX_LEN);
            for member in self.prefixed.iter().filter(|m| m.prefix == prefix) {
                if record(member.verify(data, rest)) {
                    return Ok(true);
                }
            }
        }
        for member in &self.raw {
            if record(member.verify(data, sig_bytes)) {
                return Ok(true);
            }
        }

        if decoded {
            return Ok(false);
        }
        Err(malformed.unwrap_or_else(|| {
            Error::MalformedSignature(format!(
                "no key in the set accepts a {}-byte signature with this prefix",
                sig_bytes.len()
            ))
        }))
    }
}
