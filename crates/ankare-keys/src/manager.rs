#![forbid(unsafe_code)]

//! Key managers: validate serialized keys and build verifier primitives.

use std::any::Any;

use crate::key::{
    EcdsaParams, EcdsaPublicKey, Ed25519PublicKey, KeyMessage, RsaSsaPkcs1PublicKey,
    RsaSsaPssPublicKey, SerializedKey,
};
use crate::policy::KeyPolicy;
use ankare_core::{key_type, EllipticCurve, Error, HashType};
use ankare_crypto::{
    EcdsaVerifier, Ed25519Verifier, RsaSsaPkcs1Verifier, RsaSsaPssVerifier, Verifier,
};
use rsa::traits::PublicKeyParts;

/// Factory and validator for exactly one key type.
///
/// Implementations are immutable once built; the registry shares them
/// between threads for the rest of its lifetime.
pub trait KeyManager: Send + Sync + Any {
    /// The key-type identifier this manager owns.
    fn key_type(&self) -> &'static str;

    /// Highest key format version this manager understands.
    fn version(&self) -> u32 {
        0
    }

    /// Check that `key` is of this manager's type and its parameters are
    /// acceptable. Never builds a primitive.
    fn validate_key(&self, key: &SerializedKey) -> Result<(), Error>;

    /// Validate `key` and return a verifier bound to it.
    fn new_primitive(&self, key: &SerializedKey) -> Result<Box<dyn Verifier>, Error>;

    fn does_support(&self, type_url: &str) -> bool {
        type_url == self.key_type()
    }

    fn as_any(&self) -> &dyn Any;

    /// Whether `other` is interchangeable with this manager.
    ///
    /// The default only compares concrete types; managers carrying
    /// configuration override this with [`same_as`].
    fn same_configuration(&self, other: &dyn KeyManager) -> bool {
        self.as_any().type_id() == other.as_any().type_id()
    }
}

/// Same concrete type and equal configuration.
pub fn same_as<M: KeyManager + PartialEq>(this: &M, other: &dyn KeyManager) -> bool {
    other
        .as_any()
        .downcast_ref::<M>()
        .is_some_and(|other| other == this)
}

/// Decode a key message after checking the manager supports its type URL
/// and version.
fn decode_supported<M: KeyMessage>(
    manager: &dyn KeyManager,
    key: &SerializedKey,
) -> Result<M, Error> {
    if !manager.does_support(&key.type_url) {
        return Err(Error::InvalidKey(format!(
            "key manager for {} cannot handle key type {}",
            key_type::short_name(manager.key_type()),
            key.type_url
        )));
    }
    let message: M = key.decode()?;
    if message.version() > manager.version() {
        return Err(Error::UnsupportedKeyVersion {
            type_url: key.type_url.clone(),
            version: message.version(),
            max: manager.version(),
        });
    }
    Ok(message)
}

// ── ECDSA ────────────────────────────────────────────────────────────

/// Verify key manager for ECDSA public keys.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EcdsaVerifyKeyManager;

impl EcdsaVerifyKeyManager {
    pub fn new() -> Self {
        Self
    }

    fn build(&self, key: &SerializedKey) -> Result<EcdsaVerifier, Error> {
        let message: EcdsaPublicKey = decode_supported(self, key)?;
        validate_ecdsa_params(&message.params)?;
        EcdsaVerifier::new(
            message.params.curve,
            message.params.hash,
            message.params.encoding,
            &message.x,
            &message.y,
        )
    }
}

/// Approved (curve, hash) pairs: the hash must be at least as strong as
/// the curve.
fn validate_ecdsa_params(params: &EcdsaParams) -> Result<(), Error> {
    match (params.curve, params.hash) {
        (EllipticCurve::NistP256, HashType::Sha256)
        | (EllipticCurve::NistP384, HashType::Sha384)
        | (EllipticCurve::NistP384, HashType::Sha512) => Ok(()),
        (curve, hash) => Err(Error::InvalidKey(format!(
            "ECDSA curve {curve:?} is not approved with hash {hash:?}"
        ))),
    }
}

impl KeyManager for EcdsaVerifyKeyManager {
    fn key_type(&self) -> &'static str {
        key_type::ECDSA_PUBLIC_KEY
    }

    fn validate_key(&self, key: &SerializedKey) -> Result<(), Error> {
        self.build(key).map(|_| ())
    }

    fn new_primitive(&self, key: &SerializedKey) -> Result<Box<dyn Verifier>, Error> {
        let verifier = self.build(key)?;
        tracing::trace!("built ECDSA verifier");
        Ok(Box::new(verifier))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ── Ed25519 ──────────────────────────────────────────────────────────

/// Verify key manager for Ed25519 public keys.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Ed25519VerifyKeyManager;

impl Ed25519VerifyKeyManager {
    pub fn new() -> Self {
        Self
    }

    fn build(&self, key: &SerializedKey) -> Result<Ed25519Verifier, Error> {
        let message: Ed25519PublicKey = decode_supported(self, key)?;
        Ed25519Verifier::new(&message.key_value)
    }
}

impl KeyManager for Ed25519VerifyKeyManager {
    fn key_type(&self) -> &'static str {
        key_type::ED25519_PUBLIC_KEY
    }

    fn validate_key(&self, key: &SerializedKey) -> Result<(), Error> {
        self.build(key).map(|_| ())
    }

    fn new_primitive(&self, key: &SerializedKey) -> Result<Box<dyn Verifier>, Error> {
        let verifier = self.build(key)?;
        tracing::trace!("built Ed25519 verifier");
        Ok(Box::new(verifier))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ── RSA ──────────────────────────────────────────────────────────────

/// Build an RSA public key and hold it to the policy: modulus at least
/// `min_rsa_modulus_bits`, public exponent odd and greater than 65536.
fn validate_rsa_public(
    policy: &KeyPolicy,
    n: &[u8],
    e: &[u8],
) -> Result<rsa::RsaPublicKey, Error> {
    let key = ankare_crypto::rsa_public_key(n, e)?;
    let bits = key.n().bits();
    if bits < policy.min_rsa_modulus_bits {
        return Err(Error::InvalidKey(format!(
            "RSA modulus is {bits} bits, policy requires at least {}",
            policy.min_rsa_modulus_bits
        )));
    }
    let exponent = key.e();
    let odd = exponent.to_bytes_be().last().is_some_and(|b| b & 1 == 1);
    // An odd exponent with 17 or more bits is above 65536.
    if !odd || exponent.bits() < 17 {
        return Err(Error::InvalidKey(format!(
            "RSA public exponent {exponent} must be odd and greater than 65536"
        )));
    }
    Ok(key)
}

/// Verify key manager for RSASSA-PKCS1-v1_5 public keys.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RsaSsaPkcs1VerifyKeyManager {
    policy: KeyPolicy,
}

impl RsaSsaPkcs1VerifyKeyManager {
    pub fn new(policy: KeyPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &KeyPolicy {
        &self.policy
    }

    fn build(&self, key: &SerializedKey) -> Result<RsaSsaPkcs1Verifier, Error> {
        let message: RsaSsaPkcs1PublicKey = decode_supported(self, key)?;
        let public = validate_rsa_public(&self.policy, &message.n, &message.e)?;
        Ok(RsaSsaPkcs1Verifier::new(public, message.params.hash))
    }
}

impl KeyManager for RsaSsaPkcs1VerifyKeyManager {
    fn key_type(&self) -> &'static str {
        key_type::RSA_SSA_PKCS1_PUBLIC_KEY
    }

    fn validate_key(&self, key: &SerializedKey) -> Result<(), Error> {
        self.build(key).map(|_| ())
    }

    fn new_primitive(&self, key: &SerializedKey) -> Result<Box<dyn Verifier>, Error> {
        let verifier = self.build(key)?;
        tracing::trace!("built RSA-SSA-PKCS1 verifier");
        Ok(Box::new(verifier))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn same_configuration(&self, other: &dyn KeyManager) -> bool {
        same_as(self, other)
    }
}

/// Verify key manager for RSASSA-PSS public keys.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RsaSsaPssVerifyKeyManager {
    policy: KeyPolicy,
}

impl RsaSsaPssVerifyKeyManager {
    pub fn new(policy: KeyPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &KeyPolicy {
        &self.policy
    }

    fn build(&self, key: &SerializedKey) -> Result<RsaSsaPssVerifier, Error> {
        let message: RsaSsaPssPublicKey = decode_supported(self, key)?;
        let params = &message.params;
        if params.sig_hash != params.mgf1_hash {
            return Err(Error::InvalidKey(format!(
                "RSA-PSS signature hash {:?} differs from MGF1 hash {:?}",
                params.sig_hash, params.mgf1_hash
            )));
        }
        let salt_len = params.salt_length as usize;
        if salt_len > self.policy.max_pss_salt_length {
            return Err(Error::InvalidKey(format!(
                "RSA-PSS salt length {salt_len} exceeds policy maximum {}",
                self.policy.max_pss_salt_length
            )));
        }
        let public = validate_rsa_public(&self.policy, &message.n, &message.e)?;
        Ok(RsaSsaPssVerifier::new(public, params.sig_hash, salt_len))
    }
}

impl KeyManager for RsaSsaPssVerifyKeyManager {
    fn key_type(&self) -> &'static str {
        key_type::RSA_SSA_PSS_PUBLIC_KEY
    }

    fn validate_key(&self, key: &SerializedKey) -> Result<(), Error> {
        self.build(key).map(|_| ())
    }

    fn new_primitive(&self, key: &SerializedKey) -> Result<Box<dyn Verifier>, Error> {
        let verifier = self.build(key)?;
        tracing::trace!("built RSA-SSA-PSS verifier");
        Ok(Box::new(verifier))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn same_configuration(&self, other: &dyn KeyManager) -> bool {
        same_as(self, other)
    }
}
