#![forbid(unsafe_code)]

//! Ankare: a pluggable registry for signature verification primitives.
//!
//! ```no_run
//! use ankare::{SerializedKey, Verifier, VerifyConfig};
//!
//! # fn run(key: SerializedKey, message: &[u8], signature: &[u8]) -> ankare::Result<()> {
//! let config = VerifyConfig::global();
//! config.register_standard_key_types()?;
//! let verifier = config.registry().new_primitive(&key)?;
//! if verifier.verify(message, signature)? {
//!     println!("signature is valid");
//! }
//! # Ok(())
//! # }
//! ```

pub use ankare_core as core;
pub use ankare_crypto as crypto;
pub use ankare_keys as keys;
pub use ankare_registry as registry;

pub use ankare_core::{Error, Result};
pub use ankare_crypto::Verifier;
pub use ankare_keys::{KeyManager, KeyPolicy, SerializedKey};
pub use ankare_registry::{Registration, Registry, VerifierSet, VerifyConfig};

#[cfg(test)]
mod tests {
    use super::*;
    use ankare_core::{key_type, EllipticCurve, HashType, SignatureEncoding};
    use ankare_keys::key::{EcdsaParams, EcdsaPublicKey};
    use signature::Signer;

    #[test]
    fn test_end_to_end_with_shared_config() {
        let config = VerifyConfig::global();
        config
            .register_standard_key_types()
            .expect("register standard key types");
        for url in key_type::STANDARD {
            assert!(config.registry().contains(url));
        }

        let sk = p256::ecdsa::SigningKey::from_slice(&[0x24; 32]).expect("P-256 secret");
        let point = sk.verifying_key().to_encoded_point(false);
        let key = SerializedKey::encode(&EcdsaPublicKey {
            version: 0,
            params: EcdsaParams {
                hash: HashType::Sha256,
                curve: EllipticCurve::NistP256,
                encoding: SignatureEncoding::IeeeP1363,
            },
            x: point.x().expect("x").to_vec(),
            y: point.y().expect("y").to_vec(),
        })
        .expect("encode");

        let verifier = Registry::global().new_primitive(&key).expect("new primitive");
        let sig: p256::ecdsa::Signature = sk.sign(b"hello");
        assert!(verifier.verify(b"hello", &sig.to_bytes()).unwrap());
        assert!(!verifier.verify(b"goodbye", &sig.to_bytes()).unwrap());
    }

    #[test]
    fn test_unknown_type_never_yields_a_verifier() {
        let key = SerializedKey::new("type.example.com/NotRegistered", vec![0; 8]);
        assert!(matches!(
            Registry::global().new_primitive(&key),
            Err(Error::UnknownKeyType(_))
        ));
    }
}
