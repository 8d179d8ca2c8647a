#![forbid(unsafe_code)]

//! Verifier implementations (ECDSA, Ed25519, RSA-SSA-PKCS1, RSA-SSA-PSS).

use ankare_core::{EllipticCurve, Error, HashType, SignatureEncoding};
use rsa::traits::PublicKeyParts;

/// Upper bound on accepted RSA modulus sizes.
const RSA_MAX_MODULUS_BITS: usize = 16384;

/// A signature verifier bound to one public key.
///
/// `Ok(false)` means the signature is well formed but does not match.
/// An `Err` is only returned when the signature bytes cannot be decoded
/// at all ([`Error::MalformedSignature`]).
pub trait Verifier: Send + Sync {
    fn verify(&self, data: &[u8], signature: &[u8]) -> Result<bool, Error>;
}

// ── ECDSA ────────────────────────────────────────────────────────────

enum EcdsaKey {
    P256(p256::ecdsa::VerifyingKey),
    P384(p384::ecdsa::VerifyingKey),
}

/// ECDSA verifier over NIST P-256 or P-384.
pub struct EcdsaVerifier {
    key: EcdsaKey,
    hash: HashType,
    encoding: SignatureEncoding,
}

impl EcdsaVerifier {
    /// Build a verifier from the affine coordinates of the public point.
    ///
    /// Coordinates are big-endian and may carry leading zero bytes.
    pub fn new(
        curve: EllipticCurve,
        hash: HashType,
        encoding: SignatureEncoding,
        x: &[u8],
        y: &[u8],
    ) -> Result<Self, Error> {
        let x = fixed_width(x, curve.field_len())?;
        let y = fixed_width(y, curve.field_len())?;
        let key = match curve {
            EllipticCurve::NistP256 => {
                let point = p256::EncodedPoint::from_affine_coordinates(
                    p256::FieldBytes::from_slice(&x),
                    p256::FieldBytes::from_slice(&y),
                    false,
                );
                let vk = p256::ecdsa::VerifyingKey::from_encoded_point(&point)
                    .map_err(|e| Error::InvalidKey(format!("invalid P-256 public point: {e}")))?;
                EcdsaKey::P256(vk)
            }
            EllipticCurve::NistP384 => {
                let point = p384::EncodedPoint::from_affine_coordinates(
                    p384::FieldBytes::from_slice(&x),
                    p384::FieldBytes::from_slice(&y),
                    false,
                );
                let vk = p384::ecdsa::VerifyingKey::from_encoded_point(&point)
                    .map_err(|e| Error::InvalidKey(format!("invalid P-384 public point: {e}")))?;
                EcdsaKey::P384(vk)
            }
        };
        Ok(Self {
            key,
            hash,
            encoding,
        })
    }
}

/// Left-pad (or strip leading zeros from) a big-endian integer to `len` bytes.
fn fixed_width(bytes: &[u8], len: usize) -> Result<Vec<u8>, Error> {
    let first_nonzero = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let significant = &bytes[first_nonzero..];
    if significant.len() > len {
        return Err(Error::InvalidKey(format!(
            "coordinate is {} bytes, curve field is {len} bytes",
            significant.len()
        )));
    }
    let mut out = vec![0u8; len - significant.len()];
    out.extend_from_slice(significant);
    Ok(out)
}

/// Decode a P-256 signature in the given encoding.
fn decode_p256_signature(
    encoding: SignatureEncoding,
    sig_bytes: &[u8],
) -> Result<p256::ecdsa::Signature, Error> {
    let sig = match encoding {
        SignatureEncoding::Der => p256::ecdsa::Signature::from_der(sig_bytes),
        SignatureEncoding::IeeeP1363 => {
            if sig_bytes.len() != 64 {
                return Err(Error::MalformedSignature(format!(
                    "P-256 signature must be 64 bytes, got {}",
                    sig_bytes.len()
                )));
            }
            p256::ecdsa::Signature::from_slice(sig_bytes)
        }
    };
    sig.map_err(|e| Error::MalformedSignature(format!("invalid P-256 signature: {e}")))
}

/// Decode a P-384 signature in the given encoding.
fn decode_p384_signature(
    encoding: SignatureEncoding,
    sig_bytes: &[u8],
) -> Result<p384::ecdsa::Signature, Error> {
    let sig = match encoding {
        SignatureEncoding::Der => p384::ecdsa::Signature::from_der(sig_bytes),
        SignatureEncoding::IeeeP1363 => {
            if sig_bytes.len() != 96 {
                return Err(Error::MalformedSignature(format!(
                    "P-384 signature must be 96 bytes, got {}",
                    sig_bytes.len()
                )));
            }
            p384::ecdsa::Signature::from_slice(sig_bytes)
        }
    };
    sig.map_err(|e| Error::MalformedSignature(format!("invalid P-384 signature: {e}")))
}

impl Verifier for EcdsaVerifier {
    fn verify(&self, data: &[u8], sig_bytes: &[u8]) -> Result<bool, Error> {
        use signature::hazmat::PrehashVerifier;
        // Decode before hashing so malformed input is rejected up front.
        match &self.key {
            EcdsaKey::P256(vk) => {
                let sig = decode_p256_signature(self.encoding, sig_bytes)?;
                let prehash = crate::hash::digest(self.hash, data);
                Ok(vk.verify_prehash(&prehash, &sig).is_ok())
            }
            EcdsaKey::P384(vk) => {
                let sig = decode_p384_signature(self.encoding, sig_bytes)?;
                let prehash = crate::hash::digest(self.hash, data);
                Ok(vk.verify_prehash(&prehash, &sig).is_ok())
            }
        }
    }
}

// ── Ed25519 ──────────────────────────────────────────────────────────

/// Ed25519 verifier (RFC 8032, pure variant).
pub struct Ed25519Verifier {
    key: ed25519_dalek::VerifyingKey,
}

impl Ed25519Verifier {
    /// Build a verifier from a 32-byte compressed Edwards point.
    pub fn new(public: &[u8]) -> Result<Self, Error> {
        let bytes: [u8; 32] = public.try_into().map_err(|_| {
            Error::InvalidKey(format!(
                "Ed25519 public key must be 32 bytes, got {}",
                public.len()
            ))
        })?;
        let key = ed25519_dalek::VerifyingKey::from_bytes(&bytes)
            .map_err(|e| Error::InvalidKey(format!("invalid Ed25519 public key: {e}")))?;
        if key.is_weak() {
            return Err(Error::InvalidKey(
                "Ed25519 public key is a small-order point".into(),
            ));
        }
        Ok(Self { key })
    }
}

impl Verifier for Ed25519Verifier {
    fn verify(&self, data: &[u8], sig_bytes: &[u8]) -> Result<bool, Error> {
        let sig = ed25519_dalek::Signature::from_slice(sig_bytes).map_err(|_| {
            Error::MalformedSignature(format!(
                "Ed25519 signature must be 64 bytes, got {}",
                sig_bytes.len()
            ))
        })?;
        Ok(signature::Verifier::verify(&self.key, data, &sig).is_ok())
    }
}

// ── RSA ──────────────────────────────────────────────────────────────

/// Build an RSA public key from big-endian modulus and exponent.
pub fn rsa_public_key(n: &[u8], e: &[u8]) -> Result<rsa::RsaPublicKey, Error> {
    rsa::RsaPublicKey::new_with_max_size(
        rsa::BigUint::from_bytes_be(n),
        rsa::BigUint::from_bytes_be(e),
        RSA_MAX_MODULUS_BITS,
    )
    .map_err(|e| Error::InvalidKey(format!("invalid RSA public key: {e}")))
}

/// RSA signatures are exactly as long as the modulus.
fn check_rsa_length(key: &rsa::RsaPublicKey, sig_bytes: &[u8]) -> Result<(), Error> {
    if sig_bytes.len() != key.size() {
        return Err(Error::MalformedSignature(format!(
            "RSA signature must be {} bytes, got {}",
            key.size(),
            sig_bytes.len()
        )));
    }
    Ok(())
}

/// RSASSA-PKCS1-v1_5 verifier.
pub struct RsaSsaPkcs1Verifier {
    key: rsa::RsaPublicKey,
    hash: HashType,
}

impl RsaSsaPkcs1Verifier {
    pub fn new(key: rsa::RsaPublicKey, hash: HashType) -> Self {
        Self { key, hash }
    }
}

impl Verifier for RsaSsaPkcs1Verifier {
    fn verify(&self, data: &[u8], sig_bytes: &[u8]) -> Result<bool, Error> {
        check_rsa_length(&self.key, sig_bytes)?;
        let hashed = crate::hash::digest(self.hash, data);
        let scheme = match self.hash {
            HashType::Sha256 => rsa::Pkcs1v15Sign::new::<sha2::Sha256>(),
            HashType::Sha384 => rsa::Pkcs1v15Sign::new::<sha2::Sha384>(),
            HashType::Sha512 => rsa::Pkcs1v15Sign::new::<sha2::Sha512>(),
        };
        Ok(self.key.verify(scheme, &hashed, sig_bytes).is_ok())
    }
}

/// RSASSA-PSS verifier with MGF1 over the signature hash.
pub struct RsaSsaPssVerifier {
    key: rsa::RsaPublicKey,
    hash: HashType,
    salt_len: usize,
}

impl RsaSsaPssVerifier {
    pub fn new(key: rsa::RsaPublicKey, hash: HashType, salt_len: usize) -> Self {
        Self {
            key,
            hash,
            salt_len,
        }
    }
}

impl Verifier for RsaSsaPssVerifier {
    fn verify(&self, data: &[u8], sig_bytes: &[u8]) -> Result<bool, Error> {
        check_rsa_length(&self.key, sig_bytes)?;
        let hashed = crate::hash::digest(self.hash, data);
        let scheme = match self.hash {
            HashType::Sha256 => rsa::Pss::new_with_salt::<sha2::Sha256>(self.salt_len),
            HashType::Sha384 => rsa::Pss::new_with_salt::<sha2::Sha384>(self.salt_len),
            HashType::Sha512 => rsa::Pss::new_with_salt::<sha2::Sha512>(self.salt_len),
        };
        Ok(self.key.verify(scheme, &hashed, sig_bytes).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signature::hazmat::PrehashSigner;
    use std::sync::OnceLock;

    const MESSAGE: &[u8] = b"attack at dawn";

    fn p256_fixture(encoding: SignatureEncoding) -> (EcdsaVerifier, Vec<u8>) {
        let sk = p256::ecdsa::SigningKey::from_slice(&[0x42; 32]).expect("P-256 secret");
        let point = sk.verifying_key().to_encoded_point(false);
        let verifier = EcdsaVerifier::new(
            EllipticCurve::NistP256,
            HashType::Sha256,
            encoding,
            point.x().expect("x"),
            point.y().expect("y"),
        )
        .expect("build P-256 verifier");
        let prehash = crate::hash::digest(HashType::Sha256, MESSAGE);
        let sig: p256::ecdsa::Signature = sk.sign_prehash(&prehash).expect("sign");
        let sig_bytes = match encoding {
            SignatureEncoding::Der => sig.to_der().as_bytes().to_vec(),
            SignatureEncoding::IeeeP1363 => sig.to_bytes().to_vec(),
        };
        (verifier, sig_bytes)
    }

    fn rsa_fixture() -> &'static rsa::RsaPrivateKey {
        static KEY: OnceLock<rsa::RsaPrivateKey> = OnceLock::new();
        KEY.get_or_init(|| {
            rsa::RsaPrivateKey::new(&mut rand::thread_rng(), 2048).expect("generate RSA key")
        })
    }

    #[test]
    fn test_ecdsa_p256_der_sound() {
        let (verifier, mut sig) = p256_fixture(SignatureEncoding::Der);
        assert!(verifier.verify(MESSAGE, &sig).unwrap());
        assert!(!verifier.verify(b"attack at dusk", &sig).unwrap());

        let last = sig.len() - 1;
        sig[last] ^= 0x01;
        assert!(!verifier.verify(MESSAGE, &sig).unwrap());

        sig.truncate(last);
        assert!(matches!(
            verifier.verify(MESSAGE, &sig),
            Err(Error::MalformedSignature(_))
        ));
    }

    #[test]
    fn test_ecdsa_p256_p1363_sound() {
        let (verifier, mut sig) = p256_fixture(SignatureEncoding::IeeeP1363);
        assert_eq!(sig.len(), 64);
        assert!(verifier.verify(MESSAGE, &sig).unwrap());

        sig[63] ^= 0x01;
        assert!(!verifier.verify(MESSAGE, &sig).unwrap());

        assert!(matches!(
            verifier.verify(MESSAGE, &sig[..63]),
            Err(Error::MalformedSignature(_))
        ));
    }

    #[test]
    fn test_ecdsa_der_signature_rejected_as_p1363() {
        let (_, der_sig) = p256_fixture(SignatureEncoding::Der);
        let (p1363_verifier, _) = p256_fixture(SignatureEncoding::IeeeP1363);
        assert!(matches!(
            p1363_verifier.verify(MESSAGE, &der_sig),
            Err(Error::MalformedSignature(_))
        ));
    }

    #[test]
    fn test_ecdsa_p384_sha512() {
        let sk = p384::ecdsa::SigningKey::from_slice(&[0x11; 48]).expect("P-384 secret");
        let point = sk.verifying_key().to_encoded_point(false);
        let verifier = EcdsaVerifier::new(
            EllipticCurve::NistP384,
            HashType::Sha512,
            SignatureEncoding::IeeeP1363,
            point.x().expect("x"),
            point.y().expect("y"),
        )
        .expect("build P-384 verifier");
        let prehash = crate::hash::digest(HashType::Sha512, MESSAGE);
        let sig: p384::ecdsa::Signature = sk.sign_prehash(&prehash).expect("sign");
        let mut sig_bytes = sig.to_bytes().to_vec();
        assert!(verifier.verify(MESSAGE, &sig_bytes).unwrap());

        sig_bytes[95] ^= 0x01;
        assert!(!verifier.verify(MESSAGE, &sig_bytes).unwrap());
    }

    #[test]
    fn test_ecdsa_rejects_point_off_curve() {
        let result = EcdsaVerifier::new(
            EllipticCurve::NistP256,
            HashType::Sha256,
            SignatureEncoding::Der,
            &[0x01; 32],
            &[0x02; 32],
        );
        assert!(matches!(result, Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_fixed_width_padding() {
        assert_eq!(fixed_width(&[0, 0, 1, 2], 3).unwrap(), vec![0, 1, 2]);
        assert_eq!(fixed_width(&[1, 2], 4).unwrap(), vec![0, 0, 1, 2]);
        assert!(fixed_width(&[1, 2, 3], 2).is_err());
    }

    #[test]
    fn test_ed25519_sound() {
        use ed25519_dalek::Signer;

        let secret: [u8; 32] = [
            0x9d, 0x61, 0xb1, 0x9d, 0xef, 0xfd, 0x5a, 0x60, 0xba, 0x84, 0x4a, 0xf4, 0x92, 0xec,
            0x2c, 0xc4, 0x44, 0x49, 0xc5, 0x69, 0x7b, 0x32, 0x69, 0x19, 0x70, 0x3b, 0xac, 0x03,
            0x1c, 0xae, 0x7f, 0x60,
        ];
        let sk = ed25519_dalek::SigningKey::from_bytes(&secret);
        let verifier =
            Ed25519Verifier::new(sk.verifying_key().as_bytes()).expect("build Ed25519 verifier");

        let mut sig = sk.sign(MESSAGE).to_bytes().to_vec();
        assert!(verifier.verify(MESSAGE, &sig).unwrap());

        sig[0] ^= 0x01;
        assert!(!verifier.verify(MESSAGE, &sig).unwrap());

        assert!(matches!(
            verifier.verify(MESSAGE, &sig[..40]),
            Err(Error::MalformedSignature(_))
        ));
    }

    #[test]
    fn test_ed25519_rejects_bad_length_and_weak_key() {
        assert!(matches!(
            Ed25519Verifier::new(&[0u8; 31]),
            Err(Error::InvalidKey(_))
        ));
        // The identity point has order 1.
        let mut identity = [0u8; 32];
        identity[0] = 0x01;
        assert!(matches!(
            Ed25519Verifier::new(&identity),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn test_rsa_pkcs1_sound() {
        let sk = rsa_fixture();
        let hashed = crate::hash::digest(HashType::Sha256, MESSAGE);
        let mut sig = sk
            .sign(rsa::Pkcs1v15Sign::new::<sha2::Sha256>(), &hashed)
            .expect("sign");
        let verifier = RsaSsaPkcs1Verifier::new(sk.to_public_key(), HashType::Sha256);
        assert!(verifier.verify(MESSAGE, &sig).unwrap());

        let last = sig.len() - 1;
        sig[last] ^= 0x01;
        assert!(!verifier.verify(MESSAGE, &sig).unwrap());

        sig.truncate(last);
        assert!(matches!(
            verifier.verify(MESSAGE, &sig),
            Err(Error::MalformedSignature(_))
        ));
    }

    #[test]
    fn test_rsa_pss_sound() {
        let sk = rsa_fixture();
        let hashed = crate::hash::digest(HashType::Sha384, MESSAGE);
        let mut sig = sk
            .sign_with_rng(
                &mut rand::thread_rng(),
                rsa::Pss::new_with_salt::<sha2::Sha384>(48),
                &hashed,
            )
            .expect("sign");
        let verifier = RsaSsaPssVerifier::new(sk.to_public_key(), HashType::Sha384, 48);
        assert!(verifier.verify(MESSAGE, &sig).unwrap());

        sig[10] ^= 0x01;
        assert!(!verifier.verify(MESSAGE, &sig).unwrap());
    }

    #[test]
    fn test_rsa_public_key_from_parts() {
        let public = rsa_fixture().to_public_key();
        let rebuilt = rsa_public_key(&public.n().to_bytes_be(), &public.e().to_bytes_be())
            .expect("rebuild RSA key");
        assert_eq!(rebuilt, public);
    }
}
