#![forbid(unsafe_code)]

//! Message digests used ahead of signature verification.

use ankare_core::HashType;
use digest::Digest;

/// Compute a digest in one shot.
pub fn digest(hash: HashType, data: &[u8]) -> Vec<u8> {
    match hash {
        HashType::Sha256 => sha2::Sha256::digest(data).to_vec(),
        HashType::Sha384 => sha2::Sha384::digest(data).to_vec(),
        HashType::Sha512 => sha2::Sha512::digest(data).to_vec(),
    }
}
