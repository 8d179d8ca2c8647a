#![forbid(unsafe_code)]

//! Key acceptance policy shared by the verify key managers.

/// Limits applied when validating serialized keys.
///
/// Two managers for the same key type with different policies are
/// different configurations; the registry refuses to swap one for the
/// other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPolicy {
    /// Smallest RSA modulus accepted, in bits.
    pub min_rsa_modulus_bits: usize,
    /// Largest RSA-PSS salt accepted, in bytes.
    pub max_pss_salt_length: usize,
}

impl KeyPolicy {
    pub const DEFAULT_MIN_RSA_MODULUS_BITS: usize = 2048;
    pub const DEFAULT_MAX_PSS_SALT_LENGTH: usize = 64;

    /// Set the minimum RSA modulus size.
    pub fn with_min_rsa_modulus_bits(mut self, bits: usize) -> Self {
        self.min_rsa_modulus_bits = bits;
        self
    }

    /// Set the maximum RSA-PSS salt length.
    pub fn with_max_pss_salt_length(mut self, len: usize) -> Self {
        self.max_pss_salt_length = len;
        self
    }
}

impl Default for KeyPolicy {
    fn default() -> Self {
        Self {
            min_rsa_modulus_bits: Self::DEFAULT_MIN_RSA_MODULUS_BITS,
            max_pss_salt_length: Self::DEFAULT_MAX_PSS_SALT_LENGTH,
        }
    }
}
