#![forbid(unsafe_code)]

//! Core types for the Ankare signature verification registry.
//!
//! Holds the error taxonomy shared by every layer, the key-type
//! identifiers of the built-in key managers, and the parameter
//! enumerations that appear inside serialized keys.

pub mod error;
pub mod key_type;
pub mod params;

pub use error::{Error, Result};
pub use params::{EllipticCurve, HashType, SignatureEncoding};
