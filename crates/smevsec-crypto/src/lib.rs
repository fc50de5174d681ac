#![forbid(unsafe_code)]

//! Cryptographic primitives for the smevsec WS-Security library.
//!
//! All primitives are addressed by OpenSSL-style short names (`sha256`,
//! `RSA-SHA256`, `md_gost94`, ...), the vocabulary the algorithm
//! registry in `smevsec-core` maps to and from XMLDSIG URIs.

pub mod digest;
pub mod keys;
pub mod sign;
pub mod x509;

pub use sign::SigningKey;
