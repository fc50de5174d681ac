#![forbid(unsafe_code)]

//! Digest (hash) algorithm implementations.

use digest::Digest;
use smevsec_core::{Error, Result};

/// Trait for digest algorithms.
pub trait DigestAlgorithm: Send {
    /// Feed data into the hash.
    fn update(&mut self, data: &[u8]);
    /// Finalize and return the hash value.
    fn finalize(self: Box<Self>) -> Vec<u8>;
    /// Method name this instance was resolved from.
    fn name(&self) -> &'static str;
}

/// Create a digest algorithm from its method name.
///
/// Combined RSA signature names resolve to their hash, the way
/// OpenSSL's `EVP_get_digestbyname` accepts `RSA-SHA256` as an alias
/// for `sha256`.
pub fn from_name(name: &str) -> Result<Box<dyn DigestAlgorithm>> {
    match name {
        "md5" | "RSA-MD5" => Ok(Box::new(Md5Digest::new())),
        "sha1" | "RSA-SHA1" => Ok(Box::new(Sha1Digest::new())),
        "sha256" | "RSA-SHA256" => Ok(Box::new(Sha256Digest::new())),
        "sha512" | "RSA-SHA512" => Ok(Box::new(Sha512Digest::new())),
        "md_gost94" => Ok(Box::new(Gost94Digest::new())),
        "md_gost12_256" => Ok(Box::new(Streebog256Digest::new())),
        "md_gost12_512" => Ok(Box::new(Streebog512Digest::new())),
        _ => Err(Error::UnsupportedAlgorithm(format!(
            "digest method: {name}"
        ))),
    }
}

/// Compute a digest in one shot.
pub fn digest(name: &str, data: &[u8]) -> Result<Vec<u8>> {
    let mut hasher = from_name(name)?;
    hasher.update(data);
    Ok(hasher.finalize())
}

// ── Concrete implementations ─────────────────────────────────────────

macro_rules! impl_digest {
    ($name:ident, $hasher:ty, $method:expr) => {
        struct $name {
            inner: $hasher,
        }

        impl $name {
            fn new() -> Self {
                Self {
                    inner: <$hasher>::new(),
                }
            }
        }

        impl DigestAlgorithm for $name {
            fn update(&mut self, data: &[u8]) {
                Digest::update(&mut self.inner, data);
            }

            fn finalize(self: Box<Self>) -> Vec<u8> {
                Digest::finalize(self.inner).to_vec()
            }

            fn name(&self) -> &'static str {
                $method
            }
        }
    };
}

impl_digest!(Md5Digest, md5::Md5, "md5");
impl_digest!(Sha1Digest, sha1::Sha1, "sha1");
impl_digest!(Sha256Digest, sha2::Sha256, "sha256");
impl_digest!(Sha512Digest, sha2::Sha512, "sha512");
impl_digest!(Gost94Digest, gost94::Gost94CryptoPro, "md_gost94");
impl_digest!(Streebog256Digest, streebog::Streebog256, "md_gost12_256");
impl_digest!(Streebog512Digest, streebog::Streebog512, "md_gost12_512");
