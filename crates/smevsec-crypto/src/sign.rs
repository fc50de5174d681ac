#![forbid(unsafe_code)]

//! Signature algorithm implementations.
//!
//! RSA PKCS#1 v1.5 over MD5/SHA-1/SHA-256/SHA-512 is implemented with
//! the RustCrypto stack.  The GOST signature methods are registered in
//! `smevsec-core` for URI mapping but have no signing backend here;
//! resolving one yields an `UnsupportedAlgorithm` error.

use smevsec_core::{Error, Result};

/// Key material for signature operations.
#[derive(Debug)]
pub enum SigningKey {
    Rsa(rsa::RsaPrivateKey),
    RsaPublic(rsa::RsaPublicKey),
}

impl SigningKey {
    /// Whether this key can produce signatures.
    pub fn can_sign(&self) -> bool {
        matches!(self, SigningKey::Rsa(_))
    }
}

/// Trait for signature algorithms.
pub trait SignatureAlgorithm: Send + std::fmt::Debug {
    /// Method name this instance was resolved from.
    fn name(&self) -> &'static str;
    fn sign(&self, key: &SigningKey, data: &[u8]) -> Result<Vec<u8>>;
    fn verify(&self, key: &SigningKey, data: &[u8], signature: &[u8]) -> Result<bool>;
}

/// Create a signature algorithm from its method name.
pub fn from_name(name: &str) -> Result<Box<dyn SignatureAlgorithm>> {
    match name {
        "RSA-MD5" => Ok(Box::new(RsaPkcs1v15 {
            name: "RSA-MD5",
            hash: HashType::Md5,
        })),
        "RSA-SHA1" => Ok(Box::new(RsaPkcs1v15 {
            name: "RSA-SHA1",
            hash: HashType::Sha1,
        })),
        "RSA-SHA256" => Ok(Box::new(RsaPkcs1v15 {
            name: "RSA-SHA256",
            hash: HashType::Sha256,
        })),
        "RSA-SHA512" => Ok(Box::new(RsaPkcs1v15 {
            name: "RSA-SHA512",
            hash: HashType::Sha512,
        })),
        // GOST methods, both the combined identifiers and the digest
        // names they reduce to.
        "id-GostR3411-94-with-GostR3410-2001"
        | "id-tc26-signwithdigest-gost3410-2012-256"
        | "id-tc26-signwithdigest-gost3410-2012-512"
        | "md_gost94"
        | "md_gost12_256"
        | "md_gost12_512" => Err(Error::UnsupportedAlgorithm(format!(
            "signature method {name} requires a GOST signature provider"
        ))),
        _ => Err(Error::UnsupportedAlgorithm(format!(
            "signature method: {name}"
        ))),
    }
}

#[derive(Debug, Clone, Copy)]
enum HashType {
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

// ── RSA PKCS#1 v1.5 ─────────────────────────────────────────────────

#[derive(Debug)]
struct RsaPkcs1v15 {
    name: &'static str,
    hash: HashType,
}

impl RsaPkcs1v15 {
    fn sign_with_key(&self, private_key: &rsa::RsaPrivateKey, data: &[u8]) -> Result<Vec<u8>> {
        use signature::{SignatureEncoding, Signer};
        macro_rules! do_sign {
            ($hasher:ty) => {{
                let sk = rsa::pkcs1v15::SigningKey::<$hasher>::new(private_key.clone());
                sk.try_sign(data)
                    .map(|sig| sig.to_vec())
                    .map_err(|e| Error::Crypto(format!("RSA signing failed: {e}")))
            }};
        }
        match self.hash {
            HashType::Md5 => do_sign!(md5::Md5),
            HashType::Sha1 => do_sign!(sha1::Sha1),
            HashType::Sha256 => do_sign!(sha2::Sha256),
            HashType::Sha512 => do_sign!(sha2::Sha512),
        }
    }

    fn verify_with_key(
        &self,
        public_key: &rsa::RsaPublicKey,
        data: &[u8],
        sig_bytes: &[u8],
    ) -> Result<bool> {
        use signature::Verifier;
        let sig = rsa::pkcs1v15::Signature::try_from(sig_bytes)
            .map_err(|e| Error::Crypto(format!("invalid RSA signature: {e}")))?;
        macro_rules! do_verify {
            ($hasher:ty) => {{
                let vk = rsa::pkcs1v15::VerifyingKey::<$hasher>::new(public_key.clone());
                Ok(vk.verify(data, &sig).is_ok())
            }};
        }
        match self.hash {
            HashType::Md5 => do_verify!(md5::Md5),
            HashType::Sha1 => do_verify!(sha1::Sha1),
            HashType::Sha256 => do_verify!(sha2::Sha256),
            HashType::Sha512 => do_verify!(sha2::Sha512),
        }
    }
}

impl SignatureAlgorithm for RsaPkcs1v15 {
    fn name(&self) -> &'static str {
        self.name
    }

    fn sign(&self, key: &SigningKey, data: &[u8]) -> Result<Vec<u8>> {
        match key {
            SigningKey::Rsa(pk) => self.sign_with_key(pk, data),
            _ => Err(Error::Key("RSA private key required".into())),
        }
    }

    fn verify(&self, key: &SigningKey, data: &[u8], sig_bytes: &[u8]) -> Result<bool> {
        let pubk = match key {
            SigningKey::Rsa(pk) => pk.to_public_key(),
            SigningKey::RsaPublic(pk) => pk.clone(),
        };
        self.verify_with_key(&pubk, data, sig_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gost_methods_are_unsupported_with_a_clear_message() {
        let err = from_name("id-GostR3411-94-with-GostR3410-2001").unwrap_err();
        match err {
            Error::UnsupportedAlgorithm(msg) => assert!(msg.contains("GOST")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reduced_gost_digest_names_address_the_gost_provider() {
        for name in ["md_gost94", "md_gost12_256", "md_gost12_512"] {
            let err = from_name(name).unwrap_err();
            match err {
                Error::UnsupportedAlgorithm(msg) => assert!(msg.contains("GOST")),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn resolved_algorithms_are_debug_printable() {
        let alg = from_name("RSA-SHA1").unwrap();
        assert!(format!("{alg:?}").contains("RsaPkcs1v15"));
    }

    #[test]
    fn unknown_method_is_unsupported() {
        assert!(matches!(
            from_name("DSA-SHA1"),
            Err(Error::UnsupportedAlgorithm(_))
        ));
    }
}
