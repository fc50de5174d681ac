#![forbid(unsafe_code)]

//! Algorithm URI constants and the name ↔ URI registry.
//!
//! Names are the OpenSSL short names the SMEV profile exchanges in
//! configuration and infers from certificates; URIs are what appears in
//! `Algorithm` attributes on the wire. The tables are process-lifetime
//! immutable statics; there is no dynamic registration.

use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::LazyLock;

// ── Canonicalization ─────────────────────────────────────────────────

pub const C14N: &str = "http://www.w3.org/TR/2001/REC-xml-c14n-20010315";
pub const C14N_WITH_COMMENTS: &str =
    "http://www.w3.org/TR/2001/REC-xml-c14n-20010315#WithComments";
pub const EXC_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";
pub const EXC_C14N_WITH_COMMENTS: &str = "http://www.w3.org/2001/10/xml-exc-c14n#WithComments";

// ── Transforms ───────────────────────────────────────────────────────

pub const ENVELOPED_SIGNATURE: &str = "http://www.w3.org/2000/09/xmldsig#enveloped-signature";

// ── Digest algorithms ────────────────────────────────────────────────

pub const MD5: &str = "http://www.w3.org/2001/04/xmldsig-more#md5";
pub const SHA1: &str = "http://www.w3.org/2000/09/xmldsig#sha1";
pub const SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";
pub const SHA512: &str = "http://www.w3.org/2001/04/xmlenc#sha512";
pub const GOST94: &str = "http://www.w3.org/2001/04/xmldsig-more#gostr3411";
pub const GOST12_256: &str = "urn:ietf:params:xml:ns:cpxmlsec:algorithms:gostr34112012-256";
pub const GOST12_512: &str = "urn:ietf:params:xml:ns:cpxmlsec:algorithms:gostr34112012-512";

// ── Signature algorithms ─────────────────────────────────────────────

pub const RSA_MD5: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-md5";
pub const RSA_SHA1: &str = "http://www.w3.org/2000/09/xmldsig#rsa-sha1";
pub const RSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";
pub const RSA_SHA512: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha512";
pub const GOST2001: &str = "http://www.w3.org/2001/04/xmldsig-more#gostr34102001-gostr3411";
pub const GOST2012_256: &str =
    "urn:ietf:params:xml:ns:cpxmlsec:algorithms:gostr34102012-gostr34112012-256";
pub const GOST2012_512: &str =
    "urn:ietf:params:xml:ns:cpxmlsec:algorithms:gostr34102012-gostr34112012-512";

// ── Registry tables ──────────────────────────────────────────────────

static DIGEST_METHODS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("md5", MD5),
        ("sha1", SHA1),
        ("sha256", SHA256),
        ("sha512", SHA512),
        ("md_gost94", GOST94),
        ("md_gost12_256", GOST12_256),
        ("md_gost12_512", GOST12_512),
    ])
});

static DIGEST_NAMES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| DIGEST_METHODS.iter().map(|(k, v)| (*v, *k)).collect());

static SIGNATURE_METHODS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("RSA-MD5", RSA_MD5),
        ("RSA-SHA1", RSA_SHA1),
        ("RSA-SHA256", RSA_SHA256),
        ("RSA-SHA512", RSA_SHA512),
        ("id-GostR3411-94-with-GostR3410-2001", GOST2001),
        ("id-tc26-signwithdigest-gost3410-2012-256", GOST2012_256),
        ("id-tc26-signwithdigest-gost3410-2012-512", GOST2012_512),
    ])
});

static SIGNATURE_NAMES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| SIGNATURE_METHODS.iter().map(|(k, v)| (*v, *k)).collect());

/// Combined signature identifiers whose OID already encodes the digest.
/// Applied after algorithm inference; identity for everything else.
static SIGNATURE_DIGEST_REDUCTIONS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        HashMap::from([
            ("id-GostR3411-94-with-GostR3410-2001", "md_gost94"),
            ("id-tc26-signwithdigest-gost3410-2012-256", "md_gost12_256"),
            ("id-tc26-signwithdigest-gost3410-2012-512", "md_gost12_512"),
        ])
    });

/// Look up the `Algorithm` URI for a digest method name.
pub fn digest_uri(name: &str) -> Result<&'static str> {
    DIGEST_METHODS
        .get(name)
        .copied()
        .ok_or_else(|| Error::UnsupportedAlgorithm(format!("digest method: {name}")))
}

/// Look up the digest method name for an `Algorithm` URI.
pub fn digest_name(uri: &str) -> Result<&'static str> {
    DIGEST_NAMES
        .get(uri)
        .copied()
        .ok_or_else(|| Error::UnsupportedAlgorithm(format!("digest method URI: {uri}")))
}

/// Look up the `Algorithm` URI for a signature method name.
pub fn signature_uri(name: &str) -> Result<&'static str> {
    SIGNATURE_METHODS
        .get(name)
        .copied()
        .ok_or_else(|| Error::UnsupportedAlgorithm(format!("signature method: {name}")))
}

/// Look up the signature method name for an `Algorithm` URI.
pub fn signature_name(uri: &str) -> Result<&'static str> {
    SIGNATURE_NAMES
        .get(uri)
        .copied()
        .ok_or_else(|| Error::UnsupportedAlgorithm(format!("signature method URI: {uri}")))
}

/// Reduce a combined signature identifier to its digest name.
///
/// GOST signature OIDs imply their hash, so the crypto provider is
/// addressed by the digest name instead. Names without a reduction entry
/// pass through unchanged (`RSA-SHA256` stays `RSA-SHA256`; the provider
/// resolves it the way `EVP_get_digestbyname` does).
pub fn reduce_signature_to_digest(name: &str) -> &str {
    SIGNATURE_DIGEST_REDUCTIONS
        .get(name)
        .copied()
        .unwrap_or(name)
}

/// All registered digest method names.
pub fn digest_method_names() -> Vec<&'static str> {
    let mut names: Vec<_> = DIGEST_METHODS.keys().copied().collect();
    names.sort_unstable();
    names
}

/// All registered signature method names.
pub fn signature_method_names() -> Vec<&'static str> {
    let mut names: Vec<_> = SIGNATURE_METHODS.keys().copied().collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_table_round_trips_both_directions() {
        for name in digest_method_names() {
            let uri = digest_uri(name).unwrap();
            assert_eq!(digest_name(uri).unwrap(), name);
        }
    }

    #[test]
    fn signature_table_round_trips_both_directions() {
        for name in signature_method_names() {
            let uri = signature_uri(name).unwrap();
            assert_eq!(signature_name(uri).unwrap(), name);
        }
    }

    #[test]
    fn unknown_lookups_are_hard_errors() {
        assert!(matches!(
            digest_uri("sha3-256"),
            Err(Error::UnsupportedAlgorithm(_))
        ));
        assert!(matches!(
            digest_name("urn:example:nope"),
            Err(Error::UnsupportedAlgorithm(_))
        ));
        assert!(matches!(
            signature_uri("DSA-SHA1"),
            Err(Error::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn gost_signatures_reduce_to_their_digest() {
        assert_eq!(
            reduce_signature_to_digest("id-GostR3411-94-with-GostR3410-2001"),
            "md_gost94"
        );
        assert_eq!(
            reduce_signature_to_digest("id-tc26-signwithdigest-gost3410-2012-256"),
            "md_gost12_256"
        );
        assert_eq!(
            reduce_signature_to_digest("id-tc26-signwithdigest-gost3410-2012-512"),
            "md_gost12_512"
        );
    }

    #[test]
    fn reduction_is_identity_for_rsa() {
        assert_eq!(reduce_signature_to_digest("RSA-SHA256"), "RSA-SHA256");
        assert_eq!(reduce_signature_to_digest("sha1"), "sha1");
    }
}
