#![forbid(unsafe_code)]

//! X.509 certificate handling: parsing, the signature algorithm OID
//! table, and public key extraction.

use crate::sign::SigningKey;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use der::{Decode, DecodePem, Encode};
use smevsec_core::{Error, Result};
use x509_cert::Certificate;

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";

// Signature algorithm OIDs.
const OID_RSA_MD5: &str = "1.2.840.113549.1.1.4";
const OID_RSA_SHA1: &str = "1.2.840.113549.1.1.5";
const OID_RSA_SHA256: &str = "1.2.840.113549.1.1.11";
const OID_RSA_SHA512: &str = "1.2.840.113549.1.1.13";
const OID_GOST2001: &str = "1.2.643.2.2.3";
const OID_GOST2012_256: &str = "1.2.643.7.1.1.3.2";
const OID_GOST2012_512: &str = "1.2.643.7.1.1.3.3";

/// Parse a certificate from PEM text.
pub fn load_cert_pem(pem_data: &[u8]) -> Result<Certificate> {
    Certificate::from_pem(pem_data)
        .map_err(|e| Error::Certificate(format!("failed to parse X.509 certificate PEM: {e}")))
}

/// Parse a certificate from its base64-encoded DER body (the payload
/// of a BinarySecurityToken).
pub fn load_cert_base64(b64: &str) -> Result<Certificate> {
    let stripped: String = b64.split_whitespace().collect();
    let der = BASE64
        .decode(stripped.as_bytes())
        .map_err(|e| Error::Base64(format!("certificate data: {e}")))?;
    Certificate::from_der(&der)
        .map_err(|e| Error::Certificate(format!("failed to parse X.509 certificate DER: {e}")))
}

/// Reduce PEM text (or an already-bare base64 body) to a single-line
/// base64 string, suitable for a BinarySecurityToken payload.
pub fn clean_cert_data(data: &str) -> String {
    data.lines()
        .filter(|line| !line.contains(PEM_BEGIN) && !line.contains(PEM_END))
        .flat_map(|line| line.split_whitespace())
        .collect()
}

/// The signature method name declared by the certificate's
/// signatureAlgorithm OID.
pub fn signature_method_name(cert: &Certificate) -> Result<&'static str> {
    let oid = cert.signature_algorithm.oid.to_string();
    match oid.as_str() {
        OID_RSA_MD5 => Ok("RSA-MD5"),
        OID_RSA_SHA1 => Ok("RSA-SHA1"),
        OID_RSA_SHA256 => Ok("RSA-SHA256"),
        OID_RSA_SHA512 => Ok("RSA-SHA512"),
        OID_GOST2001 => Ok("id-GostR3411-94-with-GostR3410-2001"),
        OID_GOST2012_256 => Ok("id-tc26-signwithdigest-gost3410-2012-256"),
        OID_GOST2012_512 => Ok("id-tc26-signwithdigest-gost3410-2012-512"),
        _ => Err(Error::UnsupportedAlgorithm(format!(
            "certificate signature algorithm OID: {oid}"
        ))),
    }
}

/// Extract the subject public key as a verification key.
pub fn public_key(cert: &Certificate) -> Result<SigningKey> {
    use spki::DecodePublicKey;
    let spki_der = cert
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(|e| Error::Certificate(format!("failed to encode SPKI: {e}")))?;
    let pk = rsa::RsaPublicKey::from_public_key_der(&spki_der).map_err(|e| {
        Error::Certificate(format!(
            "unsupported public key algorithm in certificate: {e}"
        ))
    })?;
    Ok(SigningKey::RsaPublic(pk))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_cert_data_strips_markers_and_whitespace() {
        let pem = "-----BEGIN CERTIFICATE-----\nAAAA\nBBBB\n-----END CERTIFICATE-----\n";
        assert_eq!(clean_cert_data(pem), "AAAABBBB");
    }

    #[test]
    fn clean_cert_data_passes_bare_base64_through() {
        assert_eq!(clean_cert_data("AAAA\nBBBB"), "AAAABBBB");
    }

    #[test]
    fn bad_base64_token_is_a_base64_error() {
        assert!(matches!(
            load_cert_base64("!!not-base64!!"),
            Err(Error::Base64(_))
        ));
    }

    #[test]
    fn truncated_der_is_a_certificate_error() {
        assert!(matches!(
            load_cert_base64("AAAA"),
            Err(Error::Certificate(_))
        ));
    }
}
