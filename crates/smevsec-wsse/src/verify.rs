#![forbid(unsafe_code)]

//! The verification pipeline.
//!
//! Every structural precondition is a hard error naming what is
//! missing.  The two "content does not match" outcomes, a Body digest
//! mismatch and a failed signature check, are kept distinct from
//! failures that prevented the check from running at all, so callers
//! can map them to a tamper rejection rather than a configuration fault.

use crate::sign::reference_digest;
use crate::transforms;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use smevsec_core::{algorithm, ns, Error, Result};
use smevsec_crypto::{sign as crypto_sign, x509};
use smevsec_xml::document::{find_element, require_child_element, require_text};
use smevsec_xml::XmlDocument;

/// Verify a signed SOAP envelope against the expected certificate.
///
/// The token embedded in the envelope must match `cert_pem` exactly;
/// the public key used for the signature check is then extracted from
/// the token itself.  The input is never modified.
pub fn verify_envelope(envelope: &str, cert_pem: &str) -> Result<()> {
    let mut xdoc = XmlDocument::parse(envelope.to_owned())?;
    xdoc.add_id_attr(ns::WSU, ns::attr::ID);
    let doc = xdoc.parse_doc()?;

    let security = find_element(&doc, ns::WSSE, ns::node::SECURITY)
        .ok_or_else(|| Error::MissingElement(ns::node::SECURITY.to_owned()))?;
    let token = require_child_element(security, ns::WSSE, ns::node::BINARY_SECURITY_TOKEN)?;
    let signature = require_child_element(security, ns::DSIG, ns::node::SIGNATURE)?;
    let signed_info = require_child_element(signature, ns::DSIG, ns::node::SIGNED_INFO)?;
    let signature_value = require_child_element(signature, ns::DSIG, ns::node::SIGNATURE_VALUE)?;
    let reference = require_child_element(signed_info, ns::DSIG, ns::node::REFERENCE)?;
    let digest_value = require_child_element(reference, ns::DSIG, ns::node::DIGEST_VALUE)?;

    // Token identity check, before any cryptographic work.
    let token_b64: String = require_text(token)?.split_whitespace().collect();
    let expected_b64 = x509::clean_cert_data(cert_pem);
    if token_b64 != expected_b64 {
        return Err(Error::Certificate(
            "Incorrect binary security token".to_owned(),
        ));
    }

    // Body digest.
    let actual = reference_digest(&xdoc, &doc, reference)?;
    let declared = require_text(digest_value)?;
    if BASE64.encode(&actual) != declared {
        return Err(Error::DigestMismatch("Invalid Body digest".to_owned()));
    }
    tracing::debug!("body digest verified");

    // Signature over SignedInfo.
    let signature_method =
        require_child_element(signed_info, ns::DSIG, ns::node::SIGNATURE_METHOD)?;
    let signature_uri = signature_method
        .attribute(ns::attr::ALGORITHM)
        .ok_or_else(|| {
            Error::MissingAttribute(format!(
                "{} on {}",
                ns::attr::ALGORITHM,
                ns::node::SIGNATURE_METHOD
            ))
        })?;
    let method_name = algorithm::signature_name(signature_uri)?;
    // Combined GOST identifiers address the provider by their digest.
    let verifier = crypto_sign::from_name(algorithm::reduce_signature_to_digest(method_name))?;

    let c14n_method =
        require_child_element(signed_info, ns::DSIG, ns::node::CANONICALIZATION_METHOD)?;
    let (mode, prefixes) = transforms::read_c14n_method(c14n_method)?;
    let canonical = smevsec_c14n::canonicalize(&doc, signed_info, mode, &prefixes, &[])?;

    let sig_b64: String = require_text(signature_value)?.split_whitespace().collect();
    let sig_bytes = BASE64
        .decode(sig_b64.as_bytes())
        .map_err(|e| Error::Base64(format!("SignatureValue: {e}")))?;

    let cert = x509::load_cert_base64(&token_b64)?;
    let public_key = x509::public_key(&cert)?;
    if !verifier.verify(&public_key, &canonical, &sig_bytes)? {
        return Err(Error::SignatureInvalid(
            "SignedInfo signature does not match".to_owned(),
        ));
    }
    tracing::debug!(signature_method = method_name, "signature verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_envelope_is_missing_the_security_element() {
        let xml = format!(
            r#"<e:Envelope xmlns:e="{}"><e:Body/></e:Envelope>"#,
            ns::SOAPENV
        );
        let err = verify_envelope(&xml, "AAAA").unwrap_err();
        match err {
            Error::MissingElement(name) => assert_eq!(name, ns::node::SECURITY),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn security_without_a_token_names_the_missing_element() {
        let xml = format!(
            r#"<e:Envelope xmlns:e="{soap}" xmlns:wsse="{wsse}">
                 <e:Header><wsse:Security/></e:Header><e:Body/>
               </e:Envelope>"#,
            soap = ns::SOAPENV,
            wsse = ns::WSSE,
        );
        let err = verify_envelope(&xml, "AAAA").unwrap_err();
        match err {
            Error::MissingElement(name) => {
                assert!(name.contains(ns::node::BINARY_SECURITY_TOKEN))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
