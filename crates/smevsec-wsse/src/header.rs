#![forbid(unsafe_code)]

//! Security header construction.
//!
//! Builds the `wsse:Security` fragment inserted under the SOAP Header:
//! a BinarySecurityToken carrying the certificate and a `ds:Signature`
//! skeleton whose DigestValue and SignatureValue are left empty for the
//! signing pipeline to fill in.

use smevsec_core::{algorithm, ns, Result};
use smevsec_xml::FragmentWriter;
use uuid::Uuid;

/// Reference URI placeholder replaced with the real Body id by the
/// signing pipeline.
pub const BODY_URI_PLACEHOLDER: &str = "#body";

/// A fresh BinarySecurityToken id.
pub fn new_token_id() -> String {
    format!("CertId-{}", Uuid::new_v4().simple())
}

/// A fresh Body id.
pub fn new_body_id() -> String {
    format!("Id-{}", Uuid::new_v4())
}

/// Build the `wsse:Security` header fragment for a certificate.
///
/// `cert_b64` is the certificate's bare base64 body (PEM markers and
/// line breaks stripped).  The digest and signature method names are
/// resolved against the registry before anything is written, so an
/// unknown name fails without producing a partial header.
pub fn build_security_header(
    cert_b64: &str,
    token_id: &str,
    digest_method: &str,
    signature_method: &str,
    actor: &str,
) -> Result<String> {
    let digest_uri = algorithm::digest_uri(digest_method)?;
    let signature_uri = algorithm::signature_uri(signature_method)?;

    let security = format!("{}:{}", ns::prefix::WSSE, ns::node::SECURITY);
    let token = format!("{}:{}", ns::prefix::WSSE, ns::node::BINARY_SECURITY_TOKEN);
    let token_ref = format!("{}:{}", ns::prefix::WSSE, ns::node::SECURITY_TOKEN_REFERENCE);
    let wsse_reference = format!("{}:{}", ns::prefix::WSSE, ns::node::REFERENCE);
    let wsu_id = format!("{}:{}", ns::prefix::WSU, ns::attr::ID);
    let soapenv_actor = format!("{}:{}", ns::prefix::SOAPENV, ns::attr::ACTOR);
    let ds = |local: &str| format!("{}:{local}", ns::prefix::DSIG);

    let mut w = FragmentWriter::new();
    w.start_element(
        &security,
        &[
            (&format!("xmlns:{}", ns::prefix::SOAPENV), ns::SOAPENV),
            (&format!("xmlns:{}", ns::prefix::WSSE), ns::WSSE),
            (&format!("xmlns:{}", ns::prefix::WSU), ns::WSU),
            (&format!("xmlns:{}", ns::prefix::DSIG), ns::DSIG),
            (&soapenv_actor, actor),
        ],
    );

    w.start_element(
        &token,
        &[
            (ns::attr::ENCODING_TYPE, ns::ENCODING_BASE64),
            (ns::attr::VALUE_TYPE, ns::VALUE_X509V3),
            (&wsu_id, token_id),
        ],
    );
    w.text(cert_b64);
    w.end_element(&token);

    w.start_element(&ds(ns::node::SIGNATURE), &[]);
    w.start_element(&ds(ns::node::SIGNED_INFO), &[]);
    w.start_element(
        &ds(ns::node::CANONICALIZATION_METHOD),
        &[(ns::attr::ALGORITHM, algorithm::EXC_C14N)],
    );
    w.end_element(&ds(ns::node::CANONICALIZATION_METHOD));
    w.start_element(
        &ds(ns::node::SIGNATURE_METHOD),
        &[(ns::attr::ALGORITHM, signature_uri)],
    );
    w.end_element(&ds(ns::node::SIGNATURE_METHOD));

    w.start_element(
        &ds(ns::node::REFERENCE),
        &[(ns::attr::URI, BODY_URI_PLACEHOLDER)],
    );
    w.start_element(&ds(ns::node::TRANSFORMS), &[]);
    w.start_element(
        &ds(ns::node::TRANSFORM),
        &[(ns::attr::ALGORITHM, algorithm::ENVELOPED_SIGNATURE)],
    );
    w.end_element(&ds(ns::node::TRANSFORM));
    w.start_element(
        &ds(ns::node::TRANSFORM),
        &[(ns::attr::ALGORITHM, algorithm::EXC_C14N)],
    );
    w.end_element(&ds(ns::node::TRANSFORM));
    w.end_element(&ds(ns::node::TRANSFORMS));
    w.start_element(
        &ds(ns::node::DIGEST_METHOD),
        &[(ns::attr::ALGORITHM, digest_uri)],
    );
    w.end_element(&ds(ns::node::DIGEST_METHOD));
    w.start_element(&ds(ns::node::DIGEST_VALUE), &[]);
    w.end_element(&ds(ns::node::DIGEST_VALUE));
    w.end_element(&ds(ns::node::REFERENCE));
    w.end_element(&ds(ns::node::SIGNED_INFO));

    w.start_element(&ds(ns::node::SIGNATURE_VALUE), &[]);
    w.end_element(&ds(ns::node::SIGNATURE_VALUE));

    w.start_element(&ds(ns::node::KEY_INFO), &[]);
    w.start_element(&token_ref, &[]);
    w.start_element(
        &wsse_reference,
        &[
            (ns::attr::URI, &format!("#{token_id}")),
            (ns::attr::VALUE_TYPE, ns::VALUE_X509V3),
        ],
    );
    w.end_element(&wsse_reference);
    w.end_element(&token_ref);
    w.end_element(&ds(ns::node::KEY_INFO));
    w.end_element(&ds(ns::node::SIGNATURE));

    w.end_element(&security);
    Ok(w.into_string())
}
