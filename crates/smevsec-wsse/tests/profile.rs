//! End-to-end sign/verify tests over real RSA key material.

use smevsec_core::{ns, Error};
use smevsec_wsse::{sign_envelope, verify_envelope, X509TokenProfile};
use smevsec_xml::document::{find_element, require_child_element};

const SIGNER_CERT: &str = include_str!("data/signer_cert.pem");
const SIGNER_KEY: &[u8] = include_bytes!("data/signer_key.pem");
const SIGNER_KEY_ENC: &[u8] = include_bytes!("data/signer_key_enc.pem");
const SHA1_CERT: &str = include_str!("data/sha1_cert.pem");
const SHA1_KEY: &[u8] = include_bytes!("data/sha1_key.pem");
const OTHER_CERT: &str = include_str!("data/other_cert.pem");

const ENVELOPE: &str = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"><soapenv:Header/><soapenv:Body><ns1:getWeather xmlns:ns1="urn:weather"><city>Moscow</city></ns1:getWeather></soapenv:Body></soapenv:Envelope>"#;

fn profile() -> X509TokenProfile {
    X509TokenProfile::new(SIGNER_CERT, SIGNER_KEY)
}

#[test]
fn sign_then_verify_round_trips() {
    let signed = profile().apply(ENVELOPE).unwrap();
    profile().validate(&signed).unwrap();
}

#[test]
fn sha1_certificate_round_trips() {
    let signed = X509TokenProfile::new(SHA1_CERT, SHA1_KEY)
        .apply(ENVELOPE)
        .unwrap();
    verify_envelope(&signed, SHA1_CERT).unwrap();
}

#[test]
fn sha256_body_digest_round_trips() {
    let signed = profile()
        .with_digest_method("sha256")
        .apply(ENVELOPE)
        .unwrap();
    profile().validate(&signed).unwrap();
}

#[test]
fn encrypted_key_signs_with_its_passphrase() {
    let signed = X509TokenProfile::new(SIGNER_CERT, SIGNER_KEY_ENC)
        .with_passphrase("correct-horse")
        .apply(ENVELOPE)
        .unwrap();
    verify_envelope(&signed, SIGNER_CERT).unwrap();
}

#[test]
fn envelope_without_a_header_gets_one() {
    let envelope = ENVELOPE.replacen("<soapenv:Header/>", "", 1);
    let signed = profile().apply(&envelope).unwrap();
    profile().validate(&signed).unwrap();
    let doc = roxmltree::Document::parse(&signed).unwrap();
    let header = find_element(&doc, ns::SOAPENV, ns::node::HEADER).unwrap();
    assert!(require_child_element(header, ns::WSSE, ns::node::SECURITY).is_ok());
}

#[test]
fn signed_structure_is_internally_consistent() {
    let signed = profile().apply(ENVELOPE).unwrap();
    let doc = roxmltree::Document::parse(&signed).unwrap();

    let body = find_element(&doc, ns::SOAPENV, ns::node::BODY).unwrap();
    let body_id = body.attribute((ns::WSU, ns::attr::ID)).unwrap();
    assert!(body_id.starts_with("Id-"));

    let reference = find_element(&doc, ns::DSIG, ns::node::REFERENCE).unwrap();
    assert_eq!(
        reference.attribute(ns::attr::URI).unwrap(),
        format!("#{body_id}")
    );

    let token = find_element(&doc, ns::WSSE, ns::node::BINARY_SECURITY_TOKEN).unwrap();
    let token_id = token.attribute((ns::WSU, ns::attr::ID)).unwrap();
    assert!(token_id.starts_with("CertId-"));
    let str_ref = find_element(&doc, ns::WSSE, ns::node::SECURITY_TOKEN_REFERENCE).unwrap();
    let key_ref = require_child_element(str_ref, ns::WSSE, ns::node::REFERENCE).unwrap();
    assert_eq!(
        key_ref.attribute(ns::attr::URI).unwrap(),
        format!("#{token_id}")
    );

    let security = find_element(&doc, ns::WSSE, ns::node::SECURITY).unwrap();
    assert_eq!(
        security.attribute((ns::SOAPENV, ns::attr::ACTOR)),
        Some(ns::SMEV_ACTOR)
    );
}

#[test]
fn custom_actor_is_written_to_the_header() {
    let signed = profile()
        .with_actor("urn:gateway:test")
        .apply(ENVELOPE)
        .unwrap();
    let doc = roxmltree::Document::parse(&signed).unwrap();
    let security = find_element(&doc, ns::WSSE, ns::node::SECURITY).unwrap();
    assert_eq!(
        security.attribute((ns::SOAPENV, ns::attr::ACTOR)),
        Some("urn:gateway:test")
    );
}

#[test]
fn body_tampering_fails_at_the_digest_check() {
    let signed = profile().apply(ENVELOPE).unwrap();
    let tampered = signed.replacen("Moscow", "Madrid", 1);
    let err = profile().validate(&tampered).unwrap_err();
    match err {
        Error::DigestMismatch(msg) => assert_eq!(msg, "Invalid Body digest"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn corrupt_signature_value_fails_at_the_signature_check() {
    let signed = profile().apply(ENVELOPE).unwrap();
    let start = signed.find("<ds:SignatureValue>").unwrap() + "<ds:SignatureValue>".len();
    let first = &signed[start..start + 1];
    let swapped = if first == "A" { "B" } else { "A" };
    let corrupted = format!("{}{}{}", &signed[..start], swapped, &signed[start + 1..]);
    let err = profile().validate(&corrupted).unwrap_err();
    assert!(matches!(err, Error::SignatureInvalid(_)));
    assert!(err.is_invalid_signature());
}

#[test]
fn wrong_certificate_is_an_identity_error_not_a_crypto_one() {
    let signed = profile().apply(ENVELOPE).unwrap();
    let err = verify_envelope(&signed, OTHER_CERT).unwrap_err();
    match err {
        Error::Certificate(msg) => assert_eq!(msg, "Incorrect binary security token"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!Error::Certificate(String::new()).is_invalid_signature());
}

#[test]
fn unknown_digest_method_aborts_signing() {
    let err = profile()
        .with_digest_method("sha3-256")
        .apply(ENVELOPE)
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedAlgorithm(_)));
}

#[test]
fn wrong_passphrase_is_a_key_error() {
    let err = X509TokenProfile::new(SIGNER_CERT, SIGNER_KEY_ENC)
        .with_passphrase("incorrect-horse")
        .apply(ENVELOPE)
        .unwrap_err();
    assert!(matches!(err, Error::Key(_)));
}

#[test]
fn verification_is_idempotent() {
    let signed = profile().apply(ENVELOPE).unwrap();
    profile().validate(&signed).unwrap();
    profile().validate(&signed).unwrap();
}

#[test]
fn signing_twice_keeps_the_existing_security_header() {
    let signed = sign_envelope(
        ENVELOPE,
        SIGNER_CERT,
        SIGNER_KEY,
        None,
        "sha1",
        ns::SMEV_ACTOR,
    )
    .unwrap();
    let twice = profile().apply(&signed).unwrap();
    assert_eq!(twice, signed);
    profile().validate(&twice).unwrap();
    let doc = roxmltree::Document::parse(&signed).unwrap();
    let count = doc
        .descendants()
        .filter(|n| {
            n.is_element()
                && n.tag_name().name() == ns::node::SECURITY
                && n.tag_name().namespace() == Some(ns::WSSE)
        })
        .count();
    assert_eq!(count, 1);
}
