#![forbid(unsafe_code)]

//! The signing pipeline.
//!
//! Works on a private copy of the envelope text through a sequence of
//! splice-and-reparse steps: ensure a Header, give the Body a `wsu:Id`,
//! insert the Security header, fill `DigestValue`, then canonicalize
//! `SignedInfo` and fill `SignatureValue`.  Any failure aborts the whole
//! operation; the caller's input string is never modified.

use crate::{header, transforms};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use smevsec_core::{algorithm, ns, Error, Result};
use smevsec_crypto::sign::SignatureAlgorithm;
use smevsec_crypto::{digest, keys, sign as crypto_sign, x509, SigningKey};
use smevsec_xml::document::{
    element_prefix, find_child_element, find_element, require_child_element,
};
use smevsec_xml::{edit, XmlDocument};

/// Sign a SOAP envelope per the X.509 Token Profile.
///
/// The signature method is inferred from the certificate's own declared
/// algorithm; `digest_method` picks the Body digest (the profile
/// default is `sha1`).  Returns the signed envelope as a new string.
pub fn sign_envelope(
    envelope: &str,
    cert_pem: &str,
    key_pem: &[u8],
    passphrase: Option<&str>,
    digest_method: &str,
    actor: &str,
) -> Result<String> {
    // Resolve every algorithm and load the key material before touching
    // the document, so unsupported inputs fail with nothing built.
    algorithm::digest_uri(digest_method)?;
    let cert = x509::load_cert_pem(cert_pem.as_bytes())?;
    let signature_method = x509::signature_method_name(&cert)?;
    // Combined GOST identifiers address the provider by their digest.
    let signer = crypto_sign::from_name(algorithm::reduce_signature_to_digest(signature_method))?;
    let key = keys::load_private_key_pem(key_pem, passphrase)?;
    if !key.can_sign() {
        return Err(Error::Key("a private key is required for signing".into()));
    }

    let mut xdoc = XmlDocument::parse(envelope.to_owned())?;
    xdoc.add_id_attr(ns::WSU, ns::attr::ID);

    ensure_header(&mut xdoc)?;
    let body_id = ensure_body_id(&mut xdoc)?;
    ensure_security(
        &mut xdoc,
        cert_pem,
        digest_method,
        signature_method,
        actor,
        &body_id,
    )?;
    fill_digest(&mut xdoc)?;
    fill_signature(&mut xdoc, &key, signer.as_ref())?;

    tracing::debug!(signature_method, digest_method, "envelope signed");
    Ok(xdoc.text().to_owned())
}

fn envelope_root<'a>(doc: &'a roxmltree::Document<'a>) -> Result<roxmltree::Node<'a, 'a>> {
    let root = doc.root_element();
    if root.tag_name().name() == ns::node::ENVELOPE
        && root.tag_name().namespace() == Some(ns::SOAPENV)
    {
        Ok(root)
    } else {
        Err(Error::XmlStructure(
            "document root is not a SOAP 1.1 Envelope".to_owned(),
        ))
    }
}

/// Create an empty `Header` as the first child of the envelope when the
/// document has none, reusing the envelope's own namespace prefix.
fn ensure_header(xdoc: &mut XmlDocument) -> Result<()> {
    let new_text = {
        let doc = xdoc.parse_doc()?;
        let root = envelope_root(&doc)?;
        if find_child_element(root, ns::SOAPENV, ns::node::HEADER).is_some() {
            return Ok(());
        }
        let qname = match element_prefix(xdoc.text(), root) {
            Some(p) => format!("{p}:{}", ns::node::HEADER),
            None => ns::node::HEADER.to_owned(),
        };
        edit::insert_first_child(xdoc.text(), root, &format!("<{qname}></{qname}>"))?
    };
    xdoc.replace_text(new_text)
}

/// Make sure the Body carries a `wsu:Id` and return it.  An existing id
/// is kept; otherwise a fresh one is assigned, declaring the utility
/// namespace on the Body when no prefix for it is in scope.
fn ensure_body_id(xdoc: &mut XmlDocument) -> Result<String> {
    let mut wsu_prefix: Option<String> = None;
    let needs_decl = {
        let doc = xdoc.parse_doc()?;
        let root = envelope_root(&doc)?;
        let body = require_child_element(root, ns::SOAPENV, ns::node::BODY)?;
        if let Some(id) = body.attribute((ns::WSU, ns::attr::ID)) {
            return Ok(id.to_owned());
        }
        wsu_prefix = body
            .namespaces()
            .find(|n| n.uri() == ns::WSU && n.name().is_some())
            .and_then(|n| n.name().map(str::to_owned));
        wsu_prefix.is_none()
    };

    if needs_decl {
        let new_text = {
            let doc = xdoc.parse_doc()?;
            let root = envelope_root(&doc)?;
            let body = require_child_element(root, ns::SOAPENV, ns::node::BODY)?;
            edit::set_attribute(
                xdoc.text(),
                body,
                &format!("xmlns:{}", ns::prefix::WSU),
                ns::WSU,
            )?
        };
        xdoc.replace_text(new_text)?;
    }

    let body_id = header::new_body_id();
    let attr_qname = format!(
        "{}:{}",
        wsu_prefix.as_deref().unwrap_or(ns::prefix::WSU),
        ns::attr::ID
    );
    let new_text = {
        let doc = xdoc.parse_doc()?;
        let root = envelope_root(&doc)?;
        let body = require_child_element(root, ns::SOAPENV, ns::node::BODY)?;
        edit::set_attribute(xdoc.text(), body, &attr_qname, &body_id)?
    };
    xdoc.replace_text(new_text)?;
    Ok(body_id)
}

/// Insert a freshly built Security header unless one is already present,
/// then point the `Reference/@URI` placeholder at the real Body id.
fn ensure_security(
    xdoc: &mut XmlDocument,
    cert_pem: &str,
    digest_method: &str,
    signature_method: &str,
    actor: &str,
    body_id: &str,
) -> Result<()> {
    let inserted = {
        let doc = xdoc.parse_doc()?;
        if find_element(&doc, ns::WSSE, ns::node::SECURITY).is_some() {
            None
        } else {
            let cert_b64 = x509::clean_cert_data(cert_pem);
            let token_id = header::new_token_id();
            let fragment = header::build_security_header(
                &cert_b64,
                &token_id,
                digest_method,
                signature_method,
                actor,
            )?;
            let root = envelope_root(&doc)?;
            let hdr = require_child_element(root, ns::SOAPENV, ns::node::HEADER)?;
            tracing::debug!(%token_id, "security header built");
            Some(edit::insert_first_child(xdoc.text(), hdr, &fragment)?)
        }
    };
    if let Some(text) = inserted {
        xdoc.replace_text(text)?;
    }

    let placeholder = format!(
        "{}=\"{}\"",
        ns::attr::URI,
        header::BODY_URI_PLACEHOLDER
    );
    if xdoc.text().contains(&placeholder) {
        let filled = xdoc.text().replacen(
            &placeholder,
            &format!("{}=\"#{body_id}\"", ns::attr::URI),
            1,
        );
        xdoc.replace_text(filled)?;
    }
    Ok(())
}

fn signed_info<'a>(doc: &'a roxmltree::Document<'a>) -> Result<roxmltree::Node<'a, 'a>> {
    let security = find_element(doc, ns::WSSE, ns::node::SECURITY)
        .ok_or_else(|| Error::MissingElement(ns::node::SECURITY.to_owned()))?;
    let signature = require_child_element(security, ns::DSIG, ns::node::SIGNATURE)?;
    require_child_element(signature, ns::DSIG, ns::node::SIGNED_INFO)
}

/// Subtree roots the enveloped-signature transform removes: every
/// `ds:Signature` inside the referenced element.
pub(crate) fn enveloped_exclusions(target: roxmltree::Node<'_, '_>) -> Vec<roxmltree::NodeId> {
    target
        .descendants()
        .filter(|n| {
            n.is_element()
                && n.tag_name().name() == ns::node::SIGNATURE
                && n.tag_name().namespace() == Some(ns::DSIG)
        })
        .map(|n| n.id())
        .collect()
}

/// Canonicalize the referenced element under its declared transform
/// chain and compute the digest named by `DigestMethod`.
pub(crate) fn reference_digest(
    xdoc: &XmlDocument,
    doc: &roxmltree::Document<'_>,
    reference: roxmltree::Node<'_, '_>,
) -> Result<Vec<u8>> {
    let uri = reference
        .attribute(ns::attr::URI)
        .ok_or_else(|| {
            Error::MissingAttribute(format!("{} on {}", ns::attr::URI, ns::node::REFERENCE))
        })?;
    let id = uri.strip_prefix('#').ok_or_else(|| {
        Error::XmlStructure(format!("unsupported non-local reference URI: {uri}"))
    })?;
    let id_map = xdoc.build_id_map(doc);
    let target = XmlDocument::find_by_id(doc, &id_map, id)
        .ok_or_else(|| Error::XmlStructure(format!("no element with id {id}")))?;

    let chain = transforms::read_transforms(reference)?;
    let excluded = if chain.enveloped {
        enveloped_exclusions(target)
    } else {
        Vec::new()
    };
    let canonical = smevsec_c14n::canonicalize(
        doc,
        target,
        chain.c14n,
        &chain.inclusive_prefixes,
        &excluded,
    )?;

    let digest_method = require_child_element(reference, ns::DSIG, ns::node::DIGEST_METHOD)?;
    let digest_uri = digest_method.attribute(ns::attr::ALGORITHM).ok_or_else(|| {
        Error::MissingAttribute(format!(
            "{} on {}",
            ns::attr::ALGORITHM,
            ns::node::DIGEST_METHOD
        ))
    })?;
    digest::digest(algorithm::digest_name(digest_uri)?, &canonical)
}

fn fill_digest(xdoc: &mut XmlDocument) -> Result<()> {
    let digest_b64 = {
        let doc = xdoc.parse_doc()?;
        let signed_info = signed_info(&doc)?;
        let reference = require_child_element(signed_info, ns::DSIG, ns::node::REFERENCE)?;
        BASE64.encode(reference_digest(xdoc, &doc, reference)?)
    };
    let empty = empty_element(ns::node::DIGEST_VALUE);
    let filled = xdoc.text().replacen(
        &empty,
        &filled_element(ns::node::DIGEST_VALUE, &digest_b64),
        1,
    );
    xdoc.replace_text(filled)
}

fn fill_signature(
    xdoc: &mut XmlDocument,
    key: &SigningKey,
    signer: &dyn SignatureAlgorithm,
) -> Result<()> {
    let signature_b64 = {
        let doc = xdoc.parse_doc()?;
        let signed_info = signed_info(&doc)?;
        let method =
            require_child_element(signed_info, ns::DSIG, ns::node::CANONICALIZATION_METHOD)?;
        let (mode, prefixes) = transforms::read_c14n_method(method)?;
        let canonical = smevsec_c14n::canonicalize(&doc, signed_info, mode, &prefixes, &[])?;
        BASE64.encode(signer.sign(key, &canonical)?)
    };
    let empty = empty_element(ns::node::SIGNATURE_VALUE);
    let filled = xdoc.text().replacen(
        &empty,
        &filled_element(ns::node::SIGNATURE_VALUE, &signature_b64),
        1,
    );
    xdoc.replace_text(filled)
}

fn empty_element(local: &str) -> String {
    let p = ns::prefix::DSIG;
    format!("<{p}:{local}></{p}:{local}>")
}

fn filled_element(local: &str, value: &str) -> String {
    let p = ns::prefix::DSIG;
    format!("<{p}:{local}>{value}</{p}:{local}>")
}
