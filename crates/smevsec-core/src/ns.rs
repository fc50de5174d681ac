#![forbid(unsafe_code)]

//! XML namespace constants used across the library.

/// SOAP 1.1 envelope namespace
pub const SOAPENV: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// XML Digital Signature namespace
pub const DSIG: &str = "http://www.w3.org/2000/09/xmldsig#";

/// WS-Security security extensions namespace
pub const WSSE: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";

/// WS-Security utility namespace
pub const WSU: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd";

/// Exclusive C14N namespace
pub const EXC_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";

/// XML namespace
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

/// XMLNS namespace
pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";

// ── WS-Security X.509 Token Profile URIs ─────────────────────────────

/// EncodingType for a base64-encoded BinarySecurityToken
pub const ENCODING_BASE64: &str = "http://docs.oasis-open.org/wss/2004/01/\
oasis-200401-wss-soap-message-security-1.0#Base64Binary";

/// ValueType for an X.509 v3 certificate token
pub const VALUE_X509V3: &str = "http://docs.oasis-open.org/wss/2004/01/\
oasis-200401-wss-x509-token-profile-1.0#X509v3";

/// Default SOAP actor the Security header is addressed to
pub const SMEV_ACTOR: &str = "http://smev.gosuslugi.ru/actors/smev";

// ── Element names ────────────────────────────────────────────────────

pub mod node {
    // SOAP elements
    pub const ENVELOPE: &str = "Envelope";
    pub const HEADER: &str = "Header";
    pub const BODY: &str = "Body";

    // WS-Security elements
    pub const SECURITY: &str = "Security";
    pub const BINARY_SECURITY_TOKEN: &str = "BinarySecurityToken";
    pub const SECURITY_TOKEN_REFERENCE: &str = "SecurityTokenReference";

    // DSig elements
    pub const SIGNATURE: &str = "Signature";
    pub const SIGNED_INFO: &str = "SignedInfo";
    pub const CANONICALIZATION_METHOD: &str = "CanonicalizationMethod";
    pub const SIGNATURE_METHOD: &str = "SignatureMethod";
    pub const SIGNATURE_VALUE: &str = "SignatureValue";
    pub const REFERENCE: &str = "Reference";
    pub const TRANSFORMS: &str = "Transforms";
    pub const TRANSFORM: &str = "Transform";
    pub const DIGEST_METHOD: &str = "DigestMethod";
    pub const DIGEST_VALUE: &str = "DigestValue";
    pub const KEY_INFO: &str = "KeyInfo";

    // Exc C14N
    pub const INCLUSIVE_NAMESPACES: &str = "InclusiveNamespaces";
}

// ── Attribute names ──────────────────────────────────────────────────

pub mod attr {
    pub const ID: &str = "Id";
    pub const URI: &str = "URI";
    pub const ALGORITHM: &str = "Algorithm";
    pub const ACTOR: &str = "actor";
    pub const ENCODING_TYPE: &str = "EncodingType";
    pub const VALUE_TYPE: &str = "ValueType";
    pub const PREFIX_LIST: &str = "PrefixList";
}

// ── Conventional prefixes ────────────────────────────────────────────

pub mod prefix {
    pub const SOAPENV: &str = "soapenv";
    pub const DSIG: &str = "ds";
    pub const WSSE: &str = "wsse";
    pub const WSU: &str = "wsu";
}
