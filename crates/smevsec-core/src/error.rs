#![forbid(unsafe_code)]

/// Errors produced by the smevsec WS-Security library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    #[error("invalid XML structure: {0}")]
    XmlStructure(String),

    #[error("missing required element: {0}")]
    MissingElement(String),

    #[error("missing required attribute: {0}")]
    MissingAttribute(String),

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("cryptographic error: {0}")]
    Crypto(String),

    #[error("key error: {0}")]
    Key(String),

    #[error("certificate error: {0}")]
    Certificate(String),

    #[error("base64 decode error: {0}")]
    Base64(String),

    #[error("digest mismatch: {0}")]
    DigestMismatch(String),

    #[error("signature verification failed: {0}")]
    SignatureInvalid(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the two "verification ran and the content did not match"
    /// outcomes, as opposed to failures that prevented the check from
    /// running at all (bad key, bad certificate, unknown algorithm).
    pub fn is_invalid_signature(&self) -> bool {
        matches!(self, Error::DigestMismatch(_) | Error::SignatureInvalid(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
