#![forbid(unsafe_code)]

//! The X.509 Token Profile as a configured unit: one certificate, one
//! private key, one digest choice, one actor.  This is the surface a
//! SOAP stack plugs in at its serialize/parse extension points.

use crate::{sign, verify};
use smevsec_core::{ns, Result};

/// WS-Security X.509 Token Profile configuration.
pub struct X509TokenProfile {
    cert_pem: String,
    key_pem: Vec<u8>,
    passphrase: Option<String>,
    digest_method: String,
    actor: String,
}

impl X509TokenProfile {
    /// A profile over a certificate and its private key, with the
    /// profile defaults: `sha1` Body digest, SMEV gateway actor.
    pub fn new(cert_pem: impl Into<String>, key_pem: impl Into<Vec<u8>>) -> Self {
        Self {
            cert_pem: cert_pem.into(),
            key_pem: key_pem.into(),
            passphrase: None,
            digest_method: "sha1".to_owned(),
            actor: ns::SMEV_ACTOR.to_owned(),
        }
    }

    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(passphrase.into());
        self
    }

    pub fn with_digest_method(mut self, digest_method: impl Into<String>) -> Self {
        self.digest_method = digest_method.into();
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    /// Sign an outgoing envelope.  Errors propagate to the caller; the
    /// profile never falls back to returning the envelope unsigned.
    pub fn apply(&self, envelope: &str) -> Result<String> {
        sign::sign_envelope(
            envelope,
            &self.cert_pem,
            &self.key_pem,
            self.passphrase.as_deref(),
            &self.digest_method,
            &self.actor,
        )
    }

    /// Verify an incoming envelope against this profile's certificate.
    pub fn validate(&self, envelope: &str) -> Result<()> {
        verify::verify_envelope(envelope, &self.cert_pem)
    }
}
