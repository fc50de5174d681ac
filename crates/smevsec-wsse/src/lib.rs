#![forbid(unsafe_code)]

//! WS-Security X.509 Token Profile over XMLDSIG for SOAP envelopes.
//!
//! The signing pipeline inserts a `wsse:Security` header carrying a
//! BinarySecurityToken and a `ds:Signature` over the Body; the
//! verification pipeline checks an envelope against an expected
//! certificate, honouring the algorithms the document declares.

pub mod header;
pub mod profile;
pub mod sign;
pub mod transforms;
pub mod verify;

pub use profile::X509TokenProfile;
pub use sign::sign_envelope;
pub use verify::verify_envelope;
