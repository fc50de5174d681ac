#![forbid(unsafe_code)]

pub use smevsec_c14n as c14n;
pub use smevsec_core as core;
pub use smevsec_crypto as crypto;
pub use smevsec_wsse as wsse;
pub use smevsec_xml as xml;

pub use smevsec_core::{Error, Result};
pub use smevsec_wsse::{sign_envelope, verify_envelope, X509TokenProfile};
