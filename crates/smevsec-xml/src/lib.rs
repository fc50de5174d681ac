#![forbid(unsafe_code)]

//! XML plumbing for the smevsec library.
//!
//! Parsed trees are read-only; every mutation goes through [`edit`],
//! which splices the serialized text at byte offsets taken from the
//! parsed tree and leaves untouched regions byte-for-byte intact.

pub mod document;
pub mod edit;
pub mod writer;

pub use document::XmlDocument;
pub use writer::FragmentWriter;
