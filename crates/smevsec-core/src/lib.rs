#![forbid(unsafe_code)]

//! Core types for the smevsec WS-Security library.

pub mod algorithm;
pub mod error;
pub mod ns;

pub use error::{Error, Result};
