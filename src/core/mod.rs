//! Core services shared by all decoders.
//!
//! - [`compression`] - Transparent gzip/zlib inflation
//! - [`DecodeOptions`] / [`DecodeLimits`] - Decoder configuration

pub mod compression;
mod options;

pub use options::*;
