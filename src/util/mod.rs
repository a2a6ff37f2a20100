//! Utility types and functions shared by the decoders.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - [`ByteReader`] - Bounds-checked little-endian cursor
//! - Math types ([`BBox3f`], [`Transform`]) and glam re-exports

mod error;
mod math;
mod read;

pub use error::*;
pub use math::*;
pub use read::*;
