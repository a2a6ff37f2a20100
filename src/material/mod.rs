//! Material list decoding.
//!
//! Materials live in the package's `ProteinMaterials` asset. Position in the
//! decoded sequence is the material id referenced by fragments, so entries
//! this decoder cannot translate are kept as
//! [`MaterialEntry::Unrecognized`] instead of being dropped.
//!
//! ## Example
//!
//! ```ignore
//! use svf::material;
//!
//! for entry in material::decode(bytes)? {
//!     if let Some(m) = entry?.as_material() {
//!         println!("diffuse {:?}, opacity {}", m.diffuse, m.opacity);
//!     }
//! }
//! ```

pub mod protein;
mod schema;

pub use protein::{collect, decode, decode_with, Materials};
pub use schema::*;
