//! # SVF
//!
//! Rust decoder for SVF ("Simple Viewable Format") packages, the
//! multi-asset container used to stream CAD/BIM models.
//!
//! A package is a manifest indexing typed assets: fragment lists, geometry
//! metadata, numbered mesh packs, materials, images and a five-buffer
//! property database. Asset bytes are fetched through a pluggable async
//! [`ByteResolver`](resolver::ByteResolver) and decoded into typed records.
//!
//! ## Modules
//!
//! - [`util`] - Errors, byte cursor, math types
//! - [`core`] - Decompression and decode limits
//! - [`pack`] - Shared pack container layout
//! - [`catalog`] - Manifest and asset lookup
//! - [`geom`] - Fragment, geometry metadata and mesh pack decoders
//! - [`material`] - Material list decoder
//! - [`propdb`] - Property database reader
//! - [`resolver`] - Byte transports
//! - [`package`] - Orchestrating decoder
//!
//! ## Example
//!
//! ```ignore
//! use svf::prelude::*;
//!
//! let pkg = PackageDecoder::open_path("model/output.svfm").await?;
//! for fragment in pkg.enumerate_fragments().await? {
//!     let fragment = fragment?;
//!     println!("geometry {} at {:?}", fragment.geometry_id, fragment.bounds);
//! }
//!
//! let db = pkg.open_property_database().await?;
//! for (attr, value) in db.properties_of(1)? {
//!     println!("{}: {}", attr.label(), value);
//! }
//! ```

pub mod util;
pub mod core;
pub mod pack;
pub mod catalog;
pub mod geom;
pub mod material;
pub mod propdb;
pub mod resolver;
pub mod package;

#[cfg(test)]
mod testutil;

// Re-export commonly used types
pub use catalog::{AssetCatalog, AssetDescriptor, AssetQuery, AssetType, PackageMetadata};
pub use package::PackageDecoder;
pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::catalog::{AssetCatalog, AssetDescriptor, AssetQuery, AssetType, PackageMetadata};
    pub use crate::core::{DecodeLimits, DecodeOptions};
    pub use crate::geom::*;
    pub use crate::material::{Material, MaterialEntry, TextureMap};
    pub use crate::package::PackageDecoder;
    pub use crate::propdb::{AttributeDefinition, AttributeType, ObjectId, PropertyDatabase, PropertyValue};
    pub use crate::resolver::{ByteResolver, LocalResolver, MemoryResolver, ResolveError};
    pub use crate::util::{BBox3f, Error, Result, Transform};
}
