//! Geometry record decoders.
//!
//! - [`fragments`] - Placed instances (fragment list)
//! - [`geometries`] - Per-geometry summaries (geometry metadata list)
//! - [`meshes`] - Mesh, line and point data (numbered mesh packs)
//!
//! Every decoder takes a resolved buffer and returns a lazy
//! [`Records`](crate::pack::Records) sequence; `collect` gathers it.

pub mod fragments;
pub mod geometries;
pub mod meshes;
mod openctm;

pub use fragments::{Fragment, Fragments};
pub use geometries::{Geometries, GeometryMetadata};
pub use meshes::{Lines, Mesh, MeshPack, MeshPackEntry, Points, UvMap};
