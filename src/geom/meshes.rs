//! Mesh pack decoder.
//!
//! A mesh pack (`{n}.pf`) holds a batch of triangle meshes, line sets and
//! point sets. Entries whose class is not recognized are kept as
//! [`MeshPackEntry::Unrecognized`] so entity ids stay positional.

use std::ops::RangeInclusive;

use bytes::Bytes;
use tracing::{trace, warn};

use super::openctm::{read_openctm, CtmBody};
pub use super::openctm::{Mesh, UvMap};
use crate::core::DecodeLimits;
use crate::pack::{check_version, EntryType, PackFile, Records, LINES_CLASS, OPENCTM_CLASS, POINTS_CLASS};
use crate::util::{ByteReader, Error, Result, Vec3};

/// Line and point record versions understood by the decoder.
pub const LINES_VERSIONS: RangeInclusive<u32> = 2..=3;
pub const POINTS_VERSIONS: RangeInclusive<u32> = 2..=3;

/// Lazy sequence of mesh pack entries.
pub type MeshPack = Records<MeshPackEntry>;

/// Line segments.
#[derive(Clone, Debug, PartialEq)]
pub struct Lines {
    pub positions: Vec<Vec3>,
    pub colors: Option<Vec<Vec3>>,
    /// Segment list, two indices per segment.
    pub indices: Vec<u16>,
    pub line_width: f32,
}

impl Lines {
    /// Get number of segments.
    pub fn num_segments(&self) -> usize {
        self.indices.len() / 2
    }
}

/// Point set.
#[derive(Clone, Debug, PartialEq)]
pub struct Points {
    pub positions: Vec<Vec3>,
    pub colors: Option<Vec<Vec3>>,
    pub indices: Vec<u16>,
    pub point_size: f32,
}

/// One entry of a mesh pack.
#[derive(Clone, Debug, PartialEq)]
pub enum MeshPackEntry {
    Mesh(Mesh),
    Lines(Lines),
    Points(Points),
    /// Entry of a class (or encoding) this decoder does not handle.
    Unrecognized { class: String },
}

impl MeshPackEntry {
    /// Check if the entry is a placeholder.
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Unrecognized { .. })
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match self {
            Self::Mesh(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_lines(&self) -> Option<&Lines> {
        match self {
            Self::Lines(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_points(&self) -> Option<&Points> {
        match self {
            Self::Points(p) => Some(p),
            _ => None,
        }
    }
}

/// Decode a mesh pack lazily.
pub fn decode(data: Bytes) -> Result<MeshPack> {
    decode_with(data, &DecodeLimits::default())
}

/// Decode a mesh pack lazily with explicit limits.
pub fn decode_with(data: Bytes, limits: &DecodeLimits) -> Result<MeshPack> {
    let pack = PackFile::parse(data, limits)?;
    Ok(Records::new(pack, decode_entry))
}

/// Decode and gather all mesh pack entries.
pub fn collect(data: Bytes) -> Result<Vec<MeshPackEntry>> {
    decode(data)?.collect()
}

fn decode_entry(index: usize, ty: &EntryType, r: &mut ByteReader<'_>) -> Result<MeshPackEntry> {
    let entry = match ty.class.as_str() {
        OPENCTM_CLASS => match read_openctm(r)? {
            CtmBody::Mesh(mesh) => MeshPackEntry::Mesh(mesh),
            CtmBody::Unsupported(method) => {
                warn!(index, method = %method, "skipping OpenCTM entry with unsupported method");
                MeshPackEntry::Unrecognized { class: format!("{}/{}", ty.class, method) }
            }
        },
        LINES_CLASS => {
            check_version("lines", ty.version, &LINES_VERSIONS)?;
            MeshPackEntry::Lines(read_lines(r, ty.version)?)
        }
        POINTS_CLASS => {
            check_version("points", ty.version, &POINTS_VERSIONS)?;
            MeshPackEntry::Points(read_points(r, ty.version)?)
        }
        other => {
            warn!(index, class = %other, "skipping unrecognized mesh pack entry");
            MeshPackEntry::Unrecognized { class: other.to_string() }
        }
    };
    trace!(index, class = %ty.class, "mesh pack entry");
    Ok(entry)
}

fn check_indices(what: &str, indices: &[u16], vertex_count: usize) -> Result<()> {
    match indices.iter().find(|&&i| i as usize >= vertex_count) {
        Some(bad) => Err(Error::invalid(format!(
            "{} index {} out of range (vertices: {})",
            what, bad, vertex_count
        ))),
        None => Ok(()),
    }
}

fn read_lines(r: &mut ByteReader<'_>, version: u32) -> Result<Lines> {
    let vertex_count = r.read_u16()? as usize;
    let index_count = r.read_u16()? as usize;
    let bounds_count = r.read_u16()? as usize;
    let line_width = if version > 2 { r.read_f32()? } else { 1.0 };
    let has_colors = r.read_u8()? != 0;

    if index_count % 2 != 0 {
        return Err(Error::invalid(format!("odd line index count {}", index_count)));
    }
    let positions = r.read_vec3s(vertex_count)?;
    let colors = if has_colors { Some(r.read_vec3s(vertex_count)?) } else { None };
    let indices = r.read_u16_vec(index_count)?;
    check_indices("line", &indices, vertex_count)?;
    // Polyline bounds are not exposed.
    r.skip(bounds_count * 2)?;

    Ok(Lines { positions, colors, indices, line_width })
}

fn read_points(r: &mut ByteReader<'_>, version: u32) -> Result<Points> {
    let vertex_count = r.read_u16()? as usize;
    let index_count = r.read_u16()? as usize;
    let point_size = if version > 2 { r.read_f32()? } else { 1.0 };
    let has_colors = r.read_u8()? != 0;

    let positions = r.read_vec3s(vertex_count)?;
    let colors = if has_colors { Some(r.read_vec3s(vertex_count)?) } else { None };
    let indices = r.read_u16_vec(index_count)?;
    check_indices("point", &indices, vertex_count)?;

    Ok(Points { positions, colors, indices, point_size })
}
