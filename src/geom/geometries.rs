//! Geometry metadata list decoder.
//!
//! One entry per geometry; the position of an entry in the list is the
//! geometry id referenced by fragments.

use std::ops::RangeInclusive;

use bytes::Bytes;
use tracing::trace;

use crate::core::DecodeLimits;
use crate::pack::{check_version, EntryType, PackFile, Records};
use crate::util::{BBox3f, ByteReader, Error, Result};

/// Geometry metadata record versions understood by the decoder.
pub const GEOMETRY_VERSIONS: RangeInclusive<u32> = 1..=4;

/// Geometry flag: primitives are line segments.
pub const GEOMETRY_LINES: u8 = 0x01;

/// Geometry flag: primitives are points.
pub const GEOMETRY_POINTS: u8 = 0x02;

/// Geometry flag: lines carry a width.
pub const GEOMETRY_WIDE_LINES: u8 = 0x04;

/// Lazy sequence of geometry metadata.
pub type Geometries = Records<GeometryMetadata>;

/// Summary of one geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryMetadata {
    /// Geometry id (position in the list).
    pub id: u32,
    /// Fragment type flags.
    pub flags: u8,
    /// Number of primitives (triangles, segments or points).
    pub primitive_count: u16,
    /// Number of the mesh pack holding the geometry (`{pack_id}.pf`).
    pub pack_id: u32,
    /// Entry index inside that pack.
    pub entity_id: u32,
    /// Topology id, version 3 and later.
    pub topology_id: Option<i32>,
    /// Local bounding box, version 4 and later.
    pub bounds: Option<BBox3f>,
}

impl GeometryMetadata {
    #[inline]
    pub fn is_lines(&self) -> bool {
        self.flags & GEOMETRY_LINES != 0
    }

    #[inline]
    pub fn is_points(&self) -> bool {
        self.flags & GEOMETRY_POINTS != 0
    }

    #[inline]
    pub fn is_mesh(&self) -> bool {
        !self.is_lines() && !self.is_points()
    }

    /// URI of the mesh pack holding this geometry.
    pub fn pack_uri(&self) -> String {
        format!("{}.pf", self.pack_id)
    }
}

/// Decode a geometry metadata list lazily.
pub fn decode(data: Bytes) -> Result<Geometries> {
    decode_with(data, &DecodeLimits::default())
}

/// Decode a geometry metadata list lazily with explicit limits.
pub fn decode_with(data: Bytes, limits: &DecodeLimits) -> Result<Geometries> {
    let pack = PackFile::parse(data, limits)?;
    Ok(Records::new(pack, decode_geometry))
}

/// Decode and gather all geometry metadata.
pub fn collect(data: Bytes) -> Result<Vec<GeometryMetadata>> {
    decode(data)?.collect()
}

fn decode_geometry(index: usize, ty: &EntryType, r: &mut ByteReader<'_>) -> Result<GeometryMetadata> {
    check_version("geometry metadata", ty.version, &GEOMETRY_VERSIONS)?;

    let flags = r.read_u8()?;
    r.skip(3)?;
    let primitive_count = r.read_u16()?;
    let pack = r.read_string()?;
    let pack_id = pack
        .parse::<u32>()
        .map_err(|_| Error::invalid(format!("geometry {} has non-numeric pack id '{}'", index, pack)))?;
    let entity_id = r.read_varint()?;
    let topology_id = if ty.version > 2 { Some(r.read_i32()?) } else { None };
    let bounds = if ty.version > 3 {
        let mut bbox = [0.0f32; 6];
        for v in bbox.iter_mut() {
            *v = r.read_f32()?;
        }
        Some(BBox3f::from_array(bbox))
    } else {
        None
    };

    trace!(index, pack_id, entity_id, primitive_count, "geometry");
    Ok(GeometryMetadata {
        id: index as u32,
        flags,
        primitive_count,
        pack_id,
        entity_id,
        topology_id,
        bounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{geometry_list, geometry_record, put_string, put_varint, PackWriter, GEOMETRY_METADATA_LIST};

    #[test]
    fn test_decode_geometries() {
        let data = geometry_list(&[
            geometry_record(0, 12, 0, 0, [0.0, 0.0, 0.0, 1.0, 1.0, 1.0]),
            geometry_record(GEOMETRY_LINES, 4, 1, 7, [0.0; 6]),
        ]);
        let geoms = collect(Bytes::from(data)).unwrap();
        assert_eq!(geoms.len(), 2);

        assert_eq!(geoms[0].id, 0);
        assert!(geoms[0].is_mesh());
        assert_eq!(geoms[0].primitive_count, 12);
        assert_eq!(geoms[0].pack_uri(), "0.pf");
        assert_eq!(geoms[0].topology_id, Some(0));
        assert!(geoms[0].bounds.is_some());

        assert_eq!(geoms[1].id, 1);
        assert!(geoms[1].is_lines());
        assert_eq!(geoms[1].entity_id, 7);
        assert_eq!(geoms[1].pack_uri(), "1.pf");
    }

    #[test]
    fn test_version_two_layout() {
        let mut rec = vec![0x02, 0, 0, 0];
        rec.extend_from_slice(&3u16.to_le_bytes());
        put_string(&mut rec, "5");
        put_varint(&mut rec, 2);

        let mut w = PackWriter::new(GEOMETRY_METADATA_LIST, 1);
        let ty = w.add_type("GeometryMetadataList", "GeometryMetadata", 2);
        w.add_entry(ty, &rec);
        let geoms = collect(Bytes::from(w.finish())).unwrap();

        assert!(geoms[0].is_points());
        assert_eq!(geoms[0].pack_id, 5);
        assert_eq!(geoms[0].topology_id, None);
        assert_eq!(geoms[0].bounds, None);
    }

    #[test]
    fn test_bad_pack_id() {
        let mut rec = vec![0, 0, 0, 0, 1, 0];
        put_string(&mut rec, "x1");
        put_varint(&mut rec, 0);

        let mut w = PackWriter::new(GEOMETRY_METADATA_LIST, 1);
        let ty = w.add_type("GeometryMetadataList", "GeometryMetadata", 1);
        w.add_entry(ty, &rec);
        assert!(matches!(collect(Bytes::from(w.finish())), Err(Error::InvalidRecord(_))));
    }
}
