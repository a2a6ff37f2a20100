//! Fragment list decoder.
//!
//! A fragment is one placed instance of a geometry: which geometry, which
//! material, where it sits and how big it is.

use std::ops::RangeInclusive;

use bytes::Bytes;
use tracing::trace;

use crate::core::DecodeLimits;
use crate::pack::{check_version, EntryType, PackFile, Records};
use crate::util::{BBox3f, ByteReader, Error, Mat3, Result, Transform, Vec3};

/// Fragment record versions understood by the decoder.
pub const FRAGMENT_VERSIONS: RangeInclusive<u32> = 3..=5;

/// Fragment flag: instance is visible by default.
pub const FRAGMENT_VISIBLE: u8 = 0x01;

/// Lazy sequence of fragments.
pub type Fragments = Records<Fragment>;

/// One placed instance of a geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    /// Index into the geometry metadata list.
    pub geometry_id: u32,
    /// Index into the material list, if any.
    pub material_id: Option<u32>,
    /// Placement, `None` for identity.
    pub transform: Option<Transform>,
    /// Raw flag byte.
    pub flags: u8,
    /// World-space bounding box.
    pub bounds: BBox3f,
    /// Object id in the property database.
    pub db_id: u32,
}

impl Fragment {
    /// Whether the fragment is visible by default.
    #[inline]
    pub fn visible(&self) -> bool {
        self.flags & FRAGMENT_VISIBLE != 0
    }
}

/// Decode a fragment list lazily.
pub fn decode(data: Bytes) -> Result<Fragments> {
    decode_with(data, &DecodeLimits::default())
}

/// Decode a fragment list lazily with explicit limits.
pub fn decode_with(data: Bytes, limits: &DecodeLimits) -> Result<Fragments> {
    let pack = PackFile::parse(data, limits)?;
    Ok(Records::new(pack, decode_fragment))
}

/// Decode and gather all fragments.
pub fn collect(data: Bytes) -> Result<Vec<Fragment>> {
    decode(data)?.collect()
}

fn read_transform(r: &mut ByteReader<'_>) -> Result<Option<Transform>> {
    let kind = r.read_u8()?;
    let transform = match kind {
        0 => Transform::Translation(r.read_vec3()?),
        1 => {
            let rotation = r.read_quat()?;
            let translation = r.read_vec3()?;
            Transform::RotationTranslation { rotation, translation }
        }
        2 => {
            let scale = r.read_f32()?;
            let rotation = r.read_quat()?;
            let translation = r.read_vec3()?;
            Transform::UniformScaleRotationTranslation { scale, rotation, translation }
        }
        3 => {
            let cols = r.read_f32_vec(9)?;
            let mut m = [0.0f32; 9];
            m.copy_from_slice(&cols);
            let translation = r.read_vec3()?;
            Transform::Affine { matrix: Mat3::from_cols_array(&m), translation }
        }
        4 => return Ok(None),
        other => return Err(Error::invalid(format!("unknown fragment transform type {}", other))),
    };
    Ok(Some(transform))
}

fn decode_fragment(index: usize, ty: &EntryType, r: &mut ByteReader<'_>) -> Result<Fragment> {
    check_version("fragment", ty.version, &FRAGMENT_VERSIONS)?;

    let flags = r.read_u8()?;
    let material = r.read_varint()?;
    let geometry = r.read_varint()?;
    if geometry == 0 {
        return Err(Error::invalid(format!("fragment {} has no geometry", index)));
    }
    let transform = read_transform(r)?;

    let mut bbox = [0.0f32; 6];
    for v in bbox.iter_mut() {
        *v = r.read_f32()?;
    }
    let mut bounds = BBox3f::from_array(bbox);
    // Newer lists store boxes relative to the fragment translation.
    if ty.version > 3 {
        let offset = transform.map(|t| t.translation()).unwrap_or(Vec3::ZERO);
        bounds = bounds.translated(offset);
    }
    let db_id = r.read_varint()?;

    trace!(index, geometry, material, db_id, "fragment");
    Ok(Fragment {
        geometry_id: geometry - 1,
        material_id: material.checked_sub(1),
        transform,
        flags,
        bounds,
        db_id,
    })
}
