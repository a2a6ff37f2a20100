//! Math type re-exports and scene math used by the decoders.
//!
//! This module re-exports the `glam` types that appear in decoded records
//! and provides the bounding box and placement transform types.

pub use glam::{Affine3A, Mat3, Quat, Vec2, Vec3, Vec4};

use serde::{Deserialize, Serialize};
use std::fmt;

/// 3D bounding box with single precision.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox3f {
    pub min: Vec3,
    pub max: Vec3,
}

impl BBox3f {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create from the packed `[minx, miny, minz, maxx, maxy, maxz]` layout.
    #[inline]
    pub fn from_array(v: [f32; 6]) -> Self {
        Self::new(Vec3::new(v[0], v[1], v[2]), Vec3::new(v[3], v[4], v[5]))
    }

    /// Box shifted by `offset`.
    #[inline]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }
}

impl fmt::Debug for BBox3f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BBox3f({:?} - {:?})", self.min, self.max)
    }
}

/// Placement of a fragment in world space.
///
/// Mirrors the four transform encodings of the fragment list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transform {
    /// Translation only.
    Translation(Vec3),
    /// Rotation followed by translation.
    RotationTranslation { rotation: Quat, translation: Vec3 },
    /// Uniform scale, rotation and translation.
    UniformScaleRotationTranslation {
        scale: f32,
        rotation: Quat,
        translation: Vec3,
    },
    /// Full 3x3 linear part plus translation.
    Affine { matrix: Mat3, translation: Vec3 },
}

impl Transform {
    /// Translation component.
    pub fn translation(&self) -> Vec3 {
        match *self {
            Self::Translation(t) => t,
            Self::RotationTranslation { translation, .. }
            | Self::UniformScaleRotationTranslation { translation, .. }
            | Self::Affine { translation, .. } => translation,
        }
    }

    /// Convert to an affine matrix.
    pub fn to_affine(&self) -> Affine3A {
        match *self {
            Self::Translation(t) => Affine3A::from_translation(t),
            Self::RotationTranslation { rotation, translation } => {
                Affine3A::from_rotation_translation(rotation, translation)
            }
            Self::UniformScaleRotationTranslation { scale, rotation, translation } => {
                Affine3A::from_scale_rotation_translation(Vec3::splat(scale), rotation, translation)
            }
            Self::Affine { matrix, translation } => Affine3A::from_mat3_translation(matrix, translation),
        }
    }
}
