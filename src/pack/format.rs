//! Pack container constants.

use std::ops::RangeInclusive;

/// Size of the footer holding the TOC and type table offsets.
pub const FOOTER_SIZE: usize = 8;

/// Smallest possible pack: empty type string, version, footer.
pub const MIN_PACK_SIZE: usize = 1 + 4 + FOOTER_SIZE;

/// Container versions this decoder understands.
pub const SUPPORTED_PACK_VERSIONS: RangeInclusive<i32> = 1..=5;

/// Entry class of OpenCTM-encoded triangle meshes.
pub const OPENCTM_CLASS: &str = "Autodesk.CloudPlatform.OpenCTM";

/// Entry class of line sets.
pub const LINES_CLASS: &str = "Autodesk.CloudPlatform.Lines";

/// Entry class of point sets.
pub const POINTS_CLASS: &str = "Autodesk.CloudPlatform.Points";

/// Check a version against a supported range.
#[inline]
pub fn check_version<T>(what: &'static str, version: T, range: &RangeInclusive<T>) -> crate::Result<()>
where
    T: PartialOrd + Into<i64> + Copy,
{
    if range.contains(&version) {
        Ok(())
    } else {
        Err(crate::Error::UnsupportedVersion { what, version: version.into() })
    }
}
