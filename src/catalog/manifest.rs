//! Binary manifest parsing.
//!
//! ```text
//! 0   magic "SVFM"
//! 4   version            u16   (1)
//! 6   reserved           u16   (0)
//! 8   metadata length    u32
//! 12  asset count        u32
//! 16  metadata JSON
//! ..  asset table
//!       type   u16 len + UTF-8
//!       uri    u16 len + UTF-8
//!       size   u32
//!       usize  u32
//!       extra  u32 len + JSON object
//! ```
//!
//! All integers are little-endian. The manifest may be gzip-wrapped.

use tracing::debug;

use super::asset::{AssetDescriptor, AssetType};
use super::metadata::PackageMetadata;
use crate::core::{compression, DecodeLimits};
use crate::util::{ByteReader, Error, Result};

pub const MANIFEST_MAGIC: &[u8; 4] = b"SVFM";
pub const MANIFEST_VERSION: u16 = 1;
pub const MANIFEST_HEADER_SIZE: usize = 16;

/// Smallest possible asset entry (empty strings, no extras).
const MIN_ENTRY_SIZE: usize = 2 + 2 + 4 + 4 + 4;

/// Parsed manifest contents.
pub(crate) struct Manifest {
    pub metadata: PackageMetadata,
    pub assets: Vec<AssetDescriptor>,
}

/// Turn reader and JSON failures into manifest errors.
fn malformed(e: Error) -> Error {
    match e {
        Error::MalformedManifest(_) | Error::LimitExceeded { .. } => e,
        other => Error::manifest(other.to_string()),
    }
}

pub(crate) fn parse(data: &[u8], limits: &DecodeLimits) -> Result<Manifest> {
    let data = compression::decompress(data, limits.max_inflated_len).map_err(malformed)?;
    let mut r = ByteReader::new(&data, "manifest");

    if data.len() < MANIFEST_HEADER_SIZE {
        return Err(Error::manifest(format!(
            "{} bytes is too small for a manifest header",
            data.len()
        )));
    }
    if r.take(4)? != MANIFEST_MAGIC {
        return Err(Error::manifest("bad magic"));
    }
    let version = r.read_u16()?;
    if version != MANIFEST_VERSION {
        return Err(Error::manifest(format!("unsupported manifest version {}", version)));
    }
    let reserved = r.read_u16()?;
    if reserved != 0 {
        return Err(Error::manifest(format!("reserved header field is {:#06x}", reserved)));
    }
    let metadata_len = r.read_u32()? as usize;
    let asset_count = r.read_u32()? as usize;

    let metadata_json = r.take(metadata_len).map_err(malformed)?;
    let metadata = PackageMetadata::from_json(version, metadata_json).map_err(malformed)?;

    if asset_count > limits.max_record_count {
        return Err(Error::LimitExceeded { what: "manifest asset count", limit: limits.max_record_count });
    }
    r.ensure(asset_count, MIN_ENTRY_SIZE).map_err(malformed)?;

    let mut assets = Vec::with_capacity(asset_count);
    for index in 0..asset_count {
        let asset = read_asset(&mut r)
            .map_err(|e| Error::manifest(format!("asset {}: {}", index, e)))?;
        assets.push(asset);
    }

    if r.remaining() > 0 {
        debug!(trailing = r.remaining(), "ignoring bytes after asset table");
    }
    debug!(assets = assets.len(), version, "parsed manifest");
    Ok(Manifest { metadata, assets })
}

fn read_asset(r: &mut ByteReader<'_>) -> Result<AssetDescriptor> {
    let ty_len = r.read_u16()? as usize;
    let asset_type = AssetType::from(r.read_utf8(ty_len)?.as_str());
    let uri_len = r.read_u16()? as usize;
    let uri = r.read_utf8(uri_len)?;
    let size = r.read_u32()?;
    let usize = r.read_u32()?;
    let extra_len = r.read_u32()? as usize;
    let extra = if extra_len == 0 {
        serde_json::Map::new()
    } else {
        let raw = r.take(extra_len)?;
        match serde_json::from_slice(raw)? {
            serde_json::Value::Object(map) => map,
            other => return Err(Error::manifest(format!("extra is not an object: {}", other))),
        }
    };
    Ok(AssetDescriptor { asset_type, uri, size, usize, extra })
}
