//! Asset catalog.
//!
//! The catalog is parsed from the package manifest and maps a logical
//! `(type, uri)` pair to an [`AssetDescriptor`]. It never touches asset
//! bytes; those are fetched through a
//! [`ByteResolver`](crate::resolver::ByteResolver).

mod asset;
mod manifest;
mod metadata;

pub use asset::{pack_number, AssetDescriptor, AssetQuery, AssetType};
pub use manifest::{MANIFEST_MAGIC, MANIFEST_VERSION};
pub use metadata::PackageMetadata;

use crate::core::DecodeLimits;
use crate::util::Result;

/// Parsed manifest: package metadata plus the asset table.
#[derive(Clone, Debug)]
pub struct AssetCatalog {
    metadata: PackageMetadata,
    assets: Vec<AssetDescriptor>,
}

impl AssetCatalog {
    /// Parse a (possibly gzip-wrapped) manifest.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_with(data, &DecodeLimits::default())
    }

    pub fn parse_with(data: &[u8], limits: &DecodeLimits) -> Result<Self> {
        let m = manifest::parse(data, limits)?;
        Ok(Self { metadata: m.metadata, assets: m.assets })
    }

    pub fn metadata(&self) -> &PackageMetadata {
        &self.metadata
    }

    /// First asset matching `query`, in manifest order.
    pub fn find(&self, query: &AssetQuery) -> Option<&AssetDescriptor> {
        self.assets.iter().find(|a| query.matches(a))
    }

    /// First asset of a given type.
    pub fn first_of(&self, asset_type: &AssetType) -> Option<&AssetDescriptor> {
        self.assets.iter().find(|a| a.asset_type == *asset_type)
    }

    /// All assets of a given type, in manifest order.
    pub fn of_type<'a>(&'a self, asset_type: &'a AssetType) -> impl Iterator<Item = &'a AssetDescriptor> + 'a {
        self.assets.iter().filter(move |a| a.asset_type == *asset_type)
    }

    /// Asset by exact URI.
    pub fn by_uri(&self, uri: &str) -> Option<&AssetDescriptor> {
        self.assets.iter().find(|a| a.uri == uri)
    }

    /// Number of numbered mesh packs (`{n}.pf`).
    pub fn mesh_pack_count(&self) -> usize {
        self.assets.iter().filter(|a| a.is_numbered_pack()).count()
    }

    /// Numbers of the listed mesh packs, ascending. May have gaps.
    pub fn mesh_pack_numbers(&self) -> Vec<u32> {
        let mut numbers: Vec<u32> = self
            .of_type(&AssetType::PackFile)
            .filter_map(|a| pack_number(&a.uri))
            .collect();
        numbers.sort_unstable();
        numbers.dedup();
        numbers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AssetDescriptor> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl<'a> IntoIterator for &'a AssetCatalog {
    type Item = &'a AssetDescriptor;
    type IntoIter = std::slice::Iter<'a, AssetDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
