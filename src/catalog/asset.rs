//! Asset descriptors and roles.

use std::fmt;
use std::str::FromStr;

/// Role of an asset inside a package.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssetType {
    FragmentList,
    GeometryMetadataList,
    PackFile,
    ProteinMaterials,
    Image,
    PropertyIds,
    PropertyOffsets,
    PropertyAvs,
    PropertyAttributes,
    PropertyValues,
    PropertyViewables,
    InstanceTree,
    /// Type string not known to this decoder.
    Other(String),
}

impl AssetType {
    /// Canonical manifest type string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::FragmentList => "Autodesk.CloudPlatform.FragmentList",
            Self::GeometryMetadataList => "Autodesk.CloudPlatform.GeometryMetadataList",
            Self::PackFile => "Autodesk.CloudPlatform.PackFile",
            Self::ProteinMaterials => "ProteinMaterials",
            Self::Image => "Autodesk.CloudPlatform.Image",
            Self::PropertyIds => "Autodesk.CloudPlatform.PropertyIDs",
            Self::PropertyOffsets => "Autodesk.CloudPlatform.PropertyOffsets",
            Self::PropertyAvs => "Autodesk.CloudPlatform.PropertyAVs",
            Self::PropertyAttributes => "Autodesk.CloudPlatform.PropertyAttributes",
            Self::PropertyValues => "Autodesk.CloudPlatform.PropertyValues",
            Self::PropertyViewables => "Autodesk.CloudPlatform.PropertyViewables",
            Self::InstanceTree => "Autodesk.CloudPlatform.InstanceTree",
            Self::Other(s) => s,
        }
    }

    /// Short role name used in errors and logs.
    pub fn role(&self) -> &str {
        match self {
            Self::Other(s) => s,
            known => known.as_str().rsplit('.').next().unwrap_or_default(),
        }
    }
}

impl FromStr for AssetType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Autodesk.CloudPlatform.FragmentList" => Self::FragmentList,
            "Autodesk.CloudPlatform.GeometryMetadataList" => Self::GeometryMetadataList,
            "Autodesk.CloudPlatform.PackFile" => Self::PackFile,
            "ProteinMaterials" => Self::ProteinMaterials,
            "Autodesk.CloudPlatform.Image" => Self::Image,
            "Autodesk.CloudPlatform.PropertyIDs" => Self::PropertyIds,
            "Autodesk.CloudPlatform.PropertyOffsets" => Self::PropertyOffsets,
            "Autodesk.CloudPlatform.PropertyAVs" => Self::PropertyAvs,
            "Autodesk.CloudPlatform.PropertyAttributes" => Self::PropertyAttributes,
            "Autodesk.CloudPlatform.PropertyValues" => Self::PropertyValues,
            "Autodesk.CloudPlatform.PropertyViewables" => Self::PropertyViewables,
            "Autodesk.CloudPlatform.InstanceTree" => Self::InstanceTree,
            other => Self::Other(other.to_string()),
        })
    }
}

impl From<&str> for AssetType {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(t) => t,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the manifest asset table.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetDescriptor {
    pub asset_type: AssetType,
    /// Location relative to the package.
    pub uri: String,
    /// Stored size in bytes.
    pub size: u32,
    /// Uncompressed size in bytes.
    pub usize: u32,
    /// Additional per-asset keys, preserved as-is.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AssetDescriptor {
    /// Check if the asset is a numbered mesh pack (`{n}.pf`).
    pub fn is_numbered_pack(&self) -> bool {
        self.asset_type == AssetType::PackFile && pack_number(&self.uri).is_some()
    }
}

/// Parse the number out of a mesh pack URI (`"12.pf"` -> 12).
pub fn pack_number(uri: &str) -> Option<u32> {
    let digits = uri.strip_suffix(".pf")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Filter for [`AssetCatalog::find`](super::AssetCatalog::find).
///
/// Unset fields match anything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssetQuery {
    pub asset_type: Option<AssetType>,
    pub uri: Option<String>,
}

impl AssetQuery {
    pub fn of_type(asset_type: AssetType) -> Self {
        Self { asset_type: Some(asset_type), uri: None }
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn matches(&self, asset: &AssetDescriptor) -> bool {
        self.asset_type.as_ref().map_or(true, |t| *t == asset.asset_type)
            && self.uri.as_deref().map_or(true, |u| u == asset.uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_strings_roundtrip() {
        for ty in [
            AssetType::FragmentList,
            AssetType::PackFile,
            AssetType::ProteinMaterials,
            AssetType::PropertyAvs,
            AssetType::InstanceTree,
        ] {
            assert_eq!(AssetType::from(ty.as_str()), ty);
        }
        assert_eq!(
            AssetType::from("Autodesk.CloudPlatform.Thumbnail"),
            AssetType::Other("Autodesk.CloudPlatform.Thumbnail".into())
        );
    }

    #[test]
    fn test_role() {
        assert_eq!(AssetType::FragmentList.role(), "FragmentList");
        assert_eq!(AssetType::ProteinMaterials.role(), "ProteinMaterials");
        assert_eq!(AssetType::Other("Thing".into()).role(), "Thing");
    }

    #[test]
    fn test_pack_number() {
        assert_eq!(pack_number("0.pf"), Some(0));
        assert_eq!(pack_number("17.pf"), Some(17));
        assert_eq!(pack_number(".pf"), None);
        assert_eq!(pack_number("a.pf"), None);
        assert_eq!(pack_number("+1.pf"), None);
        assert_eq!(pack_number("1.pf.gz"), None);
    }

    #[test]
    fn test_query_matches() {
        let asset = AssetDescriptor {
            asset_type: AssetType::PackFile,
            uri: "3.pf".into(),
            size: 0,
            usize: 0,
            extra: Default::default(),
        };
        assert!(AssetQuery::default().matches(&asset));
        assert!(AssetQuery::of_type(AssetType::PackFile).uri("3.pf").matches(&asset));
        assert!(!AssetQuery::of_type(AssetType::PackFile).uri("4.pf").matches(&asset));
        assert!(!AssetQuery::of_type(AssetType::Image).matches(&asset));
        assert!(asset.is_numbered_pack());
    }
}
