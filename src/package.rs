//! Package decoder.
//!
//! [`PackageDecoder`] ties the catalog, a resolver and the record decoders
//! together. Every typed operation looks up its descriptor(s) first and
//! fails with [`Error::AssetNotFound`] before any bytes are requested.
//! [`PackageDecoder::get_asset`] passes straight through to the resolver.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, instrument};

use crate::catalog::{AssetCatalog, AssetDescriptor, AssetQuery, AssetType, PackageMetadata};
use crate::core::DecodeOptions;
use crate::geom::{fragments, geometries, meshes, Fragment, Fragments, Geometries, GeometryMetadata, MeshPack, MeshPackEntry};
use crate::material::{self, MaterialEntry, Materials};
use crate::propdb::{PropertyBuffers, PropertyDatabase};
use crate::resolver::{ByteResolver, LocalResolver};
use crate::util::{Error, Result};

/// Decoder over one package.
///
/// Cheap to share behind an `Arc`; independent operations may run
/// concurrently.
pub struct PackageDecoder {
    catalog: AssetCatalog,
    resolver: Arc<dyn ByteResolver>,
    options: DecodeOptions,
}

impl std::fmt::Debug for PackageDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageDecoder")
            .field("assets", &self.catalog.len())
            .field("options", &self.options)
            .finish()
    }
}

impl PackageDecoder {
    /// Open a package from its manifest bytes.
    pub fn open<R: ByteResolver + 'static>(package: &[u8], resolver: R) -> Result<Self> {
        Self::open_with_options(package, resolver, DecodeOptions::default())
    }

    pub fn open_with_options<R: ByteResolver + 'static>(
        package: &[u8],
        resolver: R,
        options: DecodeOptions,
    ) -> Result<Self> {
        let catalog = AssetCatalog::parse_with(package, &options.limits)?;
        debug!(assets = catalog.len(), "opened package");
        Ok(Self { catalog, resolver: Arc::new(resolver), options })
    }

    /// Fetch the manifest through `resolver` and open it.
    pub async fn from_resolver<R: ByteResolver + 'static>(resolver: R, package_uri: &str) -> Result<Self> {
        let package = resolver.resolve(package_uri).await.map_err(|source| Error::Transport {
            uri: package_uri.to_string(),
            source,
        })?;
        Self::open(&package, resolver)
    }

    /// Open a manifest file; assets resolve relative to its directory.
    pub async fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let package = tokio::fs::read(path).await?;
        let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::open(&package, LocalResolver::new(root))
    }

    pub fn metadata(&self) -> &PackageMetadata {
        self.catalog.metadata()
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    fn require(&self, asset_type: AssetType) -> Result<&AssetDescriptor> {
        self.catalog
            .first_of(&asset_type)
            .ok_or_else(|| Error::missing(asset_type.role()))
    }

    async fn fetch(&self, asset: &AssetDescriptor) -> Result<Bytes> {
        self.resolve(&asset.uri).await
    }

    async fn resolve(&self, uri: &str) -> Result<Bytes> {
        self.resolver.resolve(uri).await.map_err(|source| Error::Transport {
            uri: uri.to_string(),
            source,
        })
    }

    /// Raw stored bytes of `uri`, resolved whether or not the manifest lists it.
    #[instrument(skip(self), level = "debug")]
    pub async fn get_asset(&self, uri: &str) -> Result<Bytes> {
        self.resolve(uri).await
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn enumerate_fragments(&self) -> Result<Fragments> {
        let asset = self.require(AssetType::FragmentList)?;
        let data = self.fetch(asset).await?;
        fragments::decode_with(data, &self.options.limits)
    }

    pub async fn list_fragments(&self) -> Result<Vec<Fragment>> {
        self.enumerate_fragments().await?.collect()
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn enumerate_geometries(&self) -> Result<Geometries> {
        let asset = self.require(AssetType::GeometryMetadataList)?;
        let data = self.fetch(asset).await?;
        geometries::decode_with(data, &self.options.limits)
    }

    pub async fn list_geometries(&self) -> Result<Vec<GeometryMetadata>> {
        self.enumerate_geometries().await?.collect()
    }

    /// Number of numbered mesh packs. Never resolves bytes.
    pub fn mesh_pack_count(&self) -> usize {
        self.catalog.mesh_pack_count()
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn enumerate_mesh_pack(&self, n: u32) -> Result<MeshPack> {
        let uri = format!("{}.pf", n);
        let asset = self
            .catalog
            .find(&AssetQuery::of_type(AssetType::PackFile).uri(uri.as_str()))
            .ok_or_else(|| Error::missing(format!("{} {}", AssetType::PackFile.role(), uri)))?;
        let data = self.fetch(asset).await?;
        meshes::decode_with(data, &self.options.limits)
    }

    pub async fn list_mesh_pack(&self, n: u32) -> Result<Vec<MeshPackEntry>> {
        self.enumerate_mesh_pack(n).await?.collect()
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn enumerate_materials(&self) -> Result<Materials> {
        let asset = self.require(AssetType::ProteinMaterials)?;
        let data = self.fetch(asset).await?;
        material::decode_with(data, &self.options.limits)
    }

    pub async fn list_materials(&self) -> Result<Vec<MaterialEntry>> {
        self.enumerate_materials().await?.collect()
    }

    /// URIs of image assets, in manifest order.
    pub fn list_image_uris(&self) -> Vec<&str> {
        self.catalog
            .of_type(&AssetType::Image)
            .map(|a| a.uri.as_str())
            .collect()
    }

    /// Resolve the five property buffers concurrently and open the database.
    #[instrument(skip(self), level = "debug")]
    pub async fn open_property_database(&self) -> Result<PropertyDatabase> {
        let ids = self.require(AssetType::PropertyIds)?;
        let offsets = self.require(AssetType::PropertyOffsets)?;
        let avs = self.require(AssetType::PropertyAvs)?;
        let attrs = self.require(AssetType::PropertyAttributes)?;
        let vals = self.require(AssetType::PropertyValues)?;

        let (ids, offsets, avs, attrs, vals) = futures::try_join!(
            self.fetch(ids),
            self.fetch(offsets),
            self.fetch(avs),
            self.fetch(attrs),
            self.fetch(vals),
        )?;
        PropertyDatabase::open_with(PropertyBuffers { ids, offsets, avs, attrs, vals }, &self.options.limits)
    }
}
