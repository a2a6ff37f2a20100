//! Shared helpers for integration tests.

#![allow(dead_code)]

#[path = "../../src/testutil.rs"]
pub mod testutil;

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::json;
use svf::resolver::{ByteResolver, MemoryResolver, ResolveError};

use testutil::*;

/// Resolver that counts every call.
#[derive(Default)]
pub struct CountingResolver {
    pub inner: MemoryResolver,
    calls: AtomicUsize,
}

impl CountingResolver {
    pub fn new(inner: MemoryResolver) -> Self {
        Self { inner, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ByteResolver for CountingResolver {
    async fn resolve(&self, uri: &str) -> Result<Bytes, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(uri).await
    }
}

pub const FRAGMENTS_URI: &str = "0.fs";
pub const GEOMETRIES_URI: &str = "GeometryMetadata.pf";
pub const MATERIALS_URI: &str = "Materials.json.gz";
pub const PROPERTY_URIS: [&str; 5] = [
    "objects_ids.json.gz",
    "objects_offs.json.gz",
    "objects_avs.json.gz",
    "objects_attrs.json.gz",
    "objects_vals.json.gz",
];

/// Three fragments over three geometries.
pub fn fragment_fixture() -> Vec<u8> {
    fragment_list(&[
        fragment_record(0, 0, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0, 1.0, 1.0], 1),
        fragment_record(2, 1, [5.0, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0, 1.0, 1.0], 2),
        fragment_record(1, 2, [0.0, 5.0, 0.0], [0.0, 0.0, 0.0, 1.0, 1.0, 1.0], 2),
    ])
}

pub fn geometry_fixture() -> Vec<u8> {
    let bbox = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
    geometry_list(&[
        geometry_record(0, 1, 0, 0, bbox),
        geometry_record(0x01, 1, 0, 1, bbox),
        geometry_record(0, 1, 0, 4, bbox),
    ])
}

/// Property buffers: two walls sharing the `Area = 12.5` slot.
pub fn property_buffers() -> [Vec<u8>; 5] {
    let docs = [
        json!(["wall-a", "wall-b"]),
        json!([0, 3, 6]),
        json!([0, 0, 1, 1, 2, 3, 0, 2, 1, 1, 2, 4]),
        json!([
            ["name", "__name__", 20],
            ["Area", "Dimensions", 3, "m^2"],
            ["Structural", "Construction", 1]
        ]),
        json!(["Wall A", 12.5, "Wall B", 1, 0]),
    ];
    docs.map(|d| gzip(&serde_json::to_vec(&d).unwrap()))
}

pub fn manifest() -> Vec<u8> {
    let mut w = ManifestWriter::new(metadata_json())
        .asset(FRAGMENT_LIST, FRAGMENTS_URI)
        .asset(GEOMETRY_METADATA_LIST, GEOMETRIES_URI)
        .asset(PACK_FILE, "0.pf")
        .asset(PROTEIN_MATERIALS, MATERIALS_URI)
        .asset(IMAGE, "Resource/wood.png");
    let types = [PROPERTY_IDS, PROPERTY_OFFSETS, PROPERTY_AVS, PROPERTY_ATTRIBUTES, PROPERTY_VALUES];
    for (ty, uri) in types.iter().zip(PROPERTY_URIS) {
        w = w.asset(ty, uri);
    }
    w.finish()
}

/// Resolver holding every asset of [`manifest`].
pub fn full_resolver() -> MemoryResolver {
    let r = MemoryResolver::new()
        .with(FRAGMENTS_URI, fragment_fixture())
        .with(GEOMETRIES_URI, geometry_fixture())
        .with("0.pf", mixed_mesh_pack())
        .with(MATERIALS_URI, gzip(&serde_json::to_vec(&materials_json()).unwrap()))
        .with("Resource/wood.png", b"\x89PNG".to_vec());
    for (uri, data) in PROPERTY_URIS.iter().zip(property_buffers()) {
        r.insert(*uri, data);
    }
    r
}
