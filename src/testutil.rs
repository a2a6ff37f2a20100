//! Fixture writers for tests.
//!
//! Only depends on external crates so integration tests can include this
//! file through `#[path]` as well.

#![allow(dead_code)]

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

pub const FRAGMENT_LIST: &str = "Autodesk.CloudPlatform.FragmentList";
pub const GEOMETRY_METADATA_LIST: &str = "Autodesk.CloudPlatform.GeometryMetadataList";
pub const PACK_FILE: &str = "Autodesk.CloudPlatform.PackFile";
pub const PROTEIN_MATERIALS: &str = "ProteinMaterials";
pub const IMAGE: &str = "Autodesk.CloudPlatform.Image";
pub const PROPERTY_IDS: &str = "Autodesk.CloudPlatform.PropertyIDs";
pub const PROPERTY_OFFSETS: &str = "Autodesk.CloudPlatform.PropertyOffsets";
pub const PROPERTY_AVS: &str = "Autodesk.CloudPlatform.PropertyAVs";
pub const PROPERTY_ATTRIBUTES: &str = "Autodesk.CloudPlatform.PropertyAttributes";
pub const PROPERTY_VALUES: &str = "Autodesk.CloudPlatform.PropertyValues";

pub const OPENCTM_CLASS: &str = "Autodesk.CloudPlatform.OpenCTM";
pub const LINES_CLASS: &str = "Autodesk.CloudPlatform.Lines";
pub const POINTS_CLASS: &str = "Autodesk.CloudPlatform.Points";

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).expect("gzip write");
    enc.finish().expect("gzip finish")
}

pub fn put_varint(out: &mut Vec<u8>, mut v: u32) {
    loop {
        let byte = (v & 0x7f) as u8;
        v >>= 7;
        if v == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

pub fn put_string(out: &mut Vec<u8>, s: &str) {
    put_varint(out, s.len() as u32);
    out.extend_from_slice(s.as_bytes());
}

pub fn put_f32s(out: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
}

/// Writer for the pack container shared by fragment, geometry and mesh packs.
pub struct PackWriter {
    body: Vec<u8>,
    offsets: Vec<u32>,
    types: Vec<(String, String, u32)>,
}

impl PackWriter {
    pub fn new(header_type: &str, version: i32) -> Self {
        let mut body = Vec::new();
        put_string(&mut body, header_type);
        body.extend_from_slice(&version.to_le_bytes());
        Self { body, offsets: Vec::new(), types: Vec::new() }
    }

    /// Register an entry type and return its index.
    pub fn add_type(&mut self, class: &str, ty: &str, version: u32) -> u32 {
        self.types.push((class.to_string(), ty.to_string(), version));
        (self.types.len() - 1) as u32
    }

    pub fn add_entry(&mut self, type_index: u32, record: &[u8]) -> &mut Self {
        self.offsets.push(self.body.len() as u32);
        put_varint(&mut self.body, type_index);
        self.body.extend_from_slice(record);
        self
    }

    pub fn finish(self) -> Vec<u8> {
        let mut out = self.body;
        let toc = out.len() as u32;
        put_varint(&mut out, self.offsets.len() as u32);
        for off in &self.offsets {
            out.extend_from_slice(&off.to_le_bytes());
        }
        let types = out.len() as u32;
        put_varint(&mut out, self.types.len() as u32);
        for (class, ty, version) in &self.types {
            put_string(&mut out, class);
            put_string(&mut out, ty);
            put_varint(&mut out, *version);
        }
        out.extend_from_slice(&toc.to_le_bytes());
        out.extend_from_slice(&types.to_le_bytes());
        out
    }
}

/// Fragment record with a translation transform.
///
/// `geometry` and `material` are zero-based; they are stored one-based.
pub fn fragment_record(geometry: u32, material: u32, translation: [f32; 3], bbox: [f32; 6], db_id: u32) -> Vec<u8> {
    let mut out = vec![0x01];
    put_varint(&mut out, material + 1);
    put_varint(&mut out, geometry + 1);
    out.push(0);
    put_f32s(&mut out, &translation);
    put_f32s(&mut out, &bbox);
    put_varint(&mut out, db_id);
    out
}

/// Fragment list with one entry type (version 5).
pub fn fragment_list(records: &[Vec<u8>]) -> Vec<u8> {
    let mut w = PackWriter::new(FRAGMENT_LIST, 1);
    let ty = w.add_type("Autodesk.CloudPlatform.FragmentList", "Autodesk.CloudPlatform.Fragment", 5);
    for r in records {
        w.add_entry(ty, r);
    }
    w.finish()
}

/// Geometry metadata record (version 4 layout).
pub fn geometry_record(flags: u8, primitive_count: u16, pack_id: u32, entity_id: u32, bbox: [f32; 6]) -> Vec<u8> {
    let mut out = vec![flags, 0, 0, 0];
    out.extend_from_slice(&primitive_count.to_le_bytes());
    put_string(&mut out, &pack_id.to_string());
    put_varint(&mut out, entity_id);
    out.extend_from_slice(&(entity_id as i32).to_le_bytes());
    put_f32s(&mut out, &bbox);
    out
}

pub fn geometry_list(records: &[Vec<u8>]) -> Vec<u8> {
    let mut w = PackWriter::new(GEOMETRY_METADATA_LIST, 1);
    let ty = w.add_type(
        "Autodesk.CloudPlatform.GeometryMetadataList",
        "Autodesk.CloudPlatform.GeometryMetadata",
        4,
    );
    for r in records {
        w.add_entry(ty, r);
    }
    w.finish()
}

fn put_ctm_string(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&(s.len() as i32).to_le_bytes());
    out.extend_from_slice(s.as_bytes());
}

/// OpenCTM v5 RAW mesh.
pub fn openctm_raw(positions: &[[f32; 3]], triangles: &[u32], normals: bool, colors: bool) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"OCTM");
    out.extend_from_slice(&5i32.to_le_bytes());
    out.extend_from_slice(b"RAW\0");
    out.extend_from_slice(&(positions.len() as i32).to_le_bytes());
    out.extend_from_slice(&((triangles.len() / 3) as i32).to_le_bytes());
    out.extend_from_slice(&1i32.to_le_bytes());
    out.extend_from_slice(&(colors as i32).to_le_bytes());
    out.extend_from_slice(&(normals as i32).to_le_bytes());
    put_ctm_string(&mut out, "fixture");

    out.extend_from_slice(b"INDX");
    for i in triangles {
        out.extend_from_slice(&(*i as i32).to_le_bytes());
    }
    out.extend_from_slice(b"VERT");
    for p in positions {
        put_f32s(&mut out, p);
    }
    if normals {
        out.extend_from_slice(b"NORM");
        for _ in positions {
            put_f32s(&mut out, &[0.0, 0.0, 1.0]);
        }
    }
    out.extend_from_slice(b"TEXC");
    put_ctm_string(&mut out, "UVMap");
    put_ctm_string(&mut out, "");
    for p in positions {
        put_f32s(&mut out, &[p[0], p[1]]);
    }
    if colors {
        out.extend_from_slice(b"ATTR");
        put_ctm_string(&mut out, "Color");
        for _ in positions {
            put_f32s(&mut out, &[1.0, 0.0, 0.0, 1.0]);
        }
    }
    out
}

/// Lines record (version 3 layout), no colors.
pub fn lines_record(positions: &[[f32; 3]], indices: &[u16], width: f32) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(positions.len() as u16).to_le_bytes());
    out.extend_from_slice(&(indices.len() as u16).to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.push(0);
    for p in positions {
        put_f32s(&mut out, p);
    }
    for i in indices {
        out.extend_from_slice(&i.to_le_bytes());
    }
    out
}

/// Points record (version 3 layout), no colors.
pub fn points_record(positions: &[[f32; 3]], size: f32) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(positions.len() as u16).to_le_bytes());
    out.extend_from_slice(&(positions.len() as u16).to_le_bytes());
    out.extend_from_slice(&size.to_le_bytes());
    out.push(0);
    for p in positions {
        put_f32s(&mut out, p);
    }
    for i in 0..positions.len() as u16 {
        out.extend_from_slice(&i.to_le_bytes());
    }
    out
}

/// Single triangle used by mesh pack fixtures.
pub fn triangle_ctm() -> Vec<u8> {
    openctm_raw(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], &[0, 1, 2], true, false)
}

/// Mesh pack of `[mesh, lines, unknown, points, mesh]`.
pub fn mixed_mesh_pack() -> Vec<u8> {
    let mut w = PackWriter::new(PACK_FILE, 1);
    let ctm = w.add_type(OPENCTM_CLASS, "Autodesk.CloudPlatform.OpenCTM", 1);
    let lines = w.add_type(LINES_CLASS, "Autodesk.CloudPlatform.Lines", 3);
    let unknown = w.add_type("Autodesk.CloudPlatform.Voxels", "Autodesk.CloudPlatform.Voxels", 1);
    let points = w.add_type(POINTS_CLASS, "Autodesk.CloudPlatform.Points", 3);
    w.add_entry(ctm, &triangle_ctm());
    w.add_entry(lines, &lines_record(&[[0.0; 3], [1.0, 1.0, 1.0]], &[0, 1], 2.0));
    w.add_entry(unknown, &[0xde, 0xad, 0xbe, 0xef]);
    w.add_entry(points, &points_record(&[[0.0; 3], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]], 3.0));
    w.add_entry(ctm, &triangle_ctm());
    w.finish()
}

/// ProteinMaterials document with a SimplePhong material, an unsupported
/// definition and a textured material.
pub fn materials_json() -> serde_json::Value {
    serde_json::json!({
        "name": "LMVTK Simple Materials",
        "version": "1.0.0",
        "materials": {
            "0": {
                "version": 2,
                "userassets": ["0"],
                "materials": {
                    "0": {
                        "tag": "",
                        "definition": "SimplePhong",
                        "properties": {
                            "colors": {
                                "generic_diffuse": { "values": [{ "r": 0.8, "g": 0.1, "b": 0.1, "a": 1.0 }] }
                            },
                            "scalars": {
                                "generic_glossiness": { "values": [50.0] },
                                "generic_transparency": { "values": [0.25] }
                            },
                            "booleans": { "generic_is_metal": true }
                        }
                    }
                }
            },
            "1": {
                "version": 2,
                "userassets": ["0"],
                "materials": {
                    "0": { "definition": "PrismLayered", "properties": {} }
                }
            },
            "2": {
                "version": 2,
                "userassets": ["0"],
                "materials": {
                    "0": {
                        "definition": "SimplePhong",
                        "properties": {
                            "textures": { "generic_diffuse": { "connections": ["t1"] } }
                        }
                    },
                    "t1": {
                        "definition": "UnifiedBitmap",
                        "properties": {
                            "uris": { "unifiedbitmap_Bitmap": { "values": ["Resource/wood.png"] } },
                            "scalars": {
                                "texture_UScale": { "values": [2.0] },
                                "texture_VScale": { "values": [4.0] }
                            }
                        }
                    }
                }
            }
        }
    })
}

/// Writer for the binary package manifest.
pub struct ManifestWriter {
    metadata: Vec<u8>,
    assets: Vec<(String, String, Option<serde_json::Value>)>,
}

impl ManifestWriter {
    pub fn new(metadata: serde_json::Value) -> Self {
        Self { metadata: serde_json::to_vec(&metadata).expect("metadata json"), assets: Vec::new() }
    }

    pub fn asset(mut self, ty: &str, uri: &str) -> Self {
        self.assets.push((ty.to_string(), uri.to_string(), None));
        self
    }

    pub fn asset_with_extra(mut self, ty: &str, uri: &str, extra: serde_json::Value) -> Self {
        self.assets.push((ty.to_string(), uri.to_string(), Some(extra)));
        self
    }

    pub fn finish(self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"SVFM");
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&(self.metadata.len() as u32).to_le_bytes());
        out.extend_from_slice(&(self.assets.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.metadata);
        for (ty, uri, extra) in &self.assets {
            out.extend_from_slice(&(ty.len() as u16).to_le_bytes());
            out.extend_from_slice(ty.as_bytes());
            out.extend_from_slice(&(uri.len() as u16).to_le_bytes());
            out.extend_from_slice(uri.as_bytes());
            out.extend_from_slice(&0u32.to_le_bytes());
            out.extend_from_slice(&0u32.to_le_bytes());
            let extra = extra
                .as_ref()
                .map(|e| serde_json::to_vec(e).expect("extra json"))
                .unwrap_or_default();
            out.extend_from_slice(&(extra.len() as u32).to_le_bytes());
            out.extend_from_slice(&extra);
        }
        out
    }
}

/// Default metadata document.
pub fn metadata_json() -> serde_json::Value {
    serde_json::json!({
        "version": "1.0",
        "metadata": {
            "distance unit": { "value": "m" },
            "world bounding box": { "minXYZ": [-1.0, -1.0, -1.0], "maxXYZ": [10.0, 10.0, 10.0] },
            "world up vector": { "XYZ": [0.0, 0.0, 1.0] },
            "world front vector": { "XYZ": [0.0, -1.0, 0.0] },
            "custom values": { "globalOffset": [5.0, 5.0, 0.0] },
            "double sided geometry": { "value": false }
        }
    })
}
