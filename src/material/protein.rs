//! ProteinMaterials decoder.
//!
//! The material list is a (usually gzipped) JSON document. Its `materials`
//! object maps decimal material ids to material groups; each group names its
//! primary material in `userassets[0]` and may hold the texture materials that
//! primary one connects to.

use std::collections::{BTreeMap, HashMap};
use std::iter::FusedIterator;

use bytes::Bytes;
use serde::Deserialize;
use tracing::{debug, trace, warn};

use super::schema::{Material, MaterialEntry, MaterialMaps, TextureMap};
use crate::core::{compression, DecodeLimits};
use crate::util::{Error, Result, Vec4};

/// Supported major version of the material document.
pub const PROTEIN_MAJOR_VERSION: u32 = 1;

/// Definition name of the decoded shading model.
pub const SIMPLE_PHONG: &str = "SimplePhong";

/// Definition name of bitmap texture materials.
pub const UNIFIED_BITMAP: &str = "UnifiedBitmap";

#[derive(Deserialize)]
struct ProteinDocument {
    #[serde(default)]
    version: Option<String>,
    materials: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct MaterialGroup {
    #[serde(default)]
    userassets: Vec<String>,
    #[serde(default)]
    materials: HashMap<String, ProteinMaterial>,
}

#[derive(Deserialize)]
struct ProteinMaterial {
    #[serde(default)]
    definition: String,
    #[serde(default)]
    properties: ProteinProperties,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ProteinProperties {
    colors: HashMap<String, ColorProperty>,
    scalars: HashMap<String, ScalarProperty>,
    booleans: HashMap<String, serde_json::Value>,
    textures: HashMap<String, Connections>,
    uris: HashMap<String, UriProperty>,
}

#[derive(Deserialize)]
struct ColorProperty {
    #[serde(default)]
    values: Vec<Rgba>,
}

#[derive(Deserialize)]
struct Rgba {
    r: f32,
    g: f32,
    b: f32,
    #[serde(default = "opaque")]
    a: f32,
}

fn opaque() -> f32 {
    1.0
}

#[derive(Deserialize)]
struct ScalarProperty {
    #[serde(default)]
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct Connections {
    #[serde(default)]
    connections: Vec<String>,
}

#[derive(Deserialize)]
struct UriProperty {
    #[serde(default)]
    values: Vec<String>,
}

impl ProteinProperties {
    fn color(&self, name: &str, default: Vec4) -> Vec4 {
        self.colors
            .get(name)
            .and_then(|c| c.values.first())
            .map(|c| Vec4::new(c.r, c.g, c.b, c.a))
            .unwrap_or(default)
    }

    fn scalar(&self, name: &str, default: f32) -> f32 {
        self.scalars
            .get(name)
            .and_then(|s| s.values.first())
            .map(|&v| v as f32)
            .unwrap_or(default)
    }

    fn boolean(&self, name: &str) -> bool {
        match self.booleans.get(name) {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::Object(o)) => o
                .get("values")
                .and_then(|v| v.get(0))
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false),
            _ => false,
        }
    }
}

/// Lazy sequence of material list entries.
///
/// Ids missing from the document are produced as gaps while advancing,
/// so memory tracks the document rather than the highest id.
pub struct Materials {
    groups: BTreeMap<usize, serde_json::Value>,
    len: usize,
    next: usize,
    failed: bool,
}

impl Materials {
    /// Number of material ids (highest id + 1).
    pub fn declared_len(&self) -> usize {
        self.len
    }
}

impl Iterator for Materials {
    type Item = Result<MaterialEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if self.next >= self.len {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let result = match self.groups.remove(&index) {
            Some(group) => decode_group(index, group),
            None => {
                debug!(index, "gap in material ids");
                Ok(MaterialEntry::Unrecognized { definition: String::new() })
            }
        };
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, Some(self.len - self.next))
        }
    }
}

impl FusedIterator for Materials {}

fn check_document_version(version: Option<&str>) -> Result<()> {
    let Some(v) = version else {
        return Ok(());
    };
    let major = v.split('.').next().and_then(|m| m.trim().parse::<u32>().ok());
    match major {
        Some(PROTEIN_MAJOR_VERSION) => Ok(()),
        Some(m) => Err(Error::UnsupportedVersion { what: "material list", version: m.into() }),
        None => Err(Error::invalid(format!("unparseable material list version '{}'", v))),
    }
}

/// Decode a material list lazily.
pub fn decode(data: Bytes) -> Result<Materials> {
    decode_with(data, &DecodeLimits::default())
}

/// Decode a material list lazily with explicit limits.
///
/// The JSON document is parsed up front; individual materials are
/// translated as the sequence is advanced.
pub fn decode_with(data: Bytes, limits: &DecodeLimits) -> Result<Materials> {
    let json = compression::decompress(&data, limits.max_inflated_len)?;
    let doc: ProteinDocument = serde_json::from_slice(&json)?;
    check_document_version(doc.version.as_deref())?;

    let mut groups = BTreeMap::new();
    for (key, group) in doc.materials {
        let id: usize = key
            .parse()
            .map_err(|_| Error::invalid(format!("non-numeric material id '{}'", key)))?;
        if id >= limits.max_record_count {
            return Err(Error::LimitExceeded { what: "material id", limit: limits.max_record_count });
        }
        groups.insert(id, group);
    }

    let len = groups.keys().next_back().map_or(0, |id| id + 1);
    debug!(materials = len, groups = groups.len(), "parsed material list");

    Ok(Materials { groups, len, next: 0, failed: false })
}

/// Decode and gather all materials.
pub fn collect(data: Bytes) -> Result<Vec<MaterialEntry>> {
    decode(data)?.collect()
}

fn decode_group(index: usize, group: serde_json::Value) -> Result<MaterialEntry> {
    let group: MaterialGroup = serde_json::from_value(group)
        .map_err(|e| Error::invalid(format!("material {}: {}", index, e)))?;
    let key = group
        .userassets
        .first()
        .ok_or_else(|| Error::invalid(format!("material {} has no user assets", index)))?;
    let material = group
        .materials
        .get(key)
        .ok_or_else(|| Error::invalid(format!("material {} references missing asset '{}'", index, key)))?;

    if material.definition != SIMPLE_PHONG {
        warn!(index, definition = %material.definition, "skipping unsupported material definition");
        return Ok(MaterialEntry::Unrecognized { definition: material.definition.clone() });
    }

    let props = &material.properties;
    let black = Vec4::new(0.0, 0.0, 0.0, 1.0);
    let maps = MaterialMaps {
        diffuse: texture(&group, props, "generic_diffuse"),
        specular: texture(&group, props, "generic_specular"),
        bump: texture(&group, props, "generic_bump"),
        alpha: texture(&group, props, "generic_alpha"),
    };
    trace!(index, "material");

    Ok(MaterialEntry::Material(Material {
        diffuse: props.color("generic_diffuse", black),
        specular: props.color("generic_specular", black),
        ambient: props.color("generic_ambient", black),
        emissive: props.color("generic_emissive", black),
        glossiness: props.scalar("generic_glossiness", 30.0),
        reflectivity: props.scalar("generic_reflectivity_at_0deg", 0.0),
        opacity: 1.0 - props.scalar("generic_transparency", 0.0),
        metal: props.boolean("generic_is_metal"),
        maps,
    }))
}

/// Follow a texture connection to its bitmap material.
fn texture(group: &MaterialGroup, props: &ProteinProperties, slot: &str) -> Option<TextureMap> {
    let target = props.textures.get(slot)?.connections.first()?;
    let bitmap = group.materials.get(target)?;
    if bitmap.definition != UNIFIED_BITMAP {
        debug!(slot, definition = %bitmap.definition, "texture connection is not a bitmap");
        return None;
    }
    let uri = bitmap.properties.uris.get("unifiedbitmap_Bitmap")?.values.first()?.clone();
    Some(TextureMap {
        uri,
        u_scale: bitmap.properties.scalar("texture_UScale", 1.0),
        v_scale: bitmap.properties.scalar("texture_VScale", 1.0),
    })
}
