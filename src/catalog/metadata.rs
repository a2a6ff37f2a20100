//! Package-level metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::util::{BBox3f, Result, Vec3};

/// Package metadata from the manifest header.
///
/// Well-known keys are lifted into typed fields; every other key is kept
/// in [`extra`](Self::extra).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PackageMetadata {
    /// Manifest layout version.
    pub format_version: u16,
    /// Metadata document version string.
    pub version: Option<String>,
    pub distance_unit: Option<String>,
    pub world_bounds: Option<BBox3f>,
    pub world_up: Option<Vec3>,
    pub world_front: Option<Vec3>,
    /// Offset subtracted from world coordinates by the exporter.
    pub global_offset: Option<Vec3>,
    pub double_sided: bool,
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Default)]
struct MetadataDocument {
    #[serde(default)]
    version: Option<Value>,
    #[serde(default)]
    metadata: Map<String, Value>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

fn vec3(v: Option<&Value>) -> Option<Vec3> {
    let arr = v?.as_array()?;
    if arr.len() != 3 {
        return None;
    }
    let mut out = [0.0f32; 3];
    for (o, x) in out.iter_mut().zip(arr) {
        *o = x.as_f64()? as f32;
    }
    Some(Vec3::from_array(out))
}

impl PackageMetadata {
    /// Parse the metadata JSON of a manifest.
    ///
    /// An empty document yields defaults.
    pub fn from_json(format_version: u16, json: &[u8]) -> Result<Self> {
        let doc: MetadataDocument = if json.is_empty() {
            MetadataDocument::default()
        } else {
            serde_json::from_slice(json)?
        };
        let mut meta = doc.metadata;

        let distance_unit = meta
            .remove("distance unit")
            .and_then(|v| v.get("value").and_then(Value::as_str).map(str::to_string));
        let world_bounds = meta.remove("world bounding box").and_then(|v| {
            let min = vec3(v.get("minXYZ"))?;
            let max = vec3(v.get("maxXYZ"))?;
            Some(BBox3f::new(min, max))
        });
        let world_up = meta.remove("world up vector").and_then(|v| vec3(v.get("XYZ")));
        let world_front = meta.remove("world front vector").and_then(|v| vec3(v.get("XYZ")));
        let global_offset = match meta.get_mut("custom values").and_then(Value::as_object_mut) {
            Some(custom) => vec3(custom.remove("globalOffset").as_ref()),
            None => None,
        };
        let double_sided = meta
            .remove("double sided geometry")
            .and_then(|v| v.get("value").and_then(Value::as_bool))
            .unwrap_or(false);

        let version = doc.version.map(|v| match v {
            Value::String(s) => s,
            other => other.to_string(),
        });

        let mut extra = doc.rest;
        extra.extend(meta);

        Ok(Self {
            format_version,
            version,
            distance_unit,
            world_bounds,
            world_up,
            world_front,
            global_offset,
            double_sided,
            extra,
        })
    }
}
