//! Five-buffer property database.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Range;
use std::sync::OnceLock;

use bytes::Bytes;
use rayon::prelude::*;
use serde_json::value::RawValue;
use serde_json::Value;
use tracing::{debug, trace};

use super::attribute::AttributeDefinition;
use super::value::{check_scalar, decode_slot, PropertyValue};
use crate::core::{compression, DecodeLimits};
use crate::util::{Error, Result};

/// One-based object id; `id - 1` is the position in the ids buffer.
pub type ObjectId = u32;

/// The five raw buffers of a property database.
#[derive(Clone, Debug, Default)]
pub struct PropertyBuffers {
    pub ids: Bytes,
    pub offsets: Bytes,
    pub avs: Bytes,
    pub attrs: Bytes,
    pub vals: Bytes,
}

/// Read-only relational store of object properties.
///
/// Objects own a contiguous run of `(attribute, value)` edges given by the
/// offsets table. Value slots are shared between objects and decoded at
/// most once.
pub struct PropertyDatabase {
    ids: Vec<String>,
    offsets: Vec<u32>,
    edges: Vec<(u32, u32)>,
    attrs: Vec<AttributeDefinition>,
    vals: Vec<Box<RawValue>>,
    cache: Vec<OnceLock<PropertyValue>>,
    by_external_id: OnceLock<HashMap<String, ObjectId>>,
}

impl std::fmt::Debug for PropertyDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyDatabase")
            .field("objects", &self.ids.len())
            .field("attributes", &self.attrs.len())
            .field("values", &self.vals.len())
            .field("edges", &self.edges.len())
            .finish()
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(what: &str, data: &[u8], limits: &DecodeLimits) -> Result<T> {
    let json = compression::decompress(data, limits.max_inflated_len)
        .map_err(|e| Error::propdb(format!("{} buffer: {}", what, e)))?;
    serde_json::from_slice(&json).map_err(|e| Error::propdb(format!("{} buffer: {}", what, e)))
}

fn parse_u32s(what: &str, items: Vec<Value>) -> Result<Vec<u32>> {
    items
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| Error::propdb(format!("{}[{}] is not an unsigned 32-bit integer: {}", what, i, v)))
        })
        .collect()
}

impl PropertyDatabase {
    /// Open a database over its five buffers with default limits.
    pub fn open(ids: Bytes, offsets: Bytes, avs: Bytes, attrs: Bytes, vals: Bytes) -> Result<Self> {
        Self::open_with(PropertyBuffers { ids, offsets, avs, attrs, vals }, &DecodeLimits::default())
    }

    /// Parse and cross-validate the buffers.
    ///
    /// Every violation is reported as [`Error::InvalidPropertyDatabase`];
    /// no reader exists for an inconsistent database.
    pub fn open_with(buffers: PropertyBuffers, limits: &DecodeLimits) -> Result<Self> {
        let ids: Vec<Value> = parse_json("ids", &buffers.ids, limits)?;
        let offsets: Vec<Value> = parse_json("offsets", &buffers.offsets, limits)?;
        let avs: Vec<Value> = parse_json("avs", &buffers.avs, limits)?;
        let attrs: Vec<Value> = parse_json("attrs", &buffers.attrs, limits)?;
        let vals: Vec<Box<RawValue>> = parse_json("vals", &buffers.vals, limits)?;

        let ids = ids
            .into_iter()
            .enumerate()
            .map(|(i, v)| match v {
                Value::String(s) => Ok(s),
                Value::Number(n) if n.is_u64() || n.is_i64() => Ok(n.to_string()),
                other => Err(Error::propdb(format!("ids[{}] is not a string or integer: {}", i, other))),
            })
            .collect::<Result<Vec<_>>>()?;
        if ids.len() > u32::MAX as usize - 1 {
            return Err(Error::propdb("too many objects"));
        }

        let offsets = parse_u32s("offsets", offsets)?;
        let avs = parse_u32s("avs", avs)?;
        if avs.len() % 2 != 0 {
            return Err(Error::propdb(format!("avs has odd length {}", avs.len())));
        }
        let edges: Vec<(u32, u32)> = avs.chunks_exact(2).map(|p| (p[0], p[1])).collect();

        let attrs = attrs
            .iter()
            .enumerate()
            .map(|(i, row)| AttributeDefinition::from_json(i, row))
            .collect::<Result<Vec<_>>>()?;

        for (i, raw) in vals.iter().enumerate() {
            check_scalar(i, raw)?;
        }

        validate_offsets(&offsets, ids.len(), edges.len())?;
        for (i, &(attr, val)) in edges.iter().enumerate() {
            if attr as usize >= attrs.len() {
                return Err(Error::propdb(format!(
                    "edge {} references attribute {} (count: {})",
                    i,
                    attr,
                    attrs.len()
                )));
            }
            if val as usize >= vals.len() {
                return Err(Error::propdb(format!(
                    "edge {} references value {} (count: {})",
                    i,
                    val,
                    vals.len()
                )));
            }
        }

        debug!(
            objects = ids.len(),
            attributes = attrs.len(),
            values = vals.len(),
            edges = edges.len(),
            "opened property database"
        );
        let cache = (0..vals.len()).map(|_| OnceLock::new()).collect();
        Ok(Self { ids, offsets, edges, attrs, vals, cache, by_external_id: OnceLock::new() })
    }

    pub fn object_count(&self) -> u32 {
        self.ids.len() as u32
    }

    pub fn attribute_count(&self) -> usize {
        self.attrs.len()
    }

    pub fn value_count(&self) -> usize {
        self.vals.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn attribute_at(&self, index: usize) -> Result<&AttributeDefinition> {
        self.attrs
            .get(index)
            .ok_or(Error::AttributeNotFound { index, count: self.attrs.len() })
    }

    /// Iterate attribute definitions in table order.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.attrs.iter()
    }

    /// All object ids, `1..=object_count`.
    pub fn object_ids(&self) -> std::ops::RangeInclusive<ObjectId> {
        1..=self.object_count()
    }

    fn check_id(&self, id: ObjectId) -> Result<usize> {
        if id == 0 || id as usize > self.ids.len() {
            return Err(Error::ObjectNotFound { id, count: self.object_count() });
        }
        Ok(id as usize)
    }

    /// Edge range of an object: `[offsets[id-1], offsets[id])`.
    pub fn edge_range(&self, id: ObjectId) -> Result<Range<usize>> {
        let i = self.check_id(id)?;
        Ok(self.offsets[i - 1] as usize..self.offsets[i] as usize)
    }

    pub fn external_id(&self, id: ObjectId) -> Result<&str> {
        let i = self.check_id(id)?;
        Ok(&self.ids[i - 1])
    }

    /// Object with the given external id.
    ///
    /// The lookup index is built on first use.
    pub fn find_by_external_id(&self, external_id: &str) -> Option<ObjectId> {
        let index = self.by_external_id.get_or_init(|| {
            let mut map = HashMap::with_capacity(self.ids.len());
            for (i, ext) in self.ids.iter().enumerate() {
                map.entry(ext.clone()).or_insert(i as ObjectId + 1);
            }
            map
        });
        index.get(external_id).copied()
    }

    fn slot(&self, index: u32) -> &PropertyValue {
        let i = index as usize;
        self.cache[i].get_or_init(|| {
            trace!(slot = i, "decoding value");
            decode_slot(&self.vals[i])
        })
    }

    /// Properties of an object in edge order.
    pub fn properties_of(&self, id: ObjectId) -> Result<Vec<(&AttributeDefinition, PropertyValue)>> {
        let range = self.edge_range(id)?;
        Ok(self.edges[range]
            .iter()
            .map(|&(a, v)| {
                let attr = &self.attrs[a as usize];
                (attr, self.slot(v).coerce(attr.data_type))
            })
            .collect())
    }

    /// Name → value map of an object's user-facing properties.
    ///
    /// Internal categories are skipped; the first value wins for repeated names.
    pub fn properties_map(&self, id: ObjectId) -> Result<BTreeMap<String, PropertyValue>> {
        let mut map = BTreeMap::new();
        for (attr, value) in self.properties_of(id)? {
            if attr.is_internal() || attr.is_reserved() {
                continue;
            }
            map.entry(attr.name.clone()).or_insert(value);
        }
        Ok(map)
    }

    /// Category → `(name, value)` list of an object's user-facing properties.
    pub fn properties_by_category(&self, id: ObjectId) -> Result<BTreeMap<String, Vec<(String, PropertyValue)>>> {
        let mut map: BTreeMap<String, Vec<(String, PropertyValue)>> = BTreeMap::new();
        for (attr, value) in self.properties_of(id)? {
            if attr.is_internal() || attr.is_reserved() {
                continue;
            }
            map.entry(attr.category.clone()).or_default().push((attr.name.clone(), value));
        }
        Ok(map)
    }

    /// Objects having an attribute named `attribute_name` whose value
    /// satisfies `predicate`.
    ///
    /// Scans every edge; objects are visited in parallel.
    pub fn find<P>(&self, attribute_name: &str, predicate: P) -> BTreeSet<ObjectId>
    where
        P: Fn(&PropertyValue) -> bool + Sync,
    {
        let targets: Vec<bool> = self.attrs.iter().map(|a| a.name == attribute_name).collect();
        if !targets.contains(&true) {
            return BTreeSet::new();
        }
        (1..=self.object_count())
            .into_par_iter()
            .filter(|&id| {
                let i = id as usize;
                let range = self.offsets[i - 1] as usize..self.offsets[i] as usize;
                self.edges[range].iter().any(|&(a, v)| {
                    let attr = &self.attrs[a as usize];
                    targets[a as usize] && predicate(&self.slot(v).coerce(attr.data_type))
                })
            })
            .collect()
    }

    /// Objects whose `attribute_name` equals `value`.
    pub fn find_equal(&self, attribute_name: &str, value: &PropertyValue) -> BTreeSet<ObjectId> {
        self.find(attribute_name, |v| v == value)
    }
}

fn validate_offsets(offsets: &[u32], object_count: usize, edge_count: usize) -> Result<()> {
    if offsets.len() != object_count + 1 {
        return Err(Error::propdb(format!(
            "offsets has {} entries, expected {} for {} objects",
            offsets.len(),
            object_count + 1,
            object_count
        )));
    }
    if offsets[0] != 0 {
        return Err(Error::propdb(format!("offsets[0] is {}, expected 0", offsets[0])));
    }
    if let Some(i) = offsets.windows(2).position(|w| w[0] > w[1]) {
        return Err(Error::propdb(format!(
            "offsets decrease at {}: {} > {}",
            i + 1,
            offsets[i],
            offsets[i + 1]
        )));
    }
    let last = offsets[object_count] as usize;
    if last != edge_count {
        return Err(Error::propdb(format!("offsets end at {}, edge count is {}", last, edge_count)));
    }
    Ok(())
}
