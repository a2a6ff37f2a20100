//! Property tests for the property database reader.

use std::collections::BTreeSet;

use bytes::Bytes;
use proptest::prelude::*;
use serde_json::{json, Value};
use svf::propdb::{PropertyBuffers, PropertyDatabase, PropertyValue};
use svf::Error;

static NAMES: [&str; 4] = ["Area", "Level", "Mark", "Volume"];

#[derive(Clone, Debug)]
struct Db {
    /// Edge list per object.
    objects: Vec<Vec<(u32, u32)>>,
    /// Attribute names (may repeat).
    attrs: Vec<&'static str>,
    vals: Vec<Value>,
}

impl Db {
    fn offsets(&self) -> Vec<u32> {
        let mut out = vec![0u32];
        for edges in &self.objects {
            out.push(out.last().copied().unwrap_or(0) + edges.len() as u32);
        }
        out
    }

    fn buffers(&self) -> PropertyBuffers {
        let ids: Vec<String> = (0..self.objects.len()).map(|i| format!("ext-{i}")).collect();
        let avs: Vec<u32> = self.objects.iter().flatten().flat_map(|&(a, v)| [a, v]).collect();
        // Untyped attributes keep values in their natural form.
        let attrs: Vec<Value> = self.attrs.iter().map(|n| json!([n, "Data", 0])).collect();
        let enc = |v: Value| Bytes::from(serde_json::to_vec(&v).unwrap());
        PropertyBuffers {
            ids: enc(json!(ids)),
            offsets: enc(json!(self.offsets())),
            avs: enc(json!(avs)),
            attrs: enc(json!(attrs)),
            vals: enc(json!(self.vals)),
        }
    }
}

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        (0i64..5).prop_map(|i| json!(i)),
        "[a-c]{1,2}".prop_map(|s| json!(s)),
        Just(json!(12.5)),
        Just(json!(true)),
    ]
}

fn db_strategy() -> impl Strategy<Value = Db> {
    (
        prop::collection::vec(prop::sample::select(&NAMES[..]), 1..6),
        prop::collection::vec(value_strategy(), 1..10),
    )
        .prop_flat_map(|(attrs, vals)| {
            let edge = (0..attrs.len() as u32, 0..vals.len() as u32);
            let objects = prop::collection::vec(prop::collection::vec(edge, 0..6), 0..20);
            (objects, Just(attrs), Just(vals))
        })
        .prop_map(|(objects, attrs, vals)| Db { objects, attrs, vals })
}

fn natural(v: &Value) -> PropertyValue {
    match v {
        Value::Bool(b) => PropertyValue::Boolean(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => PropertyValue::Integer(i),
            None => PropertyValue::Number(n.as_f64().unwrap()),
        },
        Value::String(s) => PropertyValue::String(s.clone()),
        _ => PropertyValue::Null,
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn properties_follow_offsets(db in db_strategy()) {
        let reader = PropertyDatabase::open_with(db.buffers(), &Default::default()).unwrap();
        prop_assert_eq!(reader.object_count() as usize, db.objects.len());

        let offsets = db.offsets();
        for (i, edges) in db.objects.iter().enumerate() {
            let id = i as u32 + 1;
            prop_assert_eq!(reader.edge_range(id).unwrap(), offsets[i] as usize..offsets[i + 1] as usize);

            let props = reader.properties_of(id).unwrap();
            prop_assert_eq!(props.len(), edges.len());
            for ((attr, value), &(a, v)) in props.iter().zip(edges) {
                prop_assert_eq!(attr.name.as_str(), db.attrs[a as usize]);
                prop_assert_eq!(value, &natural(&db.vals[v as usize]));
            }
        }
        let past_end = db.objects.len() as u32 + 1;
        let out_of_range = matches!(reader.properties_of(past_end), Err(Error::ObjectNotFound { .. }));
        prop_assert!(out_of_range);
    }

    #[test]
    fn find_matches_scan(db in db_strategy(), name in prop::sample::select(&NAMES[..])) {
        let reader = PropertyDatabase::open_with(db.buffers(), &Default::default()).unwrap();
        let pred = |v: &PropertyValue| matches!(v, PropertyValue::Integer(i) if *i >= 2);

        let expected: BTreeSet<u32> = reader
            .object_ids()
            .filter(|&id| {
                reader
                    .properties_of(id)
                    .unwrap()
                    .iter()
                    .any(|(a, v)| a.name == name && pred(v))
            })
            .collect();
        prop_assert_eq!(reader.find(name, pred), expected);
    }

    #[test]
    fn decreasing_offsets_are_rejected(db in db_strategy(), at in any::<prop::sample::Index>()) {
        let mut offsets = db.offsets();
        prop_assume!(offsets.len() > 2);
        // Bump one inner offset above its successor.
        let i = 1 + at.index(offsets.len() - 2);
        offsets[i] = offsets[i + 1] + 1;

        let mut buffers = db.buffers();
        buffers.offsets = Bytes::from(serde_json::to_vec(&offsets).unwrap());
        let rejected = matches!(
            PropertyDatabase::open_with(buffers, &Default::default()),
            Err(Error::InvalidPropertyDatabase(_))
        );
        prop_assert!(rejected);
    }

    #[test]
    fn out_of_range_edges_are_rejected(db in db_strategy(), bad_value in any::<bool>()) {
        prop_assume!(db.objects.iter().any(|e| !e.is_empty()));
        let mut db = db;
        let (a, v) = db.objects.iter_mut().flatten().next().unwrap();
        if bad_value {
            *v = db.vals.len() as u32;
        } else {
            *a = db.attrs.len() as u32;
        }
        let rejected = matches!(
            PropertyDatabase::open_with(db.buffers(), &Default::default()),
            Err(Error::InvalidPropertyDatabase(_))
        );
        prop_assert!(rejected);
    }
}
