//! Property database reader.
//!
//! Object properties are stored as five JSON arrays (each optionally gzipped):
//!
//! | Buffer    | Content                                           |
//! |-----------|---------------------------------------------------|
//! | `ids`     | external id per object, object id = position + 1  |
//! | `offsets` | N+1 edge offsets, object `i` owns `[o[i-1], o[i])` |
//! | `avs`     | flat `attribute index, value index` pairs          |
//! | `attrs`   | attribute definitions                             |
//! | `vals`    | deduplicated scalar values                        |
//!
//! [`PropertyDatabase::open`] validates all cross-buffer references up
//! front, so queries never index out of bounds.

mod attribute;
mod reader;
mod value;

pub use attribute::{
    AttributeDefinition, AttributeType, ATTRIBUTE_DIRECT_STORAGE, ATTRIBUTE_DONT_INDEX, ATTRIBUTE_HIDDEN,
    ATTRIBUTE_READ_ONLY,
};
pub use reader::{ObjectId, PropertyBuffers, PropertyDatabase};
pub use value::PropertyValue;
