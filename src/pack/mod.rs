//! Pack container shared by fragment lists, geometry metadata and mesh packs.
//!
//! A pack file is a small self-describing container: a header, the entry
//! bodies, a table of contents pointing at each entry and a table of entry
//! types. Each entry starts with an index into the type table, which carries
//! the version used to interpret the entry body.
//!
//! ## File Structure
//!
//! ```text
//! +----------------------+
//! | Type string          |  varint length + UTF-8
//! +----------------------+
//! | Version              |  i32 LE
//! +----------------------+
//! | ... Entries ...      |  varint type index + record body
//! +----------------------+
//! | TOC                  |  varint count, count x u32 LE offsets
//! +----------------------+
//! | Types                |  varint count, count x {class, type, varint version}
//! +----------------------+
//! | TOC offset           |  u32 LE
//! | Types offset         |  u32 LE
//! +----------------------+
//! ```
//!
//! The whole buffer may be gzip-compressed.

mod format;
mod reader;
mod records;

pub use format::*;
pub use reader::*;
pub use records::*;
