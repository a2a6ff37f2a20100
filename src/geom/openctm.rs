//! OpenCTM mesh bodies as embedded in mesh packs.
//!
//! Only the uncompressed `RAW` method is decoded. `MG1`/`MG2` bodies need an
//! LZMA stage and are reported back as unsupported.

use crate::util::{ByteReader, Error, Result, Vec2, Vec3, Vec4};

/// OpenCTM file magic.
pub const CTM_MAGIC: &[u8; 4] = b"OCTM";

/// The only OpenCTM format version in use.
pub const CTM_VERSION: i32 = 5;

/// Flag bit: the mesh carries per-vertex normals.
pub const CTM_HAS_NORMALS: i32 = 0x01;

/// Name of the attribute map holding vertex colors.
pub const CTM_COLOR_ATTRIBUTE: &str = "Color";

/// Named texture coordinate set.
#[derive(Clone, Debug, PartialEq)]
pub struct UvMap {
    pub name: String,
    /// Texture file hint, usually empty.
    pub file: String,
    pub coords: Vec<Vec2>,
}

/// Triangle mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub uv_maps: Vec<UvMap>,
    pub colors: Option<Vec<Vec4>>,
    /// Triangle list, three indices per triangle.
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Get number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Get number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Outcome of reading an OpenCTM body.
pub(crate) enum CtmBody {
    Mesh(Mesh),
    /// Compression method not handled here.
    Unsupported(String),
}

fn read_count(r: &mut ByteReader<'_>, what: &str) -> Result<usize> {
    let v = r.read_i32()?;
    usize::try_from(v).map_err(|_| Error::invalid(format!("negative OpenCTM {} count {}", what, v)))
}

fn read_ctm_string(r: &mut ByteReader<'_>) -> Result<String> {
    let len = read_count(r, "string length")?;
    r.read_utf8(len)
}

fn expect_tag(r: &mut ByteReader<'_>, tag: &[u8; 4]) -> Result<()> {
    let at = r.pos();
    let got = r.take(4)?;
    if got != tag {
        return Err(Error::invalid(format!(
            "expected OpenCTM section {:?} at offset {}, found {:?}",
            String::from_utf8_lossy(tag),
            at,
            String::from_utf8_lossy(got)
        )));
    }
    Ok(())
}

fn read_vec4s(r: &mut ByteReader<'_>, count: usize) -> Result<Vec<Vec4>> {
    r.ensure(count, 16)?;
    let flat = r.read_f32_vec(count * 4)?;
    Ok(flat.chunks_exact(4).map(Vec4::from_slice).collect())
}

/// Read an OpenCTM body from the current position.
pub(crate) fn read_openctm(r: &mut ByteReader<'_>) -> Result<CtmBody> {
    if r.take(4)? != CTM_MAGIC {
        return Err(Error::invalid("missing OpenCTM magic"));
    }
    let version = r.read_i32()?;
    if version != CTM_VERSION {
        return Err(Error::UnsupportedVersion { what: "OpenCTM", version: version.into() });
    }
    let method = r.take(4)?;
    if method != b"RAW\0" {
        let name = String::from_utf8_lossy(method).trim_end_matches('\0').to_string();
        return Ok(CtmBody::Unsupported(name));
    }

    let vertex_count = read_count(r, "vertex")?;
    let triangle_count = read_count(r, "triangle")?;
    let uv_count = read_count(r, "uv map")?;
    let attr_count = read_count(r, "attribute map")?;
    let flags = r.read_i32()?;
    let _comment = read_ctm_string(r)?;

    expect_tag(r, b"INDX")?;
    let index_count = triangle_count
        .checked_mul(3)
        .ok_or_else(|| Error::invalid("OpenCTM triangle count overflows"))?;
    let indices = r.read_u32_vec(index_count)?;
    if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(Error::invalid(format!(
            "OpenCTM index {} out of range (vertices: {})",
            *bad as i32, vertex_count
        )));
    }

    expect_tag(r, b"VERT")?;
    let positions = r.read_vec3s(vertex_count)?;

    let normals = if flags & CTM_HAS_NORMALS != 0 {
        expect_tag(r, b"NORM")?;
        Some(r.read_vec3s(vertex_count)?)
    } else {
        None
    };

    let mut uv_maps = Vec::with_capacity(uv_count.min(8));
    for _ in 0..uv_count {
        expect_tag(r, b"TEXC")?;
        let name = read_ctm_string(r)?;
        let file = read_ctm_string(r)?;
        r.ensure(vertex_count, 8)?;
        let flat = r.read_f32_vec(vertex_count * 2)?;
        let coords = flat.chunks_exact(2).map(Vec2::from_slice).collect();
        uv_maps.push(UvMap { name, file, coords });
    }

    let mut colors = None;
    for _ in 0..attr_count {
        expect_tag(r, b"ATTR")?;
        let name = read_ctm_string(r)?;
        let values = read_vec4s(r, vertex_count)?;
        if name == CTM_COLOR_ATTRIBUTE {
            colors = Some(values);
        }
    }

    Ok(CtmBody::Mesh(Mesh { positions, normals, uv_maps, colors, indices }))
}
