//! Decoded material types.

use crate::util::Vec4;

/// Texture reference with its tiling.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureMap {
    /// Image URI, resolvable through the package resolver.
    pub uri: String,
    pub u_scale: f32,
    pub v_scale: f32,
}

/// Texture maps attached to a material.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialMaps {
    pub diffuse: Option<TextureMap>,
    pub specular: Option<TextureMap>,
    pub bump: Option<TextureMap>,
    pub alpha: Option<TextureMap>,
}

impl MaterialMaps {
    /// Iterate over present maps with their slot name.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &TextureMap)> {
        [
            ("diffuse", self.diffuse.as_ref()),
            ("specular", self.specular.as_ref()),
            ("bump", self.bump.as_ref()),
            ("alpha", self.alpha.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, map)| map.map(|m| (name, m)))
    }
}

/// Phong-style shading parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub ambient: Vec4,
    pub emissive: Vec4,
    pub glossiness: f32,
    pub reflectivity: f32,
    /// 1.0 is fully opaque.
    pub opacity: f32,
    pub metal: bool,
    pub maps: MaterialMaps,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: Vec4::new(0.0, 0.0, 0.0, 1.0),
            specular: Vec4::new(0.0, 0.0, 0.0, 1.0),
            ambient: Vec4::new(0.0, 0.0, 0.0, 1.0),
            emissive: Vec4::new(0.0, 0.0, 0.0, 1.0),
            glossiness: 30.0,
            reflectivity: 0.0,
            opacity: 1.0,
            metal: false,
            maps: MaterialMaps::default(),
        }
    }
}

impl Material {
    /// Check if the material lets light through.
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// One position of the material list.
#[derive(Clone, Debug, PartialEq)]
pub enum MaterialEntry {
    Material(Material),
    /// Definition this decoder does not translate, or a gap in the ids.
    Unrecognized { definition: String },
}

impl MaterialEntry {
    pub fn as_material(&self) -> Option<&Material> {
        match self {
            Self::Material(m) => Some(m),
            Self::Unrecognized { .. } => None,
        }
    }

    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Unrecognized { .. })
    }
}
