use std::collections::HashMap;
use std::path::PathBuf;

pub type Color = [f32; 3];

/// Which image map of a material a texture feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKind {
    Ambient,
    Diffuse,
    Specular,
    Bump,
}

impl MapKind {
    pub const ALL: [MapKind; 4] = [
        MapKind::Ambient,
        MapKind::Diffuse,
        MapKind::Specular,
        MapKind::Bump,
    ];

    /// Texture unit the map is bound to.
    pub fn slot(self) -> u32 {
        match self {
            MapKind::Ambient => 0,
            MapKind::Diffuse => 1,
            MapKind::Specular => 2,
            MapKind::Bump => 3,
        }
    }

    pub fn flag(self) -> MapFlags {
        return MapFlags(1 << self.slot());
    }
}

/// Bitmask of the maps a material resource carries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapFlags(u32);

impl MapFlags {
    pub const AMBIENT: MapFlags = MapFlags(1);
    pub const DIFFUSE: MapFlags = MapFlags(2);
    pub const SPECULAR: MapFlags = MapFlags(4);
    pub const BUMP: MapFlags = MapFlags(8);

    pub fn empty() -> Self {
        return MapFlags(0);
    }

    pub fn bits(self) -> u32 {
        return self.0;
    }

    pub fn contains(self, other: MapFlags) -> bool {
        return self.0 & other.0 == other.0;
    }

    pub fn insert(&mut self, other: MapFlags) {
        self.0 |= other.0;
    }
}

impl std::ops::BitOr for MapFlags {
    type Output = MapFlags;

    fn bitor(self, rhs: MapFlags) -> MapFlags {
        return MapFlags(self.0 | rhs.0);
    }
}

/// A material as declared in a material library, before any upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialDef {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub shininess: f32,
    pub dissolve: f32,
    pub ambient_map: Option<PathBuf>,
    pub diffuse_map: Option<PathBuf>,
    pub specular_map: Option<PathBuf>,
    pub bump_map: Option<PathBuf>,
}

impl MaterialDef {
    pub fn map(&self, kind: MapKind) -> Option<&PathBuf> {
        let map = match kind {
            MapKind::Ambient => &self.ambient_map,
            MapKind::Diffuse => &self.diffuse_map,
            MapKind::Specular => &self.specular_map,
            MapKind::Bump => &self.bump_map,
        };

        // A map directive with no path behaves as if it were absent.
        return map.as_ref().filter(|path| !path.as_os_str().is_empty());
    }

    pub(crate) fn map_mut(&mut self, kind: MapKind) -> &mut Option<PathBuf> {
        match kind {
            MapKind::Ambient => &mut self.ambient_map,
            MapKind::Diffuse => &mut self.diffuse_map,
            MapKind::Specular => &mut self.specular_map,
            MapKind::Bump => &mut self.bump_map,
        }
    }
}

/// Material definitions keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialTable {
    materials: HashMap<String, MaterialDef>,
}

impl MaterialTable {
    pub fn new() -> Self {
        return MaterialTable::default();
    }

    pub fn get(&self, name: &str) -> Option<&MaterialDef> {
        return self.materials.get(name);
    }

    pub fn insert(&mut self, name: impl Into<String>, material: MaterialDef) {
        self.materials.insert(name.into(), material);
    }

    /// Adds every entry of `other`, replacing same-named entries.
    pub fn merge(&mut self, other: MaterialTable) {
        self.materials.extend(other.materials);
    }

    pub fn len(&self) -> usize {
        return self.materials.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.materials.is_empty();
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        return self.materials.keys().map(String::as_str);
    }
}
