//! Wavefront geometry (`.obj`) parsing.

use std::path::Path;

use crate::assets::{read_asset, relative_to, AssetSource};
use crate::error::{Error, Result};
use crate::materials::{library, MaterialTable};
use crate::objects::face::{parse_face, Face, PoolLens};
use crate::scanner::{Line, Scanner};

pub type Vec2 = [f32; 2];
pub type Vec3 = [f32; 3];

/// Name given to the implicit first group when the file never names it.
pub const DEFAULT_GROUP: &str = "default";

/// Every position, normal and texture coordinate of a file, in declaration
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexPool {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub texcoords: Vec<Vec2>,
}

impl VertexPool {
    pub fn lens(&self) -> PoolLens {
        return PoolLens {
            positions: self.positions.len(),
            texcoords: self.texcoords.len(),
            normals: self.normals.len(),
        };
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    pub name: String,
    pub material: String,
    pub faces: Vec<Face>,
}

impl Group {
    pub fn new(name: &str) -> Self {
        return Group {
            name: name.to_string(),
            material: String::new(),
            faces: Vec::new(),
        };
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub pool: VertexPool,
    pub groups: Vec<Group>,
    pub materials: MaterialTable,
}

impl Geometry {
    /// Reads and parses the geometry file at `path`, pulling in every
    /// material library it references.
    pub fn load(assets: &dyn AssetSource, path: &Path) -> Result<Geometry> {
        let bytes = read_asset(assets, path)?;
        return Geometry::parse(&bytes, path, assets);
    }

    pub fn parse(bytes: &[u8], path: &Path, assets: &dyn AssetSource) -> Result<Geometry> {
        let text = Scanner::decode(bytes);

        let mut parser = GeometryParser::new(path, assets);
        for line in Scanner::new(&text) {
            parser.handle(&line)?;
        }

        return Ok(parser.finish());
    }

    pub fn face_count(&self) -> usize {
        return self.groups.iter().map(|group| group.faces.len()).sum();
    }
}

/// Running state while the lines of one geometry file are consumed.
struct GeometryParser<'a> {
    path: &'a Path,
    assets: &'a dyn AssetSource,
    pool: VertexPool,
    groups: Vec<Group>,
    materials: MaterialTable,
}

impl<'a> GeometryParser<'a> {
    fn new(path: &'a Path, assets: &'a dyn AssetSource) -> Self {
        return GeometryParser {
            path,
            assets,
            pool: VertexPool::default(),
            groups: vec![Group::default()],
            materials: MaterialTable::new(),
        };
    }

    fn current(&mut self) -> &mut Group {
        let last = self.groups.len() - 1;
        return &mut self.groups[last];
    }

    fn handle(&mut self, line: &Line<'_>) -> Result<()> {
        match line.keyword {
            "v" => {
                let position = self.floats::<3>(line, "expected three coordinates")?;
                self.pool.positions.push(position);
            }

            "vn" => {
                let normal = self.floats::<3>(line, "expected three coordinates")?;
                self.pool.normals.push(normal);
            }

            "vt" => {
                let texcoord = self.floats::<2>(line, "expected two coordinates")?;
                self.pool.texcoords.push(texcoord);
            }

            "f" => {
                let face = match parse_face(line.rest, self.pool.lens()) {
                    Some(face) => face,
                    None => return Err(self.malformed(line, "unsupported face record")),
                };
                self.current().faces.push(face);
            }

            "o" | "g" => {
                if self.current().name.is_empty() {
                    self.current().name = line.rest.to_string();
                } else {
                    self.groups.push(Group::new(line.rest));
                }
            }

            "usemtl" => {
                self.current().material = line.rest.to_string();
            }

            "mtllib" => {
                let library_path = relative_to(self.path, line.rest);
                let table = library::load(self.assets, &library_path)?;
                self.materials.merge(table);
            }

            // s, l, p, vp, ... carry nothing this loader uses.
            _ => {}
        }

        return Ok(());
    }

    fn floats<const N: usize>(&self, line: &Line<'_>, reason: &'static str) -> Result<[f32; N]> {
        return line.floats::<N>().ok_or_else(|| self.malformed(line, reason));
    }

    fn malformed(&self, line: &Line<'_>, reason: &'static str) -> Error {
        return library::malformed(self.path, line, reason);
    }

    fn finish(mut self) -> Geometry {
        if self.current().name.is_empty() {
            self.current().name = DEFAULT_GROUP.to_string();
        }

        log::debug!(
            target: "asset",
            "Parsed '{}': {} position(s), {} normal(s), {} texcoord(s), {} group(s)",
            self.path.display(),
            self.pool.positions.len(),
            self.pool.normals.len(),
            self.pool.texcoords.len(),
            self.groups.len()
        );

        return Geometry {
            pool: self.pool,
            groups: self.groups,
            materials: self.materials,
        };
    }
}
