//! Material library (`.mtl`) parsing.

use std::path::Path;

use crate::assets::{read_asset, relative_to, AssetSource};
use crate::error::{Error, Result};
use crate::materials::{MapKind, MaterialDef, MaterialTable};
use crate::scanner::{Line, Scanner};

/// Reads and parses the material library at `path`.
pub fn load(assets: &dyn AssetSource, path: &Path) -> Result<MaterialTable> {
    log::info!(target: "asset", "Loading material library '{}'", path.display());

    let bytes = read_asset(assets, path)?;
    return parse(&bytes, path);
}

/// Parses material library text. Map paths are resolved next to `path`.
pub fn parse(bytes: &[u8], path: &Path) -> Result<MaterialTable> {
    let text = Scanner::decode(bytes);

    let mut table = MaterialTable::new();
    let mut current: Option<(String, MaterialDef)> = None;

    for line in Scanner::new(&text) {
        if line.keyword == "newmtl" {
            if let Some((name, material)) = current.take() {
                table.insert(name, material);
            }
            current = Some((line.rest.to_string(), MaterialDef::default()));
            continue;
        }

        let map = match line.keyword {
            "map_Ka" => Some(MapKind::Ambient),
            "map_Kd" => Some(MapKind::Diffuse),
            "map_Ks" => Some(MapKind::Specular),
            "map_bump" | "map_Bump" | "bump" => Some(MapKind::Bump),
            "Ka" | "Kd" | "Ks" | "Ns" | "d" => None,
            // Unknown directives (Ni, illum, Ke, ...) are skipped.
            _ => continue,
        };

        let material = match current.as_mut() {
            Some((_, material)) => material,
            None => return Err(malformed(path, &line, "material directive before 'newmtl'")),
        };

        if let Some(kind) = map {
            if !line.rest.is_empty() {
                *material.map_mut(kind) = Some(relative_to(path, line.rest));
            }
            continue;
        }

        match line.keyword {
            "Ka" => material.ambient = color(path, &line)?,
            "Kd" => material.diffuse = color(path, &line)?,
            "Ks" => material.specular = color(path, &line)?,
            "Ns" => material.shininess = scalar(path, &line)?,
            "d" => material.dissolve = scalar(path, &line)?,
            _ => {}
        }
    }

    if let Some((name, material)) = current {
        table.insert(name, material);
    }

    log::debug!(target: "asset", "Parsed {} material(s) from '{}'", table.len(), path.display());
    return Ok(table);
}

fn color(path: &Path, line: &Line<'_>) -> Result<[f32; 3]> {
    return line
        .floats::<3>()
        .ok_or_else(|| malformed(path, line, "expected three numbers"));
}

fn scalar(path: &Path, line: &Line<'_>) -> Result<f32> {
    return line
        .floats::<1>()
        .map(|[value]| value)
        .ok_or_else(|| malformed(path, line, "expected a number"));
}

pub(crate) fn malformed(path: &Path, line: &Line<'_>, reason: &'static str) -> Error {
    return Error::Malformed {
        path: path.to_path_buf(),
        line_number: line.number,
        line: line.raw.to_string(),
        reason,
    };
}
