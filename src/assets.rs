use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Where model, material and texture bytes come from.
pub trait AssetSource {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads assets straight from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSystem;

impl AssetSource for FileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        return std::fs::read(path);
    }
}

impl<F> AssetSource for F
where
    F: Fn(&Path) -> io::Result<Vec<u8>>,
{
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        return self(path);
    }
}

pub(crate) fn read_asset(assets: &dyn AssetSource, path: &Path) -> Result<Vec<u8>> {
    return assets.read(path).map_err(|e| Error::io(path, e));
}

/// Joins `reference` onto the directory that contains `declared_in`.
pub(crate) fn relative_to(declared_in: &Path, reference: &str) -> PathBuf {
    match declared_in.parent() {
        Some(dir) => dir.join(reference),
        None => PathBuf::from(reference),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_resolve_next_to_the_declaring_file() {
        let path = relative_to(Path::new("assets/crate/crate.obj"), "crate.mtl");
        assert_eq!(path, Path::new("assets/crate/crate.mtl"));

        let path = relative_to(Path::new("cube.obj"), "cube.mtl");
        assert_eq!(path, Path::new("cube.mtl"));
    }

    #[test]
    fn closures_are_asset_sources() {
        let source = |path: &Path| -> io::Result<Vec<u8>> {
            if path == Path::new("a.txt") {
                Ok(b"hello".to_vec())
            } else {
                Err(io::Error::new(io::ErrorKind::NotFound, "missing"))
            }
        };

        assert_eq!(read_asset(&source, Path::new("a.txt")).unwrap(), b"hello");
        match read_asset(&source, Path::new("b.txt")) {
            Err(Error::Io { path, source }) => {
                assert_eq!(path, Path::new("b.txt"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
