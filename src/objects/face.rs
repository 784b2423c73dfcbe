//! Face records: `f v//vn ...`, `f v/vt ...` and `f v/vt/vn ...`.

/// A pool index as written in the file, together with the length the pool
/// had when the face referencing it was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index {
    value: i64,
    pool_len: usize,
}

impl Index {
    pub fn new(value: i64, pool_len: usize) -> Self {
        return Index { value, pool_len };
    }

    pub fn value(&self) -> i64 {
        return self.value;
    }

    /// Converts to a 0-based pool position. Positive values are 1-based,
    /// negative values count back from the end of the pool as it was when
    /// the face was read.
    pub fn resolve(&self) -> Option<usize> {
        if self.value > 0 {
            return usize::try_from(self.value - 1).ok();
        }

        let resolved = self.pool_len as i64 + self.value;
        if self.value == 0 || resolved < 0 {
            return None;
        }

        return Some(resolved as usize);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    pub vertex: Index,
    pub texcoord: Option<Index>,
    pub normal: Option<Index>,
}

/// A triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub corners: [Corner; 3],
}

impl Face {
    pub fn has_normals(&self) -> bool {
        return self.corners[0].normal.is_some();
    }

    pub fn has_texcoords(&self) -> bool {
        return self.corners[0].texcoord.is_some();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceSyntax {
    /// `v//vn`
    VertexNormal,
    /// `v/vt`
    VertexTexcoord,
    /// `v/vt/vn`
    VertexTexcoordNormal,
}

impl FaceSyntax {
    /// Picks the record syntax of a whole `f` line body. `//` wins over the
    /// slash count.
    pub fn classify(records: &str) -> Option<FaceSyntax> {
        if records.contains("//") {
            return Some(FaceSyntax::VertexNormal);
        }

        match records.matches('/').count() {
            3 => Some(FaceSyntax::VertexTexcoord),
            6 => Some(FaceSyntax::VertexTexcoordNormal),
            _ => None,
        }
    }
}

/// Current pool sizes, captured for every index of a face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolLens {
    pub positions: usize,
    pub texcoords: usize,
    pub normals: usize,
}

/// Parses the three records of an `f` line. Returns `None` on any shape or
/// number mismatch.
pub fn parse_face(records: &str, lens: PoolLens) -> Option<Face> {
    let syntax = FaceSyntax::classify(records)?;

    let mut parts = records.split_ascii_whitespace();
    let mut corner = || parse_corner(parts.next()?, syntax, lens);
    let corners = [corner()?, corner()?, corner()?];

    if parts.next().is_some() {
        return None;
    }

    return Some(Face { corners });
}

fn parse_corner(record: &str, syntax: FaceSyntax, lens: PoolLens) -> Option<Corner> {
    let index = |field: &str, len: usize| -> Option<Index> {
        let value: i64 = field.parse().ok()?;
        if value == 0 {
            return None;
        }
        return Some(Index::new(value, len));
    };

    let corner = match syntax {
        FaceSyntax::VertexNormal => {
            let (v, vn) = record.split_once("//")?;
            Corner {
                vertex: index(v, lens.positions)?,
                texcoord: None,
                normal: Some(index(vn, lens.normals)?),
            }
        }
        FaceSyntax::VertexTexcoord => {
            let (v, vt) = record.split_once('/')?;
            Corner {
                vertex: index(v, lens.positions)?,
                texcoord: Some(index(vt, lens.texcoords)?),
                normal: None,
            }
        }
        FaceSyntax::VertexTexcoordNormal => {
            let mut fields = record.splitn(3, '/');
            let (v, vt, vn) = (fields.next()?, fields.next()?, fields.next()?);
            Corner {
                vertex: index(v, lens.positions)?,
                texcoord: Some(index(vt, lens.texcoords)?),
                normal: Some(index(vn, lens.normals)?),
            }
        }
    };

    return Some(corner);
}

#[cfg(test)]
mod tests {
    use super::*;

    const LENS: PoolLens = PoolLens {
        positions: 10,
        texcoords: 10,
        normals: 10,
    };

    #[test]
    fn classification_priority() {
        assert_eq!(FaceSyntax::classify("1//2 3//4 5//6"), Some(FaceSyntax::VertexNormal));
        assert_eq!(FaceSyntax::classify("1/2 3/4 5/6"), Some(FaceSyntax::VertexTexcoord));
        assert_eq!(
            FaceSyntax::classify("1/2/3 4/5/6 7/8/9"),
            Some(FaceSyntax::VertexTexcoordNormal)
        );
        assert_eq!(FaceSyntax::classify("1 2 3"), None);
        assert_eq!(FaceSyntax::classify("1/2/3/4"), Some(FaceSyntax::VertexTexcoord));
        assert_eq!(FaceSyntax::classify("1/2 3/4 5/6 7/8"), None);
    }

    #[test]
    fn vertex_normal_records() {
        let face = parse_face("1//2 3//4 5//6", LENS).unwrap();
        assert!(face.has_normals());
        assert!(!face.has_texcoords());
        assert_eq!(face.corners[1].vertex.value(), 3);
        assert_eq!(face.corners[1].normal.unwrap().value(), 4);
        assert_eq!(face.corners[2].texcoord, None);
    }

    #[test]
    fn vertex_texcoord_records() {
        let face = parse_face("1/2 3/4 5/6", LENS).unwrap();
        assert!(!face.has_normals());
        assert!(face.has_texcoords());
        assert_eq!(face.corners[2].vertex.value(), 5);
        assert_eq!(face.corners[2].texcoord.unwrap().value(), 6);
    }

    #[test]
    fn full_records() {
        let face = parse_face("1/2/3 4/5/6 7/8/9", LENS).unwrap();
        let values: Vec<_> = face
            .corners
            .iter()
            .map(|c| (c.vertex.value(), c.texcoord.unwrap().value(), c.normal.unwrap().value()))
            .collect();
        assert_eq!(values, vec![(1, 2, 3), (4, 5, 6), (7, 8, 9)]);
    }

    #[test]
    fn shape_mismatches_are_rejected() {
        assert_eq!(parse_face("1 2 3", LENS), None);
        assert_eq!(parse_face("1/2/3/4", LENS), None);
        // three slashes spread unevenly over the records
        assert_eq!(parse_face("1/2/3 4/5 6", LENS), None);
        assert_eq!(parse_face("1//2 3//4", LENS), None);
        assert_eq!(parse_face("1//2 3//4 5//6 7//8", LENS), None);
        assert_eq!(parse_face("a/2 3/4 5/6", LENS), None);
        assert_eq!(parse_face("0/1 2/3 4/5", LENS), None);
        assert_eq!(parse_face("1//2 3//x 5//6", LENS), None);
    }

    #[test]
    fn negative_indices_count_back_from_the_captured_length() {
        let index = Index::new(-1, 4);
        assert_eq!(index.resolve(), Some(3));

        let index = Index::new(-4, 4);
        assert_eq!(index.resolve(), Some(0));

        let index = Index::new(-5, 4);
        assert_eq!(index.resolve(), None);

        let index = Index::new(1, 0);
        assert_eq!(index.resolve(), Some(0));

        let face = parse_face("-3/-1 -2/-1 -1/-1", PoolLens { positions: 3, texcoords: 1, normals: 0 })
            .unwrap();
        let positions: Vec<_> = face.corners.iter().map(|c| c.vertex.resolve()).collect();
        assert_eq!(positions, vec![Some(0), Some(1), Some(2)]);
        assert_eq!(face.corners[0].texcoord.unwrap().resolve(), Some(0));
    }
}
