//! Expands indexed faces into flat, per-stream vertex arrays.
//!
//! No vertex is shared: every face corner becomes a fresh vertex, so a
//! group of `n` faces always occupies `3 * n` consecutive vertices.

use crate::error::{Error, Result};
use crate::objects::face::Index;
use crate::objects::{Geometry, Group};

/// Where one group's vertices sit in the flat buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRange {
    pub name: String,
    pub start: u32,
    pub count: u32,
    /// Material name as written by `usemtl`, empty when none was set.
    pub material: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub texcoords: Vec<f32>,
    pub ranges: Vec<GroupRange>,
}

#[derive(Debug, Clone, Copy)]
struct Streams {
    normals: bool,
    texcoords: bool,
}

impl MeshBuffers {
    pub fn build(geometry: &Geometry) -> Result<MeshBuffers> {
        let streams = geometry
            .groups
            .iter()
            .map(group_streams)
            .collect::<Result<Vec<_>>>()?;

        let any_normals = streams.iter().any(|s| s.normals);
        let any_texcoords = streams.iter().any(|s| s.texcoords);

        let vertex_count = geometry.face_count() * 3;
        let mut buffers = MeshBuffers {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(if any_normals { vertex_count * 3 } else { 0 }),
            texcoords: Vec::with_capacity(if any_texcoords { vertex_count * 2 } else { 0 }),
            ranges: Vec::with_capacity(geometry.groups.len()),
        };

        let mut start: u32 = 0;
        for (group, streams) in geometry.groups.iter().zip(streams) {
            if !group.faces.is_empty() {
                if any_normals && !streams.normals {
                    log::warn!(target: "asset", "Group '{}' has no normals, filling with zeros", group.name);
                }
                if any_texcoords && !streams.texcoords {
                    log::warn!(target: "asset", "Group '{}' has no texture coordinates, filling with zeros", group.name);
                }
            }

            buffers.expand_group(geometry, group, any_normals, any_texcoords)?;

            let (count, end) = span(&group.name, start, group.faces.len())?;
            buffers.ranges.push(GroupRange {
                name: group.name.clone(),
                start,
                count,
                material: group.material.clone(),
            });
            start = end;
        }

        return Ok(buffers);
    }

    pub fn vertex_count(&self) -> usize {
        return self.positions.len() / 3;
    }

    fn expand_group(
        &mut self,
        geometry: &Geometry,
        group: &Group,
        fill_normals: bool,
        fill_texcoords: bool,
    ) -> Result<()> {
        let pool = &geometry.pool;

        for face in &group.faces {
            for corner in &face.corners {
                let position = pool.positions[resolve(corner.vertex, pool.positions.len(), "position")?];
                self.positions.extend_from_slice(&position);

                match corner.normal {
                    Some(index) => {
                        let normal = pool.normals[resolve(index, pool.normals.len(), "normal")?];
                        self.normals.extend_from_slice(&normal);
                    }
                    None if fill_normals => self.normals.extend_from_slice(&[0.; 3]),
                    None => {}
                }

                match corner.texcoord {
                    Some(index) => {
                        let texcoord =
                            pool.texcoords[resolve(index, pool.texcoords.len(), "texcoord")?];
                        self.texcoords.extend_from_slice(&texcoord);
                    }
                    None if fill_texcoords => self.texcoords.extend_from_slice(&[0.; 2]),
                    None => {}
                }
            }
        }

        return Ok(());
    }
}

/// Decides which optional streams a group carries, rejecting groups whose
/// faces disagree.
fn group_streams(group: &Group) -> Result<Streams> {
    let first = match group.faces.first() {
        Some(face) => face,
        None => {
            return Ok(Streams {
                normals: false,
                texcoords: false,
            })
        }
    };

    let streams = Streams {
        normals: first.has_normals(),
        texcoords: first.has_texcoords(),
    };

    for face in &group.faces {
        if face.has_normals() != streams.normals {
            return Err(Error::InconsistentAttributes {
                group: group.name.clone(),
                attribute: "normals",
            });
        }
        if face.has_texcoords() != streams.texcoords {
            return Err(Error::InconsistentAttributes {
                group: group.name.clone(),
                attribute: "texture coordinates",
            });
        }
    }

    return Ok(streams);
}

/// Vertex count of a group of `faces` triangles placed at `start`, and where
/// the next group begins. Draw ranges are 32-bit.
fn span(group: &str, start: u32, faces: usize) -> Result<(u32, u32)> {
    let too_many = || Error::TooManyVertices {
        group: group.to_string(),
    };

    let count = faces
        .checked_mul(3)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(too_many)?;
    let end = start.checked_add(count).ok_or_else(too_many)?;

    return Ok((count, end));
}

fn resolve(index: Index, len: usize, attribute: &'static str) -> Result<usize> {
    return match index.resolve() {
        Some(i) if i < len => Ok(i),
        _ => Err(Error::IndexOutOfRange {
            attribute,
            index: index.value(),
            len,
        }),
    };
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::Path;

    use super::*;

    fn build(text: &str) -> Result<MeshBuffers> {
        let assets = |_: &Path| -> io::Result<Vec<u8>> { Err(io::ErrorKind::NotFound.into()) };
        let geometry = Geometry::parse(text.as_bytes(), Path::new("m.obj"), &assets)?;
        return MeshBuffers::build(&geometry);
    }

    const QUAD: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3
f 1/1 3/3 4/4
";

    #[test]
    fn textured_quad() {
        let buffers = build(QUAD).unwrap();

        assert_eq!(buffers.positions.len(), 18);
        assert_eq!(buffers.texcoords.len(), 12);
        assert!(buffers.normals.is_empty());
        assert_eq!(buffers.vertex_count(), 6);
        assert_eq!(
            buffers.ranges,
            vec![GroupRange {
                name: "default".to_string(),
                start: 0,
                count: 6,
                material: String::new(),
            }]
        );

        assert_eq!(&buffers.positions[9..12], &[0., 0., 0.]);
        assert_eq!(&buffers.positions[15..18], &[0., 1., 0.]);
        assert_eq!(&buffers.texcoords[4..6], &[1., 1.]);
    }

    #[test]
    fn ranges_partition_the_buffers() {
        let text = "\
v 0 0 0
vn 0 0 1
g A
usemtl Red
f 1//1 1//1 1//1
f 1//1 1//1 1//1
g B
g C
usemtl Blue
f 1//1 1//1 1//1
";
        let buffers = build(text).unwrap();

        let ranges: Vec<_> = buffers
            .ranges
            .iter()
            .map(|r| (r.name.as_str(), r.start, r.count, r.material.as_str()))
            .collect();
        assert_eq!(
            ranges,
            vec![("A", 0, 6, "Red"), ("B", 6, 0, ""), ("C", 6, 3, "Blue")]
        );

        let total: u32 = buffers.ranges.iter().map(|r| r.count).sum();
        assert_eq!(total as usize, buffers.vertex_count());
        assert_eq!(buffers.normals.len(), buffers.positions.len());
    }

    #[test]
    fn relative_indices_use_the_pool_size_of_their_face() {
        let text = "\
v 1 0 0
v 2 0 0
v 3 0 0
f -1//1 -2//1 -3//1
v 4 0 0
f -1//1 1//1 2//1
vn 0 1 0
";
        let buffers = build(text).unwrap();
        let xs: Vec<f32> = buffers.positions.chunks(3).map(|p| p[0]).collect();
        assert_eq!(xs, vec![3., 2., 1., 4., 1., 2.]);
    }

    #[test]
    fn mixed_streams_within_a_group_are_rejected() {
        let text = "v 0 0 0\nvt 0 0\nvn 0 0 1\ng Mixed\nf 1/1 1/1 1/1\nf 1//1 1//1 1//1\n";
        match build(text) {
            Err(Error::InconsistentAttributes { group, attribute }) => {
                assert_eq!(group, "Mixed");
                assert_eq!(attribute, "normals");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn groups_missing_a_stream_are_zero_filled() {
        let text = "v 0 0 0\nvt 0.5 0.5\nvn 0 0 1\ng A\nf 1/1 1/1 1/1\ng B\nf 1//1 1//1 1//1\n";
        let buffers = build(text).unwrap();

        assert_eq!(buffers.vertex_count(), 6);
        assert_eq!(buffers.normals.len(), 18);
        assert_eq!(buffers.texcoords.len(), 12);
        assert_eq!(&buffers.normals[..9], &[0.; 9]);
        assert_eq!(&buffers.normals[9..12], &[0., 0., 1.]);
        assert_eq!(&buffers.texcoords[..2], &[0.5, 0.5]);
        assert_eq!(&buffers.texcoords[6..], &[0.; 6]);
    }

    #[test]
    fn out_of_range_indices_fail() {
        let text = "v 0 0 0\nvt 0 0\nf 1/1 2/1 1/1\n";
        assert!(matches!(
            build(text),
            Err(Error::IndexOutOfRange { attribute: "position", index: 2, len: 1 })
        ));

        let text = "v 0 0 0\nvt 0 0\nf 1/1 1/-2 1/1\n";
        assert!(matches!(
            build(text),
            Err(Error::IndexOutOfRange { attribute: "texcoord", index: -2, len: 1 })
        ));
    }

    #[test]
    fn ranges_past_the_32_bit_vertex_limit_are_rejected() {
        assert_eq!(span("last", u32::MAX - 3, 1).unwrap(), (3, u32::MAX));

        assert!(matches!(
            span("over", u32::MAX - 2, 1),
            Err(Error::TooManyVertices { group }) if group == "over"
        ));
        assert!(matches!(
            span("huge", 0, usize::MAX / 2),
            Err(Error::TooManyVertices { .. })
        ));
    }
}
