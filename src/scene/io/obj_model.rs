use std::path::Path;

use thiserror::Error;

use crate::{
    math::{point::Point, tuple::Tuple},
    scene::object::primitive::{
        mesh::{MeshError, TriangleMesh},
        triangle::CullMode,
    },
};

#[derive(Debug, Error)]
pub enum ObjParseError {
    #[error("line {line}: vertex needs three numeric coordinates")]
    InvalidVertex { line: usize },
    #[error("line {line}: invalid face index `{token}`")]
    InvalidIndex { line: usize, token: String },
    #[error("line {line}: face index {index} refers to a missing vertex")]
    MissingVertex { line: usize, index: i64 },
    #[error("line {line}: face needs at least three vertices")]
    TooFewVertices { line: usize },
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error("cannot read obj file: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads `v` and `f` records into an indexed triangle list.
/// Polygons are fan-triangulated, texture and normal references in faces are skipped.
pub struct ObjModelParser {
    ignored: usize,
    vertices: Vec<Point>,
    indices: Vec<usize>,
}

impl ObjModelParser {
    pub fn new() -> ObjModelParser {
        ObjModelParser {
            ignored: 0,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Count of lines that were not vertices or faces
    pub fn ignored(&self) -> usize {
        self.ignored
    }

    pub fn vertices(&self) -> &[Point] {
        self.vertices.as_ref()
    }

    pub fn indices(&self) -> &[usize] {
        self.indices.as_ref()
    }

    fn fan_triangulation(&mut self, vertex_indices: &[usize]) {
        let first = vertex_indices[0];
        for pair in vertex_indices[1..].windows(2) {
            self.indices.extend([first, pair[0], pair[1]]);
        }
    }

    /// Resolves a 1-based or negative (relative to the end) index.
    fn vertex_index(&self, token: &str, line: usize) -> Result<usize, ObjParseError> {
        let vertex = token.split('/').next().unwrap_or_default();
        let index: i64 = vertex.parse().map_err(|_| ObjParseError::InvalidIndex {
            line,
            token: token.to_string(),
        })?;

        let count = self.vertices.len() as i64;
        let resolved = if index < 0 { count + index } else { index - 1 };
        if index == 0 || resolved < 0 || resolved >= count {
            return Err(ObjParseError::MissingVertex { line, index });
        }
        Ok(resolved as usize)
    }

    fn face<'a>(
        &mut self,
        iter: impl Iterator<Item = &'a str>,
        line: usize,
    ) -> Result<(), ObjParseError> {
        let vertex_indices = iter
            .map(|token| self.vertex_index(token, line))
            .collect::<Result<Vec<_>, _>>()?;

        if vertex_indices.len() < 3 {
            return Err(ObjParseError::TooFewVertices { line });
        }
        self.fan_triangulation(&vertex_indices);
        Ok(())
    }

    fn add_vertex<'a>(
        &mut self,
        mut iter: impl Iterator<Item = &'a str>,
        line: usize,
    ) -> Result<(), ObjParseError> {
        let mut coordinate = || -> Result<f64, ObjParseError> {
            iter.next()
                .and_then(|token| token.parse().ok())
                .ok_or(ObjParseError::InvalidVertex { line })
        };
        let (x, y, z) = (coordinate()?, coordinate()?, coordinate()?);
        self.vertices.push(Point::new(x, y, z));
        Ok(())
    }

    fn parse_line(&mut self, line: &str, line_number: usize) -> Result<(), ObjParseError> {
        if line.starts_with('#') || line.is_empty() {
            return Ok(());
        }

        let mut iter = line.split_whitespace();
        match iter.next() {
            Some("v") => self.add_vertex(iter, line_number)?,
            Some("f") => self.face(iter, line_number)?,
            _ => {
                self.ignored += 1;
            }
        }
        Ok(())
    }

    pub fn not_consuming_parse(&mut self, source: &str) -> Result<(), ObjParseError> {
        source
            .lines()
            .enumerate()
            .try_for_each(|(id, line)| self.parse_line(line.trim(), id + 1))
    }

    pub fn into_mesh(
        self,
        cull_mode: CullMode,
        material_index: usize,
    ) -> Result<TriangleMesh, ObjParseError> {
        if self.ignored > 0 {
            log::debug!("obj parser skipped {} lines", self.ignored);
        }
        Ok(TriangleMesh::new(
            self.vertices,
            self.indices,
            cull_mode,
            material_index,
        )?)
    }

    pub fn parse_to_mesh(
        source: &str,
        cull_mode: CullMode,
        material_index: usize,
    ) -> Result<TriangleMesh, ObjParseError> {
        let mut parser = Self::new();
        parser.not_consuming_parse(source)?;
        parser.into_mesh(cull_mode, material_index)
    }

    pub fn load_mesh(
        path: impl AsRef<Path>,
        cull_mode: CullMode,
        material_index: usize,
    ) -> Result<TriangleMesh, ObjParseError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse_to_mesh(&source, cull_mode, material_index)
    }
}

impl Default for ObjModelParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assert_approx_eq_low_prec,
        math::vector::Vector,
        render::ray::Ray,
    };

    #[test]
    fn ignoring_unrecognized_lines() {
        let data = r#"
            There was a young lady named Bright
            who traveled much faster than light.
            She set out one day
            in a relative way,
            and came back the previous night.
        "#;
        let mut parser = ObjModelParser::new();
        parser.not_consuming_parse(data).unwrap();
        assert_eq!(parser.ignored(), 5);
    }

    #[test]
    fn parser_records_vertices() {
        let data = r#"
            v -1 1 0
            v -1.0000 0.5000 0.0000
            v 1 0 0
            v 1 1 0
        "#;
        let mut parser = ObjModelParser::new();
        parser.not_consuming_parse(data).unwrap();

        assert_eq!(parser.vertices().len(), 4);
        assert_approx_eq_low_prec!(parser.vertices()[0], Point::new(-1.0, 1.0, 0.0));
        assert_approx_eq_low_prec!(parser.vertices()[1], Point::new(-1.0, 0.5, 0.0));
        assert_approx_eq_low_prec!(parser.vertices()[2], Point::new(1.0, 0.0, 0.0));
        assert_approx_eq_low_prec!(parser.vertices()[3], Point::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn parsing_triangle_faces() {
        let data = r#"
            v -1 1 0
            v -1 0 0
            v 1 0 0
            v 1 1 0

            f 1 2 3
            f 1 3 4
        "#;
        let mut parser = ObjModelParser::new();
        parser.not_consuming_parse(data).unwrap();

        assert_eq!(parser.indices(), &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn triangulating_polygons() {
        let data = r#"
            v -1 1 0
            v -1 0 0
            v 1 0 0
            v 1 1 0
            v 0 2 0
            f 1 2 3 4 5
        "#;
        let mut parser = ObjModelParser::new();
        parser.not_consuming_parse(data).unwrap();

        assert_eq!(parser.indices(), &[0, 1, 2, 0, 2, 3, 0, 3, 4]);
    }

    #[test]
    fn faces_with_texture_and_normal_references() {
        let data = r#"
            v 0 1 0
            v -1 0 0
            v 1 0 0
            vn 0 0 1
            f 1//1 2//1 3//1
            f 1/4/1 2/5/1 -1/6/1
        "#;
        let mut parser = ObjModelParser::new();
        parser.not_consuming_parse(data).unwrap();

        assert_eq!(parser.indices(), &[0, 1, 2, 0, 1, 2]);
        assert_eq!(parser.ignored(), 1);
    }

    #[test]
    fn parsed_mesh_is_hittable() {
        let data = r#"
            v 0 1 0
            v 1 0 0
            v -1 0 0
            f 1 2 3
        "#;
        let mesh = ObjModelParser::parse_to_mesh(data, CullMode::BackFace, 2).unwrap();

        assert_eq!(mesh.triangle_count(), 1);
        assert_approx_eq_low_prec!(mesh.transformed_normals()[0], Vector::new(0., 0., -1.));
        let hit = mesh
            .hit(&Ray::new(Point::new(0., 0.5, -1.), Vector::unit_z()))
            .unwrap();
        assert_eq!(hit.material_index, 2);
    }

    #[test]
    fn bad_vertex_reports_line() {
        let error = ObjModelParser::parse_to_mesh("v 1 2\n", CullMode::None, 0).unwrap_err();
        assert!(matches!(error, ObjParseError::InvalidVertex { line: 1 }));
    }

    #[test]
    fn face_before_vertices_is_rejected() {
        let data = "v 0 0 0\nv 1 0 0\nf 1 2 3\n";
        let error = ObjModelParser::parse_to_mesh(data, CullMode::None, 0).unwrap_err();
        assert!(matches!(
            error,
            ObjParseError::MissingVertex { line: 3, index: 3 }
        ));
    }

    #[test]
    fn zero_index_and_garbage_are_rejected() {
        let data = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n";
        assert!(matches!(
            ObjModelParser::parse_to_mesh(data, CullMode::None, 0),
            Err(ObjParseError::MissingVertex { line: 4, index: 0 })
        ));

        let data = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 a 2\n";
        assert!(matches!(
            ObjModelParser::parse_to_mesh(data, CullMode::None, 0),
            Err(ObjParseError::InvalidIndex { line: 4, .. })
        ));
    }

    #[test]
    fn two_vertex_face_is_rejected() {
        let data = "v 0 0 0\nv 1 0 0\nf 1 2\n";
        assert!(matches!(
            ObjModelParser::parse_to_mesh(data, CullMode::None, 0),
            Err(ObjParseError::TooFewVertices { line: 3 })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = ObjModelParser::load_mesh("does/not/exist.obj", CullMode::None, 0);
        assert!(matches!(result, Err(ObjParseError::Io(_))));
    }
}
