/// STL file parser for binary and ASCII formats
use std::path::Path;

use nalgebra::Point3;
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::many0,
    number::complete::double,
    sequence::preceded,
    IResult,
};
use thiserror::Error;
use tracing::info;

use crate::geometry::{Mesh, Triangle};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

#[derive(Debug, Error)]
pub enum StlError {
    #[error("file too small to be a valid STL ({0} bytes)")]
    TooShort(usize),

    #[error("unexpected end of file: header declares {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("failed to parse ASCII STL: {0}")]
    Ascii(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooShort(data.len()));
    }

    let body = &data[HEADER_LEN..];
    let triangle_count = u32::from_le_bytes([body[0], body[1], body[2], body[3]]) as usize;
    let facets = &body[4..];

    let expected = HEADER_LEN + 4 + triangle_count * FACET_LEN;
    if facets.len() < triangle_count * FACET_LEN {
        return Err(StlError::Truncated {
            expected,
            actual: data.len(),
        });
    }

    let mut mesh = Mesh::with_capacity(triangle_count);
    for facet in facets.chunks_exact(FACET_LEN).take(triangle_count) {
        // 12 bytes of normal, 3 vertices, 2 attribute bytes
        let read = |i: usize| {
            let at = 12 + i * 4;
            f32::from_le_bytes([facet[at], facet[at + 1], facet[at + 2], facet[at + 3]]) as f64
        };
        let vertex = |v: usize| Point3::new(read(v * 3), read(v * 3 + 1), read(v * 3 + 2));
        mesh.add_triangle(Triangle::new(vertex(0), vertex(1), vertex(2)));
    }

    Ok(mesh)
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, StlError> {
    match parse_ascii_stl_impl(input) {
        Ok((_, mesh)) => Ok(mesh),
        Err(e) => Err(StlError::Ascii(format!("{:?}", e))),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Mesh> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = not_line_ending(input)?; // Optional name
    let (input, triangles) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;

    let mut mesh = Mesh::with_capacity(triangles.len());
    for triangle in triangles {
        mesh.add_triangle(triangle);
    }

    Ok((input, mesh))
}

fn parse_facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    // normals are not needed for wireframes
    let (input, _) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_vertex(input)?;
    let (input, v2) = parse_vertex(input)?;
    let (input, v3) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, Triangle::new(v1, v2, v3)))
}

fn parse_vertex(input: &str) -> IResult<&str, Point3<f64>> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    parse_vector3(input)
}

fn parse_vector3(input: &str) -> IResult<&str, Point3<f64>> {
    let (input, _) = multispace0(input)?;
    let (input, x) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = double(input)?;
    Ok((input, Point3::new(x, y, z)))
}

/// Detect and parse STL data (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh, StlError> {
    // binary headers may also start with "solid", so fall back on failure
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data)
}

/// Read and parse an STL file from disk
pub fn load_stl(path: impl AsRef<Path>) -> Result<Mesh, StlError> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let mesh = parse_stl(&data)?;
    info!(path = %path.display(), triangles = mesh.triangles.len(), "loaded STL");
    Ok(mesh)
}
