/// STL import for binary and ASCII files
use std::path::Path;

use log::{debug, warn};
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{count, many0},
    number::complete::{double, le_f32, le_u16, le_u32},
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::StlError;
use crate::face::Face;
use crate::renderable::RenderableObject;
use crate::vector::Vector;

const HEADER_LEN: usize = 80;
/// Normal, three vertices and the attribute byte count
const FACET_LEN: usize = 50;

fn binary_vertex(input: &[u8]) -> IResult<&[u8], Vector> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Vector::xyz(x as f64, y as f64, z as f64)))
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Vec<Vector>> {
    // The stored normal is ignored; faces derive what they need from vertices
    let (input, _normal) = take(12usize)(input)?;
    let (input, vertices) = count(binary_vertex, 3)(input)?;
    let (input, _attributes) = le_u16(input)?;
    Ok((input, vertices))
}

/// Parse a binary STL file into one node with a face per triangle
pub fn parse_binary_stl(data: &[u8]) -> Result<RenderableObject, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooShort { len: data.len() });
    }

    let (mut rest, declared) = preceded(take(HEADER_LEN), le_u32)(data)
        .map_err(|e: nom::Err<nom::error::Error<&[u8]>>| StlError::Parse(e.to_string()))?;
    let declared = declared as usize;

    let found = rest.len() / FACET_LEN;
    if found < declared {
        return Err(StlError::Truncated { declared, found });
    }

    let mut faces = Vec::with_capacity(declared);
    for _ in 0..declared {
        let (next, vertices) = binary_facet(rest).map_err(|e| StlError::Parse(e.to_string()))?;
        faces.push(Face::new(vertices)?);
        rest = next;
    }

    if !rest.is_empty() {
        warn!(
            "Ignoring {} trailing bytes after {} STL triangles",
            rest.len(),
            declared
        );
    }

    Ok(RenderableObject::with_faces(faces))
}

fn ascii_triple(input: &str) -> IResult<&str, (f64, f64, f64)> {
    tuple((
        preceded(multispace1, double),
        preceded(multispace1, double),
        preceded(multispace1, double),
    ))(input)
}

fn ascii_vertex(input: &str) -> IResult<&str, Vector> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    let (input, (x, y, z)) = ascii_triple(input)?;
    Ok((input, Vector::xyz(x, y, z)))
}

fn ascii_facet(input: &str) -> IResult<&str, Vec<Vector>> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = ascii_triple(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, vertices) = count(ascii_vertex, 3)(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;
    Ok((input, vertices))
}

fn ascii_solid(input: &str) -> IResult<&str, (&str, Vec<Vec<Vector>>)> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, name) = not_line_ending(input)?;
    let (input, facets) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _) = not_line_ending(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, (name.trim(), facets)))
}

/// Parse an ASCII STL file into one node with a face per facet
pub fn parse_ascii_stl(input: &str) -> Result<RenderableObject, StlError> {
    let (_, (name, facets)) = ascii_solid(input).map_err(|e| StlError::Parse(e.to_string()))?;
    debug!("ASCII STL solid {:?} with {} facets", name, facets.len());

    let faces = facets
        .into_iter()
        .map(Face::new)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RenderableObject::with_faces(faces))
}

/// Detect the STL flavor and parse it. Files whose header happens to start
/// with `solid` fall back to the binary reader when ASCII parsing fails.
pub fn parse_stl(data: &[u8]) -> Result<RenderableObject, StlError> {
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            match parse_ascii_stl(text) {
                Ok(node) => return Ok(node),
                Err(e) => debug!("Not an ASCII STL ({}), trying binary", e),
            }
        }
    }

    parse_binary_stl(data)
}

/// Read and parse an STL file from disk
pub fn load_stl(path: impl AsRef<Path>) -> Result<RenderableObject, StlError> {
    let data = std::fs::read(path.as_ref())?;
    let node = parse_stl(&data)?;
    debug!(
        "Loaded {} faces from {}",
        node.faces().len(),
        path.as_ref().display()
    );
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn binary(declared: u32, triangles: &[[f32; 9]]) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_LEN];
        data.extend_from_slice(&declared.to_le_bytes());
        for triangle in triangles {
            data.extend_from_slice(&[0u8; 12]);
            for value in triangle {
                data.extend_from_slice(&value.to_le_bytes());
            }
            data.extend_from_slice(&0u16.to_le_bytes());
        }
        data
    }

    #[test]
    fn test_parse_binary_header() {
        let node = parse_binary_stl(&binary(0, &[])).unwrap();
        assert!(node.faces().is_empty());
    }

    #[test]
    fn test_parse_binary_triangle() {
        let data = binary(1, &[[0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 3.0, 1.5]]);
        let node = parse_stl(&data).unwrap();
        assert_eq!(node.faces().len(), 1);
        let face = &node.faces()[0];
        assert_eq!(face.vertices().len(), 3);
        assert!(face.center().approx_eq(&Vector::xyz(1.0, 1.0, 0.5), EPS));
    }

    #[test]
    fn test_binary_errors() {
        assert!(matches!(
            parse_binary_stl(&[0u8; 10]),
            Err(StlError::TooShort { len: 10 })
        ));

        let data = binary(3, &[[0.0; 9]]);
        assert!(matches!(
            parse_binary_stl(&data),
            Err(StlError::Truncated {
                declared: 3,
                found: 1
            })
        ));
    }

    #[test]
    fn test_parse_ascii_with_name() {
        let text = "solid wedge
  facet normal 0 0 -1
    outer loop
      vertex 0 0 0
      vertex 2 0 0
      vertex 0 2 0
    endloop
  endfacet
  facet normal 0 0 1
    outer loop
      vertex 0 0 1.5e0
      vertex -2 0 1.5
      vertex 0 -2 1.5
    endloop
  endfacet
endsolid wedge
";
        let node = parse_stl(text.as_bytes()).unwrap();
        assert_eq!(node.faces().len(), 2);
        assert!(node.faces()[1].vertices()[1].approx_eq(&Vector::xyz(-2.0, 0.0, 1.5), EPS));
    }

    #[test]
    fn test_solid_header_falls_back_to_binary() {
        let mut data = binary(1, &[[1.0; 9]]);
        data[..5].copy_from_slice(b"solid");
        let node = parse_stl(&data).unwrap();
        assert_eq!(node.faces().len(), 1);
    }

    #[test]
    fn test_malformed_ascii() {
        let text = "solid broken\n  facet normal 0 0 1\n    outer loop\n      vertex 0 0\n";
        assert!(parse_ascii_stl(text).is_err());
    }
}
