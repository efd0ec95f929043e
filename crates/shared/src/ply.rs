//! Binary PLY codec used as the wire format for all remote mesh services.
//!
//! The writer always emits the canonical layout:
//!
//! ```text
//! ply
//! format binary_little_endian 1.0
//! element vertex <n>
//! property float x
//! property float y
//! property float z
//! element face <m>
//! property list uchar uint vertex_indices
//! end_header
//! ```
//!
//! followed by `n` records of three little-endian `f32` and `m` records of a
//! one-byte arity (always 3) plus three little-endian `u32` indices.
//!
//! The reader is tolerant: vertex records may carry extra properties (colors,
//! normals, quality) which are skipped, face indices may use any integer width
//! or signedness, and face records may carry trailing scalar properties.
//! Only triangles are accepted.

use crate::error::FormatError;
use crate::Geometry;

const MAGIC: &str = "ply";
const HEADER_END: &[u8] = b"end_header\n";
const BINARY_LE: &str = "binary_little_endian";
const TRIANGLE_ARITY: u8 = 3;

/// Scalar property type as declared in a PLY header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Float,
    Double,
    /// Unrecognized type name, read as 4 bytes.
    Other,
}

impl ScalarType {
    /// Map a header type name (including the `int8`..`float64` aliases).
    pub fn from_name(name: &str) -> Self {
        match name {
            "char" | "int8" => Self::Char,
            "uchar" | "uint8" => Self::UChar,
            "short" | "int16" => Self::Short,
            "ushort" | "uint16" => Self::UShort,
            "int" | "int32" => Self::Int,
            "uint" | "uint32" => Self::UInt,
            "float" | "float32" => Self::Float,
            "double" | "float64" => Self::Double,
            other => {
                tracing::debug!("unknown PLY type `{other}`, assuming 4 bytes");
                Self::Other
            }
        }
    }

    /// Encoded size in bytes.
    pub fn size(self) -> usize {
        match self {
            Self::Char | Self::UChar => 1,
            Self::Short | Self::UShort => 2,
            Self::Int | Self::UInt | Self::Float | Self::Other => 4,
            Self::Double => 8,
        }
    }
}

/// One property of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyDef {
    Scalar {
        ty: ScalarType,
        name: String,
    },
    List {
        count: ScalarType,
        item: ScalarType,
        name: String,
    },
}

impl PropertyDef {
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar { name, .. } | Self::List { name, .. } => name,
        }
    }
}

/// An `element` declaration with its ordered properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDef {
    pub name: String,
    pub count: usize,
    pub properties: Vec<PropertyDef>,
    /// Header line the element was declared on (1-based).
    pub line: usize,
}

/// Parsed PLY header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub elements: Vec<ElementDef>,
    /// Offset of the first payload byte (just past `end_header\n`).
    pub payload_offset: usize,
}

impl Header {
    pub fn element(&self, name: &str) -> Option<&ElementDef> {
        self.elements.iter().find(|e| e.name == name)
    }
}

// ── Encoding ───────────────────────────────────────────────────

/// Encode a vertex/face pair as a canonical binary PLY document.
///
/// Inputs are expected to satisfy the buffer invariants; a trailing partial
/// vertex or face is ignored rather than written.
pub fn encode(vertices: &[f32], faces: &[u32]) -> Vec<u8> {
    let vertex_count = vertices.len() / 3;
    let face_count = faces.len() / 3;

    let header = format!(
        "{MAGIC}\n\
         format {BINARY_LE} 1.0\n\
         element vertex {vertex_count}\n\
         property float x\n\
         property float y\n\
         property float z\n\
         element face {face_count}\n\
         property list uchar uint vertex_indices\n\
         end_header\n"
    );

    let mut out = Vec::with_capacity(header.len() + vertex_count * 12 + face_count * 13);
    out.extend_from_slice(header.as_bytes());

    for v in &vertices[..vertex_count * 3] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    for tri in faces.chunks_exact(3) {
        out.push(TRIANGLE_ARITY);
        for index in tri {
            out.extend_from_slice(&index.to_le_bytes());
        }
    }

    out
}

/// Encode a geometry snapshot.
pub fn encode_geometry(geometry: &Geometry) -> Vec<u8> {
    encode(&geometry.vertices, &geometry.faces)
}

// ── Header parsing ─────────────────────────────────────────────

/// Locate the header terminator and return the payload offset.
fn find_header_end(bytes: &[u8]) -> Option<usize> {
    bytes
        .windows(HEADER_END.len())
        .position(|w| w == HEADER_END)
        .map(|pos| pos + HEADER_END.len())
}

/// Parse the ASCII header of a PLY document.
pub fn parse_header(bytes: &[u8]) -> Result<Header, FormatError> {
    let payload_offset = find_header_end(bytes).ok_or(FormatError::MissingHeaderEnd)?;
    let text = std::str::from_utf8(&bytes[..payload_offset])
        .map_err(|_| FormatError::HeaderEncoding)?;

    let mut elements: Vec<ElementDef> = Vec::new();
    let mut saw_magic = false;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let mut tokens = raw.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        if !saw_magic {
            if keyword != MAGIC {
                return Err(FormatError::header(line_no, "missing `ply` magic"));
            }
            saw_magic = true;
            continue;
        }

        match keyword {
            "format" => {
                let format = tokens.next().unwrap_or_default();
                if format != BINARY_LE {
                    return Err(FormatError::UnsupportedFormat(format.to_string()));
                }
            }
            "comment" | "obj_info" | "end_header" => {}
            "element" => {
                let (Some(name), Some(count)) = (tokens.next(), tokens.next()) else {
                    return Err(FormatError::header(line_no, "expected `element <name> <count>`"));
                };
                let count = count.parse::<usize>().map_err(|_| {
                    FormatError::header(line_no, format!("invalid element count `{count}`"))
                })?;
                elements.push(ElementDef {
                    name: name.to_string(),
                    count,
                    properties: Vec::new(),
                    line: line_no,
                });
            }
            "property" => {
                let Some(element) = elements.last_mut() else {
                    return Err(FormatError::header(line_no, "property before any element"));
                };
                let property = parse_property(line_no, tokens.collect())?;
                element.properties.push(property);
            }
            other => {
                tracing::debug!("ignoring PLY header keyword `{other}` on line {line_no}");
            }
        }
    }

    if !saw_magic {
        return Err(FormatError::header(1, "missing `ply` magic"));
    }

    Ok(Header {
        elements,
        payload_offset,
    })
}

fn parse_property(line_no: usize, tokens: Vec<&str>) -> Result<PropertyDef, FormatError> {
    match tokens.as_slice() {
        ["list", count, item, name] => Ok(PropertyDef::List {
            count: ScalarType::from_name(count),
            item: ScalarType::from_name(item),
            name: name.to_string(),
        }),
        [ty, name] if *ty != "list" => Ok(PropertyDef::Scalar {
            ty: ScalarType::from_name(ty),
            name: name.to_string(),
        }),
        _ => Err(FormatError::header(line_no, "malformed property declaration")),
    }
}

// ── Payload decoding ───────────────────────────────────────────

/// Forward-only reader over the binary payload.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8], pos: usize) -> Self {
        Self { bytes, pos }
    }

    fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        if self.remaining() < n {
            return Err(FormatError::UnexpectedEof {
                position: self.pos,
                needed: n,
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn skip(&mut self, n: usize) -> Result<(), FormatError> {
        self.take(n).map(|_| ())
    }

    /// Read a list length. Negative signed counts map to huge values and are
    /// rejected by the caller.
    fn read_count(&mut self, ty: ScalarType) -> Result<u64, FormatError> {
        let b = self.take(ty.size())?;
        Ok(match ty {
            ScalarType::Char => i8::from_le_bytes([b[0]]) as i64 as u64,
            ScalarType::UChar => u64::from(b[0]),
            ScalarType::Short => i16::from_le_bytes([b[0], b[1]]) as i64 as u64,
            ScalarType::UShort => u64::from(u16::from_le_bytes([b[0], b[1]])),
            ScalarType::Int => i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as i64 as u64,
            ScalarType::UInt | ScalarType::Other => {
                u64::from(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            }
            ScalarType::Float => f32::from_le_bytes([b[0], b[1], b[2], b[3]]) as u64,
            ScalarType::Double => f64::from_le_bytes(eight(b)) as u64,
        })
    }

    /// Read a face index; signed values are reinterpreted as unsigned.
    fn read_index(&mut self, ty: ScalarType) -> Result<u32, FormatError> {
        let b = self.take(ty.size())?;
        Ok(match ty {
            ScalarType::Char => i8::from_le_bytes([b[0]]) as i32 as u32,
            ScalarType::UChar => u32::from(b[0]),
            ScalarType::Short => i16::from_le_bytes([b[0], b[1]]) as i32 as u32,
            ScalarType::UShort => u32::from(u16::from_le_bytes([b[0], b[1]])),
            ScalarType::Int => i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as u32,
            ScalarType::UInt | ScalarType::Other => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            ScalarType::Float => f32::from_le_bytes([b[0], b[1], b[2], b[3]]) as u32,
            ScalarType::Double => f64::from_le_bytes(eight(b)) as u32,
        })
    }
}

fn eight(b: &[u8]) -> [u8; 8] {
    [b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]
}

/// Read one coordinate of type `ty` from the start of `b`.
fn coord(ty: ScalarType, b: &[u8]) -> f32 {
    match ty {
        ScalarType::Char => f32::from(i8::from_le_bytes([b[0]])),
        ScalarType::UChar => f32::from(b[0]),
        ScalarType::Short => f32::from(i16::from_le_bytes([b[0], b[1]])),
        ScalarType::UShort => f32::from(u16::from_le_bytes([b[0], b[1]])),
        ScalarType::Int => i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f32,
        ScalarType::UInt => u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f32,
        ScalarType::Float | ScalarType::Other => f32::from_le_bytes([b[0], b[1], b[2], b[3]]),
        ScalarType::Double => f64::from_le_bytes(eight(b)) as f32,
    }
}

/// Decode a binary little-endian PLY document into a geometry snapshot.
///
/// Only the first three vertex properties are read (as x, y, z); the cursor
/// advances by the full declared record width so extra properties are skipped.
/// Coordinates are read with their declared scalar type and converted to
/// f32, so `float` files decode bit-exact and integer or `double` files are
/// widened or narrowed rather than reinterpreted.
pub fn decode(bytes: &[u8]) -> Result<Geometry, FormatError> {
    let header = parse_header(bytes)?;
    let mut cursor = Cursor::new(bytes, header.payload_offset);
    let mut geometry = Geometry::default();

    for element in &header.elements {
        match element.name.as_str() {
            "vertex" => read_vertices(&mut cursor, element, &mut geometry.vertices)?,
            "face" => read_faces(&mut cursor, element, &mut geometry.faces)?,
            _ => skip_element(&mut cursor, element)?,
        }
    }

    tracing::debug!(
        "decoded PLY: {} vertices, {} faces",
        geometry.vertex_count(),
        geometry.face_count()
    );
    Ok(geometry)
}

fn read_vertices(
    cursor: &mut Cursor<'_>,
    element: &ElementDef,
    out: &mut Vec<f32>,
) -> Result<(), FormatError> {
    let mut stride = 0;
    let mut coords: Vec<(usize, ScalarType)> = Vec::with_capacity(3);
    for property in &element.properties {
        match property {
            PropertyDef::Scalar { ty, .. } => {
                if coords.len() < 3 {
                    coords.push((stride, *ty));
                }
                stride += ty.size();
            }
            PropertyDef::List { name, .. } => {
                return Err(FormatError::header(
                    element.line,
                    format!("list property `{name}` in vertex element is not supported"),
                ));
            }
        }
    }
    if coords.len() < 3 && element.count > 0 {
        return Err(FormatError::header(
            element.line,
            "vertex element needs at least three properties",
        ));
    }

    out.reserve(element.count.min(cursor.remaining() / stride.max(1)) * 3);
    for _ in 0..element.count {
        let record = cursor.take(stride)?;
        for &(offset, ty) in &coords {
            out.push(coord(ty, &record[offset..]));
        }
    }
    Ok(())
}

fn read_faces(
    cursor: &mut Cursor<'_>,
    element: &ElementDef,
    out: &mut Vec<u32>,
) -> Result<(), FormatError> {
    let index_list = element
        .properties
        .iter()
        .position(|p| {
            matches!(p, PropertyDef::List { name, .. } if name == "vertex_indices" || name == "vertex_index")
        })
        .or_else(|| {
            element
                .properties
                .iter()
                .position(|p| matches!(p, PropertyDef::List { .. }))
        })
        .ok_or_else(|| {
            FormatError::header(element.line, "face element has no vertex index list")
        })?;

    out.reserve(element.count.min(cursor.remaining() / 13) * 3);
    for face in 0..element.count {
        for (i, property) in element.properties.iter().enumerate() {
            match property {
                PropertyDef::List { count, item, .. } if i == index_list => {
                    let arity = cursor.read_count(*count)?;
                    if arity != u64::from(TRIANGLE_ARITY) {
                        return Err(FormatError::NonTriangularFace { face, arity });
                    }
                    for _ in 0..TRIANGLE_ARITY {
                        out.push(cursor.read_index(*item)?);
                    }
                }
                PropertyDef::List { count, item, .. } => {
                    let n = cursor.read_count(*count)?;
                    let len = list_bytes(n, *item, cursor)?;
                    cursor.skip(len)?;
                }
                PropertyDef::Scalar { ty, .. } => cursor.skip(ty.size())?,
            }
        }
    }
    Ok(())
}

fn skip_element(cursor: &mut Cursor<'_>, element: &ElementDef) -> Result<(), FormatError> {
    tracing::debug!("skipping PLY element `{}` ({} records)", element.name, element.count);
    // Zero-width records occupy no payload bytes.
    if element.properties.is_empty() {
        return Ok(());
    }
    for _ in 0..element.count {
        for property in &element.properties {
            match property {
                PropertyDef::Scalar { ty, .. } => cursor.skip(ty.size())?,
                PropertyDef::List { count, item, .. } => {
                    let n = cursor.read_count(*count)?;
                    let len = list_bytes(n, *item, cursor)?;
                    cursor.skip(len)?;
                }
            }
        }
    }
    Ok(())
}

/// Byte length of a list body, rejecting lengths that overflow the payload.
fn list_bytes(n: u64, item: ScalarType, cursor: &Cursor<'_>) -> Result<usize, FormatError> {
    usize::try_from(n)
        .ok()
        .and_then(|n| n.checked_mul(item.size()))
        .ok_or(FormatError::UnexpectedEof {
            position: cursor.pos,
            needed: usize::MAX,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(header_body: &str, payload: &[u8]) -> Vec<u8> {
        let mut bytes = format!("ply\nformat binary_little_endian 1.0\n{header_body}end_header\n")
            .into_bytes();
        bytes.extend_from_slice(payload);
        bytes
    }

    fn push_f32s(out: &mut Vec<u8>, values: &[f32]) {
        for v in values {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    #[test]
    fn test_roundtrip_tetrahedron() {
        let vertices = vec![
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0,
        ];
        let faces = vec![0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3];
        let decoded = decode(&encode(&vertices, &faces)).unwrap();
        assert_eq!(decoded.vertices, vertices);
        assert_eq!(decoded.faces, faces);
    }

    #[test]
    fn test_roundtrip_preserves_exact_bits() {
        let vertices = vec![f32::MIN_POSITIVE, -0.0, 1.0e-7, 3.402_823e38, -1.5, 0.1];
        let faces = vec![0, 1, 1];
        let decoded = decode(&encode(&vertices, &faces)).unwrap();
        let bits = |v: &[f32]| v.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&decoded.vertices), bits(&vertices));
        assert_eq!(decoded.faces, faces);
    }

    #[test]
    fn test_encode_header_layout() {
        let bytes = encode(&[0.0; 9], &[0, 1, 2]);
        let end = find_header_end(&bytes).unwrap();
        let header = std::str::from_utf8(&bytes[..end]).unwrap();
        assert!(header.contains("format binary_little_endian 1.0\n"));
        assert!(header.contains("element vertex 3\n"));
        assert!(header.contains("element face 1\n"));
        assert!(header.contains("property list uchar uint vertex_indices\n"));
        assert_eq!(bytes.len() - end, 3 * 12 + 13);
        assert_eq!(bytes[end + 36], 3);
    }

    #[test]
    fn test_encode_empty() {
        let decoded = decode(&encode(&[], &[])).unwrap();
        assert!(decoded.vertices.is_empty());
        assert!(decoded.faces.is_empty());
    }

    #[test]
    fn test_decode_skips_vertex_colors() {
        let mut payload = Vec::new();
        for v in [[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]] {
            push_f32s(&mut payload, &v);
            payload.extend_from_slice(&[255, 128, 0]);
        }
        payload.push(3);
        for i in [0u32, 1, 2] {
            payload.extend_from_slice(&i.to_le_bytes());
        }
        let bytes = document(
            "element vertex 3\nproperty float x\nproperty float y\nproperty float z\n\
             property uchar red\nproperty uchar green\nproperty uchar blue\n\
             element face 1\nproperty list uchar uint vertex_indices\n",
            &payload,
        );
        let g = decode(&bytes).unwrap();
        assert_eq!(g.vertices, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(g.faces, vec![0, 1, 2]);
    }

    #[test]
    fn test_decode_signed_indices() {
        let mut payload = Vec::new();
        push_f32s(&mut payload, &[0.0; 12]);
        for face in [[0i32, 1, 2], [1, 3, 2]] {
            payload.push(3);
            for i in face {
                payload.extend_from_slice(&i.to_le_bytes());
            }
        }
        let bytes = document(
            "element vertex 4\nproperty float x\nproperty float y\nproperty float z\n\
             element face 2\nproperty list uchar int vertex_indices\n",
            &payload,
        );
        assert_eq!(decode(&bytes).unwrap().faces, vec![0, 1, 2, 1, 3, 2]);
    }

    #[test]
    fn test_decode_ushort_indices_and_trailing_face_props() {
        let mut payload = Vec::new();
        push_f32s(&mut payload, &[0.0; 9]);
        payload.push(3);
        for i in [2u16, 1, 0] {
            payload.extend_from_slice(&i.to_le_bytes());
        }
        payload.push(7); // flags
        payload.extend_from_slice(&0.5f64.to_le_bytes()); // quality
        let bytes = document(
            "element vertex 3\nproperty float x\nproperty float y\nproperty float z\n\
             element face 1\nproperty list uchar ushort vertex_indices\n\
             property uchar flags\nproperty double quality\n",
            &payload,
        );
        let g = decode(&bytes).unwrap();
        assert_eq!(g.faces, vec![2, 1, 0]);
    }

    #[test]
    fn test_decode_unknown_type_is_four_bytes() {
        let mut payload = Vec::new();
        push_f32s(&mut payload, &[1.0, 2.0, 3.0]);
        payload.extend_from_slice(&[0xAA; 4]);
        push_f32s(&mut payload, &[4.0, 5.0, 6.0]);
        payload.extend_from_slice(&[0xBB; 4]);
        let bytes = document(
            "element vertex 2\nproperty float x\nproperty float y\nproperty float z\n\
             property weird confidence\nelement face 0\nproperty list uchar uint vertex_indices\n",
            &payload,
        );
        let g = decode(&bytes).unwrap();
        assert_eq!(g.vertices, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(g.faces.is_empty());
    }

    #[test]
    fn test_decode_double_coordinates() {
        let mut payload = Vec::new();
        for v in [0.25f64, -1.0, 8.0] {
            payload.extend_from_slice(&v.to_le_bytes());
        }
        let bytes = document(
            "element vertex 1\nproperty double x\nproperty double y\nproperty double z\n",
            &payload,
        );
        assert_eq!(decode(&bytes).unwrap().vertices, vec![0.25, -1.0, 8.0]);
    }

    #[test]
    fn test_decode_quad_is_rejected() {
        let mut payload = Vec::new();
        push_f32s(&mut payload, &[0.0; 12]);
        payload.push(4);
        for i in [0u32, 1, 2, 3] {
            payload.extend_from_slice(&i.to_le_bytes());
        }
        let bytes = document(
            "element vertex 4\nproperty float x\nproperty float y\nproperty float z\n\
             element face 1\nproperty list uchar uint vertex_indices\n",
            &payload,
        );
        assert_eq!(
            decode(&bytes),
            Err(FormatError::NonTriangularFace { face: 0, arity: 4 })
        );
    }

    #[test]
    fn test_decode_missing_header_end() {
        let bytes = b"ply\nformat binary_little_endian 1.0\nelement vertex 0\n".to_vec();
        assert_eq!(decode(&bytes), Err(FormatError::MissingHeaderEnd));
    }

    #[test]
    fn test_decode_truncated_payload() {
        let mut bytes = encode(&[0.0; 9], &[0, 1, 2]);
        bytes.truncate(bytes.len() - 2);
        assert!(matches!(
            decode(&bytes),
            Err(FormatError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_decode_ascii_unsupported() {
        let bytes = b"ply\nformat ascii 1.0\nelement vertex 0\nend_header\n".to_vec();
        assert_eq!(
            decode(&bytes),
            Err(FormatError::UnsupportedFormat("ascii".into()))
        );
    }

    #[test]
    fn test_parse_header_with_comments_and_extra_elements() {
        let bytes = document(
            "comment made by scanner\nelement vertex 2\nproperty float x\nproperty float y\n\
             property float z\nelement face 0\nproperty list uchar uint vertex_indices\n\
             element edge 1\nproperty int vertex1\nproperty int vertex2\n",
            &[],
        );
        let header = parse_header(&bytes).unwrap();
        assert_eq!(header.elements.len(), 3);
        assert_eq!(header.element("vertex").unwrap().count, 2);
        assert_eq!(header.element("edge").unwrap().properties[1].name(), "vertex2");
        assert_eq!(header.payload_offset, bytes.len());
    }

    #[test]
    fn test_decode_huge_element_without_properties() {
        let mut payload = Vec::new();
        push_f32s(&mut payload, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        let bytes = document(
            "element junk 100000000000000
element vertex 3
property float x
             property float y
property float z
",
            &payload,
        );
        let geometry = decode(&bytes).unwrap();
        assert_eq!(geometry.vertex_count(), 3);
    }

    #[test]
    fn test_parse_header_rejects_property_without_element() {
        let bytes = document("property float x\n", &[]);
        assert!(matches!(
            parse_header(&bytes),
            Err(FormatError::InvalidHeader { line: 3, .. })
        ));
    }

    #[test]
    fn test_scalar_sizes() {
        assert_eq!(ScalarType::from_name("uchar").size(), 1);
        assert_eq!(ScalarType::from_name("int16").size(), 2);
        assert_eq!(ScalarType::from_name("float32").size(), 4);
        assert_eq!(ScalarType::from_name("double").size(), 8);
        assert_eq!(ScalarType::from_name("mystery").size(), 4);
    }
}
