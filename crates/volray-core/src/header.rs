//! Structured-points header parsing.
//!
//! The header is the first [`HEADER_LINE_COUNT`] lines of the file:
//!
//! ```text
//! # vtk DataFile Version 3.0
//! comment
//! BINARY
//! DATASET STRUCTURED_POINTS
//! DIMENSIONS 128 128 128
//! ORIGIN 0.0 0.0 0.0
//! SPACING 1.0 1.0 1.0
//! POINT_DATA 2097152
//! SCALARS image_data unsigned_char
//! LOOKUP_TABLE default
//! ```
//!
//! Directives may appear in any order after the signature line.

use std::str::FromStr;

use glam::{UVec3, Vec3};

use crate::error::{FormatError, FormatResult};
use crate::scalar::ScalarType;

/// Number of header lines preceding the sample data.
pub const HEADER_LINE_COUNT: usize = 10;

/// Signature the first header line must start with.
pub const MAGIC: &str = "# vtk";

/// How the samples following the header are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Tightly packed big-endian samples.
    Binary,
    /// Whitespace-separated decimal literals.
    Ascii,
}

/// Metadata read from a volume header.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeHeader {
    pub scalar_type: ScalarType,
    pub dimensions: UVec3,
    pub origin: Vec3,
    pub spacing: Vec3,
    pub encoding: Encoding,
}

impl VolumeHeader {
    /// Parses the header lines.
    ///
    /// Every field is validated before a header is returned, so a failed parse
    /// never yields a partially filled value.
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> FormatResult<Self> {
        let first = lines.first().map(AsRef::<str>::as_ref).unwrap_or_default();
        if !first.starts_with(MAGIC) {
            return Err(FormatError::InvalidMagic);
        }

        let mut scalar_type = None;
        let mut dimensions = None;
        let mut origin = None;
        let mut spacing = None;

        for line in lines.iter().map(AsRef::<str>::as_ref) {
            if line.starts_with("SCALARS") {
                scalar_type = Some(parse_scalar_type(line)?);
            } else if line.starts_with("DIMENSIONS") {
                let [x, y, z] = parse_triple::<u32>(line, "dimensions")?;
                dimensions = Some(UVec3::new(x, y, z));
            } else if line.starts_with("ORIGIN") {
                origin = Some(Vec3::from_array(parse_triple::<f32>(line, "origin")?));
            } else if line.starts_with("SPACING") {
                spacing = Some(Vec3::from_array(parse_triple::<f32>(line, "spacing")?));
            }
        }

        Ok(Self {
            scalar_type: scalar_type.ok_or(FormatError::MissingDirective("SCALARS"))?,
            dimensions: dimensions.ok_or(FormatError::MissingDirective("DIMENSIONS"))?,
            origin: origin.ok_or(FormatError::MissingDirective("ORIGIN"))?,
            spacing: spacing.ok_or(FormatError::MissingDirective("SPACING"))?,
            encoding: parse_encoding(lines)?,
        })
    }

    /// Number of samples declared by the dimensions.
    pub fn element_count(&self) -> FormatResult<usize> {
        let overflow = || FormatError::SizeOverflow(self.dimensions.to_array());
        let count = u64::from(self.dimensions.x)
            .checked_mul(u64::from(self.dimensions.y))
            .and_then(|n| n.checked_mul(u64::from(self.dimensions.z)))
            .ok_or_else(overflow)?;
        usize::try_from(count).map_err(|_| overflow())
    }

    /// Size of the sample payload in bytes.
    pub fn payload_size(&self) -> FormatResult<usize> {
        self.element_count()?
            .checked_mul(self.scalar_type.size())
            .ok_or(FormatError::SizeOverflow(self.dimensions.to_array()))
    }
}

fn parse_scalar_type(line: &str) -> FormatResult<ScalarType> {
    let keyword = line
        .split_whitespace()
        .nth(2)
        .ok_or_else(|| FormatError::MalformedDirective {
            field: "data type",
            line: line.to_string(),
        })?;
    ScalarType::from_keyword(keyword)
        .ok_or_else(|| FormatError::UnsupportedScalarType(keyword.to_string()))
}

fn parse_triple<T: FromStr>(line: &str, field: &'static str) -> FormatResult<[T; 3]> {
    let malformed = || FormatError::MalformedDirective {
        field,
        line: line.to_string(),
    };
    let mut values = line.split_whitespace().skip(1).map(str::parse::<T>);
    let mut next = || values.next().and_then(std::result::Result::ok).ok_or_else(malformed);
    Ok([next()?, next()?, next()?])
}

/// The first encoding marker in header order wins.
fn parse_encoding<S: AsRef<str>>(lines: &[S]) -> FormatResult<Encoding> {
    lines
        .iter()
        .map(AsRef::<str>::as_ref)
        .find_map(|line| {
            if line.starts_with("BINARY") {
                Some(Encoding::Binary)
            } else if line.starts_with("ASCII") {
                Some(Encoding::Ascii)
            } else {
                None
            }
        })
        .ok_or(FormatError::MissingEncoding)
}
