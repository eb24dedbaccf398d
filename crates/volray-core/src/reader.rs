//! Structured-points volume file reader.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::{FormatError, FormatResult};
use crate::header::{Encoding, VolumeHeader, HEADER_LINE_COUNT};
use crate::scalar::{with_sample_type, RangeAccumulator, Sample};
use crate::volume::RawVolume;

/// Reads a volume from a file on disk.
///
/// The whole file is parsed before anything is returned; on error no volume
/// is produced.
pub fn read_volume(path: impl AsRef<Path>) -> FormatResult<RawVolume> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let volume = read_volume_from(BufReader::new(file))?;
    log::info!(
        "loaded volume {}: {} {} samples, range [{}, {}]",
        path.display(),
        volume.dimensions(),
        volume.scalar_type(),
        volume.range().0,
        volume.range().1
    );
    Ok(volume)
}

/// Reads a volume from any buffered source.
pub fn read_volume_from<R: BufRead>(mut reader: R) -> FormatResult<RawVolume> {
    let lines = read_header_lines(&mut reader)?;
    let header = VolumeHeader::parse(&lines)?;
    let count = header.element_count()?;
    // Reject overflowing payloads before reading anything.
    header.payload_size()?;

    let (data, range) = with_sample_type!(header.scalar_type, T => match header.encoding {
        Encoding::Binary => decode_binary::<T, _>(&mut reader, count)?,
        Encoding::Ascii => decode_ascii::<T, _>(&mut reader, count)?,
    });

    log::debug!(
        "decoded {count} {} samples ({:?})",
        header.scalar_type,
        header.encoding
    );
    Ok(RawVolume::from_header(&header, range, data))
}

/// Reads the fixed-size header as text. Sample data starts right after it.
fn read_header_lines<R: BufRead>(reader: &mut R) -> FormatResult<Vec<String>> {
    let mut lines = Vec::with_capacity(HEADER_LINE_COUNT);
    let mut buffer = Vec::new();
    for index in 0..HEADER_LINE_COUNT {
        buffer.clear();
        reader.read_until(b'\n', &mut buffer)?;
        let line = String::from_utf8_lossy(&buffer);
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Err(FormatError::MissingHeaderLine { line: index + 1 });
        }
        lines.push(line.to_string());
    }
    Ok(lines)
}

/// Decodes `count` big-endian samples, returning them in host order.
fn decode_binary<T: Sample, R: Read>(
    reader: &mut R,
    count: usize,
) -> FormatResult<(Vec<u8>, (f64, f64))> {
    let expected = count * T::SIZE;
    // Grows with what the file actually holds, not with the declared size.
    let mut data = Vec::new();
    reader.take(expected as u64).read_to_end(&mut data)?;
    if data.len() < expected {
        return Err(FormatError::TruncatedData {
            expected: count,
            read: data.len() / T::SIZE,
        });
    }

    let mut range = RangeAccumulator::new();
    for chunk in data.chunks_exact_mut(T::SIZE) {
        let value = T::from_be_slice(chunk);
        range.push(value.as_());
        value.store_ne(chunk);
    }
    Ok((data, range.finish()))
}

/// Decodes `count` whitespace-separated samples.
fn decode_ascii<T: Sample, R: Read>(
    reader: &mut R,
    count: usize,
) -> FormatResult<(Vec<u8>, (f64, f64))> {
    let mut text = Vec::new();
    reader.read_to_end(&mut text)?;
    let text = String::from_utf8_lossy(&text);

    let mut data = Vec::new();
    let mut range = RangeAccumulator::new();
    let mut tokens = text.split_whitespace();
    for index in 0..count {
        let token = tokens.next().ok_or(FormatError::TruncatedData {
            expected: count,
            read: index,
        })?;
        let value: T = token.parse().map_err(|_| FormatError::InvalidSample {
            index,
            token: token.to_string(),
        })?;
        range.push(value.as_());
        let start = data.len();
        data.resize(start + T::SIZE, 0);
        value.store_ne(&mut data[start..]);
    }
    Ok((data, range.finish()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::ScalarType;
    use glam::{UVec3, Vec3};
    use std::io::Cursor;

    fn header(encoding: &str, dims: [u32; 3], scalar: &str) -> Vec<u8> {
        format!(
            "# vtk DataFile Version 3.0\n\
             unit test\n\
             {encoding}\n\
             DATASET STRUCTURED_POINTS\n\
             DIMENSIONS {} {} {}\n\
             ORIGIN 0 0 0\n\
             SPACING 1 1 1\n\
             POINT_DATA {}\n\
             SCALARS scalars {scalar}\n\
             LOOKUP_TABLE default\n",
            dims[0],
            dims[1],
            dims[2],
            dims[0] * dims[1] * dims[2],
        )
        .into_bytes()
    }

    #[test]
    fn test_binary_u16_is_big_endian() {
        let mut file = header("BINARY", [2, 1, 1], "unsigned_short");
        file.extend_from_slice(&[0x01, 0x02, 0xff, 0x00]);
        let volume = read_volume_from(Cursor::new(file)).unwrap();
        assert_eq!(volume.scalar_type(), ScalarType::Uint16);
        assert_eq!(volume.samples_f64(), vec![258.0, 65280.0]);
        assert_eq!(volume.range(), (258.0, 65280.0));
    }

    #[test]
    fn test_binary_i32_is_big_endian() {
        let mut file = header("BINARY", [3, 1, 1], "int");
        for v in [-70000i32, 0x0102_0304, 7] {
            file.extend_from_slice(&v.to_be_bytes());
        }
        let volume = read_volume_from(Cursor::new(file)).unwrap();
        assert_eq!(volume.samples_f64(), vec![-70000.0, 16_909_060.0, 7.0]);
        assert_eq!(volume.range(), (-70000.0, 16_909_060.0));
    }

    #[test]
    fn test_binary_double() {
        let mut file = header("BINARY", [1, 2, 1], "double");
        for v in [0.125f64, -3.5] {
            file.extend_from_slice(&v.to_be_bytes());
        }
        let volume = read_volume_from(Cursor::new(file)).unwrap();
        assert_eq!(volume.samples_f64(), vec![0.125, -3.5]);
        assert_eq!(volume.data().len(), 16);
    }

    #[test]
    fn test_ascii_samples() {
        let mut file = header("ASCII", [2, 2, 1], "char");
        file.extend_from_slice(b"-4 12\n 0\t100\n");
        let volume = read_volume_from(Cursor::new(file)).unwrap();
        assert_eq!(volume.scalar_type(), ScalarType::Int8);
        assert_eq!(volume.samples_f64(), vec![-4.0, 12.0, 0.0, 100.0]);
        assert_eq!(volume.range(), (-4.0, 100.0));
    }

    #[test]
    fn test_ascii_float_literals() {
        let mut file = header("ASCII", [3, 1, 1], "float");
        file.extend_from_slice(b"1e-3 2.5 -0.75");
        let volume = read_volume_from(Cursor::new(file)).unwrap();
        assert_eq!(volume.range(), (-0.75, 2.5));
    }

    #[test]
    fn test_truncated_binary() {
        let mut file = header("BINARY", [2, 2, 2], "unsigned_short");
        file.extend_from_slice(&[0u8; 9]);
        match read_volume_from(Cursor::new(file)) {
            Err(FormatError::TruncatedData { expected, read }) => {
                assert_eq!(expected, 8);
                assert_eq!(read, 4);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_truncated_ascii() {
        let mut file = header("ASCII", [4, 1, 1], "int");
        file.extend_from_slice(b"1 2 3");
        assert!(matches!(
            read_volume_from(Cursor::new(file)),
            Err(FormatError::TruncatedData {
                expected: 4,
                read: 3
            })
        ));
    }

    #[test]
    fn test_invalid_ascii_token() {
        let mut file = header("ASCII", [2, 1, 1], "unsigned_char");
        file.extend_from_slice(b"7 300");
        match read_volume_from(Cursor::new(file)) {
            Err(FormatError::InvalidSample { index, token }) => {
                assert_eq!(index, 1);
                assert_eq!(token, "300");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_short_header() {
        let file = b"# vtk DataFile Version 3.0\ncomment\nBINARY\n".to_vec();
        assert!(matches!(
            read_volume_from(Cursor::new(file)),
            Err(FormatError::MissingHeaderLine { line: 4 })
        ));
    }

    #[test]
    fn test_crlf_header() {
        let text = String::from_utf8(header("ASCII", [1, 1, 1], "short"))
            .unwrap()
            .replace('\n', "\r\n");
        let mut file = text.into_bytes();
        file.extend_from_slice(b"-9");
        let volume = read_volume_from(Cursor::new(file)).unwrap();
        assert_eq!(volume.samples_f64(), vec![-9.0]);
    }

    #[test]
    fn test_zero_dimension() {
        let file = header("BINARY", [0, 3, 3], "float");
        let volume = read_volume_from(Cursor::new(file)).unwrap();
        assert_eq!(volume.voxel_count(), 0);
        assert_eq!(volume.dimensions(), UVec3::new(0, 3, 3));
        assert_eq!(volume.range(), (0.0, 0.0));
        assert_eq!(volume.origin(), Vec3::ZERO);
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("volray-does-not-exist.vtk");
        assert!(matches!(read_volume(path), Err(FormatError::Io(_))));
    }
}
