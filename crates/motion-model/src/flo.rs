//! Middlebury `.flo` optical-flow files.
//!
//! Layout (all little-endian):
//!
//! ```text
//! f32   magic   202021.25 ("PIEH" as bytes)
//! i32   width
//! i32   height
//! f32   u, v    width * height pairs, row-major
//! ```

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flowsteer_common::error::FlowsteerError;

use crate::field::{FieldError, MotionField};

/// Magic value at the head of every `.flo` file.
pub const FLO_MAGIC: f32 = 202021.25;

/// Largest width or height accepted when reading.
pub const MAX_DIMENSION: usize = 1 << 16;

const HEADER_LEN: usize = 12;

/// Errors reading or writing `.flo` data.
#[derive(Debug, thiserror::Error)]
pub enum FloError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("not a .flo stream: magic {found} (expected {expected})", expected = FLO_MAGIC)]
    BadMagic { found: f32 },

    #[error("invalid .flo dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("truncated .flo data: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error(transparent)]
    Field(#[from] FieldError),
}

impl From<FloError> for FlowsteerError {
    fn from(err: FloError) -> Self {
        match err {
            FloError::IoError { path, source } if source.kind() == std::io::ErrorKind::NotFound => {
                FlowsteerError::FileNotFound { path }
            }
            FloError::IoError { source, .. } | FloError::Io(source) => FlowsteerError::Io(source),
            malformed => FlowsteerError::invalid_input(malformed.to_string()),
        }
    }
}

/// Decode a motion field from a `.flo` byte stream.
pub fn read_flo(mut reader: impl Read) -> Result<MotionField, FloError> {
    let mut header = Vec::with_capacity(HEADER_LEN);
    (&mut reader)
        .take(HEADER_LEN as u64)
        .read_to_end(&mut header)?;
    if header.len() != HEADER_LEN {
        return Err(FloError::Truncated {
            expected: HEADER_LEN,
            actual: header.len(),
        });
    }

    let magic = f32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    if magic != FLO_MAGIC {
        return Err(FloError::BadMagic { found: magic });
    }

    let width = i32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    let height = i32::from_le_bytes([header[8], header[9], header[10], header[11]]);
    let (width, height) = match (usize::try_from(width), usize::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 && w <= MAX_DIMENSION && h <= MAX_DIMENSION => (w, h),
        _ => {
            return Err(FloError::InvalidDimensions {
                width: width as i64,
                height: height as i64,
            })
        }
    };

    let expected = width * height * 2 * std::mem::size_of::<f32>();
    // The header is untrusted, so the buffer grows with what actually arrives.
    let mut body = Vec::new();
    reader.take(expected as u64).read_to_end(&mut body)?;
    if body.len() != expected {
        return Err(FloError::Truncated {
            expected,
            actual: body.len(),
        });
    }

    let components: Vec<f32> = body
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    Ok(MotionField::from_interleaved(width, height, &components)?)
}

/// Encode a motion field as a `.flo` byte stream.
///
/// Components are narrowed to `f32`, which is what the format stores.
pub fn write_flo(field: &MotionField, mut writer: impl Write) -> Result<(), FloError> {
    let (width, height) = field.dim();
    let dims = (i32::try_from(width), i32::try_from(height));
    let (w, h) = match dims {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(FloError::InvalidDimensions {
                width: width as i64,
                height: height as i64,
            })
        }
    };

    let mut buf = Vec::with_capacity(HEADER_LEN + field.len() * 8);
    buf.extend_from_slice(&FLO_MAGIC.to_le_bytes());
    buf.extend_from_slice(&w.to_le_bytes());
    buf.extend_from_slice(&h.to_le_bytes());
    for v in field.vectors() {
        buf.extend_from_slice(&(v.dx as f32).to_le_bytes());
        buf.extend_from_slice(&(v.dy as f32).to_le_bytes());
    }
    writer.write_all(&buf)?;
    Ok(())
}

/// Read a `.flo` file from disk.
pub fn load_flo(path: impl AsRef<Path>) -> Result<MotionField, FloError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| FloError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    read_flo(std::io::BufReader::new(file))
}

/// Write a `.flo` file to disk, creating parent directories.
pub fn save_flo(field: &MotionField, path: impl AsRef<Path>) -> Result<(), FloError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| FloError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let file = std::fs::File::create(path).map_err(|e| FloError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = std::io::BufWriter::new(file);
    write_flo(field, &mut writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::MotionVector;

    fn header(width: i32, height: i32) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&FLO_MAGIC.to_le_bytes());
        bytes.extend_from_slice(&width.to_le_bytes());
        bytes.extend_from_slice(&height.to_le_bytes());
        bytes
    }

    #[test]
    fn test_magic_spells_pieh() {
        assert_eq!(&FLO_MAGIC.to_le_bytes(), b"PIEH");
    }

    #[test]
    fn test_read_known_bytes() {
        let mut bytes = header(2, 1);
        for c in [1.5f32, -2.0, 0.25, 4.0] {
            bytes.extend_from_slice(&c.to_le_bytes());
        }

        let field = read_flo(bytes.as_slice()).unwrap();
        assert_eq!(field.dim(), (2, 1));
        assert_eq!(field.get(0, 0), Some(MotionVector::new(1.5, -2.0)));
        assert_eq!(field.get(1, 0), Some(MotionVector::new(0.25, 4.0)));
    }

    #[test]
    fn test_write_then_read_preserves_field() {
        let field = MotionField::from_vectors(
            2,
            2,
            vec![
                MotionVector::new(1.0, 2.0),
                MotionVector::new(-3.0, 0.5),
                MotionVector::new(0.0, -7.25),
                MotionVector::new(9.0, 9.0),
            ],
        )
        .unwrap();

        let mut bytes = Vec::new();
        write_flo(&field, &mut bytes).unwrap();
        assert_eq!(bytes.len(), 12 + 4 * 8);
        assert_eq!(read_flo(bytes.as_slice()).unwrap(), field);
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut bytes = header(1, 1);
        bytes[0] = b'X';
        bytes.extend_from_slice(&[0u8; 8]);
        assert!(matches!(
            read_flo(bytes.as_slice()),
            Err(FloError::BadMagic { .. })
        ));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let bytes = header(0, 4);
        assert!(matches!(
            read_flo(bytes.as_slice()),
            Err(FloError::InvalidDimensions {
                width: 0,
                height: 4
            })
        ));
    }

    #[test]
    fn test_truncated_body_rejected() {
        let mut bytes = header(2, 2);
        bytes.extend_from_slice(&[0u8; 12]);
        assert!(matches!(
            read_flo(bytes.as_slice()),
            Err(FloError::Truncated {
                expected: 32,
                actual: 12
            })
        ));
    }

    #[test]
    fn test_write_empty_field_rejected() {
        let mut sink = Vec::new();
        assert!(matches!(
            write_flo(&MotionField::empty(), &mut sink),
            Err(FloError::InvalidDimensions { .. })
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir().join(format!("flowsteer-flo-{}", std::process::id()));
        let path = dir.join("nested").join("pair.flo");
        let field = MotionField::uniform(3, 2, MotionVector::new(5.0, -3.0)).unwrap();

        save_flo(&field, &path).unwrap();
        assert_eq!(load_flo(&path).unwrap(), field);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = load_flo("/definitely/not/here.flo").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.flo"));
    }

    #[test]
    fn test_huge_header_with_short_body_is_truncated() {
        let mut bytes = header(65536, 65536);
        bytes.extend_from_slice(&[0u8; 16]);
        assert!(matches!(
            read_flo(bytes.as_slice()),
            Err(FloError::Truncated { actual: 16, .. })
        ));
    }

    #[test]
    fn test_short_header_is_truncated() {
        assert!(matches!(
            read_flo(&FLO_MAGIC.to_le_bytes()[..]),
            Err(FloError::Truncated {
                expected: 12,
                actual: 4
            })
        ));
        assert!(matches!(
            read_flo(&[][..]),
            Err(FloError::Truncated {
                expected: 12,
                actual: 0
            })
        ));
    }

    #[test]
    fn test_malformed_data_maps_to_invalid_input() {
        let mut bad_magic = header(1, 1);
        bad_magic[0] = b'X';
        let cases = [
            bad_magic,
            header(-3, 2),
            header(2, 2),
            FLO_MAGIC.to_le_bytes().to_vec(),
        ];
        for bytes in cases {
            let err = FlowsteerError::from(read_flo(bytes.as_slice()).unwrap_err());
            assert!(err.is_invalid_input(), "{err}");
        }
    }

    #[test]
    fn test_io_failures_stay_io() {
        let err = FlowsteerError::from(load_flo("/definitely/not/here.flo").unwrap_err());
        assert!(matches!(err, FlowsteerError::FileNotFound { .. }));

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = FlowsteerError::from(FloError::Io(denied));
        assert!(matches!(err, FlowsteerError::Io(_)));
        assert!(!err.is_invalid_input());
    }
}
