//! Raw `f32` sample files.
//!
//! The format is a flat run of little-endian IEEE-754 single-precision
//! values: mono, no header, sample rate implied by the graph.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Decode little-endian `f32` samples.
///
/// Fails with [`Error::TruncatedFile`] when the data isn't a whole number of samples.
pub fn decode_f32_le(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(Error::TruncatedFile {
            path: None,
            len: bytes.len(),
        });
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Read a whole raw sample file into memory.
pub fn read_f32_file(path: impl AsRef<Path>) -> Result<Vec<f32>> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;

    let samples = decode_f32_le(&bytes).map_err(|err| match err {
        Error::TruncatedFile { len, .. } => Error::TruncatedFile {
            path: Some(path.to_path_buf()),
            len,
        },
        other => other,
    })?;

    debug!(path = %path.display(), samples = samples.len(), "loaded sample file");
    Ok(samples)
}

/// Encode samples in the same format, for writing test fixtures or renders.
pub fn encode_f32_le(samples: &[f32]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_little_endian() {
        let bytes = [0x00, 0x00, 0x80, 0x3f, 0x00, 0x00, 0x00, 0xc0];
        assert_eq!(decode_f32_le(&bytes).unwrap(), vec![1.0, -2.0]);
        assert!(decode_f32_le(&[]).unwrap().is_empty());
    }

    #[test]
    fn rejects_partial_trailing_sample() {
        let mut bytes = encode_f32_le(&[0.5, 0.25]);
        bytes.push(0x01);

        match decode_f32_le(&bytes) {
            Err(Error::TruncatedFile { path: None, len: 9 }) => {}
            other => panic!("expected truncated file error, got {:?}", other),
        }
    }
}
