//! Raw-compressed ingestion: gzip archives of little-endian `i16` voxels.

use std::io::Read;

use flate2::read::GzDecoder;
use volren_core::{Result, ScalarBuffer, VolrenError};

use crate::volume::{ElementType, Volume, VolumeBuffer, VolumeDescriptor};

/// Inflates a gzip archive fully into memory.
///
/// Only the first member of a multi-member stream is read.
pub fn inflate(name: &str, compressed: &[u8]) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    GzDecoder::new(compressed)
        .read_to_end(&mut bytes)
        .map_err(|e| VolrenError::CorruptArchive {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
    Ok(bytes)
}

/// Reinterprets decompressed bytes as an `i16` volume of `descriptor`'s shape.
///
/// The length must match exactly; nothing is truncated or padded.
pub fn decode_voxels(name: &str, bytes: &[u8], descriptor: &VolumeDescriptor) -> Result<Volume> {
    let expected = descriptor.voxel_count() * std::mem::size_of::<i16>();
    if bytes.len() != expected {
        return Err(VolrenError::archive_length(name, expected, bytes.len()));
    }

    let voxels: Vec<i16> = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let buffer = ScalarBuffer::from_vec(&descriptor.shape(), voxels)?;

    Ok(Volume {
        buffer: VolumeBuffer::Int16(buffer),
        descriptor: VolumeDescriptor {
            element_type: ElementType::Int16,
            ..*descriptor
        },
    })
}

/// Inflates `compressed` and decodes it as a volume of `descriptor`'s shape.
pub fn load_raw(name: &str, compressed: &[u8], descriptor: &VolumeDescriptor) -> Result<Volume> {
    let bytes = inflate(name, compressed)?;
    log::debug!("inflated '{name}': {} -> {} bytes", compressed.len(), bytes.len());
    decode_voxels(name, &bytes, descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use glam::{UVec3, Vec3};
    use proptest::prelude::*;
    use std::io::Write;

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    fn descriptor(nx: u32, ny: u32, nz: u32) -> VolumeDescriptor {
        VolumeDescriptor::new(UVec3::new(nx, ny, nz), Vec3::splat(0.001), ElementType::Int16)
    }

    #[test]
    fn test_decode_x_fastest() {
        let values: [i16; 8] = [-1024, -1, 0, 1, 2, 3, 3071, i16::MIN];
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let volume = load_raw("cube", &gzip(&bytes), &descriptor(2, 2, 2)).unwrap();

        assert_eq!(volume.buffer.sample(0, 0, 0), Some(-1024.0));
        assert_eq!(volume.buffer.sample(1, 0, 0), Some(-1.0));
        assert_eq!(volume.buffer.sample(0, 1, 0), Some(0.0));
        assert_eq!(volume.buffer.sample(0, 0, 1), Some(2.0));
        assert_eq!(volume.buffer.sample(1, 1, 1), Some(f32::from(i16::MIN)));
        assert_eq!(volume.buffer.as_bytes(), bytes.as_slice());
    }

    #[test]
    fn test_short_archive_is_corrupt() {
        let d = descriptor(2, 2, 2);
        let bytes = vec![0u8; d.voxel_count() * 2 - 2];
        let err = load_raw("short", &gzip(&bytes), &d).unwrap_err();
        assert!(matches!(err, VolrenError::CorruptArchive { ref name, .. } if name == "short"));
        assert!(err.to_string().contains("expected 16 bytes, got 14"));
    }

    #[test]
    fn test_long_archive_is_corrupt() {
        let bytes = vec![0u8; 18];
        assert!(matches!(
            load_raw("long", &gzip(&bytes), &descriptor(2, 2, 2)),
            Err(VolrenError::CorruptArchive { .. })
        ));
    }

    #[test]
    fn test_not_gzip_is_corrupt() {
        assert!(matches!(
            load_raw("plain", &[0u8; 16], &descriptor(2, 2, 2)),
            Err(VolrenError::CorruptArchive { .. })
        ));
    }

    #[test]
    fn test_first_member_wins() {
        let mut stream = gzip(&[1, 0, 2, 0]);
        stream.extend(gzip(&[9, 9, 9, 9]));
        let volume = load_raw("multi", &stream, &descriptor(2, 1, 1)).unwrap();
        assert_eq!(volume.buffer.sample(1, 0, 0), Some(2.0));
    }

    proptest! {
        #[test]
        fn prop_only_exact_length_decodes(nx in 1u32..6, ny in 1u32..6, nz in 1u32..6, len in 0usize..512) {
            let d = descriptor(nx, ny, nz);
            let result = decode_voxels("p", &vec![0u8; len], &d);
            prop_assert_eq!(result.is_ok(), len == d.byte_len());
        }
    }
}
