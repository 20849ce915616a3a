//! Image-stack ingestion: one grayscale image per z-slice.
//!
//! This path ignores the dataset's recorded dimension. Width and height come
//! from the first decoded slice and depth from the slice count; every slice
//! must share the first one's size.

use volren_core::{Result, ScalarBuffer, VolrenError};

use crate::resources::ResourceProvider;

/// Returns the resource name of slice `index`.
#[must_use]
pub fn slice_name(prefix: &str, extension: &str, index: u32) -> String {
    format!("{prefix}{index:04}.{extension}")
}

/// Decodes one slice to normalized `[0, 1]` grayscale.
fn decode_slice(name: &str, bytes: &[u8]) -> Result<(u32, u32, Vec<f32>)> {
    let image = image::load_from_memory(bytes).map_err(|e| VolrenError::CorruptArchive {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    let gray = image.to_luma32f();
    let (w, h) = gray.dimensions();
    Ok((w, h, gray.into_raw()))
}

/// Loads `slices` images and stacks them into an `f32` volume.
///
/// Returns the buffer with shape `[width, height, slices]`.
pub fn load_image_stack<R: ResourceProvider>(
    resources: &R,
    prefix: &str,
    extension: &str,
    slices: u32,
) -> Result<ScalarBuffer<f32>> {
    if slices == 0 {
        return Err(VolrenError::CorruptArchive {
            name: slice_name(prefix, extension, 0),
            reason: "image stack has no slices".to_string(),
        });
    }

    let mut volume: Option<ScalarBuffer<f32>> = None;
    for z in 0..slices {
        let name = slice_name(prefix, extension, z);
        let bytes = resources.fetch(&name)?;
        let (w, h, pixels) = decode_slice(&name, &bytes)?;

        let buffer = volume.get_or_insert_with(|| {
            log::debug!("image stack {prefix}*.{extension}: {w}x{h}x{slices}");
            ScalarBuffer::zeroed(&[w as usize, h as usize, slices as usize])
        });
        if buffer.shape()[..2] != [w as usize, h as usize] {
            return Err(VolrenError::CorruptArchive {
                name,
                reason: format!(
                    "slice is {w}x{h}, expected {}x{}",
                    buffer.shape()[0],
                    buffer.shape()[1]
                ),
            });
        }
        if let Some(dst) = buffer.outer_slice_mut(z as usize) {
            dst.copy_from_slice(&pixels);
        }
    }

    volume.ok_or_else(|| VolrenError::ResourceNotFound(slice_name(prefix, extension, 0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::MemoryResources;
    use image::{GrayImage, ImageFormat, Luma};
    use std::io::Cursor;

    fn png(width: u32, height: u32, value: u8) -> Vec<u8> {
        let image = GrayImage::from_pixel(width, height, Luma([value]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_slice_name() {
        assert_eq!(slice_name("", "png", 7), "0007.png");
        assert_eq!(slice_name("head_", "png", 1234), "head_1234.png");
    }

    #[test]
    fn test_stack_places_slices_by_z() {
        let mut res = MemoryResources::new();
        res.insert("0000.png", png(3, 2, 0));
        res.insert("0001.png", png(3, 2, 255));

        let volume = load_image_stack(&res, "", "png", 2).unwrap();
        assert_eq!(volume.shape(), &[3, 2, 2]);
        assert_eq!(volume.get(&[2, 1, 0]), Some(0.0));
        assert!((volume.get(&[0, 0, 1]).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_slice() {
        let mut res = MemoryResources::new();
        res.insert("0000.png", png(2, 2, 10));
        assert!(matches!(
            load_image_stack(&res, "", "png", 2),
            Err(VolrenError::ResourceNotFound(name)) if name == "0001.png"
        ));
    }

    #[test]
    fn test_mismatched_slice_size() {
        let mut res = MemoryResources::new();
        res.insert("0000.png", png(2, 2, 10));
        res.insert("0001.png", png(3, 2, 10));
        assert!(matches!(
            load_image_stack(&res, "", "png", 2),
            Err(VolrenError::CorruptArchive { .. })
        ));
    }

    #[test]
    fn test_undecodable_slice() {
        let mut res = MemoryResources::new();
        res.insert("0000.png", b"not an image".to_vec());
        assert!(matches!(
            load_image_stack(&res, "", "png", 1),
            Err(VolrenError::CorruptArchive { .. })
        ));
    }
}
