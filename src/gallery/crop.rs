//! Face thumbnail geometry and rendering.

use super::error::GalleryError;
use image::{imageops, DynamicImage, ImageFormat, RgbaImage};
use serde::Deserialize;
use std::io::Cursor;

/// The thumbnail shows this much more than the detected face, centred on it.
pub const CROP_ENLARGEMENT: f64 = 1.5;

/// Bounding box as fractions of the image dimensions, taken from the
/// thumbnail query string.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct NormalizedBox {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
}

impl NormalizedBox {
    /// Every field must be a finite fraction in `[0, 1]`, which bounds the
    /// crop canvas to 1.5 times the photo in each direction.
    pub fn validate(&self) -> Result<(), GalleryError> {
        let fields = [
            ("width", self.width),
            ("height", self.height),
            ("left", self.left),
            ("top", self.top),
        ];
        for (name, value) in fields {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(GalleryError::InvalidBoundingBox(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Pixel rectangle. `left` and `top` may be negative and the rectangle may
/// reach past the image edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub width: i64,
    pub height: i64,
    pub left: i64,
    pub top: i64,
}

pub fn crop_rect(image_width: u32, image_height: u32, norm: &NormalizedBox) -> CropRect {
    let image_width = f64::from(image_width);
    let image_height = f64::from(image_height);

    let width = image_width * norm.width;
    let height = image_height * norm.height;
    let crop_width = width * CROP_ENLARGEMENT;
    let crop_height = height * CROP_ENLARGEMENT;
    let diff_width = (crop_width - width) / 2.0;
    let diff_height = (crop_height - height) / 2.0;

    // `as` truncates toward zero.
    CropRect {
        width: crop_width as i64,
        height: crop_height as i64,
        left: (image_width * norm.left - diff_width) as i64,
        top: (image_height * norm.top - diff_height) as i64,
    }
}

/// Cuts `rect` out of `source`. Parts of the rectangle outside the source
/// come out fully transparent.
pub fn crop_image(source: &DynamicImage, rect: CropRect) -> Result<DynamicImage, GalleryError> {
    let (width, height) = match (u32::try_from(rect.width), u32::try_from(rect.height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(GalleryError::InvalidCrop(rect)),
    };

    let inside = rect.left >= 0
        && rect.top >= 0
        && rect.left + rect.width <= i64::from(source.width())
        && rect.top + rect.height <= i64::from(source.height());

    if inside {
        return Ok(source.crop_imm(rect.left as u32, rect.top as u32, width, height));
    }

    let mut canvas = RgbaImage::new(width, height);
    imageops::overlay(&mut canvas, &source.to_rgba8(), -rect.left, -rect.top);
    Ok(DynamicImage::ImageRgba8(canvas))
}

pub fn encode_image(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, GalleryError> {
    let mut out = Cursor::new(Vec::new());
    match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()).write_to(&mut out, format)?,
        _ => image.write_to(&mut out, format)?,
    }
    Ok(out.into_inner())
}

pub struct FaceThumbnail {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Decodes a stored photo, crops the enlarged face rectangle and re-encodes
/// it in the photo's own format.
pub fn render_face_thumbnail(
    bytes: &[u8],
    norm: &NormalizedBox,
) -> Result<FaceThumbnail, GalleryError> {
    norm.validate()?;

    let format = image::guess_format(bytes)?;
    let source = image::load_from_memory_with_format(bytes, format)?;

    let rect = crop_rect(source.width(), source.height(), norm);
    let cropped = crop_image(&source, rect)?;

    Ok(FaceThumbnail {
        bytes: encode_image(&cropped, format)?,
        content_type: format.to_mime_type(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba};

    fn norm(width: f64, height: f64, left: f64, top: f64) -> NormalizedBox {
        NormalizedBox {
            width,
            height,
            left,
            top,
        }
    }

    fn checkerboard(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        }))
    }

    #[test]
    fn test_crop_rect_enlarges_around_face() {
        let rect = crop_rect(1000, 500, &norm(0.2, 0.2, 0.4, 0.3));
        assert_eq!(
            rect,
            CropRect {
                width: 300,
                height: 150,
                left: 350,
                top: 125
            }
        );
    }

    #[test]
    fn test_crop_rect_truncates_toward_zero() {
        let rect = crop_rect(100, 100, &norm(0.5, 0.5, 0.0, 0.0));
        assert_eq!(
            rect,
            CropRect {
                width: 75,
                height: 75,
                left: -12,
                top: -12
            }
        );
    }

    #[test]
    fn test_crop_rect_does_not_clamp() {
        let rect = crop_rect(200, 100, &norm(0.4, 0.4, 0.8, 0.8));
        assert_eq!(rect.width, 120);
        assert_eq!(rect.left, 140);
        assert!(rect.left + rect.width > 200);
    }

    #[test]
    fn test_crop_image_inside_bounds() {
        let source = checkerboard(1000, 500);
        let rect = crop_rect(1000, 500, &norm(0.2, 0.2, 0.4, 0.3));
        let cropped = crop_image(&source, rect).unwrap();
        assert_eq!(cropped.dimensions(), (300, 150));
        assert_eq!(cropped.get_pixel(0, 0), source.get_pixel(350, 125));
    }

    #[test]
    fn test_crop_image_outside_bounds_is_padded() {
        let source = checkerboard(100, 100);
        let rect = crop_rect(100, 100, &norm(0.5, 0.5, 0.0, 0.0));
        let cropped = crop_image(&source, rect).unwrap();

        assert_eq!(cropped.dimensions(), (75, 75));
        assert_eq!(cropped.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(cropped.get_pixel(12, 12), source.get_pixel(0, 0));
    }

    #[test]
    fn test_crop_image_rejects_empty_rect() {
        let source = checkerboard(10, 10);
        let rect = CropRect {
            width: 0,
            height: 5,
            left: 0,
            top: 0,
        };
        assert!(matches!(
            crop_image(&source, rect),
            Err(GalleryError::InvalidCrop(_))
        ));
    }

    #[test]
    fn test_render_face_thumbnail_keeps_format() {
        let source = checkerboard(1000, 500);
        let png = encode_image(&source, ImageFormat::Png).unwrap();

        let thumbnail = render_face_thumbnail(&png, &norm(0.2, 0.2, 0.4, 0.3)).unwrap();

        assert_eq!(thumbnail.content_type, "image/png");
        let decoded = image::load_from_memory(&thumbnail.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (300, 150));
    }

    #[test]
    fn test_render_face_thumbnail_jpeg() {
        let source = checkerboard(200, 200);
        let jpeg = encode_image(&source, ImageFormat::Jpeg).unwrap();

        let thumbnail = render_face_thumbnail(&jpeg, &norm(0.5, 0.5, 0.25, 0.25)).unwrap();

        assert_eq!(thumbnail.content_type, "image/jpeg");
        let decoded = image::load_from_memory(&thumbnail.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (150, 150));
    }

    #[test]
    fn test_validate_accepts_unit_range() {
        assert!(norm(0.0, 1.0, 0.5, 1.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_and_non_finite() {
        for bad in [
            norm(2000.0, 0.2, 0.0, 0.0),
            norm(0.2, -0.1, 0.0, 0.0),
            norm(0.2, 0.2, f64::NAN, 0.0),
            norm(0.2, 0.2, 0.0, f64::INFINITY),
        ] {
            assert!(matches!(
                bad.validate(),
                Err(GalleryError::InvalidBoundingBox(_))
            ));
        }
    }

    #[test]
    fn test_render_face_thumbnail_rejects_oversized_box_before_allocating() {
        let png = encode_image(&checkerboard(100, 100), ImageFormat::Png).unwrap();
        let result = render_face_thumbnail(&png, &norm(2000.0, 2000.0, 0.0, 0.0));
        assert!(matches!(result, Err(GalleryError::InvalidBoundingBox(_))));
    }

    #[test]
    fn test_render_face_thumbnail_rejects_garbage() {
        let result = render_face_thumbnail(b"not an image", &norm(0.2, 0.2, 0.4, 0.3));
        assert!(matches!(result, Err(GalleryError::Image(_))));
    }
}
