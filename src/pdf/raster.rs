use std::path::{Path, PathBuf};

use crate::error::Error;

/// A decoded raster image, split into 8-bit RGB samples and an optional
/// alpha plane for a PDF soft mask.
pub struct RasterImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
    pub alpha: Option<Vec<u8>>,
}

impl RasterImage {
    /// Decode an image file. Any read or decode failure is a render error.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let reader = image::ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| Error::Render(format!("cannot read image {}: {e}", path.display())))?;
        let decoded = reader
            .decode()
            .map_err(|e| Error::Render(format!("cannot decode image {}: {e}", path.display())))?;

        let rgba: image::RgbaImage = decoded.to_rgba8();
        let (width, height) = (rgba.width(), rgba.height());
        if width == 0 || height == 0 {
            return Err(Error::Render(format!("image {} has no pixels", path.display())));
        }
        let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

        let rgb: Vec<u8> = rgba
            .pixels()
            .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
            .collect();
        let alpha = has_alpha.then(|| rgba.pixels().map(|p| p.0[3]).collect());

        Ok(Self {
            path: path.to_path_buf(),
            width,
            height,
            rgb,
            alpha,
        })
    }
}

/// Uniform scale that fits `(width, height)` into `max_width` x `max_height`.
/// Small images are enlarged to fill the box.
pub fn fit_scale(width: f32, height: f32, max_width: f32, max_height: f32) -> f32 {
    (max_width / width).min(max_height / height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_scale_picks_the_tighter_bound() {
        let s = fit_scale(400.0, 100.0, 300.0, 200.0);
        assert!((s - 0.75).abs() < 1e-6);
        assert!((400.0 * s - 300.0).abs() < 1e-4);
        assert!((100.0 * s - 75.0).abs() < 1e-4);

        let tall = fit_scale(100.0, 400.0, 300.0, 200.0);
        assert!((tall - 0.5).abs() < 1e-6);
    }

    #[test]
    fn decodes_png_with_alpha() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dot.png");
        let mut img = image::RgbaImage::new(3, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 128]));
        img.save(&path).expect("write png");

        let raster = RasterImage::open(&path).expect("decodes");
        assert_eq!((raster.width, raster.height), (3, 2));
        assert_eq!(raster.rgb.len(), 3 * 2 * 3);
        assert_eq!(raster.alpha.as_ref().map(Vec::len), Some(6));
    }

    #[test]
    fn garbage_bytes_are_a_render_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not an image").expect("write");

        assert!(matches!(RasterImage::open(&path), Err(Error::Render(_))));
    }
}
