use anyhow::Context;
use duskforge_assets::{AssetError, DecodedImage, ImageDecoder};
use std::io;
use std::path::{Path, PathBuf};

/// Decodes sprite strips from PNG files under `root`.
///
/// A strip holds its frames stacked top to bottom. Frames are square, so a
/// `w x h` image yields `h / w` frames of `w x w` pixels.
pub struct PngStripDecoder {
    root: PathBuf,
}

impl PngStripDecoder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageDecoder for PngStripDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, AssetError> {
        let bytes = match std::fs::read(self.root.join(path)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(AssetError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(AssetError::Io(e)),
        };
        let decode_error = |reason: String| AssetError::Decode {
            path: path.to_path_buf(),
            reason,
        };

        let image = image::load_from_memory(&bytes)
            .map_err(|e| decode_error(e.to_string()))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        if width == 0 || height % width != 0 {
            return Err(decode_error(format!(
                "{width}x{height} is not a vertical strip of square frames"
            )));
        }

        let frame_bytes = width as usize * width as usize * 4;
        let frames = image
            .as_raw()
            .chunks_exact(frame_bytes)
            .map(<[u8]>::to_vec)
            .collect();
        tracing::debug!(path = %path.display(), width, frames = height / width, "decoded strip");
        Ok(DecodedImage {
            width,
            height: width,
            frames,
        })
    }
}

/// Write tightly packed RGBA8 pixels, rows top to bottom, as a PNG file.
pub fn write_png(path: &Path, width: u32, height: u32, rgba: Vec<u8>) -> anyhow::Result<()> {
    let image = image::RgbaImage::from_raw(width, height, rgba)
        .context("pixel buffer does not match the image size")?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to write {}", path.display()))
}
