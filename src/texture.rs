//! Nearest-neighbor texture sampling backed by the `image` crate.

use std::path::Path;

use crate::color::ColorRgb;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to decode texture {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// A decoded 2D image sampled read-only by the shader.
pub struct Texture {
    data: Vec<u32>, // ARGB8888, row-major, y*width+x.
    width: u32,
    height: u32,
}

impl Texture {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref)
            .map_err(|source| TextureError::Decode {
                path: path_ref.display().to_string(),
                source,
            })?
            .to_rgba8();
        let (width, height) = img.dimensions();

        let data: Vec<u32> = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
            })
            .collect();

        log::info!("loaded texture {} ({width}x{height})", path_ref.display());

        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds a single-pixel texture of one solid color, for tests and
    /// benchmarks that need a `Texture` without decoding a file.
    pub fn solid(color: ColorRgb) -> Self {
        let [r, g, b] = color.to_rgb8();
        Self {
            data: vec![0xFF000000 | ((r as u32) << 16) | ((g as u32) << 8) | b as u32],
            width: 1,
            height: 1,
        }
    }

    /// Samples at UV coordinates using nearest-neighbor filtering.
    ///
    /// UVs wrap via `rem_euclid` rather than clamp.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> ColorRgb {
        let packed = self.sample_packed(u, v);
        let r = ((packed >> 16) & 0xFF) as f32 / 255.0;
        let g = ((packed >> 8) & 0xFF) as f32 / 255.0;
        let b = (packed & 0xFF) as f32 / 255.0;
        ColorRgb::new(r, g, b)
    }

    #[inline]
    fn sample_packed(&self, u: f32, v: f32) -> u32 {
        let u = u.rem_euclid(1.0);
        let v = v.rem_euclid(1.0);

        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);

        self.data[(y * self.width + x) as usize]
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_wraps_out_of_range_uv() {
        let tex = Texture::solid(ColorRgb::new(10.0 / 255.0, 20.0 / 255.0, 30.0 / 255.0));
        let in_range = tex.sample(0.5, 0.5);
        let wrapped = tex.sample(1.5, -0.5);
        assert_eq!(in_range, wrapped);
    }
}
