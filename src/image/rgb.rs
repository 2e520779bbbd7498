//! Interleaved 8-bit RGB input view and its planar float counterpart.
//!
//! `ImageRgb8` borrows an already-decoded frame (decoding and format/size
//! validation happen before the pipeline runs). `RgbPlanes` is the owned,
//! planar `[0, 1]` representation the preprocessing stage works on.
use super::ImageF32;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug)]
pub struct ImageRgb8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows (>= 3 * w)
    pub data: &'a [u8],
}

impl<'a> ImageRgb8<'a> {
    /// Minimum buffer length implied by the view geometry.
    pub fn required_len(&self) -> usize {
        if self.w == 0 || self.h == 0 {
            return 0;
        }
        self.stride * (self.h - 1) + self.w * 3
    }

    /// Checks that the view geometry describes at least one readable pixel.
    pub fn validate(&self) -> Result<(), String> {
        if self.w == 0 || self.h == 0 {
            return Err(format!("image has zero size ({}x{})", self.w, self.h));
        }
        if self.stride < self.w * 3 {
            return Err(format!(
                "row stride {} is shorter than {} bytes",
                self.stride,
                self.w * 3
            ));
        }
        if self.data.len() < self.required_len() {
            return Err(format!(
                "pixel buffer holds {} bytes, {} required",
                self.data.len(),
                self.required_len()
            ));
        }
        Ok(())
    }

    /// Split into three float planes scaled to `[0, 1]`.
    pub fn to_planes(&self) -> RgbPlanes {
        let mut planes = RgbPlanes::new(self.w, self.h);
        for y in 0..self.h {
            let src = &self.data[y * self.stride..y * self.stride + self.w * 3];
            let r = planes.r.row_mut(y);
            for (x, px) in src.chunks_exact(3).enumerate() {
                r[x] = px[0] as f32 / 255.0;
            }
            let g = planes.g.row_mut(y);
            for (x, px) in src.chunks_exact(3).enumerate() {
                g[x] = px[1] as f32 / 255.0;
            }
            let b = planes.b.row_mut(y);
            for (x, px) in src.chunks_exact(3).enumerate() {
                b[x] = px[2] as f32 / 255.0;
            }
        }
        planes
    }
}

/// Caller-supplied metadata travelling with the decoded frame.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ImageMeta {
    pub filename: String,
    pub format: String,
}

impl ImageMeta {
    pub fn new(filename: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            format: format.into(),
        }
    }

    /// Derive the format label from the filename extension (`"unknown"` if none).
    pub fn from_filename(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        let format = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| "unknown".to_string());
        Self { filename, format }
    }
}

/// Planar float RGB image, one `ImageF32` per channel.
#[derive(Clone, Debug, Default)]
pub struct RgbPlanes {
    pub r: ImageF32,
    pub g: ImageF32,
    pub b: ImageF32,
}

impl RgbPlanes {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            r: ImageF32::new(w, h),
            g: ImageF32::new(w, h),
            b: ImageF32::new(w, h),
        }
    }

    pub fn width(&self) -> usize {
        self.r.width()
    }

    pub fn height(&self) -> usize {
        self.r.height()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [f32; 3] {
        [self.r.get(x, y), self.g.get(x, y), self.b.get(x, y)]
    }

    pub fn channels(&self) -> [&ImageF32; 3] {
        [&self.r, &self.g, &self.b]
    }

    pub fn channels_mut(&mut self) -> [&mut ImageF32; 3] {
        [&mut self.r, &mut self.g, &mut self.b]
    }

    /// Rec. 601 luma plane.
    pub fn luminance(&self) -> ImageF32 {
        let (w, h) = (self.width(), self.height());
        let mut out = ImageF32::new(w, h);
        for y in 0..h {
            let (r, g, b) = (self.r.row(y), self.g.row(y), self.b.row(y));
            let dst = out.row_mut(y);
            for x in 0..w {
                dst[x] = 0.299 * r[x] + 0.587 * g[x] + 0.114 * b[x];
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_validity_accounts_for_stride() {
        let data = vec![0u8; 2 * 8 + 6];
        let img = ImageRgb8 {
            w: 2,
            h: 3,
            stride: 8,
            data: &data,
        };
        assert_eq!(img.validate(), Ok(()));
        let short = ImageRgb8 {
            data: &data[..data.len() - 1],
            ..img.clone()
        };
        assert_eq!(
            short.validate(),
            Err("pixel buffer holds 21 bytes, 22 required".to_string())
        );
        let narrow = ImageRgb8 { stride: 5, ..img };
        assert!(narrow.validate().is_err());
    }

    #[test]
    fn planes_split_channels() {
        let data = [255u8, 0, 51, 0, 255, 102];
        let img = ImageRgb8 {
            w: 2,
            h: 1,
            stride: 6,
            data: &data,
        };
        let planes = img.to_planes();
        assert_eq!(planes.get(0, 0), [1.0, 0.0, 0.2]);
        assert_eq!(planes.get(1, 0), [0.0, 1.0, 0.4]);
    }

    #[test]
    fn meta_format_from_extension() {
        assert_eq!(ImageMeta::from_filename("site.JPG").format, "jpg");
        assert_eq!(ImageMeta::from_filename("noext").format, "unknown");
    }
}
