//! Owned single-channel float plane, row-major and tightly packed.
//!
//! Every numeric plane in the pipeline uses it: the three denoised colour
//! planes, the contrast-normalised luminance plane and the gradient buffers.
//! Intensity planes hold values in `[0, 1]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageF32 {
    pub w: usize,
    pub h: usize,
    /// `w * h` samples, row after row.
    pub data: Vec<f32>,
}

impl ImageF32 {
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, 0.0)
    }

    pub fn filled(w: usize, h: usize, value: f32) -> Self {
        Self {
            w,
            h,
            data: vec![value; w * h],
        }
    }

    /// Wrap an existing row-major buffer. `None` when the length does not
    /// match `w * h`.
    pub fn from_vec(w: usize, h: usize, data: Vec<f32>) -> Option<Self> {
        (data.len() == w * h).then_some(Self { w, h, data })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        self.data[y * self.w + x] = v;
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[f32] {
        &self.data[y * self.w..(y + 1) * self.w]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [f32] {
        &mut self.data[y * self.w..(y + 1) * self.w]
    }

    /// Mean over all samples, zero for an empty plane.
    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        (self.data.iter().map(|&v| v as f64).sum::<f64>() / self.data.len() as f64) as f32
    }

    /// Apply `f` to every sample in place.
    pub fn map_in_place(&mut self, f: impl Fn(f32) -> f32) {
        self.data.iter_mut().for_each(|v| *v = f(*v));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_contiguous_slices() {
        let mut img = ImageF32::new(3, 2);
        img.row_mut(1).copy_from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(img.row(0), &[0.0; 3]);
        assert_eq!(img.get(2, 1), 3.0);
        assert!((img.mean() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn from_vec_checks_the_length() {
        let img = ImageF32::from_vec(2, 1, vec![0.25, 0.75]).expect("length matches");
        assert_eq!(img.get(1, 0), 0.75);
        assert!(ImageF32::from_vec(2, 2, vec![0.0; 3]).is_none());
        assert!(ImageF32::new(0, 4).is_empty());
    }
}
