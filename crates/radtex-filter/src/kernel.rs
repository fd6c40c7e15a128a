//! Convolution kernels
//!
//! [`Kernel1d`] is applied along one axis (separable filters: mean, LoG,
//! Laws). [`Kernel`] is a 2D kernel applied in a plane (Sobel, Gabor).
//! Both are correlated with the volume: the kernel is not flipped.

use crate::{FilterError, FilterResult};

/// A 1D kernel with a center tap
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel1d {
    data: Vec<f64>,
    center: usize,
}

impl Kernel1d {
    /// Create a centered kernel from its taps.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidKernel` if `data` is empty or has even
    /// length.
    pub fn from_slice(data: &[f64]) -> FilterResult<Self> {
        if data.is_empty() || data.len() % 2 == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "1D kernel needs an odd number of taps, got {}",
                data.len()
            )));
        }
        Ok(Self {
            data: data.to_vec(),
            center: data.len() / 2,
        })
    }

    /// Averaging kernel of `size` taps, each `1/size`.
    pub fn box_kernel(size: usize) -> FilterResult<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "box kernel size must be odd and positive, got {size}"
            )));
        }
        Self::from_slice(&vec![1.0 / size as f64; size])
    }

    /// Sampled Gaussian on `-half..=half`, normalized to sum 1.
    pub fn gaussian(sigma: f64, half: usize) -> FilterResult<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(FilterError::InvalidKernel(format!(
                "gaussian sigma must be positive, got {sigma}"
            )));
        }
        let mut k = Self::from_fn(half, |t| (-t * t / (2.0 * sigma * sigma)).exp());
        k.normalize();
        Ok(k)
    }

    /// Second derivative of a sampled Gaussian, adjusted to sum 0.
    pub fn gaussian_second_derivative(sigma: f64, half: usize) -> FilterResult<Self> {
        let g = Self::gaussian(sigma, half)?;
        let s2 = sigma * sigma;
        let mut data: Vec<f64> = g
            .data
            .iter()
            .enumerate()
            .map(|(i, &w)| {
                let t = i as f64 - half as f64;
                (t * t / (s2 * s2) - 1.0 / s2) * w
            })
            .collect();
        let mean = data.iter().sum::<f64>() / data.len() as f64;
        for v in &mut data {
            *v -= mean;
        }
        Ok(Self { data, center: half })
    }

    fn from_fn(half: usize, f: impl Fn(f64) -> f64) -> Self {
        let data = (0..=2 * half)
            .map(|i| f(i as f64 - half as f64))
            .collect();
        Self { data, center: half }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn center(&self) -> usize {
        self.center
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Kernel with taps in reverse order
    pub fn reversed(&self) -> Self {
        let mut data = self.data.clone();
        data.reverse();
        Self {
            data,
            center: self.data.len() - 1 - self.center,
        }
    }

    /// Scale to unit L2 norm (no-op for an all-zero kernel).
    pub fn normalize_l2(&mut self) {
        let norm = self.data.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut self.data {
                *v /= norm;
            }
        }
    }

    /// Scale so the taps sum to 1 (no-op if the sum is 0).
    pub fn normalize(&mut self) {
        let sum = self.sum();
        if sum != 0.0 {
            for v in &mut self.data {
                *v /= sum;
            }
        }
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

/// A 2D convolution kernel
///
/// Rows of the kernel run along the plane's vertical axis and columns along
/// its horizontal axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// Width of the kernel
    width: usize,
    /// Height of the kernel
    height: usize,
    /// X coordinate of the center
    cx: usize,
    /// Y coordinate of the center
    cy: usize,
    /// Kernel data (row-major order)
    data: Vec<f64>,
}

impl Kernel {
    /// Create a zero kernel with the given dimensions, centered.
    pub fn new(width: usize, height: usize) -> FilterResult<Self> {
        if width == 0 || height == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "kernel dimensions must be positive: {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            cx: width / 2,
            cy: height / 2,
            data: vec![0.0; width * height],
        })
    }

    /// Create a kernel from row-major values.
    pub fn from_slice(width: usize, height: usize, data: &[f64]) -> FilterResult<Self> {
        let mut k = Self::new(width, height)?;
        if data.len() != width * height {
            return Err(FilterError::InvalidKernel(format!(
                "kernel data length {} doesn't match {}x{}",
                data.len(),
                width,
                height
            )));
        }
        k.data.copy_from_slice(data);
        Ok(k)
    }

    /// Build a `(2*half_x+1) x (2*half_y+1)` kernel from `f(x, y)` with
    /// offsets measured from the center.
    pub fn from_fn(half_x: usize, half_y: usize, f: impl Fn(f64, f64) -> f64) -> Self {
        let width = 2 * half_x + 1;
        let height = 2 * half_y + 1;
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x as f64 - half_x as f64, y as f64 - half_y as f64));
            }
        }
        Self {
            width,
            height,
            cx: half_x,
            cy: half_y,
            data,
        }
    }

    /// Sobel kernel responding to intensity changes along x.
    pub fn sobel_horizontal() -> Self {
        Self {
            width: 3,
            height: 3,
            cx: 1,
            cy: 1,
            data: vec![-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0],
        }
    }

    /// Sobel kernel responding to intensity changes along y.
    pub fn sobel_vertical() -> Self {
        Self {
            width: 3,
            height: 3,
            cx: 1,
            cy: 1,
            data: vec![-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn center_x(&self) -> usize {
        self.cx
    }

    #[inline]
    pub fn center_y(&self) -> usize {
        self.cy
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Get a value at (x, y).
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// Get the sum of all kernel values.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel1d_rejects_even() {
        assert!(Kernel1d::from_slice(&[1.0, 1.0]).is_err());
        assert!(Kernel1d::box_kernel(4).is_err());
        assert!(Kernel1d::box_kernel(0).is_err());
    }

    #[test]
    fn test_box_kernel_sums_to_one() {
        let k = Kernel1d::box_kernel(5).unwrap();
        assert!((k.sum() - 1.0).abs() < 1e-12);
        assert_eq!(k.center(), 2);
    }

    #[test]
    fn test_gaussian_kernels() {
        let g = Kernel1d::gaussian(1.5, 4).unwrap();
        assert_eq!(g.len(), 9);
        assert!((g.sum() - 1.0).abs() < 1e-12);
        assert_eq!(g.data()[3], g.data()[5]);

        let d2 = Kernel1d::gaussian_second_derivative(1.5, 4).unwrap();
        assert!(d2.sum().abs() < 1e-12);
        // center is the most negative tap
        assert!(d2.data()[4] < 0.0);
        assert!(Kernel1d::gaussian(0.0, 2).is_err());
    }

    #[test]
    fn test_reverse_and_l2() {
        let mut k = Kernel1d::from_slice(&[-1.0, 0.0, 1.0]).unwrap();
        assert_eq!(k.reversed().data(), &[1.0, 0.0, -1.0]);
        k.normalize_l2();
        let n: f64 = k.data().iter().map(|v| v * v).sum();
        assert!((n - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_kernel2d() {
        let s = Kernel::sobel_horizontal();
        assert_eq!(s.get(2, 1), Some(2.0));
        assert_eq!(s.get(3, 1), None);
        assert_eq!(s.sum(), 0.0);
        let k = Kernel::from_fn(1, 2, |x, y| x + 10.0 * y);
        assert_eq!((k.width(), k.height()), (3, 5));
        assert_eq!(k.get(0, 0), Some(-21.0));
        assert!(Kernel::from_slice(2, 2, &[1.0]).is_err());
    }
}
