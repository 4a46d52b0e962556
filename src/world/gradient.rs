use super::error::{TerrainError, TerrainResult};

/// Radial falloff used to sink the edges of a finite world into the sea.
///
/// Values are `1.0` at the geometric center of the grid and `0.0` at the four
/// corner pixels, shaped by `exponent` (higher values give a steeper coast).
#[derive(Debug, Clone, PartialEq)]
pub struct GradientMask {
    width: u32,
    height: u32,
    values: Vec<f64>,
}

impl GradientMask {
    pub fn build(width: u32, height: u32, exponent: f64) -> TerrainResult<Self> {
        if width == 0 || height == 0 {
            return Err(TerrainError::InvalidDimensions { width, height });
        }

        let center_x = (width as f64 - 1.0) * 0.5;
        let center_y = (height as f64 - 1.0) * 0.5;
        let center_to_corner = center_x.hypot(center_y);

        let mut values = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let value = if center_to_corner == 0.0 {
                    1.0
                } else {
                    let distance = (x as f64 - center_x).hypot(y as f64 - center_y);
                    (1.0 - distance / center_to_corner).clamp(0.0, 1.0).powf(exponent)
                };
                values.push(value);
            }
        }

        Ok(Self {
            width,
            height,
            values,
        })
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f64 {
        debug_assert!(x < self.width && y < self.height);
        self.values[(y * self.width + x) as usize]
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub(crate) fn row(&self, y: u32) -> &[f64] {
        let start = (y * self.width) as usize;
        &self.values[start..start + self.width as usize]
    }
}
