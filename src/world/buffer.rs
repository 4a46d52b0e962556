use image::{ImageBuffer, Rgb, RgbImage};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::config::TerrainProfile;
use super::error::{TerrainError, TerrainResult};
use super::gradient::GradientMask;
use super::noise_field::NoiseField;
use super::palette::{ColorClassifier, Rgb8};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ScrollDirection {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// World-space step of the buffer origin for one pixel of movement.
    pub fn unit(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Turns world coordinates into terrain colors.
///
/// A pixel's color depends only on its world coordinates and the mask weight,
/// which is what lets strips be generated independently of the rest of the map.
#[derive(Clone)]
pub struct TerrainSampler {
    noise: NoiseField,
    profile: TerrainProfile,
    classifier: ColorClassifier,
}

impl TerrainSampler {
    pub fn new(noise: NoiseField, profile: TerrainProfile, classifier: ColorClassifier) -> Self {
        Self {
            noise,
            profile,
            classifier,
        }
    }

    #[inline]
    pub fn amplitude(&self, world_x: i64, world_y: i64, mask_weight: f64) -> f64 {
        (self.noise.sample(world_x as f64, world_y as f64) + self.profile.bias) * mask_weight
    }

    #[inline]
    pub fn color_at(&self, world_x: i64, world_y: i64, mask_weight: f64) -> Rgb8 {
        let amplitude = self.amplitude(world_x, world_y, mask_weight);
        self.classifier.classify(amplitude, self.profile.threshold)
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    pub fn profile(&self) -> TerrainProfile {
        self.profile
    }

    pub fn classifier(&self) -> &ColorClassifier {
        &self.classifier
    }
}

/// Row-major grid of terrain colors plus the world coordinate of its top-left pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainBuffer {
    width: u32,
    height: u32,
    origin: (i64, i64),
    masked: bool,
    pixels: Vec<Rgb8>,
}

impl TerrainBuffer {
    /// Colors every pixel of a `width × height` window whose top-left corner
    /// sits at `origin` in world space. With a mask, each amplitude is weighted
    /// by the mask value at the same pixel before classification.
    pub fn build(
        sampler: &TerrainSampler,
        mask: Option<&GradientMask>,
        origin: (i64, i64),
        width: u32,
        height: u32,
    ) -> TerrainResult<Self> {
        if width == 0 || height == 0 {
            return Err(TerrainError::InvalidDimensions { width, height });
        }
        if let Some(mask) = mask {
            if mask.dimensions() != (width, height) {
                return Err(TerrainError::MaskMismatch {
                    expected: (width, height),
                    actual: mask.dimensions(),
                });
            }
        }

        let mut pixels = vec![Rgb8::BLACK; width as usize * height as usize];
        pixels
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(row, out)| {
                let world_y = origin.1 + row as i64;
                let weights = mask.map(|mask| mask.row(row as u32));
                for (column, pixel) in out.iter_mut().enumerate() {
                    let weight = weights.map_or(1.0, |weights| weights[column]);
                    *pixel = sampler.color_at(origin.0 + column as i64, world_y, weight);
                }
            });

        Ok(Self {
            width,
            height,
            origin,
            masked: mask.is_some(),
            pixels,
        })
    }

    /// Pans the window by `speed` pixels, recomputing only the exposed strip.
    ///
    /// The retained pixels are shifted in place and the new strip is written on
    /// the leading edge, so the result equals a fresh unmasked build at the new
    /// origin. A speed that would leave nothing to retain is rejected and the
    /// buffer is left untouched, as is any buffer built under a mask.
    pub fn scroll(
        &mut self,
        sampler: &TerrainSampler,
        direction: ScrollDirection,
        speed: u32,
    ) -> TerrainResult<()> {
        if self.masked {
            return Err(TerrainError::MaskedScroll { direction });
        }
        let extent = if direction.is_horizontal() {
            self.width
        } else {
            self.height
        };
        if speed >= extent {
            return Err(TerrainError::DegenerateScroll {
                direction,
                speed,
                extent,
            });
        }
        if speed == 0 {
            return Ok(());
        }

        let width = self.width as usize;
        let height = self.height as usize;
        let step = speed as usize;
        let (origin_x, origin_y) = self.origin;
        let delta = speed as i64;

        match direction {
            ScrollDirection::Right => {
                let strip = Self::build(
                    sampler,
                    None,
                    (origin_x + self.width as i64, origin_y),
                    speed,
                    self.height,
                )?;
                for (row, fresh) in self
                    .pixels
                    .chunks_exact_mut(width)
                    .zip(strip.pixels.chunks_exact(step))
                {
                    row.copy_within(step.., 0);
                    row[width - step..].copy_from_slice(fresh);
                }
            }
            ScrollDirection::Left => {
                let strip =
                    Self::build(sampler, None, (origin_x - delta, origin_y), speed, self.height)?;
                for (row, fresh) in self
                    .pixels
                    .chunks_exact_mut(width)
                    .zip(strip.pixels.chunks_exact(step))
                {
                    row.copy_within(..width - step, step);
                    row[..step].copy_from_slice(fresh);
                }
            }
            ScrollDirection::Down => {
                let strip = Self::build(
                    sampler,
                    None,
                    (origin_x, origin_y + self.height as i64),
                    self.width,
                    speed,
                )?;
                self.pixels.copy_within(step * width.., 0);
                self.pixels[(height - step) * width..].copy_from_slice(&strip.pixels);
            }
            ScrollDirection::Up => {
                let strip =
                    Self::build(sampler, None, (origin_x, origin_y - delta), self.width, speed)?;
                self.pixels.copy_within(..(height - step) * width, step * width);
                self.pixels[..step * width].copy_from_slice(&strip.pixels);
            }
        }

        let (unit_x, unit_y) = direction.unit();
        self.origin = (origin_x + unit_x * delta, origin_y + unit_y * delta);
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn origin(&self) -> (i64, i64) {
        self.origin
    }

    pub fn is_masked(&self) -> bool {
        self.masked
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Rgb8 {
        debug_assert!(x < self.width && y < self.height);
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn row(&self, y: u32) -> &[Rgb8] {
        let start = (y * self.width) as usize;
        &self.pixels[start..start + self.width as usize]
    }

    pub fn pixels(&self) -> &[Rgb8] {
        &self.pixels
    }

    /// Packed row-major RGB bytes, ready for any 24-bit pixel surface.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Opaque RGBA bytes for `Rgba8UnormSrgb` textures.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|pixel| pixel.to_rgba())
            .collect()
    }

    pub fn to_image(&self) -> RgbImage {
        ImageBuffer::from_fn(self.width, self.height, |x, y| Rgb(self.get(x, y).to_array()))
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> TerrainResult<()> {
        self.to_image().save(path)?;
        Ok(())
    }

    /// Fraction of pixels painted with one of the classifier's water colors.
    pub fn water_ratio(&self, classifier: &ColorClassifier) -> f64 {
        let water = self
            .pixels
            .iter()
            .filter(|pixel| classifier.is_water(**pixel))
            .count();
        water as f64 / self.pixels.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::config::NoiseParameters;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn sampler(seed: i64) -> TerrainSampler {
        let params = NoiseParameters {
            scale: 40.0,
            ..NoiseParameters::infinite().with_seed(seed)
        };
        TerrainSampler::new(
            NoiseField::new(&params),
            TerrainProfile::infinite(),
            ColorClassifier::default(),
        )
    }

    fn build(sampler: &TerrainSampler, origin: (i64, i64), width: u32, height: u32) -> TerrainBuffer {
        TerrainBuffer::build(sampler, None, origin, width, height).expect("build buffer")
    }

    #[test]
    fn pixels_follow_world_coordinates() {
        let sampler = sampler(2);
        let buffer = build(&sampler, (-13, 21), 16, 12);
        for y in 0..12 {
            for x in 0..16 {
                assert_eq!(
                    buffer.get(x, y),
                    sampler.color_at(-13 + x as i64, 21 + y as i64, 1.0)
                );
            }
        }
    }

    #[test]
    fn every_direction_matches_a_fresh_build() {
        let sampler = sampler(7);
        for direction in ScrollDirection::ALL {
            let mut buffer = build(&sampler, (5, -9), 48, 32);
            buffer.scroll(&sampler, direction, 8).expect("scroll");

            let (dx, dy) = direction.unit();
            let origin = (5 + dx * 8, -9 + dy * 8);
            assert_eq!(buffer.origin(), origin);
            assert_eq!(buffer, build(&sampler, origin, 48, 32), "{direction:?}");
        }
    }

    #[test]
    fn right_then_left_restores_the_original() {
        let sampler = sampler(0);
        let original = build(&sampler, (0, 0), 64, 64);

        let mut buffer = original.clone();
        buffer.scroll(&sampler, ScrollDirection::Right, 8).unwrap();
        assert_ne!(buffer, original);
        buffer.scroll(&sampler, ScrollDirection::Left, 8).unwrap();

        assert_eq!(buffer, original);
    }

    #[test]
    fn random_pan_sequences_match_a_direct_build() {
        let sampler = sampler(42);
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let (width, height) = (40, 28);
        let mut buffer = build(&sampler, (0, 0), width, height);

        for _ in 0..60 {
            let direction = ScrollDirection::ALL[rng.gen_range(0..4)];
            let limit = if direction.is_horizontal() { width } else { height };
            let speed = rng.gen_range(0..limit);
            buffer.scroll(&sampler, direction, speed).expect("scroll");
        }

        assert_eq!(buffer, build(&sampler, buffer.origin(), width, height));
    }

    #[test]
    fn degenerate_scroll_leaves_the_buffer_alone() {
        let sampler = sampler(1);
        let mut buffer = build(&sampler, (3, 4), 20, 10);
        let before = buffer.clone();

        for (direction, speed) in [
            (ScrollDirection::Right, 20),
            (ScrollDirection::Left, 25),
            (ScrollDirection::Up, 10),
            (ScrollDirection::Down, u32::MAX),
        ] {
            let result = buffer.scroll(&sampler, direction, speed);
            assert!(matches!(
                result,
                Err(TerrainError::DegenerateScroll { .. })
            ));
            assert_eq!(buffer, before);
        }

        buffer.scroll(&sampler, ScrollDirection::Up, 9).expect("largest valid pan");
        assert_eq!(buffer.origin(), (3, -5));
    }

    #[test]
    fn zero_speed_is_a_no_op() {
        let sampler = sampler(1);
        let mut buffer = build(&sampler, (0, 0), 12, 12);
        let before = buffer.clone();
        buffer.scroll(&sampler, ScrollDirection::Down, 0).unwrap();
        assert_eq!(buffer, before);
    }

    #[test]
    fn mask_must_match_the_buffer() {
        let sampler = sampler(1);
        let mask = GradientMask::build(10, 10, 1.5).unwrap();
        let result = TerrainBuffer::build(&sampler, Some(&mask), (0, 0), 12, 10);
        assert!(matches!(result, Err(TerrainError::MaskMismatch { .. })));
        assert!(matches!(
            TerrainBuffer::build(&sampler, None, (0, 0), 0, 10),
            Err(TerrainError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn masked_corners_are_water() {
        let params = NoiseParameters::finite();
        let sampler = TerrainSampler::new(
            NoiseField::new(&params),
            TerrainProfile::finite(),
            ColorClassifier::default(),
        );
        let mask = GradientMask::build(33, 25, 1.5).unwrap();
        let buffer = TerrainBuffer::build(&sampler, Some(&mask), (0, 0), 33, 25).unwrap();
        for (x, y) in [(0, 0), (32, 0), (0, 24), (32, 24)] {
            assert!(sampler.classifier().is_water(buffer.get(x, y)));
        }
    }

    #[test]
    fn masked_buffers_refuse_to_scroll() {
        let params = NoiseParameters::finite();
        let sampler = TerrainSampler::new(
            NoiseField::new(&params),
            TerrainProfile::finite(),
            ColorClassifier::default(),
        );
        let mask = GradientMask::build(16, 16, 1.5).unwrap();
        let mut buffer = TerrainBuffer::build(&sampler, Some(&mask), (0, 0), 16, 16).unwrap();
        assert!(buffer.is_masked());
        let before = buffer.clone();

        for direction in ScrollDirection::ALL {
            let result = buffer.scroll(&sampler, direction, 4);
            assert!(matches!(result, Err(TerrainError::MaskedScroll { .. })));
        }
        assert_eq!(buffer, before);
        assert!(!build(&sampler, (0, 0), 16, 16).is_masked());
    }

    #[test]
    fn byte_views_are_row_major() {
        let sampler = sampler(9);
        let buffer = build(&sampler, (0, 0), 5, 3);
        let bytes = buffer.as_bytes();
        assert_eq!(bytes.len(), 5 * 3 * 3);

        let pixel = buffer.get(4, 1);
        let offset = (1 * 5 + 4) * 3;
        assert_eq!(&bytes[offset..offset + 3], &pixel.to_array());

        let rgba = buffer.to_rgba_bytes();
        assert_eq!(&rgba[(1 * 5 + 4) * 4..(1 * 5 + 4) * 4 + 4], &pixel.to_rgba());

        let image = buffer.to_image();
        assert_eq!(image.get_pixel(4, 1).0, pixel.to_array());
    }
}
