use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::error::{TerrainError, TerrainResult};

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainClass {
    Water,
    Beach,
    Lowland,
    Mountain,
    Snow,
}

/// One entry of the palette. The band covers every amplitude below
/// `threshold + upper_offset` that an earlier band did not claim.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorBand {
    pub upper_offset: f64,
    pub color: Rgb8,
    pub class: TerrainClass,
}

impl ColorBand {
    pub const fn new(upper_offset: f64, color: Rgb8, class: TerrainClass) -> Self {
        Self {
            upper_offset,
            color,
            class,
        }
    }
}

pub const DARK_BLUE: Rgb8 = Rgb8::new(11, 65, 181);
pub const BLUE: Rgb8 = Rgb8::new(11, 74, 212);
pub const MEDIUM_BLUE: Rgb8 = Rgb8::new(20, 103, 199);
pub const LIGHT_BLUE: Rgb8 = Rgb8::new(27, 127, 196);
pub const LIGHT_SAND: Rgb8 = Rgb8::new(205, 182, 115);
pub const SAND: Rgb8 = Rgb8::new(199, 149, 95);
pub const DARK_SAND: Rgb8 = Rgb8::new(172, 130, 78);
pub const DARKEST_GREEN: Rgb8 = Rgb8::new(35, 124, 24);
pub const DARK_GREEN: Rgb8 = Rgb8::new(28, 140, 24);
pub const GREEN: Rgb8 = Rgb8::new(56, 158, 35);
pub const LIGHT_GREEN: Rgb8 = Rgb8::new(106, 171, 56);
pub const DARK_MOUNTAIN: Rgb8 = Rgb8::new(90, 160, 79);
pub const MOUNTAIN: Rgb8 = Rgb8::new(120, 120, 120);
pub const MEDIUM_MOUNTAIN: Rgb8 = Rgb8::new(107, 107, 107);
pub const LIGHT_MOUNTAIN: Rgb8 = Rgb8::new(89, 89, 89);
pub const SNOW: Rgb8 = Rgb8::new(255, 255, 255);

/// The sixteen hand-tuned bands, deepest water first.
pub const DEFAULT_BANDS: [ColorBand; 16] = [
    ColorBand::new(-0.2, DARK_BLUE, TerrainClass::Water),
    ColorBand::new(-0.075, BLUE, TerrainClass::Water),
    ColorBand::new(0.0, MEDIUM_BLUE, TerrainClass::Water),
    ColorBand::new(0.05, LIGHT_BLUE, TerrainClass::Water),
    ColorBand::new(0.07, LIGHT_SAND, TerrainClass::Beach),
    ColorBand::new(0.085, SAND, TerrainClass::Beach),
    ColorBand::new(0.095, DARK_SAND, TerrainClass::Beach),
    ColorBand::new(0.16, DARKEST_GREEN, TerrainClass::Lowland),
    ColorBand::new(0.23, DARK_GREEN, TerrainClass::Lowland),
    ColorBand::new(0.3, GREEN, TerrainClass::Lowland),
    ColorBand::new(0.335, LIGHT_GREEN, TerrainClass::Lowland),
    ColorBand::new(0.36, DARK_MOUNTAIN, TerrainClass::Lowland),
    ColorBand::new(0.38, MOUNTAIN, TerrainClass::Mountain),
    ColorBand::new(0.415, MEDIUM_MOUNTAIN, TerrainClass::Mountain),
    ColorBand::new(0.495, LIGHT_MOUNTAIN, TerrainClass::Mountain),
    ColorBand::new(1.0, SNOW, TerrainClass::Snow),
];

/// Maps amplitudes to colors through an ordered, immutable band table.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorClassifier {
    bands: Vec<ColorBand>,
    fallback: Rgb8,
}

impl ColorClassifier {
    pub fn new(bands: Vec<ColorBand>) -> TerrainResult<Self> {
        if bands.is_empty() {
            return Err(TerrainError::invalid("palette", "at least one band is required"));
        }
        if let Some(band) = bands.iter().find(|band| !band.upper_offset.is_finite()) {
            return Err(TerrainError::invalid(
                "palette",
                format!("band bound {} is not finite", band.upper_offset),
            ));
        }
        if let Some(pair) = bands
            .windows(2)
            .find(|pair| pair[0].upper_offset >= pair[1].upper_offset)
        {
            return Err(TerrainError::invalid(
                "palette",
                format!(
                    "bands must be strictly ascending, found {} before {}",
                    pair[0].upper_offset, pair[1].upper_offset
                ),
            ));
        }

        Ok(Self {
            bands,
            fallback: Rgb8::BLACK,
        })
    }

    pub fn with_fallback(mut self, fallback: Rgb8) -> Self {
        self.fallback = fallback;
        self
    }

    /// Index of the first band whose bound strictly exceeds `amplitude`, or
    /// `None` when the amplitude lies at or above every bound (or is NaN).
    pub fn band_index(&self, amplitude: f64, threshold: f64) -> Option<usize> {
        self.bands
            .iter()
            .position(|band| amplitude < threshold + band.upper_offset)
    }

    /// Color for `amplitude`; amplitudes outside every band get the fallback color.
    pub fn classify(&self, amplitude: f64, threshold: f64) -> Rgb8 {
        self.band_index(amplitude, threshold)
            .map(|index| self.bands[index].color)
            .unwrap_or(self.fallback)
    }

    pub fn class_of(&self, amplitude: f64, threshold: f64) -> Option<TerrainClass> {
        self.band_index(amplitude, threshold)
            .map(|index| self.bands[index].class)
    }

    pub fn is_water(&self, color: Rgb8) -> bool {
        self.bands
            .iter()
            .any(|band| band.class == TerrainClass::Water && band.color == color)
    }

    pub fn bands(&self) -> &[ColorBand] {
        &self.bands
    }

    pub fn fallback(&self) -> Rgb8 {
        self.fallback
    }
}

impl Default for ColorClassifier {
    fn default() -> Self {
        Self {
            bands: DEFAULT_BANDS.to_vec(),
            fallback: Rgb8::BLACK,
        }
    }
}
