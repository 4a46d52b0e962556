use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::defaults;
use super::error::{TerrainError, TerrainResult};

/// Fractal noise settings for one generation pass.
///
/// `scale` is the world distance covered by one unit of the first octave, so
/// larger values zoom in. Changing `seed` always calls for a full rebuild.
/// Seeds are limited to the `i32` range, which maps one-to-one onto the
/// 32-bit Perlin seed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseParameters {
    pub scale: f64,
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
    pub seed: i64,
}

impl NoiseParameters {
    pub fn infinite() -> Self {
        use defaults::*;

        Self {
            scale: INFINITE_SCALE,
            octaves: INFINITE_OCTAVES,
            persistence: INFINITE_PERSISTENCE,
            lacunarity: INFINITE_LACUNARITY,
            seed: SEED,
        }
    }

    pub fn finite() -> Self {
        use defaults::*;

        Self {
            scale: FINITE_SCALE,
            octaves: FINITE_OCTAVES,
            persistence: FINITE_PERSISTENCE,
            lacunarity: FINITE_LACUNARITY,
            seed: SEED,
        }
    }

    pub fn with_seed(self, seed: i64) -> Self {
        Self { seed, ..self }
    }

    pub fn validate(&self) -> TerrainResult<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(TerrainError::invalid(
                "scale",
                format!("must be a positive number, got {}", self.scale),
            ));
        }
        if self.octaves < 1 {
            return Err(TerrainError::invalid("octaves", "at least one octave is required"));
        }
        if !(self.persistence > 0.0 && self.persistence < 1.0) {
            return Err(TerrainError::invalid(
                "persistence",
                format!("must lie strictly between 0 and 1, got {}", self.persistence),
            ));
        }
        if !(self.lacunarity.is_finite() && self.lacunarity > 1.0) {
            return Err(TerrainError::invalid(
                "lacunarity",
                format!("must be greater than 1, got {}", self.lacunarity),
            ));
        }
        if i32::try_from(self.seed).is_err() {
            return Err(TerrainError::invalid(
                "seed",
                format!(
                    "must lie within {}..={}, got {}",
                    i32::MIN,
                    i32::MAX,
                    self.seed
                ),
            ));
        }
        Ok(())
    }
}

impl Default for NoiseParameters {
    fn default() -> Self {
        Self::infinite()
    }
}

/// How a raw noise sample becomes a classified amplitude:
/// `(sample + bias) * mask`, then banded relative to `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainProfile {
    pub bias: f64,
    pub threshold: f64,
}

impl TerrainProfile {
    pub fn infinite() -> Self {
        Self {
            bias: defaults::AMPLITUDE_BIAS,
            threshold: defaults::INFINITE_THRESHOLD,
        }
    }

    pub fn finite() -> Self {
        Self {
            bias: defaults::AMPLITUDE_BIAS,
            threshold: defaults::FINITE_THRESHOLD,
        }
    }

    pub fn validate(&self) -> TerrainResult<()> {
        if !self.bias.is_finite() {
            return Err(TerrainError::invalid("bias", "must be finite"));
        }
        if !self.threshold.is_finite() {
            return Err(TerrainError::invalid("threshold", "must be finite"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldMode {
    Finite,
    Infinite,
}

impl WorldMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Finite => "finite",
            Self::Infinite => "infinite",
        }
    }
}

impl std::str::FromStr for WorldMode {
    type Err = TerrainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "finite" => Ok(Self::Finite),
            "infinite" => Ok(Self::Infinite),
            other => Err(TerrainError::invalid(
                "mode",
                format!("expected `finite` or `infinite`, got `{other}`"),
            )),
        }
    }
}

/// Everything needed to construct a [`TerrainWorld`](super::TerrainWorld).
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSettings {
    pub mode: WorldMode,
    pub width: u32,
    pub height: u32,
    pub noise: NoiseParameters,
    pub profile: TerrainProfile,
    pub gradient_exponent: f64,
}

impl WorldSettings {
    pub fn infinite(width: u32, height: u32) -> Self {
        Self {
            mode: WorldMode::Infinite,
            width,
            height,
            noise: NoiseParameters::infinite(),
            profile: TerrainProfile::infinite(),
            gradient_exponent: defaults::GRADIENT_EXPONENT,
        }
    }

    pub fn finite(width: u32, height: u32) -> Self {
        Self {
            mode: WorldMode::Finite,
            width,
            height,
            noise: NoiseParameters::finite(),
            profile: TerrainProfile::finite(),
            gradient_exponent: defaults::GRADIENT_EXPONENT,
        }
    }

    pub fn with_noise(self, noise: NoiseParameters) -> Self {
        Self { noise, ..self }
    }

    pub fn validate(&self) -> TerrainResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TerrainError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        self.noise.validate()?;
        self.profile.validate()?;
        if !(self.gradient_exponent.is_finite() && self.gradient_exponent > 0.0) {
            return Err(TerrainError::invalid(
                "gradient_exponent",
                format!("must be a positive number, got {}", self.gradient_exponent),
            ));
        }
        Ok(())
    }
}

/// On-disk settings shared by the viewer and the command line renderer.
#[derive(Resource, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExplorerConfig {
    pub mode: WorldMode,
    pub width: u32,
    pub height: u32,
    pub moving_speed: u32,
    pub infinite: NoiseParameters,
    pub finite: NoiseParameters,
    pub infinite_profile: TerrainProfile,
    pub finite_profile: TerrainProfile,
    pub gradient_exponent: f64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        use defaults::*;

        Self {
            mode: WorldMode::Finite,
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
            moving_speed: MOVING_SPEED,
            infinite: NoiseParameters::infinite(),
            finite: NoiseParameters::finite(),
            infinite_profile: TerrainProfile::infinite(),
            finite_profile: TerrainProfile::finite(),
            gradient_exponent: GRADIENT_EXPONENT,
        }
    }
}

impl ExplorerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> TerrainResult<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> TerrainResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, json)?;
        Ok(())
    }

    pub fn world_settings(&self) -> WorldSettings {
        let (noise, profile) = match self.mode {
            WorldMode::Finite => (self.finite, self.finite_profile),
            WorldMode::Infinite => (self.infinite, self.infinite_profile),
        };

        WorldSettings {
            mode: self.mode,
            width: self.width,
            height: self.height,
            noise,
            profile,
            gradient_exponent: self.gradient_exponent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_noise_parameters_are_valid() {
        NoiseParameters::infinite().validate().expect("infinite defaults");
        NoiseParameters::finite().validate().expect("finite defaults");
    }

    #[test]
    fn out_of_domain_parameters_are_rejected() {
        let base = NoiseParameters::infinite();

        let cases = [
            NoiseParameters { scale: 0.0, ..base },
            NoiseParameters { scale: -3.0, ..base },
            NoiseParameters { octaves: 0, ..base },
            NoiseParameters { persistence: 1.0, ..base },
            NoiseParameters { persistence: 0.0, ..base },
            NoiseParameters { lacunarity: 1.0, ..base },
            NoiseParameters { lacunarity: f64::NAN, ..base },
            NoiseParameters { seed: i64::from(i32::MAX) + 1, ..base },
            NoiseParameters { seed: i64::from(i32::MIN) - 1, ..base },
            NoiseParameters { seed: 1 << 32, ..base },
        ];

        for params in cases {
            assert!(
                matches!(params.validate(), Err(TerrainError::InvalidParameter { .. })),
                "{params:?} should be rejected"
            );
        }
    }

    #[test]
    fn seed_range_matches_the_noise_seed_width() {
        let base = NoiseParameters::infinite();
        for seed in [i64::from(i32::MIN), -1, 0, i64::from(i32::MAX)] {
            base.with_seed(seed).validate().expect("seed within i32");
        }

        let aliased = base.with_seed(1 << 32).validate();
        assert!(matches!(
            aliased,
            Err(TerrainError::InvalidParameter { name: "seed", .. })
        ));
    }

    #[test]
    fn zero_sized_world_is_rejected() {
        let settings = WorldSettings::infinite(0, 32);
        assert!(matches!(
            settings.validate(),
            Err(TerrainError::InvalidDimensions { width: 0, height: 32 })
        ));
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: ExplorerConfig =
            serde_json::from_str(r#"{ "mode": "infinite", "width": 320 }"#).expect("parse config");

        assert_eq!(config.mode, WorldMode::Infinite);
        assert_eq!(config.width, 320);
        assert_eq!(config.height, defaults::MAP_HEIGHT);
        assert_eq!(config.moving_speed, defaults::MOVING_SPEED);
        assert_eq!(config.infinite, NoiseParameters::infinite());
    }

    #[test]
    fn config_survives_a_save_and_load() {
        let dir = std::env::temp_dir().join(format!("terrain_explorer_cfg_{}", std::process::id()));
        let path = dir.join("explorer.json");

        let mut config = ExplorerConfig::default();
        config.mode = WorldMode::Infinite;
        config.infinite.seed = -7;
        config.save(&path).expect("save config");

        let loaded = ExplorerConfig::load(&path).expect("load config");
        assert_eq!(loaded, config);
        assert_eq!(loaded.world_settings().noise.seed, -7);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Infinite".parse::<WorldMode>().unwrap(), WorldMode::Infinite);
        assert_eq!("finite".parse::<WorldMode>().unwrap(), WorldMode::Finite);
        assert!("spherical".parse::<WorldMode>().is_err());
    }
}
