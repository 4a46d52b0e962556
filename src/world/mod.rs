pub mod buffer;
pub mod config;
pub mod defaults;
pub mod error;
pub mod gradient;
pub mod noise_field;
pub mod palette;

use bevy::log::{debug, info};
use image::{GrayImage, ImageBuffer, Luma};
use std::path::Path;

pub use buffer::{ScrollDirection, TerrainBuffer, TerrainSampler};
pub use config::{ExplorerConfig, NoiseParameters, TerrainProfile, WorldMode, WorldSettings};
pub use error::{TerrainError, TerrainResult};
pub use gradient::GradientMask;
pub use noise_field::NoiseField;
pub use palette::{ColorBand, ColorClassifier, Rgb8, TerrainClass};

/// External requests a world reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Pan(ScrollDirection, u32),
    ChangeSeed(i64),
    Init,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Rebuilt,
    Scrolled,
    Ignored,
    Quit,
}

/// One exploration session: the visible terrain plus everything needed to
/// regenerate it.
///
/// Finite worlds are a fixed island under a radial mask and only react to seed
/// changes. Infinite worlds track the world-space origin of the visible window
/// and recompute just the exposed strip on every pan.
#[derive(Clone)]
pub struct TerrainWorld {
    mode: WorldMode,
    params: NoiseParameters,
    sampler: TerrainSampler,
    mask: Option<GradientMask>,
    buffer: TerrainBuffer,
}

impl TerrainWorld {
    pub fn new(settings: WorldSettings) -> TerrainResult<Self> {
        Self::with_classifier(settings, ColorClassifier::default())
    }

    pub fn with_classifier(
        settings: WorldSettings,
        classifier: ColorClassifier,
    ) -> TerrainResult<Self> {
        settings.validate()?;

        let mask = match settings.mode {
            WorldMode::Finite => Some(GradientMask::build(
                settings.width,
                settings.height,
                settings.gradient_exponent,
            )?),
            WorldMode::Infinite => None,
        };
        let sampler = TerrainSampler::new(
            NoiseField::new(&settings.noise),
            settings.profile,
            classifier,
        );
        let buffer = TerrainBuffer::build(
            &sampler,
            mask.as_ref(),
            (0, 0),
            settings.width,
            settings.height,
        )?;

        let world = Self {
            mode: settings.mode,
            params: settings.noise,
            sampler,
            mask,
            buffer,
        };
        world.log_summary("Created");
        Ok(world)
    }

    pub fn apply(&mut self, command: Command) -> TerrainResult<CommandOutcome> {
        match command {
            Command::Pan(direction, speed) => self.pan(direction, speed),
            Command::ChangeSeed(delta) => {
                let seed = self.params.seed.checked_add(delta).ok_or_else(|| {
                    TerrainError::invalid(
                        "seed",
                        format!("{} + {} overflows", self.params.seed, delta),
                    )
                })?;
                self.reseed(seed)?;
                Ok(CommandOutcome::Rebuilt)
            }
            Command::Init => {
                self.rebuild(self.buffer.origin())?;
                Ok(CommandOutcome::Rebuilt)
            }
            Command::Quit => Ok(CommandOutcome::Quit),
        }
    }

    fn pan(&mut self, direction: ScrollDirection, speed: u32) -> TerrainResult<CommandOutcome> {
        if self.mode == WorldMode::Finite {
            debug!("Ignoring {:?} pan in a finite world", direction);
            return Ok(CommandOutcome::Ignored);
        }

        self.buffer.scroll(&self.sampler, direction, speed)?;
        debug!(
            "Panned {:?} by {}px, origin now {:?}",
            direction,
            speed,
            self.buffer.origin()
        );
        Ok(CommandOutcome::Scrolled)
    }

    fn reseed(&mut self, seed: i64) -> TerrainResult<()> {
        let params = self.params.with_seed(seed);
        params.validate()?;

        let sampler = TerrainSampler::new(
            NoiseField::new(&params),
            self.sampler.profile(),
            self.sampler.classifier().clone(),
        );
        let buffer = TerrainBuffer::build(
            &sampler,
            self.mask.as_ref(),
            (0, 0),
            self.buffer.width(),
            self.buffer.height(),
        )?;

        self.params = params;
        self.sampler = sampler;
        self.buffer = buffer;
        self.log_summary("Reseeded");
        Ok(())
    }

    fn rebuild(&mut self, origin: (i64, i64)) -> TerrainResult<()> {
        self.buffer = TerrainBuffer::build(
            &self.sampler,
            self.mask.as_ref(),
            origin,
            self.buffer.width(),
            self.buffer.height(),
        )?;
        self.log_summary("Rebuilt");
        Ok(())
    }

    fn log_summary(&self, action: &str) {
        info!("{} {}", action, self.summary());
    }

    /// One-line description of the visible map, e.g.
    /// `infinite world 64x64 (seed 3): 41.2% water, 58.8% land`.
    pub fn summary(&self) -> String {
        let water = self.buffer.water_ratio(self.sampler.classifier());
        format!(
            "{} world {}x{} (seed {}): {:.1}% water, {:.1}% land",
            self.mode.label(),
            self.buffer.width(),
            self.buffer.height(),
            self.params.seed,
            water * 100.0,
            (1.0 - water) * 100.0
        )
    }

    pub fn mode(&self) -> WorldMode {
        self.mode
    }

    pub fn seed(&self) -> i64 {
        self.params.seed
    }

    pub fn params(&self) -> &NoiseParameters {
        &self.params
    }

    /// World-space coordinate of the visible window's top-left pixel.
    pub fn offset(&self) -> (i64, i64) {
        self.buffer.origin()
    }

    pub fn buffer(&self) -> &TerrainBuffer {
        &self.buffer
    }

    pub fn mask(&self) -> Option<&GradientMask> {
        self.mask.as_ref()
    }

    pub fn sampler(&self) -> &TerrainSampler {
        &self.sampler
    }

    pub fn export_png<P: AsRef<Path>>(&self, path: P) -> TerrainResult<()> {
        self.buffer.save_png(path)
    }

    /// Grayscale rendering of the unclassified amplitudes in the visible window,
    /// masked the same way as the colored map.
    pub fn heightmap(&self) -> GrayImage {
        let (origin_x, origin_y) = self.buffer.origin();
        ImageBuffer::from_fn(self.buffer.width(), self.buffer.height(), |x, y| {
            let weight = self.mask.as_ref().map_or(1.0, |mask| mask.get(x, y));
            let amplitude =
                self.sampler
                    .amplitude(origin_x + x as i64, origin_y + y as i64, weight);
            Luma([(amplitude.clamp(0.0, 1.0) * 255.0) as u8])
        })
    }
}
