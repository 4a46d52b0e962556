pub mod view {
    pub const SEED: i64 = 0;
    pub const MAP_WIDTH: u32 = 1000;
    pub const MAP_HEIGHT: u32 = 1000;
    pub const MOVING_SPEED: u32 = 40;
}
pub mod infinite {
    pub const INFINITE_SCALE: f64 = 300.0;
    pub const INFINITE_OCTAVES: u32 = 5;
    pub const INFINITE_PERSISTENCE: f64 = 0.5;
    pub const INFINITE_LACUNARITY: f64 = 2.0;
}
pub mod finite {
    pub const FINITE_SCALE: f64 = 200.0;
    pub const FINITE_OCTAVES: u32 = 5;
    pub const FINITE_PERSISTENCE: f64 = 0.5;
    pub const FINITE_LACUNARITY: f64 = 2.0;
}
pub mod gradient {
    pub const GRADIENT_EXPONENT: f64 = 1.5;
}
pub mod profile {
    pub const AMPLITUDE_BIAS: f64 = 0.5;
    pub const INFINITE_THRESHOLD: f64 = 0.5;
    pub const FINITE_THRESHOLD: f64 = 0.15;
}
pub use view::*;
pub use finite::*;
pub use gradient::*;
pub use infinite::*;
pub use profile::*;
