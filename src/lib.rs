pub mod explorer;
pub mod input;
pub mod world;
