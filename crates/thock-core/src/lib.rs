pub mod constants;
pub mod device;
pub mod engine;
pub mod envelope;
pub mod filter;
pub mod graph;
pub mod jitter;
pub mod noise;
pub mod offline;
pub mod profile;
pub mod render;
pub mod synth;

pub use constants::*;
pub use device::*;
pub use engine::*;
pub use envelope::*;
pub use graph::*;
pub use jitter::*;
pub use noise::*;
pub use offline::*;
pub use profile::*;
pub use render::*;
pub use synth::*;
