pub mod backend;
pub mod constants;
pub mod curve;
pub mod input;
pub mod scene;
pub static CURVES_WGSL: &str = include_str!("../shaders/curves.wgsl");

pub use backend::*;
pub use constants::*;
pub use curve::*;
pub use input::*;
pub use scene::*;
