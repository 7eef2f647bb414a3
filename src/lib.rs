pub mod canvas;
pub mod logging;

pub use canvas::{DrawingSurface, SurfaceState};
