pub mod bridge;
pub mod export;
pub mod history;
pub mod input;
pub mod model;
pub mod raster;
pub mod settings;
pub mod settings_store;
pub mod shapes;
pub mod style;
pub mod surface;

pub use input::{BoundingRect, PointerInput, PointerPhase, PointerSource};
pub use model::{Color, Point, ShapeKind, Tool};
pub use surface::{DrawingSurface, SurfaceState};
