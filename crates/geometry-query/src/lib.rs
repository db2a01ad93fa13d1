pub mod mock_geometry;
pub mod scene;
pub mod trace;
pub mod traits;
pub mod types;

pub use mock_geometry::MockGeometry;
pub use scene::{load_scene, Region, SceneModel, Shape};
pub use trace::{MemoryTrace, TraceReader};
pub use traits::*;
pub use types::*;
