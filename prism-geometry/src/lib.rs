pub mod bezier;
pub mod builder;
pub mod shapes;
pub mod types;

pub use bezier::BezierCurve;
pub use builder::{Cycle, MeshBuilder};
pub use types::{MeshDescription, Vertex};
