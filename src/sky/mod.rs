mod projector;

pub use projector::{elevation_radius, project_all, DotStyle};
