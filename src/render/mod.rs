mod canvas;
mod frame;
mod geometry;
mod labels;

pub use canvas::{place, CommandList, DrawCommand, Placed};
#[cfg(test)]
pub use canvas::Paint;
pub use frame::{render_frame, Viewport};
pub use geometry::Point;
