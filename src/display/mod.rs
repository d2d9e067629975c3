mod events;
mod sky_display;
mod snapshot;

pub use events::{pump, EventSource, SkyEvent};
pub use sky_display::SkyDisplay;
pub use snapshot::DisplaySnapshot;
