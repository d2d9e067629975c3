mod error;
mod parser;
mod player;

pub use parser::{Scenario, Step};
pub use player::play;
