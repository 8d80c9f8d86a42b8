mod color;
mod mode;
mod state;

pub use color::{Rgb, Rgba};
pub use mode::InteractionMode;
pub use state::{CameraTransform, DEFAULT_SCREEN_SIDE, SimulationState};
