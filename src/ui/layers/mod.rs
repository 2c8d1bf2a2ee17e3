//! The game's concrete layers.

mod control;
mod gameplay;
mod pause;
mod progress;
mod welcome;

pub use control::{ControlOverlay, Eye, EyeControl};
pub use gameplay::GameplayLayer;
pub use pause::PauseLayer;
pub use progress::{Progress, ProgressBarLayer};
pub use welcome::WelcomeOverlay;
