// Sound captions library
// Turns the game's playing sounds into an on-screen caption feed

pub mod captions;
pub mod cli;
pub mod config;
pub mod graphics;
pub mod logging;
pub mod overlay;
pub mod replay;
pub mod resource;
pub mod sound;

pub use captions::{AlertLevel, Caption, CaptionEngine, Channel, Classifier, PerceivedSound};
pub use cli::Cli;
pub use config::{Anchor, CaptionsConfig};
pub use logging::LogLevel;
pub use overlay::Overlay;
