//! Caption pipeline
//!
//! Raw sounds are classified into perceived sounds, which the engine folds
//! into a small, stable set of captions.
//!
//! # Architecture
//!
//! - `classifier` filters and normalizes individual sounds
//! - `engine` owns the caption set and arbitrates channel slots
//! - `types` holds the shared value types

pub mod classifier;
pub mod engine;
pub mod types;

pub use classifier::{
    audibility, normalize_sound_id, parse_alert_sigils, Classifier, Rejection,
    AUDIBILITY_THRESHOLD, CAPTION_KEY_PREFIX,
};
pub use engine::{Admission, CaptionEngine};
pub use types::{AlertLevel, Caption, Channel, Millis, PerceivedSound, DEFAULT_PRIORITY};
