//! Audio model and post-processing for murmur
//!
//! Decodes synthesized waveforms, runs the fixed effects chain over them
//! and encodes the result for delivery.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod chain;
mod effects;
mod encode;
mod error;
mod segment;

pub use chain::{Effect, EffectChain};
pub use effects::{Compressor, db_to_float, ratio_to_db};
pub use encode::Encoder;
pub use error::{AudioError, Result};
pub use segment::AudioSegment;
