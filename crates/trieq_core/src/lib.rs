//! trieq Core - Equalizer Sessions
//!
//! This crate wraps the DSP chain in the boundary a playback engine calls
//! once per decoded block:
//! - `EqualizerSession`: stateful per-session `process` with pass-through fallback
//! - Configuration (band layout, channel count) loaded from JSON
//! - Slider mapping, presets and lock-free shared gains
//! - Optional dedicated equalizer thread driven over channels
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Control Thread                         │
//! │        sliders / presets ──▶ SharedGains (atomics)          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ snapshot per block
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Decode / Render Loop                      │
//! │   PCM block ──▶ EqualizerSession::process ──▶ output device │
//! │                    (bypass on any failure)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod gains;
mod message;
mod session;
mod worker;

pub use config::EqualizerConfig;
pub use error::{EqError, EqResult, ErrorClass};
pub use gains::{
    db_to_slider, gains_from_sliders, preset, slider_to_db, Preset, SharedGains, DB_PER_STEP,
    PRESETS, SLIDER_CENTER, SLIDER_MAX,
};
pub use message::{Command, Event};
pub use session::{BlockOutcome, EqualizerSession, ProcessedBlock, SessionStats};
pub use worker::EqualizerWorker;

// Re-export DSP types for convenience
pub use trieq_dsp::{pcm, BandGains, BandKind, BandLayout, BandSpec, BandType, DspError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_exports() {
        // Verify public API is accessible
        let _config = EqualizerConfig::default();
        let _session = EqualizerSession::mono().unwrap();
    }
}
