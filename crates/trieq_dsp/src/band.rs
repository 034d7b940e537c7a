//! Band Layout and Gains
//!
//! The equalizer has exactly three bands. Their corner/centre frequencies
//! and Q values are fixed per session but configurable; the gains change
//! freely between blocks.

use std::fmt;

use biquad::Q_BUTTERWORTH_F64;
use serde::{Deserialize, Serialize};

use crate::error::DspError;

/// Default low-shelf corner frequency (Hz)
pub const BASS_SHELF_HZ: f64 = 250.0;

/// Default peaking filter centre frequency (Hz)
pub const MID_PEAK_HZ: f64 = 1000.0;

/// Default high-shelf corner frequency (Hz)
pub const TREBLE_SHELF_HZ: f64 = 4000.0;

/// Default Q for the mid peak. Wide enough to cover the region between the shelves.
pub const MID_Q: f64 = 0.7;

/// Documented operating range for band gains (dB). Values outside are accepted.
pub const GAIN_RANGE_DB: (f32, f32) = (-12.0, 12.0);

/// Which of the three bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BandKind {
    Bass,
    Mid,
    Treble,
}

impl BandKind {
    pub const ALL: [BandKind; 3] = [BandKind::Bass, BandKind::Mid, BandKind::Treble];
}

impl fmt::Display for BandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BandKind::Bass => "Bass",
            BandKind::Mid => "Mid",
            BandKind::Treble => "Treble",
        };
        f.write_str(name)
    }
}

/// Filter shape used for a band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandType {
    LowShelf,
    Peaking,
    HighShelf,
}

/// Fixed design parameters of one band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandSpec {
    /// Corner (shelf) or centre (peak) frequency in Hz
    pub frequency: f64,
    pub q: f64,
    pub band_type: BandType,
}

impl BandSpec {
    pub fn new(frequency: f64, q: f64, band_type: BandType) -> Self {
        Self {
            frequency,
            q,
            band_type,
        }
    }
}

/// Design parameters for the bass, mid and treble stages
///
/// Stages always run in this order: low shelf, peak, high shelf.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandLayout {
    pub bass: BandSpec,
    pub mid: BandSpec,
    pub treble: BandSpec,
}

impl Default for BandLayout {
    fn default() -> Self {
        Self {
            bass: BandSpec::new(BASS_SHELF_HZ, Q_BUTTERWORTH_F64, BandType::LowShelf),
            mid: BandSpec::new(MID_PEAK_HZ, MID_Q, BandType::Peaking),
            treble: BandSpec::new(TREBLE_SHELF_HZ, Q_BUTTERWORTH_F64, BandType::HighShelf),
        }
    }
}

impl BandLayout {
    pub fn band(&self, kind: BandKind) -> &BandSpec {
        match kind {
            BandKind::Bass => &self.bass,
            BandKind::Mid => &self.mid,
            BandKind::Treble => &self.treble,
        }
    }

    /// Check that every band can be designed at some sample rate
    pub fn validate(&self) -> Result<(), DspError> {
        for kind in BandKind::ALL {
            let spec = self.band(kind);
            let usable = spec.frequency.is_finite()
                && spec.frequency > 0.0
                && spec.q.is_finite()
                && spec.q > 0.0;
            if !usable {
                return Err(DspError::InvalidCoefficients {
                    frequency: spec.frequency,
                    sample_rate: 0.0,
                });
            }
        }
        Ok(())
    }
}

/// Snapshot of the three band gains, in dB
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BandGains {
    pub bass_db: f32,
    pub mid_db: f32,
    pub treble_db: f32,
}

impl BandGains {
    pub const FLAT: BandGains = BandGains {
        bass_db: 0.0,
        mid_db: 0.0,
        treble_db: 0.0,
    };

    pub fn new(bass_db: f32, mid_db: f32, treble_db: f32) -> Self {
        Self {
            bass_db,
            mid_db,
            treble_db,
        }
    }

    pub fn get(&self, kind: BandKind) -> f32 {
        match kind {
            BandKind::Bass => self.bass_db,
            BandKind::Mid => self.mid_db,
            BandKind::Treble => self.treble_db,
        }
    }

    /// Reject NaN and infinite gains. Out-of-range finite gains are allowed.
    pub fn validate(&self) -> Result<(), DspError> {
        for band in BandKind::ALL {
            let value = self.get(band);
            if !value.is_finite() {
                return Err(DspError::NonFiniteGain { band, value });
            }
        }
        Ok(())
    }

    /// Whether every gain lies inside [`GAIN_RANGE_DB`]
    pub fn is_nominal(&self) -> bool {
        let (lo, hi) = GAIN_RANGE_DB;
        BandKind::ALL
            .iter()
            .all(|&band| (lo..=hi).contains(&self.get(band)))
    }
}
