//! Coefficient Designer
//!
//! Turns a band layout, three gains and a sample rate into BiQuad
//! coefficients. Based on the RBJ (Robert Bristow-Johnson) Audio EQ Cookbook
//! as implemented by `biquad::Coefficients::from_params`.
//!
//! All design math runs in f64 and the results are normalised so that
//! `a0 == 1`.

use biquad::{Coefficients, ToHertz, Type};

#[cfg(test)]
use crate::band::BandKind;
use crate::band::{BandGains, BandLayout, BandSpec, BandType};
use crate::error::DspError;

/// Fraction of the sample rate a corner frequency is clamped to when it
/// reaches or exceeds Nyquist
pub const NYQUIST_GUARD: f64 = 0.49;

/// Clamp a corner frequency below Nyquist
///
/// At 8 kHz the default 4 kHz treble shelf would sit exactly on Nyquist,
/// where the cookbook formulas degenerate.
#[inline]
pub fn safe_frequency(frequency: f64, sample_rate: f64) -> f64 {
    if frequency >= sample_rate * 0.5 {
        sample_rate * NYQUIST_GUARD
    } else {
        frequency
    }
}

impl BandSpec {
    /// Generate BiQuad coefficients for this band at the given gain
    ///
    /// `biquad` takes shelf and peak gains in dB (A = 10^(dB/40)).
    pub fn to_coefficients(self, gain_db: f32, sample_rate: f64) -> Result<Coefficients<f64>, DspError> {
        let invalid = || DspError::InvalidCoefficients {
            frequency: self.frequency,
            sample_rate,
        };

        if !(sample_rate > 0.0) || !(self.frequency > 0.0) || !(self.q > 0.0) {
            return Err(invalid());
        }

        let gain = f64::from(gain_db);
        let filter = match self.band_type {
            BandType::LowShelf => Type::LowShelf(gain),
            BandType::Peaking => Type::PeakingEQ(gain),
            BandType::HighShelf => Type::HighShelf(gain),
        };
        let f0 = safe_frequency(self.frequency, sample_rate);

        let coeffs = Coefficients::<f64>::from_params(filter, sample_rate.hz(), f0.hz(), self.q)
            .map_err(|_| invalid())?;

        // Absurd gains overflow A without tripping biquad's own checks
        let finite = [coeffs.a1, coeffs.a2, coeffs.b0, coeffs.b1, coeffs.b2]
            .iter()
            .all(|c| c.is_finite());
        if finite {
            Ok(coeffs)
        } else {
            Err(invalid())
        }
    }
}

/// Coefficients for all three stages, designed together for one
/// (sample rate, gains) pair
#[derive(Clone, Copy)]
pub struct CoefficientSet {
    pub bass: Coefficients<f64>,
    pub mid: Coefficients<f64>,
    pub treble: Coefficients<f64>,
}

impl CoefficientSet {
    /// Design all three stages
    ///
    /// Fails without side effects on a non-positive sample rate, a
    /// non-finite gain or a layout that cannot be designed.
    pub fn design(layout: &BandLayout, gains: BandGains, sample_rate: i32) -> Result<Self, DspError> {
        if sample_rate <= 0 {
            return Err(DspError::InvalidSampleRate(sample_rate));
        }
        gains.validate()?;

        let fs = f64::from(sample_rate);
        Ok(Self {
            bass: layout.bass.to_coefficients(gains.bass_db, fs)?,
            mid: layout.mid.to_coefficients(gains.mid_db, fs)?,
            treble: layout.treble.to_coefficients(gains.treble_db, fs)?,
        })
    }

    #[cfg(test)]
    pub(crate) fn get(&self, kind: BandKind) -> &Coefficients<f64> {
        match kind {
            BandKind::Bass => &self.bass,
            BandKind::Mid => &self.mid,
            BandKind::Treble => &self.treble,
        }
    }
}
