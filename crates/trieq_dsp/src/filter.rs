//! Per-Channel Filter State
//!
//! Each channel owns one cascade of three BiQuads. The delay lines live
//! inside the `biquad` filter structs and survive coefficient updates,
//! so retuning gains between blocks does not click.

use biquad::{Biquad, DirectForm1};

use crate::design::CoefficientSet;

/// Low shelf -> peak -> high shelf for a single channel
pub struct ChannelFilters {
    // DirectForm1 keeps the two previous inputs and outputs explicitly
    bass: DirectForm1<f64>,
    mid: DirectForm1<f64>,
    treble: DirectForm1<f64>,
}

impl ChannelFilters {
    pub fn new(coeffs: &CoefficientSet) -> Self {
        Self {
            bass: DirectForm1::<f64>::new(coeffs.bass),
            mid: DirectForm1::<f64>::new(coeffs.mid),
            treble: DirectForm1::<f64>::new(coeffs.treble),
        }
    }

    /// Swap in new coefficients, keeping the delay lines
    pub fn update_coefficients(&mut self, coeffs: &CoefficientSet) {
        self.bass.update_coefficients(coeffs.bass);
        self.mid.update_coefficients(coeffs.mid);
        self.treble.update_coefficients(coeffs.treble);
    }

    /// Zero the delay lines
    pub fn reset(&mut self) {
        self.bass.reset_state();
        self.mid.reset_state();
        self.treble.reset_state();
    }

    /// Run one normalised sample through the cascade
    #[inline]
    pub fn run(&mut self, sample: f64) -> f64 {
        let low = self.bass.run(sample);
        let mid = self.mid.run(low);
        self.treble.run(mid)
    }
}
