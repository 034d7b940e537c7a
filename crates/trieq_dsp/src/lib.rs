//! Signal path for trieq: bass, mid and treble BiQuads over 16-bit PCM.
//!
//! [`CoefficientSet::design`] turns a [`BandLayout`], a set of [`BandGains`]
//! and a sample rate into three normalised coefficient sets.
//! [`ThreeBandEqualizer`] runs them as a cascade per channel and keeps the
//! delay lines between calls; [`pcm`] handles the byte format.
//!
//! Nothing here logs or allocates per sample. Retuning happens between
//! blocks through [`ThreeBandEqualizer::set_params`].

mod band;
mod design;
mod equalizer;
mod error;
mod filter;
pub mod pcm;

pub use band::{
    BandGains, BandKind, BandLayout, BandSpec, BandType, BASS_SHELF_HZ, GAIN_RANGE_DB, MID_PEAK_HZ,
    MID_Q, TREBLE_SHELF_HZ,
};
pub use design::{safe_frequency, CoefficientSet, NYQUIST_GUARD};
pub use equalizer::{Retune, ThreeBandEqualizer, MAX_CHANNELS};
pub use error::DspError;
pub use filter::ChannelFilters;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_design_then_process_from_crate_root() {
        let layout = BandLayout::default();
        assert!(CoefficientSet::design(&layout, BandGains::new(3.0, 0.0, -3.0), 48000).is_ok());

        let mut eq = ThreeBandEqualizer::new(2, layout, 48000).unwrap();
        assert_eq!(eq.set_params(48000, BandGains::FLAT).unwrap(), Retune::Unchanged);
        assert_eq!(eq.process(&pcm::to_bytes(&[0, 0])).unwrap(), vec![0u8; 4]);
    }
}
