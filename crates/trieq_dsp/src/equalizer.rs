//! Three-Band Equalizer
//!
//! Cascade of a low shelf (bass), a peaking filter (mid) and a high shelf
//! (treble), applied per channel to interleaved 16-bit PCM.
//!
//! Coefficients are only replaced between blocks, through [`set_params`].
//! The per-sample path performs no allocations.
//!
//! [`set_params`]: ThreeBandEqualizer::set_params

use crate::band::{BandGains, BandLayout};
use crate::design::CoefficientSet;
use crate::error::DspError;
use crate::filter::ChannelFilters;
use crate::pcm;

/// Largest supported channel count (mono or interleaved stereo)
pub const MAX_CHANNELS: usize = 2;

/// What [`ThreeBandEqualizer::set_params`] had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retune {
    /// Same sample rate and gains as before, nothing recomputed
    Unchanged,
    /// New coefficients, delay lines kept
    GainsChanged,
    /// New coefficients, delay lines zeroed
    SampleRateChanged,
}

/// The block processor
///
/// Holds one filter cascade per channel plus the parameters the current
/// coefficients were designed for.
pub struct ThreeBandEqualizer {
    layout: BandLayout,
    filters: Vec<ChannelFilters>,
    sample_rate: i32,
    gains: BandGains,
}

impl ThreeBandEqualizer {
    /// Create an equalizer with a flat response
    pub fn new(channels: usize, layout: BandLayout, sample_rate: i32) -> Result<Self, DspError> {
        if channels == 0 || channels > MAX_CHANNELS {
            return Err(DspError::UnsupportedChannelCount(channels));
        }
        layout.validate()?;

        let coeffs = CoefficientSet::design(&layout, BandGains::FLAT, sample_rate)?;
        let filters = (0..channels).map(|_| ChannelFilters::new(&coeffs)).collect();

        Ok(Self {
            layout,
            filters,
            sample_rate,
            gains: BandGains::FLAT,
        })
    }

    /// Retune for the next block
    ///
    /// Designs first and only touches filter state once the design has
    /// succeeded, so an error leaves the equalizer exactly as it was.
    pub fn set_params(&mut self, sample_rate: i32, gains: BandGains) -> Result<Retune, DspError> {
        if sample_rate == self.sample_rate && gains == self.gains {
            return Ok(Retune::Unchanged);
        }

        let coeffs = CoefficientSet::design(&self.layout, gains, sample_rate)?;
        let rate_changed = sample_rate != self.sample_rate;

        for filters in &mut self.filters {
            filters.update_coefficients(&coeffs);
            if rate_changed {
                // History computed at another rate is meaningless here
                filters.reset();
            }
        }
        self.sample_rate = sample_rate;
        self.gains = gains;

        Ok(if rate_changed {
            Retune::SampleRateChanged
        } else {
            Retune::GainsChanged
        })
    }

    /// Process a whole-frame PCM buffer into `output`
    ///
    /// `input` must be a multiple of the frame size and `output` must be the
    /// same length. Stops at the first non-finite filter output; the
    /// delay lines are then garbage and the caller should [`reset`].
    ///
    /// [`reset`]: ThreeBandEqualizer::reset
    pub fn process_into(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), DspError> {
        let frame_bytes = pcm::frame_bytes(self.channels());
        if input.len() % frame_bytes != 0 {
            return Err(DspError::MalformedBuffer {
                len: input.len(),
                frame_bytes,
            });
        }
        if output.len() != input.len() {
            return Err(DspError::BufferSizeMismatch {
                expected: input.len(),
                got: output.len(),
            });
        }

        for (in_frame, out_frame) in input
            .chunks_exact(frame_bytes)
            .zip(output.chunks_exact_mut(frame_bytes))
        {
            for (channel, filters) in self.filters.iter_mut().enumerate() {
                let offset = channel * pcm::BYTES_PER_SAMPLE;
                let x = pcm::sample_to_f64(pcm::read_sample(in_frame, offset));
                let y = filters.run(x);
                if !y.is_finite() {
                    return Err(DspError::NonFiniteOutput { channel });
                }
                pcm::write_sample(out_frame, offset, pcm::f64_to_sample(y));
            }
        }

        Ok(())
    }

    /// Process a whole-frame PCM buffer into a new buffer of the same length
    pub fn process(&mut self, input: &[u8]) -> Result<Vec<u8>, DspError> {
        let mut output = vec![0u8; input.len()];
        self.process_into(input, &mut output)?;
        Ok(output)
    }

    /// Process an interleaved float buffer in-place
    ///
    /// Buffer format: [L0, R0, L1, R1, ...] for stereo, plain samples for mono.
    /// A trailing partial frame is left untouched. No clamping is applied.
    #[inline]
    pub fn process_interleaved(&mut self, buffer: &mut [f32]) {
        let channels = self.channels();
        for frame in buffer.chunks_exact_mut(channels) {
            for (sample, filters) in frame.iter_mut().zip(self.filters.iter_mut()) {
                *sample = filters.run(f64::from(*sample)) as f32;
            }
        }
    }

    /// Reset filter state (clear delay lines)
    ///
    /// Call when playback restarts to prevent ringing from the old stream.
    pub fn reset(&mut self) {
        for filters in &mut self.filters {
            filters.reset();
        }
    }

    pub fn channels(&self) -> usize {
        self.filters.len()
    }

    pub fn layout(&self) -> &BandLayout {
        &self.layout
    }

    /// Sample rate the current coefficients were designed for
    pub fn sample_rate(&self) -> i32 {
        self.sample_rate
    }

    /// Gains the current coefficients were designed for
    pub fn gains(&self) -> BandGains {
        self.gains
    }
}
