//! DSP Error Types

use thiserror::Error;

use crate::band::BandKind;

/// Errors that can occur during DSP operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DspError {
    #[error("Sample rate must be positive, got {0}")]
    InvalidSampleRate(i32),

    #[error("{band} gain must be finite, got {value}")]
    NonFiniteGain { band: BandKind, value: f32 },

    #[error("Unsupported channel count: {0} (must be 1 or 2)")]
    UnsupportedChannelCount(usize),

    #[error("Invalid filter coefficients for frequency {frequency}Hz at sample rate {sample_rate}Hz")]
    InvalidCoefficients { frequency: f64, sample_rate: f64 },

    #[error("Buffer length {len} is not a multiple of the {frame_bytes}-byte frame size")]
    MalformedBuffer { len: usize, frame_bytes: usize },

    #[error("Output buffer length {got} does not match input length {expected}")]
    BufferSizeMismatch { expected: usize, got: usize },

    #[error("Filter produced a non-finite sample on channel {channel}")]
    NonFiniteOutput { channel: usize },
}

impl DspError {
    /// True for errors caused by the caller's parameters rather than the audio.
    ///
    /// These are detected before any filter state is touched.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(
            self,
            DspError::InvalidSampleRate(_)
                | DspError::NonFiniteGain { .. }
                | DspError::UnsupportedChannelCount(_)
                | DspError::InvalidCoefficients { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DspError::InvalidSampleRate(-1);
        assert!(err.to_string().contains("-1"));

        let err = DspError::InvalidCoefficients {
            frequency: 4000.0,
            sample_rate: 8000.0,
        };
        assert!(err.to_string().contains("4000"));

        let err = DspError::NonFiniteGain {
            band: BandKind::Treble,
            value: f32::NAN,
        };
        assert!(err.to_string().starts_with("Treble"));
    }

    #[test]
    fn test_parameter_classification() {
        assert!(DspError::InvalidSampleRate(0).is_invalid_parameter());
        assert!(DspError::UnsupportedChannelCount(6).is_invalid_parameter());
        assert!(!DspError::MalformedBuffer {
            len: 3,
            frame_bytes: 2
        }
        .is_invalid_parameter());
        assert!(!DspError::NonFiniteOutput { channel: 0 }.is_invalid_parameter());
    }
}
