//! Equalizer Error Types

use serde::{Deserialize, Serialize};
use thiserror::Error;
use trieq_dsp::DspError;

/// Errors that can occur in an equalizer session or worker
#[derive(Error, Debug)]
pub enum EqError {
    #[error("DSP error: {0}")]
    Dsp(#[from] DspError),

    #[error("Processing fault: {0}")]
    ProcessingFault(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to spawn equalizer thread: {0}")]
    WorkerSpawn(String),

    #[error("Channel send error - receiver dropped")]
    ChannelSendError,

    #[error("Channel receive error - sender dropped")]
    ChannelRecvError,
}

/// Result type alias for equalizer operations
pub type EqResult<T> = Result<T, EqError>;

/// Coarse failure category for a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Bad sample rate, gain or layout; rejected before touching filter state
    InvalidParameter,
    /// Buffer not aligned to whole frames
    MalformedBuffer,
    /// Unexpected failure inside the block loop
    ProcessingFault,
    /// Configuration, I/O or channel errors outside the audio path
    Other,
}

impl EqError {
    pub fn class(&self) -> ErrorClass {
        match self {
            EqError::Dsp(DspError::MalformedBuffer { .. }) => ErrorClass::MalformedBuffer,
            EqError::Dsp(DspError::NonFiniteOutput { .. })
            | EqError::Dsp(DspError::BufferSizeMismatch { .. }) => ErrorClass::ProcessingFault,
            EqError::Dsp(e) if e.is_invalid_parameter() => ErrorClass::InvalidParameter,
            EqError::Dsp(_) => ErrorClass::Other,
            EqError::ProcessingFault(_) => ErrorClass::ProcessingFault,
            _ => ErrorClass::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EqError::ProcessingFault("panicked".into());
        assert!(err.to_string().contains("panicked"));

        let err = EqError::Config("channels must be 1 or 2".into());
        assert!(err.to_string().contains("channels"));
    }

    #[test]
    fn test_error_from_dsp() {
        let dsp_err = DspError::InvalidSampleRate(0);
        let err: EqError = dsp_err.into();
        assert!(matches!(err, EqError::Dsp(_)));
        assert_eq!(err.class(), ErrorClass::InvalidParameter);
    }

    #[test]
    fn test_classification() {
        let malformed: EqError = DspError::MalformedBuffer {
            len: 3,
            frame_bytes: 2,
        }
        .into();
        assert_eq!(malformed.class(), ErrorClass::MalformedBuffer);

        let fault: EqError = DspError::NonFiniteOutput { channel: 1 }.into();
        assert_eq!(fault.class(), ErrorClass::ProcessingFault);

        assert_eq!(EqError::ChannelSendError.class(), ErrorClass::Other);
    }
}
