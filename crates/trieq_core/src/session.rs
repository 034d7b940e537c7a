//! Equalizer Session
//!
//! One session per playback session. It owns the filter state for every
//! channel and exposes the PCM boundary used by the decode/render loop:
//!
//! ```text
//! process(pcm, bass_db, mid_db, treble_db, sample_rate) -> pcm
//! ```
//!
//! The boundary never fails. Whatever goes wrong, the caller gets audio
//! back: processed, truncated to whole frames, or the untouched input.
//! [`EqualizerSession::try_process`] is the strict variant that reports
//! errors instead.
//!
//! Calls against one session must be serialized (`&mut self`). Separate
//! sessions share nothing and can run on separate threads.

use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use trieq_dsp::{pcm, BandGains, BandLayout, DspError, Retune, ThreeBandEqualizer};

use crate::config::EqualizerConfig;
use crate::error::{EqError, EqResult, ErrorClass};

/// Sample rate the filters are designed for before the first block arrives
const INITIAL_SAMPLE_RATE: i32 = 44100;

/// Result of [`EqualizerSession::try_process`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedBlock {
    /// Processed PCM, whole frames only
    pub pcm: Vec<u8>,
    /// Trailing bytes that did not form a whole frame and were dropped
    pub dropped_bytes: usize,
}

/// What happened to the most recent block passed to [`EqualizerSession::process`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockOutcome {
    /// No block processed yet, or the session was just reset
    Idle,
    /// Zero-length input, returned as-is
    Empty,
    /// Whole buffer equalized
    Processed,
    /// Whole-frame prefix equalized, trailing partial frame dropped
    Truncated { dropped_bytes: usize },
    /// Input returned unmodified because of an error of this class
    PassedThrough(ErrorClass),
}

/// Running counters for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub blocks_processed: u64,
    pub blocks_truncated: u64,
    pub blocks_passed_through: u64,
    pub faults: u64,
}

/// Stateful three-band equalizer bound to one playback session
pub struct EqualizerSession {
    eq: ThreeBandEqualizer,
    last_outcome: BlockOutcome,
    stats: SessionStats,
    #[cfg(test)]
    injected_fault: Option<InjectedFault>,
}

impl EqualizerSession {
    /// Create a session from a validated configuration
    pub fn new(config: &EqualizerConfig) -> EqResult<Self> {
        config.validate()?;
        Self::with_layout(config.channels as usize, config.layout)
    }

    /// Create a mono session with the default band layout
    pub fn mono() -> EqResult<Self> {
        Self::with_layout(1, BandLayout::default())
    }

    /// Create a stereo session with the default band layout
    pub fn stereo() -> EqResult<Self> {
        Self::with_layout(2, BandLayout::default())
    }

    pub fn with_layout(channels: usize, layout: BandLayout) -> EqResult<Self> {
        let eq = ThreeBandEqualizer::new(channels, layout, INITIAL_SAMPLE_RATE)?;
        Ok(Self {
            eq,
            last_outcome: BlockOutcome::Idle,
            stats: SessionStats::default(),
            #[cfg(test)]
            injected_fault: None,
        })
    }

    /// Equalize one block; never fails
    ///
    /// Returns a buffer of the same length for whole-frame input. A trailing
    /// partial frame is dropped. On invalid parameters or an internal fault
    /// the input is returned unchanged. See [`last_outcome`] for which case
    /// applied.
    ///
    /// [`last_outcome`]: EqualizerSession::last_outcome
    pub fn process(
        &mut self,
        pcm: &[u8],
        bass_db: f32,
        mid_db: f32,
        treble_db: f32,
        sample_rate: i32,
    ) -> Vec<u8> {
        let gains = BandGains::new(bass_db, mid_db, treble_db);
        match self.try_process(pcm, gains, sample_rate) {
            Ok(block) => {
                self.last_outcome = if pcm.is_empty() {
                    BlockOutcome::Empty
                } else if block.dropped_bytes > 0 {
                    BlockOutcome::Truncated {
                        dropped_bytes: block.dropped_bytes,
                    }
                } else {
                    BlockOutcome::Processed
                };
                block.pcm
            }
            Err(e) => {
                let class = e.class();
                match class {
                    ErrorClass::ProcessingFault => {
                        error!("Equalizer fault, passing audio through: {}", e)
                    }
                    _ => warn!("Equalizer skipped block, passing audio through: {}", e),
                }
                self.stats.blocks_passed_through += 1;
                self.last_outcome = BlockOutcome::PassedThrough(class);
                pcm.to_vec()
            }
        }
    }

    /// Equalize one block, reporting errors
    ///
    /// Parameter errors are detected before any filter state changes. A
    /// fault inside the block loop zeroes the filter state before returning.
    pub fn try_process(
        &mut self,
        pcm: &[u8],
        gains: BandGains,
        sample_rate: i32,
    ) -> EqResult<ProcessedBlock> {
        if pcm.is_empty() {
            return Ok(ProcessedBlock {
                pcm: Vec::new(),
                dropped_bytes: 0,
            });
        }

        self.retune(sample_rate, gains)?;

        let aligned = pcm::aligned_len(pcm.len(), self.channels());
        let dropped_bytes = pcm.len() - aligned;
        if dropped_bytes > 0 {
            warn!(
                "Block of {} bytes is not frame-aligned, dropping {} trailing bytes",
                pcm.len(),
                dropped_bytes
            );
        }

        let mut output = vec![0u8; aligned];
        let eq = &mut self.eq;
        #[cfg(test)]
        let injected = self.injected_fault.take();
        let result = panic::catch_unwind(AssertUnwindSafe(|| -> Result<(), DspError> {
            eq.process_into(&pcm[..aligned], &mut output)?;
            #[cfg(test)]
            if let Some(fault) = injected {
                fault.raise()?;
            }
            Ok(())
        }));

        let fault = match result {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(EqError::from(e)),
            Err(payload) => Some(EqError::ProcessingFault(panic_message(payload.as_ref()))),
        };
        if let Some(e) = fault {
            self.stats.faults += 1;
            self.eq.reset();
            return Err(e);
        }

        self.stats.blocks_processed += 1;
        if dropped_bytes > 0 {
            self.stats.blocks_truncated += 1;
        }
        Ok(ProcessedBlock {
            pcm: output,
            dropped_bytes,
        })
    }

    fn retune(&mut self, sample_rate: i32, gains: BandGains) -> EqResult<()> {
        match self.eq.set_params(sample_rate, gains)? {
            Retune::Unchanged => return Ok(()),
            Retune::GainsChanged => debug!(
                "Coefficients recomputed for bass {} dB, mid {} dB, treble {} dB",
                gains.bass_db, gains.mid_db, gains.treble_db
            ),
            Retune::SampleRateChanged => {
                debug!("Sample rate changed to {} Hz, filter state cleared", sample_rate)
            }
        }
        if !gains.is_nominal() {
            debug!(
                "Gains outside the {:?} dB slider range, applying as given",
                trieq_dsp::GAIN_RANGE_DB
            );
        }
        Ok(())
    }

    /// Clear all filter state, e.g. when playback restarts
    pub fn reset(&mut self) {
        self.eq.reset();
        self.last_outcome = BlockOutcome::Idle;
        debug!("Equalizer session reset");
    }

    pub fn channels(&self) -> usize {
        self.eq.channels()
    }

    pub fn layout(&self) -> &BandLayout {
        self.eq.layout()
    }

    /// Sample rate of the current coefficients
    pub fn sample_rate(&self) -> i32 {
        self.eq.sample_rate()
    }

    /// Gains of the current coefficients
    pub fn gains(&self) -> BandGains {
        self.eq.gains()
    }

    pub fn last_outcome(&self) -> BlockOutcome {
        self.last_outcome
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }
}

/// Failure forced into the block loop by unit tests
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
enum InjectedFault {
    NonFiniteOutput,
    Panic,
}

#[cfg(test)]
impl InjectedFault {
    fn raise(self) -> Result<(), DspError> {
        match self {
            InjectedFault::NonFiniteOutput => Err(DspError::NonFiniteOutput { channel: 0 }),
            InjectedFault::Panic => panic!("filter cascade blew up"),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic in block loop".to_string()
    }
}
