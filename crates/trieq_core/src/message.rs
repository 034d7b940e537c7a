//! Message Types for Thread Communication
//!
//! Commands flow from the render loop -> equalizer thread
//! Events flow from the equalizer thread -> render loop

use serde::{Deserialize, Serialize};

use crate::session::{BlockOutcome, SessionStats};

/// Commands sent to an [`EqualizerWorker`](crate::EqualizerWorker)
#[derive(Debug, Clone)]
pub enum Command {
    /// Equalize one decoded block with the worker's current gains
    Process { pcm: Vec<u8>, sample_rate: i32 },

    /// Clear filter state (playback restarted or source changed)
    Reset,

    /// Request current counters (triggers a Stats event)
    RequestStats,

    /// Stop the worker thread
    Shutdown,
}

/// Events sent back from the equalizer thread
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Event {
    /// A block is ready for the output device
    Processed { pcm: Vec<u8>, outcome: BlockOutcome },

    /// Filter state was cleared
    Reset,

    /// Session counters
    Stats(SessionStats),

    /// Worker thread exited
    Stopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = Event::Processed {
            pcm: vec![1, 0],
            outcome: BlockOutcome::Truncated { dropped_bytes: 1 },
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"Processed\""));
        assert!(json.contains("dropped_bytes"));

        let back: Event = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            back,
            Event::Processed {
                outcome: BlockOutcome::Truncated { dropped_bytes: 1 },
                ..
            }
        ));
    }

    #[test]
    fn test_stats_event() {
        let json = serde_json::to_string(&Event::Stats(SessionStats::default())).unwrap();
        assert!(json.contains("blocks_processed"));
    }
}
