//! Dedicated Equalizer Thread
//!
//! Runs one [`EqualizerSession`] on its own thread. The decode loop submits
//! blocks over a bounded channel and reads results back in order; a control
//! thread adjusts gains through the shared [`SharedGains`] at any time.
//!
//! ```text
//! decode loop ──Command──▶ trieq-eq thread ──Event──▶ output writer
//!                              ▲
//!          UI ──SharedGains────┘ (snapshot per block)
//! ```

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use tracing::{info, warn};

use crate::config::EqualizerConfig;
use crate::error::{EqError, EqResult};
use crate::gains::SharedGains;
use crate::message::{Command, Event};
use crate::session::EqualizerSession;

/// Handle to an equalizer thread
///
/// Dropping the handle shuts the thread down and joins it.
pub struct EqualizerWorker {
    command_sender: Sender<Command>,
    event_receiver: Receiver<Event>,
    gains: Arc<SharedGains>,
    thread: Option<JoinHandle<()>>,
}

impl EqualizerWorker {
    /// Spawn a worker with flat gains
    pub fn spawn(config: &EqualizerConfig) -> EqResult<Self> {
        let session = EqualizerSession::new(config)?;

        let (command_sender, command_receiver) = bounded::<Command>(config.worker_queue_depth);
        let (event_sender, event_receiver) = unbounded::<Event>();

        let gains = Arc::new(SharedGains::default());
        let gains_clone = Arc::clone(&gains);

        let thread = thread::Builder::new()
            .name("trieq-eq".into())
            .spawn(move || worker_main(session, command_receiver, event_sender, gains_clone))
            .map_err(|e| EqError::WorkerSpawn(e.to_string()))?;

        Ok(Self {
            command_sender,
            event_receiver,
            gains,
            thread: Some(thread),
        })
    }

    /// Gains applied to every subsequently processed block
    pub fn gains(&self) -> &Arc<SharedGains> {
        &self.gains
    }

    /// Queue a block; blocks while the command queue is full
    pub fn submit(&self, pcm: Vec<u8>, sample_rate: i32) -> EqResult<()> {
        self.send_command(Command::Process { pcm, sample_rate })
    }

    /// Clear filter state before the next block
    pub fn reset(&self) -> EqResult<()> {
        self.send_command(Command::Reset)
    }

    pub fn request_stats(&self) -> EqResult<()> {
        self.send_command(Command::RequestStats)
    }

    /// Wait for the next event
    pub fn recv(&self) -> EqResult<Event> {
        self.event_receiver
            .recv()
            .map_err(|_| EqError::ChannelRecvError)
    }

    /// Wait for the next event, up to `timeout`
    pub fn recv_timeout(&self, timeout: Duration) -> EqResult<Option<Event>> {
        match self.event_receiver.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(EqError::ChannelRecvError),
        }
    }

    /// Next event if one is ready
    pub fn try_recv(&self) -> EqResult<Option<Event>> {
        match self.event_receiver.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(EqError::ChannelRecvError),
        }
    }

    /// Stop the thread after it drains queued commands, then join it
    pub fn shutdown(&mut self) -> EqResult<()> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        // The thread may already be gone; joining tells us how it ended
        let _ = self.command_sender.send(Command::Shutdown);
        thread
            .join()
            .map_err(|_| EqError::ProcessingFault("equalizer thread panicked".into()))
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn send_command(&self, command: Command) -> EqResult<()> {
        self.command_sender
            .send(command)
            .map_err(|_| EqError::ChannelSendError)
    }
}

impl Drop for EqualizerWorker {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("Equalizer thread did not shut down cleanly: {}", e);
        }
    }
}

/// Equalizer thread main loop
fn worker_main(
    mut session: EqualizerSession,
    command_receiver: Receiver<Command>,
    event_sender: Sender<Event>,
    gains: Arc<SharedGains>,
) {
    info!("Equalizer thread started ({} channel(s))", session.channels());

    for command in command_receiver.iter() {
        let event = match command {
            Command::Process { pcm, sample_rate } => {
                let g = gains.snapshot();
                let out = session.process(&pcm, g.bass_db, g.mid_db, g.treble_db, sample_rate);
                Event::Processed {
                    pcm: out,
                    outcome: session.last_outcome(),
                }
            }
            Command::Reset => {
                session.reset();
                Event::Reset
            }
            Command::RequestStats => Event::Stats(session.stats()),
            Command::Shutdown => break,
        };

        if event_sender.send(event).is_err() {
            warn!("Event receiver dropped, stopping equalizer thread");
            break;
        }
    }

    let _ = event_sender.send(Event::Stopped);
    info!("Equalizer thread stopped");
}
