use std::sync::Arc;

use rtrb::{Consumer, Producer, PushError, RingBuffer};
use tracing::warn;

use crate::{
    dsp::Ramp,
    error::{EngineError, Result},
    graph::TransportHandle,
    noise::NoiseBuffer,
};

/// The operations the control side may perform on a signal graph.
///
/// Implemented by [`SignalGraph`](super::SignalGraph) itself, for hosts and
/// tests that drive the graph on one thread, and by [`CommandQueue`], which
/// forwards each call to the audio thread.
pub trait GraphControl {
    /// See [`TransportHandle::completed_stops`].
    fn completed_stops(&self) -> u64;

    /// Replace the playback unit with a new looping one bound to `buffer`.
    fn attach_source(&mut self, buffer: Arc<NoiseBuffer>) -> Result<()>;

    /// Stop and drop the playback unit. No-op if none is attached.
    fn detach_source(&mut self) -> Result<()>;

    /// Detach after `delay_seconds`; cancelled by a later attach.
    fn schedule_detach(&mut self, delay_seconds: f32) -> Result<()>;

    fn set_filter_target(&mut self, cutoff_hz: f32, q: f32, ramp: Ramp) -> Result<()>;

    fn set_gain_target(&mut self, level: f32, ramp: Ramp) -> Result<()>;
}

/// A graph operation in flight from the control thread to the audio thread.
#[derive(Debug, Clone)]
pub enum GraphCommand {
    AttachSource(Arc<NoiseBuffer>),
    DetachSource,
    ScheduleDetach { delay_seconds: f32 },
    SetFilterTarget { cutoff_hz: f32, q: f32, ramp: Ramp },
    SetGainTarget { level: f32, ramp: Ramp },
}

/// Control-side end of the command ring.
///
/// Commands go out through the ring; what the graph has done with them comes
/// back through its transport handle.
pub struct CommandQueue {
    tx: Producer<GraphCommand>,
    transport: TransportHandle,
}

impl CommandQueue {
    /// Create a queue and the receiving end for the audio thread.
    pub fn new(capacity: usize, transport: TransportHandle) -> (Self, Consumer<GraphCommand>) {
        let (tx, rx) = RingBuffer::<GraphCommand>::new(capacity.max(1));
        (Self { tx, transport }, rx)
    }

    fn send(&mut self, command: GraphCommand) -> Result<()> {
        match self.tx.push(command) {
            Ok(()) => Ok(()),
            Err(PushError::Full(command)) => {
                warn!(?command, "graph command queue full; dropping command");
                Err(EngineError::QueueFull)
            }
        }
    }
}

impl GraphControl for CommandQueue {
    fn completed_stops(&self) -> u64 {
        self.transport.completed_stops()
    }

    fn attach_source(&mut self, buffer: Arc<NoiseBuffer>) -> Result<()> {
        self.send(GraphCommand::AttachSource(buffer))
    }

    fn detach_source(&mut self) -> Result<()> {
        self.send(GraphCommand::DetachSource)
    }

    fn schedule_detach(&mut self, delay_seconds: f32) -> Result<()> {
        self.send(GraphCommand::ScheduleDetach { delay_seconds })
    }

    fn set_filter_target(&mut self, cutoff_hz: f32, q: f32, ramp: Ramp) -> Result<()> {
        self.send(GraphCommand::SetFilterTarget { cutoff_hz, q, ramp })
    }

    fn set_gain_target(&mut self, level: f32, ramp: Ramp) -> Result<()> {
        self.send(GraphCommand::SetGainTarget { level, ramp })
    }
}
