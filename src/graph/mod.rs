//! The fixed signal path: `source -> lowpass -> gain -> analyzer -> sink`.
//!
//! Every stage is built once and lives as long as the engine. The only part
//! that comes and goes is the source (one looping playback unit at a time);
//! the filter and gain only ever receive new targets.

/// Looping playback of a precomputed noise buffer.
pub mod source;
/// Commands and the control surface shared by the graph and its queue.
pub mod command;
/// Smoothed resonant lowpass stage.
pub mod filter;
/// Smoothed gain stage.
pub mod gain;
/// Pass-through tap feeding the spectrum sampler.
pub mod analyzer;
/// Core traits shared by all stages.
pub mod node;
/// Published playback lifecycle.
pub mod transport;

use std::sync::Arc;

use crate::{
    dsp::Ramp,
    error::Result,
    noise::{NoiseBuffer, NoiseColor},
};

pub use analyzer::{AnalyzerFeed, AnalyzerTap};
pub use command::{CommandQueue, GraphCommand, GraphControl};
pub use filter::FilterNode;
pub use gain::GainNode;
pub use node::{GraphNode, RenderCtx};
pub use source::BufferSource;
pub use transport::{TransportHandle, TransportState};

/// Cutoff the filter starts at: fully open.
pub const DEFAULT_CUTOFF_HZ: f32 = 20_000.0;
/// Resonance the filter starts at.
pub const DEFAULT_Q: f32 = 1.0;

/// Attach/detach counters, used to check the single-source invariant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub attaches: u64,
    pub detaches: u64,
}

pub struct SignalGraph {
    source: Option<BufferSource>,
    filter: FilterNode,
    gain: GainNode,
    analyzer: AnalyzerTap,
    /// Samples left until a scheduled detach fires.
    pending_detach: Option<usize>,
    /// Scheduled detaches received so far.
    stops_requested: u64,
    transport: TransportState,
    transport_handle: TransportHandle,
    stats: GraphStats,
    ctx: RenderCtx,
}

impl SignalGraph {
    pub fn new(sample_rate: f32, analyzer: AnalyzerTap) -> Self {
        Self {
            source: None,
            filter: FilterNode::lowpass(DEFAULT_CUTOFF_HZ, DEFAULT_Q, sample_rate),
            gain: GainNode::new(0.0, sample_rate),
            analyzer,
            pending_detach: None,
            stops_requested: 0,
            transport: TransportState::Stopped,
            transport_handle: TransportHandle::default(),
            stats: GraphStats::default(),
            ctx: RenderCtx::new(sample_rate),
        }
    }

    /// Build a graph together with the consumer end of its analyzer ring.
    pub fn with_analyzer(sample_rate: f32, analyzer_capacity: usize) -> (Self, AnalyzerFeed) {
        let (tap, feed) = AnalyzerTap::new(analyzer_capacity);
        (Self::new(sample_rate, tap), feed)
    }

    pub fn sample_rate(&self) -> f32 {
        self.ctx.sample_rate
    }

    pub fn transport(&self) -> TransportState {
        self.transport
    }

    /// A handle other threads can poll for the transport state.
    pub fn transport_handle(&self) -> TransportHandle {
        self.transport_handle.clone()
    }

    pub fn stats(&self) -> GraphStats {
        self.stats
    }

    pub fn source_color(&self) -> Option<NoiseColor> {
        self.source.as_ref().map(BufferSource::color)
    }

    pub fn is_source_attached(&self) -> bool {
        self.source.is_some()
    }

    pub fn gain(&self) -> &GainNode {
        &self.gain
    }

    pub fn filter(&self) -> &FilterNode {
        &self.filter
    }

    pub fn analyzer(&self) -> &AnalyzerTap {
        &self.analyzer
    }

    /// Execute one command from the control side.
    pub fn apply(&mut self, command: GraphCommand) {
        match command {
            GraphCommand::AttachSource(buffer) => self.attach(buffer),
            GraphCommand::DetachSource => self.detach(),
            GraphCommand::ScheduleDetach { delay_seconds } => self.schedule(delay_seconds),
            GraphCommand::SetFilterTarget { cutoff_hz, q, ramp } => {
                self.filter.set_target(cutoff_hz, q, ramp)
            }
            GraphCommand::SetGainTarget { level, ramp } => self.gain.set_target(level, ramp),
        }
    }

    fn set_transport(&mut self, state: TransportState) {
        if self.transport != state {
            self.transport = state;
            self.transport_handle.set(state);
        }
    }

    fn attach(&mut self, buffer: Arc<NoiseBuffer>) {
        self.pending_detach = None;

        if self.source.take().is_some() {
            // Splice: the gain stage is untouched, so the level carries over.
            self.stats.detaches += 1;
        } else {
            // Nothing was playing: start from silence.
            self.gain.set_level(0.0);
        }

        self.source = Some(BufferSource::new(buffer));
        self.stats.attaches += 1;

        if matches!(
            self.transport,
            TransportState::Stopped | TransportState::Stopping
        ) {
            self.set_transport(TransportState::Starting);
        }
    }

    fn detach(&mut self) {
        self.pending_detach = None;

        if self.source.take().is_some() {
            self.stats.detaches += 1;
        }

        // Cancel whatever ramp was still scheduled; nothing is audible now.
        self.gain.set_level(0.0);
        self.set_transport(TransportState::Stopped);
        self.transport_handle.complete_stops(self.stops_requested);
    }

    fn schedule(&mut self, delay_seconds: f32) {
        self.stops_requested += 1;

        if self.source.is_none() {
            self.detach();
            return;
        }

        let samples = (delay_seconds.max(0.0) * self.ctx.sample_rate).round() as usize;
        if samples == 0 {
            self.detach();
            return;
        }

        self.pending_detach = Some(samples);
        self.set_transport(TransportState::Stopping);
    }

    /// Render one block through the whole chain.
    ///
    /// A scheduled detach is honoured on the exact sample it is due, so a
    /// stop fade is always finished before the source disappears.
    pub fn render_block(&mut self, out: &mut [f32]) {
        let mut offset = 0;

        while offset < out.len() {
            let mut n = out.len() - offset;
            if let Some(remaining) = self.pending_detach {
                n = n.min(remaining);
            }

            self.render_segment(&mut out[offset..offset + n]);
            offset += n;

            if let Some(remaining) = self.pending_detach.as_mut() {
                *remaining -= n;
                if *remaining == 0 {
                    self.detach();
                }
            }
        }

        if self.transport == TransportState::Starting && self.gain.is_settled() {
            self.set_transport(TransportState::Playing);
        }
    }

    fn render_segment(&mut self, out: &mut [f32]) {
        match self.source.as_mut() {
            Some(source) => source.render_block(out, &self.ctx),
            None => out.fill(0.0),
        }

        self.filter.render_block(out, &self.ctx);
        self.gain.render_block(out, &self.ctx);
        self.analyzer.render_block(out, &self.ctx);
    }
}

impl GraphControl for SignalGraph {
    fn completed_stops(&self) -> u64 {
        self.transport_handle.completed_stops()
    }

    fn attach_source(&mut self, buffer: Arc<NoiseBuffer>) -> Result<()> {
        self.attach(buffer);
        Ok(())
    }

    fn detach_source(&mut self) -> Result<()> {
        self.detach();
        Ok(())
    }

    fn schedule_detach(&mut self, delay_seconds: f32) -> Result<()> {
        self.schedule(delay_seconds);
        Ok(())
    }

    fn set_filter_target(&mut self, cutoff_hz: f32, q: f32, ramp: Ramp) -> Result<()> {
        self.filter.set_target(cutoff_hz, q, ramp);
        Ok(())
    }

    fn set_gain_target(&mut self, level: f32, ramp: Ramp) -> Result<()> {
        self.gain.set_target(level, ramp);
        Ok(())
    }
}
