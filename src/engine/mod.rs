//! The engine handle: one graph, one device stream, three threads of use.

/// Device discovery and the cpal output stream.
mod output;
/// Audio-thread half of the engine.
pub mod renderer;

use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::{
    config::EngineConfig,
    control::{AudioState, Transition, TransitionController},
    error::{EngineError, Result},
    graph::{CommandQueue, SignalGraph, TransportHandle, TransportState},
    noise::{NoiseBank, NoiseBufferFactory},
    spectrum::{spawn_sampler, SamplerHandle, SpectrumFrame, SpectrumSampler},
};

use output::OutputDevice;

pub use renderer::GraphRenderer;

/*
Threading
=========

  control (caller)              audio (cpal callback)            visual
  ────────────────              ─────────────────────            ──────
  set_state(AudioState)
    TransitionController
      CommandQueue ──rtrb──▶    GraphRenderer
                                  drain commands
                                  SignalGraph::render_block
                                    AnalyzerTap ──rtrb──▶   SpectrumSampler
  transport() ◀──atomic──────     TransportHandle           pull_frame()

Neither ring ever blocks: a full command ring fails the set_state call, a
full analyzer ring drops samples. The noise buffers live in the controller's
bank for the whole engine lifetime, so swapping sources on the audio thread
only ever drops a reference count.

Without an output device the engine is a silent stub: it accepts every call,
plays nothing, reports Stopped and hands out empty frames.
*/

struct Running {
    controller: TransitionController<CommandQueue>,
    transport: TransportHandle,
    sampler: Option<SpectrumSampler>,
    sampler_thread: Option<SamplerHandle>,
    sample_rate: u32,
    // Declared last: dropped after the sampler thread has been joined.
    stream: Option<cpal::Stream>,
}

pub struct NoiseEngine {
    running: Option<Running>,
}

impl NoiseEngine {
    /// Open the default output device and start the (silent) graph.
    ///
    /// Falls back to [`NoiseEngine::unsupported`] when there is no usable
    /// device, so a missing sound card only ever means silence.
    pub fn new(config: EngineConfig) -> Self {
        match Self::try_new(config) {
            Ok(engine) => engine,
            Err(err) if err.is_environment() => {
                warn!(%err, "audio output unavailable; running without sound");
                Self::unsupported()
            }
            Err(err) => {
                error!(%err, "noise engine failed to start; running without sound");
                Self::unsupported()
            }
        }
    }

    /// Like [`NoiseEngine::new`], but report why the device could not be used.
    pub fn try_new(config: EngineConfig) -> Result<Self> {
        let config = config.sanitized();
        let device = OutputDevice::open_default()?;
        let sample_rate = device.sample_rate();

        let (mut running, renderer) = Running::assemble(&config, sample_rate)?;
        running.stream = Some(device.start(renderer)?);

        info!(sample_rate, "noise engine started");
        Ok(Self {
            running: Some(running),
        })
    }

    /// Build the engine without a device; the caller renders through the
    /// returned [`GraphRenderer`].
    pub fn offline(config: EngineConfig, sample_rate: u32) -> Result<(Self, GraphRenderer)> {
        let config = config.sanitized();
        let (running, renderer) = Running::assemble(&config, sample_rate)?;

        debug!(sample_rate, "offline noise engine created");
        Ok((
            Self {
                running: Some(running),
            },
            renderer,
        ))
    }

    /// The silent stub.
    pub fn unsupported() -> Self {
        Self { running: None }
    }

    pub fn is_supported(&self) -> bool {
        self.running.is_some()
    }

    pub fn sample_rate(&self) -> Option<u32> {
        self.running.as_ref().map(|running| running.sample_rate)
    }

    /// Move the audio towards `state`. Calling it twice with the same state
    /// does nothing the second time.
    pub fn set_state(&mut self, state: AudioState) -> Result<Transition> {
        match self.running.as_mut() {
            Some(running) => running.controller.apply(state),
            None => {
                debug!("no audio output; ignoring state change");
                Ok(Transition::Unchanged)
            }
        }
    }

    /// The last state applied, after clamping.
    pub fn state(&self) -> Option<AudioState> {
        self.running
            .as_ref()
            .and_then(|running| running.controller.state())
    }

    pub fn transport(&self) -> TransportState {
        self.running
            .as_ref()
            .map_or(TransportState::Stopped, |running| running.transport.get())
    }

    /// Compute a fresh spectrum frame on the calling thread.
    ///
    /// Empty when there is no audio output or the sampler was handed off.
    pub fn pull_spectrum_frame(&mut self) -> SpectrumFrame {
        self.running
            .as_mut()
            .and_then(|running| running.sampler.as_mut())
            .map_or_else(SpectrumFrame::empty, |sampler| sampler.pull_frame().clone())
    }

    /// Hand the sampler to another thread. Later pulls on the engine return
    /// empty frames.
    pub fn take_spectrum_sampler(&mut self) -> Option<SpectrumSampler> {
        self.running
            .as_mut()
            .and_then(|running| running.sampler.take())
    }

    /// Sample on a dedicated thread every `interval`, owned by the engine and
    /// joined on shutdown. Returns `false` if there is no sampler to run.
    pub fn spawn_spectrum_thread<F>(&mut self, interval: Duration, sink: F) -> Result<bool>
    where
        F: FnMut(&SpectrumFrame) + Send + 'static,
    {
        let Some(running) = self.running.as_mut() else {
            return Ok(false);
        };
        let Some(sampler) = running.sampler.take() else {
            return Ok(false);
        };

        running.sampler_thread = Some(spawn_sampler(sampler, interval, sink)?);
        Ok(true)
    }

    /// Stop the stream and the sampling thread. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(mut running) = self.running.take() {
            // Join the sampler before the stream goes away.
            drop(running.sampler_thread.take());
            drop(running.stream.take());
            info!(sample_rate = running.sample_rate, "noise engine shut down");
        }
    }
}

impl Drop for NoiseEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Running {
    fn assemble(config: &EngineConfig, sample_rate: u32) -> Result<(Self, GraphRenderer)> {
        if sample_rate == 0 {
            return Err(EngineError::InvalidParameter {
                name: "sample_rate",
                value: 0.0,
            });
        }

        let bank = NoiseBank::generate(&NoiseBufferFactory::from_config(config), sample_rate)?;

        let analyzer_capacity = config.fft_size * config.analyzer_capacity_blocks;
        let (graph, analyzer_feed) = SignalGraph::with_analyzer(sample_rate as f32, analyzer_capacity);
        let transport = graph.transport_handle();

        let (queue, command_rx) = CommandQueue::new(config.command_capacity, transport.clone());
        let controller = TransitionController::new(queue, bank, config);
        let sampler = SpectrumSampler::new(analyzer_feed, sample_rate as f32, config);

        Ok((
            Self {
                controller,
                transport,
                sampler: Some(sampler),
                sampler_thread: None,
                sample_rate,
                stream: None,
            },
            GraphRenderer::new(graph, command_rx),
        ))
    }
}
