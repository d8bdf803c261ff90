use tracing::{debug, warn};

use crate::{
    config::EngineConfig,
    control::state::AudioState,
    dsp::Ramp,
    error::{EngineError, Result},
    graph::GraphControl,
    noise::NoiseBank,
};

/*
Transition Policy
=================

Every incoming AudioState is compared with the last one applied and turned
into the smallest set of graph operations that gets there without a click:

  | change                          | action                                   |
  | ------------------------------- | ---------------------------------------- |
  | stopped -> playing              | filter jumps to target (silent anyway),  |
  |                                 | attach source for the requested color,   |
  |                                 | gain fades 0 -> volume linearly          |
  | playing -> stopped              | gain fades current -> 0 linearly,        |
  |                                 | source detached when the fade ends       |
  | color, while playing            | swap source; gain and filter untouched   |
  | volume / cutoff / q, playing    | exponential approach to the new target   |
  | cutoff / q, stopped             | stored on the filter directly            |
  | volume, stopped                 | ignored (gain stays at 0)                |
  | nothing (after clamping)        | nothing                                  |

Play/stop wins over everything else in the same update: "start playing brown"
is a single start with the brown buffer, not start + swap.

The controller also keeps its own idea of whether a source is attached.
After a stop it believes the source is still detaching until the graph
reports that stop as completed; from then on filter edits jump again. The
graph enforces a single source by construction, but a start while the
controller thinks one is attached (or a swap while it thinks none is) means
the two sides disagree. That is logged as a graph inconsistency and repaired
by detaching before attaching again.
*/

/// What an `apply` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Same state as before; no graph operations issued.
    Unchanged,
    /// Playback started with a fade-in.
    Started,
    /// Fade-out scheduled, detach pending.
    Stopped,
    /// Noise color swapped while playing (possibly with other ramps).
    Swapped,
    /// Volume and/or filter ramped while playing.
    Retargeted,
    /// Stopped; filter target stored, nothing audible changed.
    Stored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceBelief {
    Detached,
    Attached,
    /// Waiting for the graph to finish the stop with this sequence number.
    Detaching { stop: u64 },
}

pub struct TransitionController<G> {
    graph: G,
    bank: NoiseBank,
    fade_seconds: f32,
    time_constant: f32,
    current: Option<AudioState>,
    source: SourceBelief,
    stops_sent: u64,
}

impl<G: GraphControl> TransitionController<G> {
    pub fn new(graph: G, bank: NoiseBank, config: &EngineConfig) -> Self {
        Self {
            graph,
            bank,
            fade_seconds: config.fade_seconds,
            time_constant: config.smoothing_time_constant,
            current: None,
            source: SourceBelief::Detached,
            stops_sent: 0,
        }
    }

    /// The last state applied (already clamped).
    pub fn state(&self) -> Option<AudioState> {
        self.current
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph
    }

    pub fn apply(&mut self, requested: AudioState) -> Result<Transition> {
        if let Err(err) = requested.validate() {
            debug!(%err, "clamping audio state");
        }
        let next = requested.clamped();

        if self.current == Some(next) {
            return Ok(Transition::Unchanged);
        }

        self.sync_source_belief();

        let current = self.current;
        let transition = match current {
            Some(prev) if prev.is_playing && next.is_playing => self.retarget(&prev, &next)?,
            Some(prev) if prev.is_playing => self.stop(&prev, &next)?,
            _ if next.is_playing => self.start(&next)?,
            prev => self.store(prev.as_ref(), &next)?,
        };

        debug!(
            ?transition,
            playing = next.is_playing,
            color = %next.noise_color,
            volume = next.volume,
            cutoff = next.filter_frequency,
            q = next.filter_q,
            "applied audio state"
        );

        self.current = Some(next);
        Ok(transition)
    }

    fn sync_source_belief(&mut self) {
        if let SourceBelief::Detaching { stop } = self.source {
            if self.graph.completed_stops() >= stop {
                self.source = SourceBelief::Detached;
            }
        }
    }

    /// Filter ramp while the gain is at zero: a jump, unless a stop fade may
    /// still be audible.
    fn silent_filter_ramp(&self) -> Ramp {
        if matches!(self.source, SourceBelief::Detaching { .. }) {
            self.smooth()
        } else {
            Ramp::Immediate
        }
    }

    fn smooth(&self) -> Ramp {
        Ramp::Exponential {
            time_constant: self.time_constant,
        }
    }

    fn fade(&self) -> Ramp {
        Ramp::Linear {
            seconds: self.fade_seconds,
        }
    }

    fn start(&mut self, next: &AudioState) -> Result<Transition> {
        if self.source == SourceBelief::Attached {
            let err = EngineError::GraphInconsistency("start requested while a source is attached");
            warn!(%err, "detaching before restart");
            self.graph.detach_source()?;
            self.source = SourceBelief::Detached;
        }

        let filter_ramp = self.silent_filter_ramp();
        self.graph
            .set_filter_target(next.filter_frequency, next.filter_q, filter_ramp)?;

        self.graph.attach_source(self.bank.get(next.noise_color))?;
        self.source = SourceBelief::Attached;

        self.graph.set_gain_target(next.volume, self.fade())?;
        Ok(Transition::Started)
    }

    fn stop(&mut self, prev: &AudioState, next: &AudioState) -> Result<Transition> {
        self.graph.set_gain_target(0.0, self.fade())?;
        self.graph.schedule_detach(self.fade_seconds)?;
        self.stops_sent += 1;
        self.source = SourceBelief::Detaching {
            stop: self.stops_sent,
        };

        if filter_changed(Some(prev), next) {
            self.graph
                .set_filter_target(next.filter_frequency, next.filter_q, self.smooth())?;
        }
        Ok(Transition::Stopped)
    }

    fn retarget(&mut self, prev: &AudioState, next: &AudioState) -> Result<Transition> {
        let mut transition = Transition::Retargeted;

        if prev.noise_color != next.noise_color {
            if self.source != SourceBelief::Attached {
                let err = EngineError::GraphInconsistency("color swap with no source attached");
                warn!(%err, "starting instead of swapping");
                return self.start(next);
            }

            self.graph.attach_source(self.bank.get(next.noise_color))?;
            transition = Transition::Swapped;
        }

        if prev.volume != next.volume {
            self.graph.set_gain_target(next.volume, self.smooth())?;
        }

        if filter_changed(Some(prev), next) {
            self.graph
                .set_filter_target(next.filter_frequency, next.filter_q, self.smooth())?;
        }

        Ok(transition)
    }

    fn store(&mut self, prev: Option<&AudioState>, next: &AudioState) -> Result<Transition> {
        if filter_changed(prev, next) {
            let ramp = self.silent_filter_ramp();
            self.graph
                .set_filter_target(next.filter_frequency, next.filter_q, ramp)?;
        }
        Ok(Transition::Stored)
    }
}

fn filter_changed(prev: Option<&AudioState>, next: &AudioState) -> bool {
    prev.map_or(true, |prev| {
        prev.filter_frequency != next.filter_frequency || prev.filter_q != next.filter_q
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        graph::{AnalyzerTap, GraphStats, SignalGraph, TransportState},
        noise::{NoiseBufferFactory, NoiseColor},
    };

    const SAMPLE_RATE: f32 = 8_000.0;

    fn controller() -> TransitionController<SignalGraph> {
        let bank = NoiseBank::generate(&NoiseBufferFactory::new(0.5, 0.01, 2), 8_000).unwrap();
        let graph = SignalGraph::new(SAMPLE_RATE, AnalyzerTap::disconnected());
        TransitionController::new(graph, bank, &EngineConfig::default())
    }

    fn render(controller: &mut TransitionController<SignalGraph>, seconds: f32) {
        let mut out = vec![0.0; (seconds * SAMPLE_RATE) as usize];
        controller.graph_mut().render_block(&mut out);
    }

    fn playing_pink() -> AudioState {
        AudioState {
            is_playing: true,
            volume: 0.5,
            noise_color: NoiseColor::Pink,
            filter_frequency: 5_000.0,
            filter_q: 1.0,
        }
    }

    #[test]
    fn start_attaches_and_fades_in() {
        let mut ctl = controller();

        assert_eq!(ctl.apply(playing_pink()).unwrap(), Transition::Started);

        let graph = ctl.graph();
        assert_eq!(graph.source_color(), Some(NoiseColor::Pink));
        assert_eq!(graph.gain().level(), 0.0);
        assert_eq!(graph.gain().target(), 0.5);
        assert_eq!(graph.filter().target(), (5_000.0, 1.0));
        assert_eq!(graph.filter().cutoff(), 5_000.0);
    }

    #[test]
    fn identical_state_is_a_no_op() {
        let mut ctl = controller();
        ctl.apply(playing_pink()).unwrap();
        let before = ctl.graph().stats();

        assert_eq!(ctl.apply(playing_pink()).unwrap(), Transition::Unchanged);
        assert_eq!(ctl.graph().stats(), before);
    }

    #[test]
    fn out_of_range_duplicates_are_no_ops_after_clamping() {
        let mut ctl = controller();
        ctl.apply(playing_pink().with_volume(3.0)).unwrap();

        assert_eq!(
            ctl.apply(playing_pink().with_volume(1.0)).unwrap(),
            Transition::Unchanged
        );
    }

    #[test]
    fn color_change_while_playing_swaps_once() {
        let mut ctl = controller();
        ctl.apply(playing_pink()).unwrap();
        render(&mut ctl, 0.2);

        let transition = ctl
            .apply(playing_pink().with_color(NoiseColor::Brown))
            .unwrap();

        assert_eq!(transition, Transition::Swapped);
        assert_eq!(
            ctl.graph().stats(),
            GraphStats {
                attaches: 2,
                detaches: 1
            }
        );
        assert_eq!(ctl.graph().gain().level(), 0.5);
        assert_eq!(ctl.graph().filter().target(), (5_000.0, 1.0));
    }

    #[test]
    fn start_with_new_color_is_one_start() {
        let mut ctl = controller();
        ctl.apply(AudioState::default()).unwrap();

        let transition = ctl
            .apply(playing_pink().with_color(NoiseColor::White))
            .unwrap();

        assert_eq!(transition, Transition::Started);
        assert_eq!(ctl.graph().stats().attaches, 1);
        assert_eq!(ctl.graph().source_color(), Some(NoiseColor::White));
    }

    #[test]
    fn stop_fades_then_detaches() {
        let mut ctl = controller();
        ctl.apply(playing_pink()).unwrap();
        render(&mut ctl, 0.2);

        assert_eq!(
            ctl.apply(playing_pink().playing(false)).unwrap(),
            Transition::Stopped
        );
        assert_eq!(ctl.graph().transport(), TransportState::Stopping);

        render(&mut ctl, 0.05);
        let level = ctl.graph().gain().level();
        assert!(level > 0.0 && level < 0.5, "mid-fade level {level}");

        render(&mut ctl, 0.06);
        assert!(!ctl.graph().is_source_attached());
        assert_eq!(ctl.graph().gain().level(), 0.0);
        assert_eq!(ctl.graph().transport(), TransportState::Stopped);
    }

    #[test]
    fn volume_change_while_playing_is_smoothed() {
        let mut ctl = controller();
        ctl.apply(playing_pink()).unwrap();
        render(&mut ctl, 0.2);

        let transition = ctl.apply(playing_pink().with_volume(1.0)).unwrap();
        assert_eq!(transition, Transition::Retargeted);

        render(&mut ctl, 0.01);
        let level = ctl.graph().gain().level();
        assert!(level > 0.5 && level < 0.6, "level {level}");
    }

    #[test]
    fn stopped_updates_store_filter_and_ignore_volume() {
        let mut ctl = controller();
        ctl.apply(AudioState::default()).unwrap();

        let transition = ctl
            .apply(AudioState::default().with_volume(0.9).with_filter(800.0, 3.0))
            .unwrap();

        assert_eq!(transition, Transition::Stored);
        assert_eq!(ctl.graph().filter().cutoff(), 800.0);
        assert_eq!(ctl.graph().filter().q(), 3.0);
        assert_eq!(ctl.graph().gain().target(), 0.0);
        assert_eq!(ctl.graph().stats().attaches, 0);
    }

    #[test]
    fn filter_jumps_again_once_stop_has_finished() {
        let mut ctl = controller();
        ctl.apply(playing_pink()).unwrap();
        render(&mut ctl, 0.2);
        ctl.apply(playing_pink().playing(false)).unwrap();
        render(&mut ctl, 0.5);
        assert_eq!(ctl.graph().transport(), TransportState::Stopped);

        let stopped = playing_pink().playing(false).with_filter(300.0, 8.0);
        assert_eq!(ctl.apply(stopped).unwrap(), Transition::Stored);
        assert_eq!(ctl.graph().filter().cutoff(), 300.0);
        assert_eq!(ctl.graph().filter().q(), 8.0);

        ctl.apply(stopped.playing(true)).unwrap();
        render(&mut ctl, 0.01);
        assert_eq!(ctl.graph().filter().cutoff(), 300.0);
        assert_eq!(ctl.graph().filter().q(), 8.0);
    }

    #[test]
    fn filter_edit_during_stop_fade_is_smoothed() {
        let mut ctl = controller();
        ctl.apply(playing_pink()).unwrap();
        render(&mut ctl, 0.2);
        ctl.apply(playing_pink().playing(false)).unwrap();
        render(&mut ctl, 0.02);

        ctl.apply(playing_pink().playing(false).with_filter(300.0, 1.0))
            .unwrap();

        assert_eq!(ctl.graph().filter().cutoff(), 5_000.0);
        assert_eq!(ctl.graph().filter().target(), (300.0, 1.0));
    }

    #[test]
    fn restart_during_stop_fade_keeps_one_source() {
        let mut ctl = controller();
        ctl.apply(playing_pink()).unwrap();
        render(&mut ctl, 0.2);
        ctl.apply(playing_pink().playing(false)).unwrap();
        render(&mut ctl, 0.05);

        assert_eq!(ctl.apply(playing_pink()).unwrap(), Transition::Started);
        render(&mut ctl, 0.2);

        assert!(ctl.graph().is_source_attached());
        assert_eq!(ctl.graph().gain().level(), 0.5);
        assert_eq!(ctl.graph().transport(), TransportState::Playing);
    }
}
