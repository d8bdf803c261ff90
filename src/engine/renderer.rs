use rtrb::Consumer;

use crate::{
    graph::{GraphCommand, SignalGraph},
    MAX_BLOCK_SIZE,
};

/// Audio-thread half of the engine: the graph plus the command consumer.
///
/// Owned by the device callback, or by the caller for offline rendering.
/// Rendering never blocks, allocates or logs.
pub struct GraphRenderer {
    graph: SignalGraph,
    rx: Consumer<GraphCommand>,
    block: Vec<f32>,
}

impl GraphRenderer {
    pub fn new(graph: SignalGraph, rx: Consumer<GraphCommand>) -> Self {
        Self {
            graph,
            rx,
            block: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn graph(&self) -> &SignalGraph {
        &self.graph
    }

    pub fn sample_rate(&self) -> f32 {
        self.graph.sample_rate()
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.rx.pop() {
            self.graph.apply(command);
        }
    }

    /// Render mono samples, picking up pending commands before every block.
    pub fn render(&mut self, out: &mut [f32]) {
        for block in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.drain_commands();
            self.graph.render_block(block);
        }
    }

    /// Render into an interleaved device buffer, duplicating mono to every
    /// channel. A trailing partial frame is written as silence.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        if channels == 0 {
            data.fill(0.0);
            return;
        }

        let total_frames = data.len() / channels;
        let mut frames_written = 0;

        while frames_written < total_frames {
            let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

            self.drain_commands();
            let block = &mut self.block[..frames_to_render];
            self.graph.render_block(block);

            let out_off = frames_written * channels;
            for (i, &s) in block.iter().enumerate() {
                let frame = out_off + i * channels;
                data[frame..frame + channels].fill(s);
            }

            frames_written += frames_to_render;
        }

        data[total_frames * channels..].fill(0.0);
    }
}
