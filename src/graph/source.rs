use std::sync::Arc;

use crate::{
    graph::node::{GraphNode, RenderCtx},
    noise::{NoiseBuffer, NoiseColor},
};

/*
Looping Buffer Source
=====================

The playback unit at the head of the graph. It owns nothing but a shared
handle to a precomputed noise buffer and a read position:

  buffer:  [ s0 s1 s2 ......................... s(n-1) ]
                                  ^ position
  block:   copy forward, wrap to s0 at the end, keep going

Creating one is two words of state, so the graph can build a fresh unit for
every play or color change without touching the allocator. Dropping one only
decrements the `Arc`; the bank keeps the buffer alive, so the audio thread
never frees memory either.
*/

pub struct BufferSource {
    buffer: Arc<NoiseBuffer>,
    position: usize,
}

impl BufferSource {
    pub fn new(buffer: Arc<NoiseBuffer>) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    pub fn color(&self) -> NoiseColor {
        self.buffer.color()
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl GraphNode for BufferSource {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        let samples = self.buffer.samples();
        if samples.is_empty() {
            out.fill(0.0);
            return;
        }

        let mut written = 0;
        while written < out.len() {
            let available = samples.len() - self.position;
            let n = available.min(out.len() - written);
            out[written..written + n].copy_from_slice(&samples[self.position..self.position + n]);

            written += n;
            self.position += n;
            if self.position == samples.len() {
                self.position = 0;
            }
        }
    }
}
