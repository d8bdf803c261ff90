/// Context passed to graph stages during rendering.
///
/// The graph runs at a single fixed rate for its whole lifetime, so the
/// sample rate is all a stage needs to know.
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        Self { sample_rate }
    }
}

/// Core trait for audio processing stages.
///
/// Sources overwrite `out`; processors transform it in place. Implementations
/// must not allocate, lock, or block: `render_block` runs on the audio thread.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);
}
