use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use rtrb::{Consumer, Producer, PushError, RingBuffer};

use crate::graph::node::{GraphNode, RenderCtx};

/// Pass-through tap at the end of the chain.
///
/// Copies every rendered sample into a lock-free ring read by the spectrum
/// sampler on the visual thread. When the reader falls behind the ring fills
/// and the rest of the block is dropped; the audio never waits. Every drop is
/// counted so the reader can tell that what is still queued is stale.
pub struct AnalyzerTap {
    tx: Option<Producer<f32>>,
    dropped: Arc<AtomicU64>,
}

impl AnalyzerTap {
    /// Create a tap and the reading end for the visual side.
    pub fn new(capacity: usize) -> (Self, AnalyzerFeed) {
        let (tx, rx) = RingBuffer::<f32>::new(capacity.max(1));
        let dropped = Arc::new(AtomicU64::new(0));
        (
            Self {
                tx: Some(tx),
                dropped: Arc::clone(&dropped),
            },
            AnalyzerFeed { rx, dropped },
        )
    }

    /// A tap with nobody listening; renders as a plain pass-through.
    pub fn disconnected() -> Self {
        Self {
            tx: None,
            dropped: Arc::default(),
        }
    }
}

impl GraphNode for AnalyzerTap {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        let Some(tx) = self.tx.as_mut() else {
            return;
        };

        for (i, &s) in out.iter().enumerate() {
            if let Err(PushError::Full(_)) = tx.push(s) {
                self.dropped
                    .fetch_add((out.len() - i) as u64, Ordering::Release);
                break; // drop remainder if full
            }
        }
    }
}

/// Reading end of an [`AnalyzerTap`]: the sample ring plus the tap's drop count.
pub struct AnalyzerFeed {
    rx: Consumer<f32>,
    dropped: Arc<AtomicU64>,
}

impl AnalyzerFeed {
    pub fn pop(&mut self) -> Option<f32> {
        self.rx.pop().ok()
    }

    /// Samples queued and not yet read.
    pub fn queued(&self) -> usize {
        self.rx.slots()
    }

    /// Samples the tap could not queue since it was created.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Acquire)
    }

    /// Throw away everything queued.
    pub fn discard(&mut self) {
        let queued = self.rx.slots();
        if let Ok(chunk) = self.rx.read_chunk(queued) {
            chunk.commit_all();
        }
    }
}

/// A feed over a ring filled by something other than a tap. Never reports drops.
impl From<Consumer<f32>> for AnalyzerFeed {
    fn from(rx: Consumer<f32>) -> Self {
        Self {
            rx,
            dropped: Arc::default(),
        }
    }
}
