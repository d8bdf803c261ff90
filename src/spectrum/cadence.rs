use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use tracing::debug;

use crate::{
    error::{EngineError, Result},
    spectrum::{SpectrumFrame, SpectrumSampler},
};

/// Running sampling thread. Dropping the handle stops and joins it.
pub struct SamplerHandle {
    stop: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<SpectrumSampler>>,
}

impl SamplerHandle {
    /// Stop the thread and get the sampler back.
    pub fn stop(mut self) -> Option<SpectrumSampler> {
        self.stop.store(true, Ordering::Release);
        self.thread.take().and_then(|thread| thread.join().ok())
    }

    pub fn is_finished(&self) -> bool {
        self.thread
            .as_ref()
            .map_or(true, thread::JoinHandle::is_finished)
    }
}

impl Drop for SamplerHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Pull a frame every `interval` on a dedicated thread and hand it to `sink`.
///
/// For hosts without a render loop of their own. A sink slower than the
/// interval just lowers the frame rate; nothing queues up.
pub fn spawn_sampler<F>(
    mut sampler: SpectrumSampler,
    interval: Duration,
    mut sink: F,
) -> Result<SamplerHandle>
where
    F: FnMut(&SpectrumFrame) + Send + 'static,
{
    let stop = Arc::new(AtomicBool::new(false));

    let thread = thread::Builder::new()
        .name("noisebox-spectrum".into())
        .spawn({
            let stop = Arc::clone(&stop);
            move || {
                debug!(?interval, "spectrum sampler started");
                while !stop.load(Ordering::Acquire) {
                    sink(sampler.pull_frame());
                    thread::sleep(interval);
                }
                debug!("spectrum sampler stopped");
                sampler
            }
        })
        .map_err(|err| EngineError::Spawn("spectrum sampler", err))?;

    Ok(SamplerHandle {
        stop,
        thread: Some(thread),
    })
}
