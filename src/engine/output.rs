use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info};

use crate::{
    engine::renderer::GraphRenderer,
    error::{EngineError, Result},
};

/// The default output device and the format it wants.
pub(crate) struct OutputDevice {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,
}

impl OutputDevice {
    pub(crate) fn open_default() -> Result<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or_else(|| {
            EngineError::UnsupportedEnvironment("no default output device available".into())
        })?;
        let config = device.default_output_config()?;

        if config.sample_rate().0 == 0 {
            return Err(EngineError::UnsupportedEnvironment(
                "output device reports no sample rate".into(),
            ));
        }

        info!(
            host = ?host.id(),
            device = %device.name().unwrap_or_else(|_| "unknown".into()),
            sample_rate = config.sample_rate().0,
            channels = config.channels(),
            format = ?config.sample_format(),
            "opened output device"
        );

        Ok(Self { device, config })
    }

    pub(crate) fn sample_rate(&self) -> u32 {
        self.config.sample_rate().0
    }

    /// Hand the renderer to the device callback and start playback.
    pub(crate) fn start(self, mut renderer: GraphRenderer) -> Result<cpal::Stream> {
        let channels = self.config.channels() as usize;

        let stream = self.device.build_output_stream(
            &self.config.into(),
            move |data: &mut [f32], _| renderer.render_interleaved(data, channels),
            |err| error!(%err, "output stream error"),
            None,
        )?;

        stream.play()?;
        Ok(stream)
    }
}
