//! 旧式单元素播放器

use tracing::debug;
use transition_runtime::{FadeProfile, PlaybackId};

use super::{AudioError, AudioPlayer, OutputDevice, PlaybackEvent, StartStatus, TrackOutput};

struct LegacyElement {
    playback: PlaybackId,
    src: String,
    volume: f32,
    output: Box<dyn TrackOutput>,
}

/// 只有一个播放元素的播放器
///
/// 同步启动；新的播放会替换当前元素。音量只保留 1 位小数。
pub struct LegacyPlayer {
    device: Box<dyn OutputDevice>,
    locked: bool,
    element: Option<LegacyElement>,
}

impl LegacyPlayer {
    pub fn new(device: Box<dyn OutputDevice>, locked: bool) -> Self {
        Self {
            device,
            locked,
            element: None,
        }
    }

    /// 当前元素的音源
    pub fn current_src(&self) -> Option<&str> {
        self.element.as_ref().map(|el| el.src.as_str())
    }

    fn element_for(&self, playback: PlaybackId) -> Option<&LegacyElement> {
        self.element.as_ref().filter(|el| el.playback == playback)
    }
}

impl AudioPlayer for LegacyPlayer {
    fn kind(&self) -> &'static str {
        "legacy"
    }

    fn fade_profile(&self) -> FadeProfile {
        FadeProfile::LEGACY
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    fn start(
        &mut self,
        playback: PlaybackId,
        src: &str,
        volume: f32,
    ) -> Result<StartStatus, AudioError> {
        if self.locked {
            return Err(AudioError::Locked {
                src: src.to_string(),
            });
        }

        let volume = self.fade_profile().quantize(volume as f64) as f32;
        let output = self.device.open_track(src, volume)?;
        if let Some(old) = self.element.take() {
            old.output.stop();
            debug!(playback = old.playback, "替换播放元素");
        }
        self.element = Some(LegacyElement {
            playback,
            src: src.to_string(),
            volume,
            output,
        });

        debug!(playback, src = %src, volume, "开始播放");
        Ok(StartStatus::Started)
    }

    fn poll_events(&mut self) -> Vec<PlaybackEvent> {
        match self.element.take() {
            Some(el) if el.output.is_finished() => vec![PlaybackEvent::Ended(el.playback)],
            other => {
                self.element = other;
                Vec::new()
            }
        }
    }

    fn is_playing(&self, playback: PlaybackId) -> bool {
        self.element_for(playback).is_some()
    }

    fn volume(&self, playback: PlaybackId) -> Option<f32> {
        self.element_for(playback).map(|el| el.volume)
    }

    fn set_volume(&mut self, playback: PlaybackId, volume: f32) {
        let volume = self.fade_profile().quantize(volume as f64) as f32;
        if let Some(el) = self.element.as_mut().filter(|el| el.playback == playback) {
            el.volume = volume;
            el.output.set_volume(volume);
        }
    }

    fn stop(&mut self, playback: PlaybackId) {
        if let Some(el) = self.element.take_if(|el| el.playback == playback) {
            el.output.stop();
            debug!(playback, "停止播放");
        }
    }
}
