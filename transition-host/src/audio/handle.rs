//! 基于句柄的播放器

use std::collections::BTreeMap;
use tracing::debug;
use transition_runtime::{FadeProfile, PlaybackId};

use super::{AudioError, AudioPlayer, OutputDevice, PlaybackEvent, StartStatus, TrackOutput};

struct HandleTrack {
    volume: f32,
    /// 句柄已回报就绪
    ready: bool,
    output: Box<dyn TrackOutput>,
}

/// 句柄式播放器
///
/// `start` 只提交播放，句柄在下一次 `poll_events` 时就绪并回报
/// [`PlaybackEvent::Started`]。同时可以有任意多条音轨。
pub struct HandlePlayer {
    device: Box<dyn OutputDevice>,
    locked: bool,
    tracks: BTreeMap<PlaybackId, HandleTrack>,
}

impl HandlePlayer {
    pub fn new(device: Box<dyn OutputDevice>, locked: bool) -> Self {
        Self {
            device,
            locked,
            tracks: BTreeMap::new(),
        }
    }

    /// 当前音轨数（含未就绪）
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }
}

impl AudioPlayer for HandlePlayer {
    fn kind(&self) -> &'static str {
        "handle"
    }

    fn fade_profile(&self) -> FadeProfile {
        FadeProfile::HANDLE
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
        if let Some(old) = self.tracks.insert(
            playback,
            HandleTrack {
                volume,
                ready: false,
                output,
            },
        ) {
            old.output.stop();
        }

        debug!(playback, src = %src, volume, "提交播放");
        Ok(StartStatus::Pending)
    }

    fn poll_events(&mut self) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        for (&playback, track) in &mut self.tracks {
            if !track.ready {
                track.ready = true;
                events.push(PlaybackEvent::Started(playback));
            } else if track.output.is_finished() {
                events.push(PlaybackEvent::Ended(playback));
            }
        }
        for event in &events {
            if let PlaybackEvent::Ended(playback) = event {
                self.tracks.remove(playback);
            }
        }
        events
    }

    fn is_playing(&self, playback: PlaybackId) -> bool {
        self.tracks.get(&playback).is_some_and(|track| track.ready)
    }

    fn volume(&self, playback: PlaybackId) -> Option<f32> {
        self.tracks.get(&playback).map(|track| track.volume)
    }

    fn set_volume(&mut self, playback: PlaybackId, volume: f32) {
        let volume = self.fade_profile().quantize(volume as f64) as f32;
        if let Some(track) = self.tracks.get_mut(&playback) {
            track.volume = volume;
            track.output.set_volume(volume);
        }
    }

    fn stop(&mut self, playback: PlaybackId) {
        if let Some(track) = self.tracks.remove(&playback) {
            track.output.stop();
            debug!(playback, "停止播放");
        }
    }
}
