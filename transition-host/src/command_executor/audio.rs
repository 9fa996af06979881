//! # 音频相关命令执行
//!
//! 处理 PlayAudio、SetAudioVolume、StopAudio 命令。

use tracing::{debug, warn};
use transition_runtime::{PlaybackId, TransitionInput};

use super::CommandExecutor;
use super::types::ExecuteResult;
use crate::audio::{AudioPlayer, StartStatus};

impl CommandExecutor {
    /// 执行 PlayAudio
    ///
    /// 同步启动的播放器立即回报 `PlaybackStarted`；失败时回报
    /// `PlaybackFailed`，过渡本身照常进行。
    pub(super) fn execute_play_audio(
        &mut self,
        playback: PlaybackId,
        src: &str,
        volume: f32,
        audio: &mut dyn AudioPlayer,
    ) -> ExecuteResult {
        match audio.start(playback, src, volume) {
            Ok(StartStatus::Started) => {
                self.last_output
                    .feedback
                    .push(TransitionInput::playback_started(playback));
                ExecuteResult::Ok
            }
            Ok(StartStatus::Pending) => ExecuteResult::Ok,
            Err(e) => {
                warn!(playback, src = %src, error = %e, "音频播放失败，过渡继续");
                self.last_output
                    .feedback
                    .push(TransitionInput::playback_failed(playback, e.to_string()));
                ExecuteResult::Error(e.to_string())
            }
        }
    }

    /// 执行 SetAudioVolume
    pub(super) fn execute_set_audio_volume(
        &mut self,
        playback: PlaybackId,
        volume: f32,
        audio: &mut dyn AudioPlayer,
    ) -> ExecuteResult {
        audio.set_volume(playback, volume);
        debug!(playback, volume, "调整音量");
        ExecuteResult::Ok
    }

    /// 执行 StopAudio
    pub(super) fn execute_stop_audio(
        &mut self,
        playback: PlaybackId,
        audio: &mut dyn AudioPlayer,
    ) -> ExecuteResult {
        audio.stop(playback);
        ExecuteResult::Ok
    }
}
