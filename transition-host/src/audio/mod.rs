//! # Audio 模块
//!
//! 过渡音频的播放器抽象。
//!
//! ## 两种播放器
//!
//! - [`HandlePlayer`]：基于句柄，启动是异步的，句柄在下一次
//!   [`AudioPlayer::poll_events`] 时才就绪；音量精度 6 位小数
//! - [`LegacyPlayer`]：旧式单元素播放器，同步启动；音量精度 1 位小数
//!
//! 播放器在启动时通过 [`probe_player`] 选定一次，之后不再切换。
//!
//! 实际发声由 [`OutputDevice`] 负责。开启 `device-audio` feature 时使用
//! rodio 输出到系统音频设备，否则使用 [`SilentDevice`] 只追踪状态。

mod handle;
mod legacy;
mod output;

pub use handle::HandlePlayer;
pub use legacy::LegacyPlayer;
#[cfg(feature = "device-audio")]
pub use output::RodioDevice;
pub use output::{OutputDevice, SilentDevice, TrackOutput, resolve_path};

use thiserror::Error;
use tracing::{info, warn};
use transition_runtime::{FadeProfile, PlaybackId};

use crate::config::{AudioBackendKind, AudioConfig};

/// 播放启动结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartStatus {
    /// 已开始，句柄立即可用
    Started,
    /// 已提交，等待 [`PlaybackEvent::Started`]
    Pending,
}

/// 播放器回报的事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    Started(PlaybackId),
    Ended(PlaybackId),
}

/// 音频错误
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AudioError {
    #[error("音频播放被锁定，无法播放: {src}")]
    Locked { src: String },

    #[error("无法打开音频文件: {path} - {message}")]
    Open { path: String, message: String },

    #[error("无法解码音频文件: {path} - {message}")]
    Decode { path: String, message: String },

    #[error("无法初始化音频输出: {0}")]
    Device(String),
}

/// 过渡音频播放器
pub trait AudioPlayer {
    /// 后端名称（用于日志）
    fn kind(&self) -> &'static str;

    /// 该播放器对应的淡出参数
    fn fade_profile(&self) -> FadeProfile;

    fn is_locked(&self) -> bool;

    /// 解除/设置播放锁定
    fn set_locked(&mut self, locked: bool);

    /// 开始播放
    fn start(
        &mut self,
        playback: PlaybackId,
        src: &str,
        volume: f32,
    ) -> Result<StartStatus, AudioError>;

    /// 取出自上次调用以来的事件
    fn poll_events(&mut self) -> Vec<PlaybackEvent>;

    /// 句柄已就绪且仍在播放
    fn is_playing(&self, playback: PlaybackId) -> bool;

    /// 当前音量
    fn volume(&self, playback: PlaybackId) -> Option<f32>;

    /// 设置音量，按播放器精度量化
    fn set_volume(&mut self, playback: PlaybackId, volume: f32);

    /// 停止播放，未知句柄是空操作
    fn stop(&mut self, playback: PlaybackId);
}

/// 根据配置选定播放器
pub fn probe_player(config: &AudioConfig) -> Box<dyn AudioPlayer> {
    let device = open_device(config);
    let player: Box<dyn AudioPlayer> = match config.backend {
        AudioBackendKind::Legacy => Box::new(LegacyPlayer::new(device, config.locked)),
        AudioBackendKind::Auto | AudioBackendKind::Handle => {
            Box::new(HandlePlayer::new(device, config.locked))
        }
    };
    info!(
        backend = player.kind(),
        locked = config.locked,
        "音频播放器就绪"
    );
    player
}

fn open_device(config: &AudioConfig) -> Box<dyn OutputDevice> {
    #[cfg(feature = "device-audio")]
    {
        match RodioDevice::open(&config.assets_root) {
            Ok(device) => return Box::new(device),
            Err(e) => warn!(error = %e, "音频设备不可用，改用静音输出"),
        }
    }
    #[cfg(not(feature = "device-audio"))]
    if config.backend != AudioBackendKind::Auto {
        warn!("未启用 device-audio，播放器只追踪状态");
    }
    Box::new(SilentDevice::new(&config.assets_root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_selects_backend() {
        let mut config = AudioConfig::default();
        assert_eq!(probe_player(&config).kind(), "handle");

        config.backend = AudioBackendKind::Legacy;
        config.locked = true;
        let player = probe_player(&config);
        assert_eq!(player.kind(), "legacy");
        assert!(player.is_locked());
        assert_eq!(player.fade_profile(), FadeProfile::LEGACY);
    }

    #[test]
    fn test_error_messages() {
        let err = AudioError::Locked {
            src: "a.ogg".to_string(),
        };
        assert_eq!(err.to_string(), "音频播放被锁定，无法播放: a.ogg");
    }
}
