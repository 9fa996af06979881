//! # Input 模块
//!
//! 定义 Host 向 Runtime 传递的输入事件。
//!
//! ## 设计说明
//!
//! - 时间流逝不是输入：Host 每帧调用 `update(dt)` 推进
//! - 频道消息走 [`ChannelMessage`](crate::message::ChannelMessage)，不在这里
//! - 音频播放是异步的，播放器通过 `PlaybackStarted` 回报句柄就绪

use serde::{Deserialize, Serialize};

use crate::command::{InstanceId, PlaybackId};

/// Host 向 Runtime 传递的输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransitionInput {
    /// 用户点击了遮罩
    Click { instance: InstanceId },

    /// 播放已开始，句柄可用于调整音量
    PlaybackStarted { playback: PlaybackId },

    /// 播放失败（被锁定、文件缺失等）
    PlaybackFailed { playback: PlaybackId, reason: String },

    /// 播放自然结束
    PlaybackEnded { playback: PlaybackId },
}

impl TransitionInput {
    pub fn click(instance: InstanceId) -> Self {
        Self::Click { instance }
    }

    pub fn playback_started(playback: PlaybackId) -> Self {
        Self::PlaybackStarted { playback }
    }

    pub fn playback_failed(playback: PlaybackId, reason: impl Into<String>) -> Self {
        Self::PlaybackFailed {
            playback,
            reason: reason.into(),
        }
    }
}
