//! # Command 模块
//!
//! 定义 Runtime 向 Host 发出的所有指令。
//! Command 是过渡控制器与宿主之间的**唯一输出方式**。
//!
//! ## 设计原则
//!
//! - **声明式**：Command 描述"做什么"，不描述"怎么做"
//! - **无副作用**：Command 本身不执行任何操作
//! - **宿主无关**：不包含任何渲染或音频库的类型

use serde::{Deserialize, Serialize};

use crate::config::TransitionConfig;
use crate::message::ChannelMessage;

/// 过渡实例标识
pub type InstanceId = u64;

/// 音频播放标识
///
/// 每个实例最多发起一次播放，播放 ID 与实例 ID 相同。
pub type PlaybackId = u64;

/// 遮罩层级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayLayer {
    /// 覆盖宿主 UI
    AboveUi,
    /// 位于宿主 UI 之下
    BelowUi,
}

impl OverlayLayer {
    /// 对应的 z-index
    pub fn z_index(self) -> i32 {
        match self {
            Self::AboveUi => 5000,
            Self::BelowUi => 1,
        }
    }
}

/// 遮罩背景
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayBackground {
    /// 背景图片 URI（可为空）
    pub image: String,
    pub size: String,
    pub position: String,
    /// 背景图片透明度 (0.0 - 1.0)
    pub opacity: f32,
    /// 底色
    pub color: String,
}

/// 遮罩内容区域
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayContent {
    pub color: String,
    pub font_size: String,
    /// 原样插入的文本 / 标记
    pub markup: String,
}

/// 全屏遮罩的声明式描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlaySurface {
    pub layer: OverlayLayer,
    pub background: OverlayBackground,
    pub content: OverlayContent,
}

impl OverlaySurface {
    /// 由配置生成遮罩描述，透明度截断到 0.0 - 1.0
    pub fn from_config(config: &TransitionConfig, layer: OverlayLayer) -> Self {
        Self {
            layer,
            background: OverlayBackground {
                image: config.bg_img.clone(),
                size: config.bg_size.clone(),
                position: config.bg_pos.clone(),
                opacity: config.bg_opacity.clamp(0.0, 1.0),
                color: config.bg_color.clone(),
            },
            content: OverlayContent {
                color: config.font_color.clone(),
                font_size: config.font_size.clone(),
                markup: config.content.clone(),
            },
        }
    }
}

/// 遮罩淡入淡出方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayFade {
    In,
    Out,
}

/// Runtime 发出的指令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// 插入遮罩（初始不可见，等待 FadeOverlay）
    ShowOverlay {
        instance: InstanceId,
        surface: OverlaySurface,
    },
    /// 遮罩淡入 / 淡出
    FadeOverlay {
        instance: InstanceId,
        fade: OverlayFade,
        duration_ms: u64,
    },
    /// 显示内容区域
    ShowContent { instance: InstanceId },
    /// 绑定点击关闭
    BindDismiss { instance: InstanceId },
    /// 移除遮罩
    RemoveOverlay { instance: InstanceId },
    /// 激活场景
    ActivateScene { scene_id: String },
    /// 预加载场景
    PreloadScene { scene_id: String },
    /// 向会话中其他观众广播
    Broadcast { message: ChannelMessage },
    /// 开始播放音频
    PlayAudio {
        playback: PlaybackId,
        src: String,
        volume: f32,
    },
    /// 调整播放音量
    SetAudioVolume { playback: PlaybackId, volume: f32 },
    /// 停止播放
    StopAudio { playback: PlaybackId },
}

impl Command {
    /// 指令所属的过渡实例（与实例无关的指令返回 `None`）
    pub fn instance(&self) -> Option<InstanceId> {
        match self {
            Self::ShowOverlay { instance, .. }
            | Self::FadeOverlay { instance, .. }
            | Self::ShowContent { instance }
            | Self::BindDismiss { instance }
            | Self::RemoveOverlay { instance } => Some(*instance),
            Self::PlayAudio { playback, .. }
            | Self::SetAudioVolume { playback, .. }
            | Self::StopAudio { playback } => Some(*playback),
            Self::ActivateScene { .. } | Self::PreloadScene { .. } | Self::Broadcast { .. } => {
                None
            }
        }
    }
}
