//! # Host 层
//!
//! 场景过渡的宿主层实现。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 遮罩呈现（[`presenter`]）
//! - 音频播放（[`audio`]）
//! - 会话频道（[`session`]）
//! - 场景与日志数据（[`world`]）
//! - 将 Runtime 的 Command 转换为实际效果（[`command_executor`]）
//!
//! Host 层不包含过渡的生命周期逻辑，只负责执行 Runtime 发出的 Command
//! 并回传播放器事件。

pub mod audio;
pub mod client;
pub mod command_executor;
pub mod config;
pub mod presenter;
pub mod session;
pub mod world;

pub use audio::{
    AudioError, AudioPlayer, HandlePlayer, LegacyPlayer, OutputDevice, PlaybackEvent,
    SilentDevice, StartStatus, TrackOutput, probe_player,
};
pub use client::Client;
pub use command_executor::{
    CommandExecutor, CommandOutput, ExecuteResult, ExecutorStats, HostServices,
};
pub use config::{
    AudioBackendKind, AudioConfig, DebugConfig, HostConfig, HostConfigError, SessionConfig,
};
pub use presenter::{HeadlessPresenter, OverlayView, Presenter};
pub use session::{BusEndpoint, Messenger, SessionBus};
pub use world::{JournalPage, JournalRecord, SceneRecord, WorldData, WorldError};
