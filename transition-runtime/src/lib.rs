//! # Transition Runtime
//!
//! 场景过渡遮罩的纯逻辑核心。
//!
//! ## 架构概述
//!
//! `transition-runtime` 不依赖任何 IO、渲染或音频库。
//! 它通过 **命令驱动模式** 与宿主层（Host）通信：
//!
//! ```text
//! Host                                   Runtime
//!   │                                       │
//!   │── ChannelMessage / TransitionInput ──►│
//!   │── update(dt) ────────────────────────►│
//!   │◄──────────────────── Vec<Command> ────│
//!   │                                       │
//! ```
//!
//! ## 核心类型
//!
//! - [`TransitionController`]：持有所有实例与当前活动实例
//! - [`TransitionInstance`]：单个过渡的生命周期状态机
//! - [`TransitionConfig`] / [`TransitionPatch`]：类型化配置与浅合并
//! - [`Command`]：Runtime 向 Host 发出的指令
//! - [`ChannelMessage`]：会话频道上的消息
//! - [`AudioFade`]：音频线性淡出
//!
//! ## 使用示例
//!
//! ```ignore
//! use transition_runtime::{FadeProfile, TransitionConfig, TransitionController, Viewer};
//!
//! let mut controller = TransitionController::new(Viewer::player("u1"), FadeProfile::HANDLE);
//! let (_, commands) = controller.render(TransitionConfig::default(), false);
//! host.execute_all(commands);
//!
//! loop {
//!     for message in host.drain_inbox() {
//!         host.execute_all(controller.handle_message(message));
//!     }
//!     host.execute_all(controller.update(frame_ms));
//! }
//! ```

pub mod actions;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod fade;
pub mod input;
pub mod instance;
pub mod message;
pub mod state;
pub mod timer;

// 重导出核心类型
pub use actions::{
    JournalStore, MenuAction, SceneStore, StoredTransition, TRANSITION_FLAG, delete_transition,
    journal_menu, save_transition, scene_menu,
};
pub use command::{
    Command, InstanceId, OverlayBackground, OverlayContent, OverlayFade, OverlayLayer,
    OverlaySurface, PlaybackId,
};
pub use config::{TransitionConfig, TransitionPatch};
pub use controller::TransitionController;
pub use error::{ConfigError, TransitionError, TransitionResult};
pub use fade::{AudioFade, FadeProfile, FadeTick};
pub use input::TransitionInput;
pub use instance::{CONTENT_FADE_MS, PlaybackSlot, TransitionInstance};
pub use message::{CHANNEL, ChannelMessage, ControlAction};
pub use state::{TransitionPhase, Viewer, VisibleStage};
pub use timer::DelayTimer;
