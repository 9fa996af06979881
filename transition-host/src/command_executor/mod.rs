//! # Command Executor 模块
//!
//! Command 执行器，负责将 Runtime 发出的 Command 转换为实际操作。
//!
//! ## 设计说明
//!
//! - `CommandExecutor` 接收 `Command`，分派给 [`HostServices`] 中的各个协作者
//! - 执行器不保存遮罩或音频状态，状态由 `Presenter` / `AudioPlayer` 持有
//! - 需要回传给 Runtime 的结果（例如同步启动的播放）放在
//!   `last_output.feedback` 中，由调用者交给 `handle_input`
//! - 单条命令失败只记录日志，不中断后续命令
//!
//! ## 模块结构
//!
//! - `audio`: 音频命令执行
//! - `overlay`: 遮罩命令执行
//! - `scene`: 场景命令执行
//! - `types`: 类型定义

mod audio;
mod overlay;
mod scene;
mod types;

pub use types::*;

use tracing::debug;
use transition_runtime::{Command, TransitionInput};

use crate::audio::AudioPlayer;
use crate::presenter::Presenter;
use crate::session::Messenger;
use crate::world::WorldData;

/// 执行命令所需的宿主协作者
pub struct HostServices<'a> {
    pub presenter: &'a mut dyn Presenter,
    pub audio: &'a mut dyn AudioPlayer,
    pub messenger: &'a mut dyn Messenger,
    pub world: &'a mut WorldData,
}

/// Command 执行器
#[derive(Debug, Default)]
pub struct CommandExecutor {
    /// 最近一次执行的输出
    pub last_output: CommandOutput,
    stats: ExecutorStats,
}

impl CommandExecutor {
    /// 创建新的 Command 执行器
    pub fn new() -> Self {
        Self::default()
    }

    /// 累计执行统计
    pub fn stats(&self) -> ExecutorStats {
        self.stats
    }

    /// 执行单个 Command
    ///
    /// 返回执行结果，同时更新 `last_output` 以获取回传输入。
    pub fn execute(&mut self, command: &Command, services: &mut HostServices<'_>) -> ExecuteResult {
        // 重置输出
        self.last_output = CommandOutput::default();

        let result = match command {
            Command::ShowOverlay { instance, surface } => {
                self.execute_show_overlay(*instance, surface, services.presenter)
            }
            Command::FadeOverlay {
                instance,
                fade,
                duration_ms,
            } => self.execute_fade_overlay(*instance, *fade, *duration_ms, services.presenter),
            Command::ShowContent { instance } => {
                services.presenter.show_content(*instance);
                ExecuteResult::Ok
            }
            Command::BindDismiss { instance } => {
                services.presenter.bind_dismiss(*instance);
                ExecuteResult::Ok
            }
            Command::RemoveOverlay { instance } => {
                services.presenter.remove_overlay(*instance);
                ExecuteResult::Ok
            }
            Command::ActivateScene { scene_id } => {
                self.execute_activate_scene(scene_id, services.world)
            }
            Command::PreloadScene { scene_id } => {
                self.execute_preload_scene(scene_id, services.world)
            }
            Command::Broadcast { message } => {
                services.messenger.broadcast(message);
                ExecuteResult::Ok
            }
            Command::PlayAudio {
                playback,
                src,
                volume,
            } => self.execute_play_audio(*playback, src, *volume, services.audio),
            Command::SetAudioVolume { playback, volume } => {
                self.execute_set_audio_volume(*playback, *volume, services.audio)
            }
            Command::StopAudio { playback } => self.execute_stop_audio(*playback, services.audio),
        };

        self.stats.executed += 1;
        if !result.is_ok() {
            self.stats.failed += 1;
        }
        self.last_output.result = result.clone();
        result
    }

    /// 按顺序执行一批 Command，汇总回传输入
    pub fn execute_batch(
        &mut self,
        commands: &[Command],
        services: &mut HostServices<'_>,
    ) -> Vec<TransitionInput> {
        let mut feedback = Vec::new();
        for command in commands {
            self.execute(command, services);
            feedback.append(&mut self.last_output.feedback);
        }
        if !commands.is_empty() {
            debug!(count = commands.len(), feedback = feedback.len(), "执行命令批次");
        }
        feedback
    }
}
