//! # Controller 模块
//!
//! 过渡生命周期控制器。
//!
//! 控制器持有本地的所有过渡实例，以及"当前活动实例"的引用：
//! 最后一次 `render()` 的实例成为活动实例，之前的实例不会被强制销毁，
//! 按自己的计时继续走完生命周期。远程 `end` 信号只作用于活动实例。

use crate::command::{Command, InstanceId};
use crate::config::{TransitionConfig, TransitionPatch};
use crate::error::{TransitionError, TransitionResult};
use crate::fade::FadeProfile;
use crate::input::TransitionInput;
use crate::instance::TransitionInstance;
use crate::message::{ChannelMessage, ControlAction};
use crate::state::Viewer;

/// 过渡控制器
#[derive(Debug)]
pub struct TransitionController {
    viewer: Viewer,
    fade_profile: FadeProfile,
    instances: Vec<TransitionInstance>,
    active: Option<InstanceId>,
    next_id: InstanceId,
}

impl TransitionController {
    /// 创建控制器
    ///
    /// `fade_profile` 由 Host 在启动时探测音频后端后确定，之后不再改变。
    pub fn new(viewer: Viewer, fade_profile: FadeProfile) -> Self {
        Self {
            viewer,
            fade_profile,
            instances: Vec::new(),
            active: None,
            next_id: 1,
        }
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn fade_profile(&self) -> FadeProfile {
        self.fade_profile
    }

    /// 当前活动实例 ID
    pub fn active_id(&self) -> Option<InstanceId> {
        self.active
    }

    /// 当前活动实例
    pub fn active(&self) -> Option<&TransitionInstance> {
        self.active.and_then(|id| self.instance(id))
    }

    pub fn instance(&self, id: InstanceId) -> Option<&TransitionInstance> {
        self.instances.iter().find(|inst| inst.id() == id)
    }

    pub fn instance_mut(&mut self, id: InstanceId) -> Option<&mut TransitionInstance> {
        self.instances.iter_mut().find(|inst| inst.id() == id)
    }

    /// 尚未丢弃的实例数量
    pub fn live_instances(&self) -> usize {
        self.instances.len()
    }

    /// 创建并显示一个过渡，成为活动实例
    pub fn render(
        &mut self,
        config: TransitionConfig,
        preview: bool,
    ) -> (InstanceId, Vec<Command>) {
        let id = self.next_id;
        self.next_id += 1;

        let mut instance = TransitionInstance::new(id, config, preview, self.fade_profile);
        let mut out = Vec::new();
        instance.render(&self.viewer, &mut out);

        self.instances.push(instance);
        self.active = Some(id);
        self.prune();

        (id, out)
    }

    /// 合并配置到指定实例
    pub fn update_data(
        &mut self,
        id: InstanceId,
        patch: &TransitionPatch,
    ) -> TransitionResult<&mut TransitionInstance> {
        self.instance_mut(id)
            .map(|inst| inst.update_data(patch))
            .ok_or(TransitionError::InstanceNotFound { id })
    }

    /// 销毁指定实例，已销毁或不存在时是空操作
    pub fn destroy(&mut self, id: InstanceId, instant: bool) -> Vec<Command> {
        let mut out = Vec::new();
        if let Some(inst) = self.instance_mut(id) {
            inst.destroy(instant, &mut out);
        }
        out
    }

    /// 销毁活动实例
    pub fn destroy_active(&mut self, instant: bool) -> Vec<Command> {
        match self.active {
            Some(id) => self.destroy(id, instant),
            None => Vec::new(),
        }
    }

    /// 点击指定实例
    pub fn click(&mut self, id: InstanceId) -> Vec<Command> {
        let mut out = Vec::new();
        let viewer = &self.viewer;
        if let Some(inst) = self.instances.iter_mut().find(|inst| inst.id() == id) {
            inst.click(viewer, &mut out);
        }
        out
    }

    /// 处理频道消息
    pub fn handle_message(&mut self, message: ChannelMessage) -> Vec<Command> {
        match message {
            ChannelMessage::Control(ControlAction::End) => self.destroy_active(false),
            ChannelMessage::Control(ControlAction::Unknown(_)) => Vec::new(),
            ChannelMessage::Trigger(patch) => {
                let mut config = TransitionConfig::from_patch(&patch);
                if !config.is_recipient(&self.viewer.user_id) {
                    return Vec::new();
                }
                config.from_socket = true;
                self.render(config, false).1
            }
        }
    }

    /// 处理 Host 输入
    pub fn handle_input(&mut self, input: TransitionInput) -> Vec<Command> {
        match input {
            TransitionInput::Click { instance } => self.click(instance),
            TransitionInput::PlaybackStarted { playback } => {
                let mut out = Vec::new();
                match self.instance_mut(playback) {
                    Some(inst) => inst.on_playback_started(&mut out),
                    // 实例已丢弃，句柄没有主人
                    None => out.push(Command::StopAudio { playback }),
                }
                out
            }
            TransitionInput::PlaybackFailed { playback, .. }
            | TransitionInput::PlaybackEnded { playback } => {
                if let Some(inst) = self.instance_mut(playback) {
                    inst.on_playback_gone();
                }
                self.prune();
                Vec::new()
            }
        }
    }

    /// 推进所有实例
    pub fn update(&mut self, dt_ms: u64) -> Vec<Command> {
        let mut out = Vec::new();
        for inst in &mut self.instances {
            inst.advance(dt_ms, &mut out);
        }
        self.prune();
        out
    }

    /// 丢弃已完成的实例（活动实例保留，供 `end` 信号使用）
    fn prune(&mut self) {
        let active = self.active;
        self.instances
            .retain(|inst| !inst.is_finished() || Some(inst.id()) == active);
    }
}
