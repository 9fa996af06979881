//! # Client 模块
//!
//! 会话中的一个客户端：控制器、执行器、呈现层、播放器和频道端点的组合。
//!
//! 每帧调用 [`Client::pump`]：
//!
//! 1. 取出频道消息交给控制器
//! 2. 取出播放器事件作为输入
//! 3. 推进时间
//!
//! 执行命令产生的回传输入会立刻交回控制器，直到不再产生新命令。

use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};
use transition_runtime::{
    ChannelMessage, Command, ControlAction, InstanceId, MenuAction, SceneStore,
    TransitionConfig, TransitionController, TransitionInput, TransitionPatch, TransitionResult,
    Viewer, delete_transition, journal_menu, save_transition, scene_menu,
};

use crate::audio::{AudioPlayer, PlaybackEvent};
use crate::command_executor::{CommandExecutor, ExecutorStats, HostServices};
use crate::presenter::HeadlessPresenter;
use crate::session::BusEndpoint;
use crate::world::WorldData;

/// 会话客户端
pub struct Client {
    controller: TransitionController,
    executor: CommandExecutor,
    presenter: HeadlessPresenter,
    audio: Box<dyn AudioPlayer>,
    endpoint: BusEndpoint,
    world: Rc<RefCell<WorldData>>,
}

impl Client {
    /// 创建客户端，淡出参数取自播放器
    pub fn new(
        viewer: Viewer,
        audio: Box<dyn AudioPlayer>,
        endpoint: BusEndpoint,
        world: Rc<RefCell<WorldData>>,
    ) -> Self {
        let controller = TransitionController::new(viewer, audio.fade_profile());
        Self {
            controller,
            executor: CommandExecutor::new(),
            presenter: HeadlessPresenter::new(),
            audio,
            endpoint,
            world,
        }
    }

    pub fn viewer(&self) -> &Viewer {
        self.controller.viewer()
    }

    pub fn controller(&self) -> &TransitionController {
        &self.controller
    }

    pub fn presenter(&self) -> &HeadlessPresenter {
        &self.presenter
    }

    pub fn audio(&self) -> &dyn AudioPlayer {
        self.audio.as_ref()
    }

    pub fn audio_mut(&mut self) -> &mut dyn AudioPlayer {
        self.audio.as_mut()
    }

    pub fn executor_stats(&self) -> ExecutorStats {
        self.executor.stats()
    }

    // ========== 帧驱动 ==========

    /// 推进一帧
    pub fn pump(&mut self, dt_ms: u64) {
        self.receive();

        let inputs: Vec<TransitionInput> = self
            .audio
            .poll_events()
            .into_iter()
            .map(|event| match event {
                PlaybackEvent::Started(playback) => TransitionInput::playback_started(playback),
                PlaybackEvent::Ended(playback) => TransitionInput::PlaybackEnded { playback },
            })
            .collect();
        for input in inputs {
            let commands = self.controller.handle_input(input);
            self.apply(commands);
        }

        let commands = self.controller.update(dt_ms);
        self.apply(commands);
    }

    /// 处理收件箱中的频道消息，返回处理条数
    pub fn receive(&mut self) -> usize {
        let values = self.endpoint.drain();
        let count = values.len();
        for value in values {
            match ChannelMessage::parse(value) {
                Ok(message) => self.handle_message(message),
                Err(e) => warn!(user = %self.viewer().user_id, error = %e, "无法解析频道消息"),
            }
        }
        count
    }

    fn handle_message(&mut self, message: ChannelMessage) {
        match &message {
            ChannelMessage::Trigger(patch) => warn_unknown_keys(patch),
            ChannelMessage::Control(ControlAction::Unknown(action)) => {
                debug!(action = %action, "忽略未知的控制消息");
            }
            ChannelMessage::Control(ControlAction::End) => {}
        }
        let commands = self.controller.handle_message(message);
        self.apply(commands);
    }

    /// 点击最上层可关闭的遮罩
    pub fn click(&mut self) -> bool {
        let Some(id) = self.presenter.topmost_dismissable() else {
            return false;
        };
        let commands = self.controller.handle_input(TransitionInput::click(id));
        let handled = !commands.is_empty();
        self.apply(commands);
        handled
    }

    /// 执行命令，并把回传输入交回控制器
    fn apply(&mut self, commands: Vec<Command>) {
        let mut pending = commands;
        while !pending.is_empty() {
            let feedback = {
                let mut world = self.world.borrow_mut();
                let mut services = HostServices {
                    presenter: &mut self.presenter,
                    audio: self.audio.as_mut(),
                    messenger: &mut self.endpoint,
                    world: &mut *world,
                };
                self.executor.execute_batch(&pending, &mut services)
            };
            pending = feedback
                .into_iter()
                .flat_map(|input| self.controller.handle_input(input))
                .collect();
        }
    }

    // ========== 操作 ==========

    /// 直接显示一个过渡
    pub fn render(&mut self, config: TransitionConfig, preview: bool) -> InstanceId {
        let (id, commands) = self.controller.render(config, preview);
        self.apply(commands);
        id
    }

    /// 合并配置到实例（不重新渲染）
    pub fn update_data(&mut self, id: InstanceId, patch: &TransitionPatch) -> TransitionResult<()> {
        warn_unknown_keys(patch);
        self.controller.update_data(id, patch).map(|_| ())
    }

    /// 销毁活动实例
    pub fn destroy_active(&mut self, instant: bool) {
        let commands = self.controller.destroy_active(instant);
        self.apply(commands);
    }

    /// 播放场景上保存的过渡
    pub fn play_scene(&mut self, scene_id: &str) -> TransitionResult<InstanceId> {
        let (id, commands) = {
            let world = self.world.borrow();
            self.controller.play_scene_transition(&*world, scene_id)?
        };
        self.apply(commands);
        Ok(id)
    }

    /// 用日志条目播放过渡
    pub fn play_journal(&mut self, journal_id: &str) -> TransitionResult<InstanceId> {
        let (id, commands) = {
            let world = self.world.borrow();
            self.controller.play_from_journal(&*world, journal_id)?
        };
        self.apply(commands);
        Ok(id)
    }

    /// 预览场景过渡：有保存的过渡时编辑，否则新建
    pub fn preview(&mut self, scene_id: &str) -> TransitionResult<InstanceId> {
        let (id, commands) = {
            let world = self.world.borrow();
            if world.transition_flag(scene_id).is_some() {
                self.controller.edit_transition(&*world, scene_id)?
            } else {
                self.controller.create_transition(&*world, scene_id)?
            }
        };
        self.apply(commands);
        Ok(id)
    }

    /// 宏调用
    pub fn trigger_macro(&mut self, patch: TransitionPatch, show_me: bool) -> Option<InstanceId> {
        warn_unknown_keys(&patch);
        let (id, commands) = self.controller.trigger_macro(patch, show_me);
        self.apply(commands);
        id
    }

    /// 保存过渡到场景
    pub fn save_transition(&mut self, scene_id: &str, config: &TransitionConfig) -> TransitionResult<()> {
        config.validate()?;
        save_transition(&mut *self.world.borrow_mut(), scene_id, config)
    }

    /// 删除场景上的过渡
    pub fn delete_transition(&mut self, scene_id: &str) -> TransitionResult<()> {
        delete_transition(&mut *self.world.borrow_mut(), scene_id)
    }

    /// 场景右键菜单
    pub fn scene_menu(&self, scene_id: &str) -> Vec<MenuAction> {
        scene_menu(self.viewer(), &*self.world.borrow(), scene_id)
    }

    /// 日志条目菜单
    pub fn journal_menu(&self) -> Vec<MenuAction> {
        journal_menu(self.viewer())
    }
}

fn warn_unknown_keys(patch: &TransitionPatch) {
    let unknown = patch.unknown_keys();
    if !unknown.is_empty() {
        warn!(keys = ?unknown, "忽略未知的配置项");
    }
}
