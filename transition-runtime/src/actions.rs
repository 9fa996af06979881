//! # Actions 模块
//!
//! 场景菜单、日志菜单与宏调用对应的操作。
//!
//! 场景与日志数据由 Host 提供，这里只通过 [`SceneStore`] / [`JournalStore`]
//! 读取和写入。过渡配置以 flag 形式保存在场景上（key 为 [`TRANSITION_FLAG`]）。

use serde::{Deserialize, Serialize};

use crate::command::{Command, InstanceId};
use crate::config::{TransitionConfig, TransitionPatch};
use crate::controller::TransitionController;
use crate::error::{TransitionError, TransitionResult};
use crate::message::ChannelMessage;
use crate::state::Viewer;

/// 场景 flag 名称
pub const TRANSITION_FLAG: &str = "transition";

/// 场景上保存的过渡
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredTransition {
    pub options: TransitionPatch,
}

/// 场景数据访问
pub trait SceneStore {
    /// 场景是否存在
    fn contains_scene(&self, scene_id: &str) -> bool;

    /// 读取场景上保存的过渡
    fn transition_flag(&self, scene_id: &str) -> Option<StoredTransition>;

    /// 保存过渡到场景
    fn set_transition_flag(
        &mut self,
        scene_id: &str,
        stored: StoredTransition,
    ) -> TransitionResult<()>;

    /// 删除场景上的过渡
    fn unset_transition_flag(&mut self, scene_id: &str) -> TransitionResult<()>;
}

/// 日志条目数据访问
pub trait JournalStore {
    /// 日志条目是否存在
    fn contains_journal(&self, journal_id: &str) -> bool;

    /// 第一段文本内容
    fn first_text(&self, journal_id: &str) -> Option<String>;

    /// 第一张图片
    fn first_image(&self, journal_id: &str) -> Option<String>;
}

/// 菜单项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuAction {
    PlayTransition,
    CreateTransition,
    EditTransition,
    DeleteTransition,
    PlayFromJournal,
}

impl MenuAction {
    /// 菜单显示名称
    pub fn label(self) -> &'static str {
        match self {
            Self::PlayTransition => "Play Transition",
            Self::CreateTransition => "Create Transition",
            Self::EditTransition => "Edit Transition",
            Self::DeleteTransition => "Delete Transition",
            Self::PlayFromJournal => "Play Transition From Journal",
        }
    }
}

/// 场景菜单中对该观众可用的操作
pub fn scene_menu(viewer: &Viewer, scenes: &dyn SceneStore, scene_id: &str) -> Vec<MenuAction> {
    if !viewer.privileged || !scenes.contains_scene(scene_id) {
        return Vec::new();
    }
    if scenes.transition_flag(scene_id).is_some() {
        vec![
            MenuAction::PlayTransition,
            MenuAction::EditTransition,
            MenuAction::DeleteTransition,
        ]
    } else {
        vec![MenuAction::CreateTransition]
    }
}

/// 日志菜单中对该观众可用的操作
pub fn journal_menu(viewer: &Viewer) -> Vec<MenuAction> {
    if viewer.privileged {
        vec![MenuAction::PlayFromJournal]
    } else {
        Vec::new()
    }
}

/// 保存过渡到场景（编辑表单提交）
pub fn save_transition(
    scenes: &mut dyn SceneStore,
    scene_id: &str,
    config: &TransitionConfig,
) -> TransitionResult<()> {
    if !scenes.contains_scene(scene_id) {
        return Err(TransitionError::SceneNotFound {
            scene_id: scene_id.to_string(),
        });
    }
    let mut options = TransitionPatch::from(config);
    options.scene_id = Some(Some(scene_id.to_string()));
    options.from_socket = None;
    scenes.set_transition_flag(scene_id, StoredTransition { options })
}

/// 删除场景上的过渡
pub fn delete_transition(scenes: &mut dyn SceneStore, scene_id: &str) -> TransitionResult<()> {
    if !scenes.contains_scene(scene_id) {
        return Err(TransitionError::SceneNotFound {
            scene_id: scene_id.to_string(),
        });
    }
    scenes.unset_transition_flag(scene_id)
}

fn stored_options(scenes: &dyn SceneStore, scene_id: &str) -> TransitionResult<TransitionPatch> {
    if !scenes.contains_scene(scene_id) {
        return Err(TransitionError::SceneNotFound {
            scene_id: scene_id.to_string(),
        });
    }
    scenes
        .transition_flag(scene_id)
        .map(|stored| stored.options)
        .ok_or_else(|| TransitionError::NoStoredTransition {
            scene_id: scene_id.to_string(),
        })
}

impl TransitionController {
    /// 播放场景上保存的过渡：本地显示并广播给所有人
    pub fn play_scene_transition(
        &mut self,
        scenes: &dyn SceneStore,
        scene_id: &str,
    ) -> TransitionResult<(InstanceId, Vec<Command>)> {
        let mut options = stored_options(scenes, scene_id)?;
        options.scene_id = Some(Some(scene_id.to_string()));

        let mut out = vec![Command::PreloadScene {
            scene_id: scene_id.to_string(),
        }];
        let (id, rendered) = self.render(TransitionConfig::from_patch(&options), false);
        out.extend(rendered);
        out.push(Command::Broadcast {
            message: ChannelMessage::Trigger(options),
        });

        Ok((id, out))
    }

    /// 为场景创建新过渡：以预览模式显示默认配置
    pub fn create_transition(
        &mut self,
        scenes: &dyn SceneStore,
        scene_id: &str,
    ) -> TransitionResult<(InstanceId, Vec<Command>)> {
        if !scenes.contains_scene(scene_id) {
            return Err(TransitionError::SceneNotFound {
                scene_id: scene_id.to_string(),
            });
        }
        let config = TransitionConfig::from_patch(&TransitionPatch::for_scene(scene_id));
        Ok(self.render(config, true))
    }

    /// 编辑场景上的过渡：以预览模式显示保存的配置
    pub fn edit_transition(
        &mut self,
        scenes: &dyn SceneStore,
        scene_id: &str,
    ) -> TransitionResult<(InstanceId, Vec<Command>)> {
        let options = stored_options(scenes, scene_id)?;
        Ok(self.render(TransitionConfig::from_patch(&options), true))
    }

    /// 用日志条目的第一段文本和第一张图片播放过渡
    pub fn play_from_journal(
        &mut self,
        journals: &dyn JournalStore,
        journal_id: &str,
    ) -> TransitionResult<(InstanceId, Vec<Command>)> {
        if !journals.contains_journal(journal_id) {
            return Err(TransitionError::JournalNotFound {
                journal_id: journal_id.to_string(),
            });
        }

        let options = TransitionPatch {
            scene_id: Some(None),
            content: Some(journals.first_text(journal_id).unwrap_or_default()),
            bg_img: Some(journals.first_image(journal_id).unwrap_or_default()),
            ..TransitionPatch::default()
        };

        let (id, mut out) = self.render(TransitionConfig::from_patch(&options), false);
        out.push(Command::Broadcast {
            message: ChannelMessage::Trigger(options),
        });
        Ok((id, out))
    }

    /// 宏调用：广播过渡
    ///
    /// `show_me` 为真或 patch 显式开启 `gmEndAll` 时本地也显示，
    /// 后者保证触发者能点击结束所有人的过渡。
    pub fn trigger_macro(
        &mut self,
        patch: TransitionPatch,
        show_me: bool,
    ) -> (Option<InstanceId>, Vec<Command>) {
        let mut out = Vec::new();
        let show_locally = show_me || patch.gm_end_all == Some(true);

        let local = if show_locally {
            let (id, rendered) = self.render(TransitionConfig::from_patch(&patch), false);
            out.extend(rendered);
            Some(id)
        } else {
            None
        };

        out.insert(
            0,
            Command::Broadcast {
                message: ChannelMessage::Trigger(patch),
            },
        );
        (local, out)
    }
}
