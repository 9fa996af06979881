//! # World 模块
//!
//! 场景与日志条目数据，从 JSON 文件加载。
//!
//! ```json
//! {
//!   "scenes": [
//!     { "id": "s1", "name": "Tavern", "flags": { "transition": { "options": { ... } } } }
//!   ],
//!   "journals": [
//!     { "id": "j1", "name": "Intro", "pages": [ { "type": "text", "content": "<p>Hi</p>" } ] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};
use transition_runtime::{
    JournalStore, SceneStore, StoredTransition, TRANSITION_FLAG, TransitionError,
    TransitionResult,
};

/// 世界数据错误
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("世界数据 IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("世界数据解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("场景不存在: {0}")]
    SceneNotFound(String),
}

/// 场景
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub flags: Map<String, Value>,
}

/// 日志页
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JournalPage {
    Text { content: String },
    Image { src: String },
}

/// 日志条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pages: Vec<JournalPage>,
}

/// 世界数据
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldData {
    #[serde(default)]
    pub scenes: Vec<SceneRecord>,
    #[serde(default)]
    pub journals: Vec<JournalRecord>,
    #[serde(skip)]
    active_scene: Option<String>,
    #[serde(skip)]
    preloaded: Vec<String>,
}

impl WorldData {
    /// 从文件加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorldError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let world: Self = serde_json::from_str(&content)?;
        info!(
            path = %path.display(),
            scenes = world.scenes.len(),
            journals = world.journals.len(),
            "世界数据加载成功"
        );
        Ok(world)
    }

    /// 保存到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), WorldError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn scene(&self, scene_id: &str) -> Option<&SceneRecord> {
        self.scenes.iter().find(|s| s.id == scene_id)
    }

    fn scene_mut(&mut self, scene_id: &str) -> TransitionResult<&mut SceneRecord> {
        self.scenes
            .iter_mut()
            .find(|s| s.id == scene_id)
            .ok_or_else(|| TransitionError::SceneNotFound {
                scene_id: scene_id.to_string(),
            })
    }

    fn journal(&self, journal_id: &str) -> Option<&JournalRecord> {
        self.journals.iter().find(|j| j.id == journal_id)
    }

    /// 当前激活的场景
    pub fn active_scene(&self) -> Option<&str> {
        self.active_scene.as_deref()
    }

    /// 已预加载的场景
    pub fn preloaded(&self) -> &[String] {
        &self.preloaded
    }

    /// 激活场景
    pub fn activate(&mut self, scene_id: &str) -> Result<(), WorldError> {
        if self.scene(scene_id).is_none() {
            return Err(WorldError::SceneNotFound(scene_id.to_string()));
        }
        info!(scene = %scene_id, "激活场景");
        self.active_scene = Some(scene_id.to_string());
        Ok(())
    }

    /// 预加载场景
    pub fn preload(&mut self, scene_id: &str) -> Result<(), WorldError> {
        if self.scene(scene_id).is_none() {
            return Err(WorldError::SceneNotFound(scene_id.to_string()));
        }
        if !self.preloaded.iter().any(|id| id == scene_id) {
            debug!(scene = %scene_id, "预加载场景");
            self.preloaded.push(scene_id.to_string());
        }
        Ok(())
    }
}

impl SceneStore for WorldData {
    fn contains_scene(&self, scene_id: &str) -> bool {
        self.scene(scene_id).is_some()
    }

    fn transition_flag(&self, scene_id: &str) -> Option<StoredTransition> {
        let value = self.scene(scene_id)?.flags.get(TRANSITION_FLAG)?;
        match serde_json::from_value(value.clone()) {
            Ok(stored) => Some(stored),
            Err(e) => {
                warn!(scene = %scene_id, error = %e, "场景上的过渡数据无效");
                None
            }
        }
    }

    fn set_transition_flag(
        &mut self,
        scene_id: &str,
        stored: StoredTransition,
    ) -> TransitionResult<()> {
        let value = serde_json::to_value(&stored).map_err(|e| TransitionError::InvalidPayload {
            message: e.to_string(),
        })?;
        self.scene_mut(scene_id)?
            .flags
            .insert(TRANSITION_FLAG.to_string(), value);
        Ok(())
    }

    fn unset_transition_flag(&mut self, scene_id: &str) -> TransitionResult<()> {
        self.scene_mut(scene_id)?.flags.remove(TRANSITION_FLAG);
        Ok(())
    }
}

impl JournalStore for WorldData {
    fn contains_journal(&self, journal_id: &str) -> bool {
        self.journal(journal_id).is_some()
    }

    fn first_text(&self, journal_id: &str) -> Option<String> {
        self.journal(journal_id)?
            .pages
            .iter()
            .find_map(|page| match page {
                JournalPage::Text { content } => Some(content.clone()),
                JournalPage::Image { .. } => None,
            })
    }

    fn first_image(&self, journal_id: &str) -> Option<String> {
        self.journal(journal_id)?
            .pages
            .iter()
            .find_map(|page| match page {
                JournalPage::Image { src } => Some(src.clone()),
                JournalPage::Text { .. } => None,
            })
    }
}
