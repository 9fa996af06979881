//! # Config 模块
//!
//! 过渡配置的类型化表示。
//!
//! ## 合并规则
//!
//! - [`TransitionConfig`]：完整配置，每个字段都有默认值
//! - [`TransitionPatch`]：部分配置，所有字段可选
//! - 合并是**浅合并**：patch 中出现的字段覆盖原值，未出现的字段保持原值
//! - 未识别的 key 收集到 [`TransitionPatch::unknown`]，不会进入配置
//!
//! 字段的 JSON 名称与频道协议一致（`sceneID`、`gmHide`、`showUI` 等）。

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// 完整过渡配置
///
/// 每个过渡实例持有一份，构造后只能通过 [`TransitionConfig::apply`] 修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransitionConfig {
    /// 淡入完成后激活的场景
    ///
    /// 协议上以 `false` 表示"无场景"。
    #[serde(rename = "sceneID", with = "scene_id_wire")]
    pub scene_id: Option<String>,
    /// 远程触发时，特权观众不显示遮罩
    pub gm_hide: bool,
    pub font_color: String,
    pub font_size: String,
    /// 背景图片 URI
    pub bg_img: String,
    pub bg_pos: String,
    pub bg_size: String,
    pub bg_color: String,
    /// 背景图片透明度 (0.0 - 1.0)
    pub bg_opacity: f32,
    /// 遮罩淡入时长（毫秒）
    pub fade_in: u64,
    /// 停留时长（毫秒），之后自动销毁
    pub delay: u64,
    /// 遮罩淡出时长（毫秒）
    pub fade_out: u64,
    /// 音频 URI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    /// 音量 (0.0 - 1.0)
    pub volume: f32,
    /// 允许点击跳过
    pub skippable: bool,
    /// 特权观众点击时结束所有人的过渡
    pub gm_end_all: bool,
    /// 遮罩置于宿主 UI 之下
    #[serde(rename = "showUI")]
    pub show_ui: bool,
    /// 内容区域的文本 / 标记
    pub content: String,
    /// 接收者白名单（`None` 表示所有人）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,
    /// 由频道消息触发
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub from_socket: bool,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            scene_id: None,
            gm_hide: true,
            font_color: "#777777".to_string(),
            font_size: "28px".to_string(),
            bg_img: String::new(),
            bg_pos: "center center".to_string(),
            bg_size: "cover".to_string(),
            bg_color: "#000000".to_string(),
            bg_opacity: 0.7,
            fade_in: 400,
            delay: 4000,
            fade_out: 1000,
            audio: None,
            volume: 1.0,
            skippable: true,
            gm_end_all: true,
            show_ui: false,
            content: String::new(),
            users: None,
            from_socket: false,
        }
    }
}

/// 逐字段覆盖：patch 中为 `Some` 的字段写入目标
macro_rules! merge_fields {
    ($target:expr, $patch:expr; $($field:ident),* $(,)?) => {
        $(
            if let Some(value) = &$patch.$field {
                $target.$field = value.clone();
            }
        )*
    };
}

impl TransitionConfig {
    /// 以默认配置为底合并 patch
    pub fn from_patch(patch: &TransitionPatch) -> Self {
        Self::default().merge(patch)
    }

    /// 浅合并，返回新配置
    pub fn merge(&self, patch: &TransitionPatch) -> Self {
        let mut merged = self.clone();
        merged.apply(patch);
        merged
    }

    /// 原地浅合并
    pub fn apply(&mut self, patch: &TransitionPatch) {
        merge_fields!(self, patch;
            scene_id,
            gm_hide,
            font_color,
            font_size,
            bg_img,
            bg_pos,
            bg_size,
            bg_color,
            bg_opacity,
            fade_in,
            delay,
            fade_out,
            volume,
            skippable,
            gm_end_all,
            show_ui,
            content,
            from_socket,
        );
        if let Some(audio) = &patch.audio {
            self.audio = Some(audio.clone());
        }
        if let Some(users) = &patch.users {
            self.users = Some(users.clone());
        }
    }

    /// 有效的音频 URI（空字符串视为无音频）
    pub fn audio_src(&self) -> Option<&str> {
        self.audio.as_deref().filter(|src| !src.is_empty())
    }

    /// 检查接收者白名单是否包含指定用户
    ///
    /// 白名单缺失或为空时所有人都是接收者。
    pub fn is_recipient(&self, user_id: &str) -> bool {
        match &self.users {
            None => true,
            Some(users) => users.is_empty() || users.iter().any(|u| u == user_id),
        }
    }

    /// 验证数值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit_range("volume", self.volume)?;
        check_unit_range("bgOpacity", self.bg_opacity)?;
        Ok(())
    }
}

fn check_unit_range(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: 1.0,
        })
    }
}

/// 部分过渡配置
///
/// 来自宏调用、场景 flag 或频道消息。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionPatch {
    /// `Some(None)` 表示显式清除场景（协议值 `false`）
    #[serde(
        rename = "sceneID",
        default,
        skip_serializing_if = "Option::is_none",
        with = "patch_scene_id_wire"
    )]
    pub scene_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gm_hide: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_pos: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_out: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skippable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gm_end_all: Option<bool>,
    #[serde(rename = "showUI", default, skip_serializing_if = "Option::is_none")]
    pub show_ui: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_socket: Option<bool>,
    /// 未识别的 key，不参与合并
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

impl TransitionPatch {
    /// 只指定场景的 patch
    pub fn for_scene(scene_id: impl Into<String>) -> Self {
        Self {
            scene_id: Some(Some(scene_id.into())),
            ..Self::default()
        }
    }

    /// 未识别的 key 列表
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.unknown.keys().map(String::as_str).collect()
    }
}

impl From<&TransitionConfig> for TransitionPatch {
    fn from(config: &TransitionConfig) -> Self {
        Self {
            scene_id: Some(config.scene_id.clone()),
            gm_hide: Some(config.gm_hide),
            font_color: Some(config.font_color.clone()),
            font_size: Some(config.font_size.clone()),
            bg_img: Some(config.bg_img.clone()),
            bg_pos: Some(config.bg_pos.clone()),
            bg_size: Some(config.bg_size.clone()),
            bg_color: Some(config.bg_color.clone()),
            bg_opacity: Some(config.bg_opacity),
            fade_in: Some(config.fade_in),
            delay: Some(config.delay),
            fade_out: Some(config.fade_out),
            audio: config.audio.clone(),
            volume: Some(config.volume),
            skippable: Some(config.skippable),
            gm_end_all: Some(config.gm_end_all),
            show_ui: Some(config.show_ui),
            content: Some(config.content.clone()),
            users: config.users.clone(),
            from_socket: config.from_socket.then_some(true),
            unknown: Map::new(),
        }
    }
}

/// `sceneID` 的协议表示：字符串或 `false`
mod scene_id_wire {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(id) => s.serialize_str(id),
            None => s.serialize_bool(false),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        match Value::deserialize(d)? {
            Value::String(id) if !id.is_empty() => Ok(Some(id)),
            Value::String(_) | Value::Null | Value::Bool(false) => Ok(None),
            other => Err(serde::de::Error::custom(format!(
                "sceneID 必须是字符串或 false，实际为 {other}"
            ))),
        }
    }
}

mod patch_scene_id_wire {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<Option<String>>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(inner) => super::scene_id_wire::serialize(inner, s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Option<String>>, D::Error> {
        super::scene_id_wire::deserialize(d).map(Some)
    }
}
