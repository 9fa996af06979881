//! # Message 模块
//!
//! 会话频道上的消息格式。
//!
//! ```text
//! {"action": "end"}                       -> Control(End)
//! {"sceneID": "abc", "users": ["u1"], ...} -> Trigger(patch)
//! ```
//!
//! 没有 `action` 字段（或字段为假值）的消息都被当作过渡配置。

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Value, json};

use crate::config::TransitionPatch;
use crate::error::{TransitionError, TransitionResult};

/// 频道名称
pub const CHANNEL: &str = "module.scene-transitions";

/// 控制动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlAction {
    /// 结束当前活动的过渡
    End,
    /// 未知动作，接收方忽略
    Unknown(String),
}

impl ControlAction {
    pub fn as_str(&self) -> &str {
        match self {
            Self::End => "end",
            Self::Unknown(name) => name,
        }
    }
}

/// 频道消息
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelMessage {
    Control(ControlAction),
    /// 远程触发过渡
    Trigger(TransitionPatch),
}

impl ChannelMessage {
    /// `{"action": "end"}`
    pub fn end() -> Self {
        Self::Control(ControlAction::End)
    }

    /// 从 JSON 值解析
    pub fn parse(value: Value) -> TransitionResult<Self> {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Err(TransitionError::InvalidPayload {
                    message: format!("消息必须是 JSON 对象，实际为 {other}"),
                });
            }
        };

        match map.remove("action") {
            Some(Value::String(action)) if !action.is_empty() => {
                Ok(Self::Control(match action.as_str() {
                    "end" => ControlAction::End,
                    _ => ControlAction::Unknown(action),
                }))
            }
            Some(Value::Null | Value::Bool(false) | Value::String(_)) | None => {
                serde_json::from_value(Value::Object(map))
                    .map(Self::Trigger)
                    .map_err(|e| TransitionError::InvalidPayload {
                        message: e.to_string(),
                    })
            }
            Some(other) => Err(TransitionError::InvalidPayload {
                message: format!("action 必须是字符串，实际为 {other}"),
            }),
        }
    }

    /// 转换为 JSON 值
    pub fn to_value(&self) -> Value {
        match self {
            Self::Control(action) => json!({ "action": action.as_str() }),
            // TransitionPatch 只含字符串 key 与基础类型，序列化不会失败
            Self::Trigger(patch) => serde_json::to_value(patch).unwrap_or(Value::Null),
        }
    }
}

impl Serialize for ChannelMessage {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(s)
    }
}

impl<'de> Deserialize<'de> for ChannelMessage {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(d)?;
        Self::parse(value).map_err(serde::de::Error::custom)
    }
}
