//! # State 模块
//!
//! 过渡实例的生命周期阶段与本地观众身份。

use serde::{Deserialize, Serialize};

/// 可见阶段的子状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibleStage {
    /// 内容区域淡入中
    ContentFadingIn,
    /// 停留，等待自动销毁或点击
    Holding,
}

/// 过渡实例生命周期
///
/// ```text
/// Idle → FadingIn → Visible(ContentFadingIn | Holding) → FadingOut → Destroyed
/// ```
///
/// `Destroyed` 是终态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionPhase {
    /// 尚未显示（或因特权观众隐藏而跳过）
    Idle,
    /// 遮罩淡入中
    FadingIn,
    /// 遮罩完全显示
    Visible(VisibleStage),
    /// 遮罩淡出中
    FadingOut,
    /// 已移除
    Destroyed,
}

/// 本地观众
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    /// 会话内的用户标识
    pub user_id: String,
    /// 是否为特权观众（可激活场景、结束所有人的过渡）
    pub privileged: bool,
}

impl Viewer {
    /// 特权观众
    pub fn privileged(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            privileged: true,
        }
    }

    /// 普通观众
    pub fn player(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            privileged: false,
        }
    }
}
