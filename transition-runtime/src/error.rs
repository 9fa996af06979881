//! # Error 模块
//!
//! 定义 transition-runtime 中使用的错误类型。

use thiserror::Error;

/// 配置校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 数值超出允许范围
    #[error("字段 '{field}' 的值 {value} 超出范围 {min} - {max}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

/// 过渡运行时错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    /// 场景未找到
    #[error("场景 '{scene_id}' 未找到")]
    SceneNotFound { scene_id: String },

    /// 日志条目未找到
    #[error("日志条目 '{journal_id}' 未找到")]
    JournalNotFound { journal_id: String },

    /// 场景上没有保存的过渡
    #[error("场景 '{scene_id}' 没有保存的过渡配置")]
    NoStoredTransition { scene_id: String },

    /// 过渡实例不存在（已销毁或从未创建）
    #[error("过渡实例 {id} 不存在")]
    InstanceNotFound { id: u64 },

    /// 无效的频道消息
    #[error("无效的频道消息: {message}")]
    InvalidPayload { message: String },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// Result 类型别名
pub type TransitionResult<T> = Result<T, TransitionError>;
