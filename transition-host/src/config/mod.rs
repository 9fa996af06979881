//! # Config 模块
//!
//! 宿主配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// 音频后端选择
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AudioBackendKind {
    /// 启动时探测
    #[default]
    Auto,
    /// 基于句柄的播放器（异步启动，6 位小数音量）
    Handle,
    /// 旧式单元素播放器（同步启动，1 位小数音量）
    Legacy,
}

/// 宿主配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// 本地用户 ID
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// 本地用户是否为 GM
    #[serde(default = "default_privileged")]
    pub privileged: bool,

    /// 世界数据文件（场景、日志）
    #[serde(default = "default_world_path")]
    pub world_path: PathBuf,

    /// 音频配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 会话模拟配置
    #[serde(default)]
    pub session: SessionConfig,

    /// 调试配置
    #[serde(default)]
    pub debug: DebugConfig,
}

/// 音频配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// 后端选择
    #[serde(default)]
    pub backend: AudioBackendKind,

    /// 播放被锁定（模拟浏览器自动播放限制）
    #[serde(default)]
    pub locked: bool,

    /// 音频资源根目录
    #[serde(default = "default_assets_root")]
    pub assets_root: PathBuf,
}

/// 会话模拟配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// 除本地用户外的玩家数
    #[serde(default = "default_players")]
    pub players: usize,

    /// 每帧推进的毫秒数
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
}

/// 调试配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// 日志级别（trace/debug/info/warn/error）
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// 默认值函数
fn default_user_id() -> String {
    "gm".to_string()
}

fn default_privileged() -> bool {
    true
}

fn default_world_path() -> PathBuf {
    PathBuf::from("world.json")
}

fn default_assets_root() -> PathBuf {
    PathBuf::from("assets")
}

fn default_players() -> usize {
    2
}

fn default_frame_ms() -> u64 {
    16
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            privileged: default_privileged(),
            world_path: default_world_path(),
            audio: AudioConfig::default(),
            session: SessionConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            backend: AudioBackendKind::default(),
            locked: false,
            assets_root: default_assets_root(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            players: default_players(),
            frame_ms: default_frame_ms(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl HostConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!(path = %path.display(), "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), HostConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| HostConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| HostConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), HostConfigError> {
        if self.user_id.trim().is_empty() {
            return Err(HostConfigError::ValidationFailed(
                "user_id 不能为空".to_string(),
            ));
        }

        if self.session.frame_ms == 0 {
            return Err(HostConfigError::ValidationFailed(
                "frame_ms 必须大于 0".to_string(),
            ));
        }

        if parse_level(&self.debug.log_level).is_none() {
            return Err(HostConfigError::ValidationFailed(format!(
                "未知的日志级别: {}",
                self.debug.log_level
            )));
        }

        Ok(())
    }

    /// 配置的日志级别，无法识别时为 INFO
    pub fn log_level(&self) -> tracing::Level {
        parse_level(&self.debug.log_level).unwrap_or(tracing::Level::INFO)
    }
}

fn parse_level(level: &str) -> Option<tracing::Level> {
    level.parse().ok()
}

/// 配置错误
#[derive(Debug, Clone, Error)]
pub enum HostConfigError {
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),

    #[error("配置 IO 错误: {0}")]
    IoError(String),

    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
