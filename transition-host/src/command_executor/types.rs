//! Command Executor 类型定义

use transition_runtime::TransitionInput;

/// Command 执行结果
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ExecuteResult {
    /// 执行成功
    #[default]
    Ok,
    /// 执行失败（已记录日志，不中断后续命令）
    Error(String),
}

impl ExecuteResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// 命令执行输出
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// 执行结果
    pub result: ExecuteResult,
    /// 需要回传给 Runtime 的输入
    pub feedback: Vec<TransitionInput>,
}

/// 执行统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutorStats {
    pub executed: usize,
    pub failed: usize,
}
