//! # Timer 模块
//!
//! 可取消的一次性延时。时间由宿主通过 `advance(dt)` 推进。

/// 一次性延时计时器
///
/// 取消即丢弃：持有者把 `Option<DelayTimer>` 置为 `None`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayTimer {
    remaining_ms: u64,
}

impl DelayTimer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            remaining_ms: delay_ms,
        }
    }

    /// 剩余时间（毫秒）
    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// 推进时间
    ///
    /// 到期时返回 `Some(剩余的 dt)`，未到期返回 `None`。
    pub fn advance(&mut self, dt_ms: u64) -> Option<u64> {
        if dt_ms >= self.remaining_ms {
            let leftover = dt_ms - self.remaining_ms;
            self.remaining_ms = 0;
            Some(leftover)
        } else {
            self.remaining_ms -= dt_ms;
            None
        }
    }
}
