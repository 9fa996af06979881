//! # Fade 模块
//!
//! 音频线性淡出算法。
//!
//! 每个 tick 把音量减少固定步长，直到音量降到精度下限后停止播放。
//! 步长按 `volume / duration * tick_interval` 计算，每次从起始音量重新推算
//! （`start - step * k`），不累积浮点误差；tick 次数有上限
//! `ceil(duration / tick_interval)`，保证一定终止。

use serde::{Deserialize, Serialize};

/// 音频后端的淡出参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FadeProfile {
    /// tick 间隔（毫秒）
    pub tick_interval_ms: u64,
    /// 音量精度（小数位数）
    pub decimals: u32,
}

impl FadeProfile {
    /// 句柄式播放器：50ms 一次，6 位小数
    pub const HANDLE: Self = Self {
        tick_interval_ms: 50,
        decimals: 6,
    };

    /// 旧式单元素播放器：100ms 一次，1 位小数
    pub const LEGACY: Self = Self {
        tick_interval_ms: 100,
        decimals: 1,
    };

    /// 按精度四舍五入
    pub fn quantize(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.decimals as i32);
        (value * scale).round() / scale
    }

    /// 精度下限，音量不高于该值即视为静音
    pub fn epsilon(&self) -> f64 {
        10f64.powi(-(self.decimals as i32))
    }
}

impl Default for FadeProfile {
    fn default() -> Self {
        Self::HANDLE
    }
}

/// 单次 tick 的输出
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadeTick {
    /// 设置新音量
    Volume(f32),
    /// 停止播放，淡出结束
    Stop,
}

/// 进行中的音频淡出
#[derive(Debug, Clone)]
pub struct AudioFade {
    profile: FadeProfile,
    /// 起始音量（已量化）
    start: f64,
    /// 每 tick 的减量
    step: f64,
    /// tick 上限，为 0 表示立即停止
    max_ticks: u64,
    ticks: u64,
    /// 最后一次输出的音量
    last: f64,
    /// 距下一次 tick 的时间（毫秒）
    until_next_ms: u64,
    finished: bool,
}

impl AudioFade {
    /// 创建淡出
    ///
    /// 时长为 0 或起始音量已为静音时，第一次 tick 直接输出 [`FadeTick::Stop`]。
    pub fn new(volume: f32, duration_ms: u64, profile: FadeProfile) -> Self {
        let start = profile.quantize(f64::from(volume.max(0.0)));
        let interval = profile.tick_interval_ms.max(1);

        let (step, max_ticks) = if duration_ms == 0 || start <= profile.epsilon() {
            (0.0, 0)
        } else {
            (
                start / duration_ms as f64 * interval as f64,
                duration_ms.div_ceil(interval).max(1),
            )
        };

        Self {
            profile,
            start,
            step,
            max_ticks,
            ticks: 0,
            last: start,
            until_next_ms: 0,
            finished: false,
        }
    }

    /// 是否为立即停止（无中间音量）
    pub fn is_instant(&self) -> bool {
        self.max_ticks == 0
    }

    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// 推进时间，返回期间触发的所有 tick 输出
    ///
    /// 第一次 tick 在 `advance(0)` 时立即触发。
    pub fn advance(&mut self, dt_ms: u64) -> Vec<FadeTick> {
        let mut ticks = Vec::new();
        let mut budget = dt_ms;

        while !self.finished {
            if self.until_next_ms > budget {
                self.until_next_ms -= budget;
                break;
            }
            budget -= self.until_next_ms;
            self.until_next_ms = self.profile.tick_interval_ms.max(1);

            if let Some(tick) = self.tick() {
                ticks.push(tick);
            }
        }

        ticks
    }

    fn tick(&mut self) -> Option<FadeTick> {
        if self.max_ticks == 0 {
            self.finished = true;
            return Some(FadeTick::Stop);
        }

        self.ticks += 1;
        let volume = self
            .profile
            .quantize(self.start - self.step * self.ticks as f64);

        if volume <= self.profile.epsilon() || self.ticks >= self.max_ticks {
            self.finished = true;
            return Some(FadeTick::Stop);
        }

        // 精度不足时相邻 tick 可能量化到同一值，只输出严格下降的音量
        if volume < self.last {
            self.last = volume;
            Some(FadeTick::Volume(volume as f32))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(fade: &mut AudioFade, step_ms: u64) -> Vec<FadeTick> {
        let mut all = fade.advance(0);
        for _ in 0..10_000 {
            if fade.is_finished() {
                break;
            }
            all.extend(fade.advance(step_ms));
        }
        all
    }

    #[test]
    fn test_zero_duration_stops_immediately() {
        let mut fade = AudioFade::new(1.0, 0, FadeProfile::HANDLE);
        assert!(fade.is_instant());
        assert_eq!(fade.advance(0), vec![FadeTick::Stop]);
        assert!(fade.is_finished());
        assert!(fade.advance(1000).is_empty());
    }

    #[test]
    fn test_silent_start_stops_immediately() {
        let mut fade = AudioFade::new(0.0, 1000, FadeProfile::HANDLE);
        assert!(fade.is_instant());
        assert_eq!(fade.advance(0), vec![FadeTick::Stop]);
    }

    #[test]
    fn test_handle_fade_strictly_decreasing() {
        let mut fade = AudioFade::new(1.0, 1000, FadeProfile::HANDLE);
        let ticks = run_to_end(&mut fade, 50);

        assert_eq!(ticks.last(), Some(&FadeTick::Stop));
        let volumes: Vec<f32> = ticks
            .iter()
            .filter_map(|t| match t {
                FadeTick::Volume(v) => Some(*v),
                FadeTick::Stop => None,
            })
            .collect();

        assert_eq!(volumes.len(), 19);
        assert!(volumes[0] < 1.0);
        assert!(volumes.windows(2).all(|w| w[1] < w[0]));
        assert_eq!(ticks.iter().filter(|t| **t == FadeTick::Stop).count(), 1);
    }

    #[test]
    fn test_fade_stops_within_duration() {
        let mut fade = AudioFade::new(0.8, 1000, FadeProfile::HANDLE);
        fade.advance(0);
        let mut elapsed = 0;
        while !fade.is_finished() {
            fade.advance(10);
            elapsed += 10;
        }
        assert!(elapsed <= 1000);
    }

    #[test]
    fn test_legacy_fade_sequence() {
        let mut fade = AudioFade::new(1.0, 500, FadeProfile::LEGACY);
        let ticks = run_to_end(&mut fade, 100);

        insta::assert_debug_snapshot!(ticks, @r"
        [
            Volume(
                0.8,
            ),
            Volume(
                0.6,
            ),
            Volume(
                0.4,
            ),
            Volume(
                0.2,
            ),
            Stop,
        ]
        ");
    }

    #[test]
    fn test_coarse_precision_still_terminates() {
        // 步长远小于精度：大量 tick 量化到同一值，依靠 tick 上限终止
        let mut fade = AudioFade::new(0.3, 60_000, FadeProfile::LEGACY);
        let ticks = run_to_end(&mut fade, 100);

        assert!(fade.is_finished());
        assert_eq!(ticks.last(), Some(&FadeTick::Stop));
        let volumes: Vec<f32> = ticks
            .iter()
            .filter_map(|t| match t {
                FadeTick::Volume(v) => Some(*v),
                FadeTick::Stop => None,
            })
            .collect();
        assert!(volumes.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_short_duration_single_tick() {
        let mut fade = AudioFade::new(1.0, 30, FadeProfile::HANDLE);
        assert_eq!(fade.advance(0), vec![FadeTick::Stop]);
    }

    #[test]
    fn test_quantize() {
        assert_eq!(FadeProfile::LEGACY.quantize(0.36), 0.4);
        assert_eq!(FadeProfile::HANDLE.quantize(0.1234564), 0.123456);
        assert_eq!(FadeProfile::LEGACY.epsilon(), 0.1);
    }
}
