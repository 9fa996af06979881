//! # Instance 模块
//!
//! 单个过渡实例的生命周期状态机。
//!
//! ## 时间推进
//!
//! 实例不持有真实计时器。Host 每帧调用 [`TransitionInstance::advance`]，
//! 一个阶段用不完的时间会顺延到下一阶段，因此同样的总时长无论怎样切分
//! 都得到同样的指令序列。
//!
//! ## 销毁
//!
//! `destroy()` 在产生任何指令之前先设置 `destroying` 标记，之后的调用全部
//! 是空操作。点击与自动销毁在同一帧触发时只有第一个生效。

use crate::command::{Command, InstanceId, OverlayFade, OverlayLayer, OverlaySurface, PlaybackId};
use crate::config::{TransitionConfig, TransitionPatch};
use crate::fade::{AudioFade, FadeProfile, FadeTick};
use crate::message::ChannelMessage;
use crate::state::{TransitionPhase, Viewer, VisibleStage};
use crate::timer::DelayTimer;

/// 内容区域淡入时长（毫秒）
pub const CONTENT_FADE_MS: u64 = 400;

/// 音频播放槽
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackSlot {
    /// 无音频
    Empty,
    /// 已请求播放，等待句柄
    ///
    /// `cancelled` 表示实例在句柄就绪前已开始销毁，句柄到达时直接停止。
    Pending {
        playback: PlaybackId,
        cancelled: bool,
    },
    /// 正在播放
    Playing(PlaybackId),
}

/// 过渡实例
#[derive(Debug, Clone)]
pub struct TransitionInstance {
    id: InstanceId,
    preview: bool,
    config: TransitionConfig,
    fade_profile: FadeProfile,
    phase: TransitionPhase,
    /// 因特权观众隐藏而未显示
    skipped: bool,
    /// 淡入完成时激活场景（特权观众且非预览）
    activates_scene: bool,
    destroying: bool,
    has_surface: bool,
    dismiss_bound: bool,
    /// 当前阶段已经过的时间
    phase_elapsed_ms: u64,
    /// 淡出阶段总时长（instant 时为 0）
    fade_out_ms: u64,
    delay_timer: Option<DelayTimer>,
    playback: PlaybackSlot,
    /// 最近一次设置给播放器的音量
    audio_volume: f32,
    audio_fade: Option<(PlaybackId, AudioFade)>,
}

impl TransitionInstance {
    /// 创建实例，配置已合并完毕
    pub fn new(
        id: InstanceId,
        config: TransitionConfig,
        preview: bool,
        fade_profile: FadeProfile,
    ) -> Self {
        Self {
            id,
            preview,
            config,
            fade_profile,
            phase: TransitionPhase::Idle,
            skipped: false,
            activates_scene: false,
            destroying: false,
            has_surface: false,
            dismiss_bound: false,
            phase_elapsed_ms: 0,
            fade_out_ms: 0,
            delay_timer: None,
            playback: PlaybackSlot::Empty,
            audio_volume: 0.0,
            audio_fade: None,
        }
    }

    // ========== 查询 ==========

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    pub fn is_destroying(&self) -> bool {
        self.destroying
    }

    pub fn has_surface(&self) -> bool {
        self.has_surface
    }

    pub fn is_dismiss_bound(&self) -> bool {
        self.dismiss_bound
    }

    pub fn playback(&self) -> PlaybackSlot {
        self.playback
    }

    pub fn audio_volume(&self) -> f32 {
        self.audio_volume
    }

    pub fn is_audio_fading(&self) -> bool {
        self.audio_fade.is_some()
    }

    /// 自动销毁剩余时间（未设置时为 `None`）
    pub fn delay_remaining_ms(&self) -> Option<u64> {
        self.delay_timer.as_ref().map(DelayTimer::remaining_ms)
    }

    /// 实例已完成全部工作，可以丢弃
    pub fn is_finished(&self) -> bool {
        let done = self.phase == TransitionPhase::Destroyed || self.skipped;
        done && self.audio_fade.is_none()
    }

    // ========== 操作 ==========

    /// 浅合并配置，不会重新渲染
    pub fn update_data(&mut self, patch: &TransitionPatch) -> &mut Self {
        self.config.apply(patch);
        self
    }

    /// 显示遮罩
    ///
    /// 只有 `Idle` 且未销毁的实例会响应，重复调用是空操作。
    pub fn render(&mut self, viewer: &Viewer, out: &mut Vec<Command>) {
        if self.phase != TransitionPhase::Idle || self.destroying || self.skipped {
            return;
        }

        // 特权观众触发时自己不看遮罩，但消息照常广播给其他人
        if self.config.gm_hide && self.config.from_socket && viewer.privileged {
            self.skipped = true;
            return;
        }

        let layer = if viewer.privileged || self.config.show_ui {
            OverlayLayer::BelowUi
        } else {
            OverlayLayer::AboveUi
        };
        out.push(Command::ShowOverlay {
            instance: self.id,
            surface: OverlaySurface::from_config(&self.config, layer),
        });
        self.has_surface = true;
        self.activates_scene = viewer.privileged && !self.preview;

        if let Some(src) = self.config.audio_src() {
            let volume = self
                .fade_profile
                .quantize(f64::from(self.config.volume.clamp(0.0, 1.0)))
                as f32;
            out.push(Command::PlayAudio {
                playback: self.id,
                src: src.to_string(),
                volume,
            });
            self.audio_volume = volume;
            self.playback = PlaybackSlot::Pending {
                playback: self.id,
                cancelled: false,
            };
        }

        self.phase = TransitionPhase::FadingIn;
        self.phase_elapsed_ms = 0;
        out.push(Command::FadeOverlay {
            instance: self.id,
            fade: OverlayFade::In,
            duration_ms: self.config.fade_in,
        });

        let live = !self.preview;
        if (self.config.skippable && live)
            || (self.config.gm_end_all && viewer.privileged && live)
        {
            self.dismiss_bound = true;
            out.push(Command::BindDismiss { instance: self.id });
        }

        // 淡入时长为 0 时立即进入可见阶段
        self.advance(0, out);
    }

    /// 设置自动销毁
    ///
    /// 重复调用会替换之前的计时器。
    pub fn set_delay(&mut self) {
        self.delay_timer = Some(DelayTimer::new(self.config.delay));
    }

    /// 销毁实例
    ///
    /// 返回 `false` 表示已经在销毁中，本次调用没有任何效果。
    /// 淡入中被销毁时，场景照常激活，不等淡入结束。
    pub fn destroy(&mut self, instant: bool, out: &mut Vec<Command>) -> bool {
        if self.destroying {
            return false;
        }
        self.destroying = true;
        self.delay_timer = None;

        let time = if instant { 0 } else { self.config.fade_out };

        // 销毁时重新检查播放状态：句柄可能还没就绪
        match self.playback {
            PlaybackSlot::Playing(playback) => {
                self.playback = PlaybackSlot::Empty;
                self.audio_fade = Some((
                    playback,
                    AudioFade::new(self.audio_volume, time, self.fade_profile),
                ));
                self.tick_audio_fade(0, out);
            }
            PlaybackSlot::Pending { playback, .. } => {
                self.playback = PlaybackSlot::Pending {
                    playback,
                    cancelled: true,
                };
            }
            PlaybackSlot::Empty => {}
        }

        if self.phase == TransitionPhase::FadingIn {
            self.activate_scene(out);
        }

        if self.has_surface {
            self.phase = TransitionPhase::FadingOut;
            self.phase_elapsed_ms = 0;
            self.fade_out_ms = time;
            out.push(Command::FadeOverlay {
                instance: self.id,
                fade: OverlayFade::Out,
                duration_ms: time,
            });
            if time == 0 {
                self.remove_surface(out);
            }
        } else {
            self.phase = TransitionPhase::Destroyed;
        }

        true
    }

    /// 处理点击
    ///
    /// 仅在绑定了点击关闭时生效；特权观众且 `gm_end_all` 时先广播结束信号。
    pub fn click(&mut self, viewer: &Viewer, out: &mut Vec<Command>) -> bool {
        if !self.dismiss_bound || self.destroying {
            return false;
        }
        if self.config.gm_end_all && viewer.privileged {
            out.push(Command::Broadcast {
                message: ChannelMessage::end(),
            });
        }
        self.destroy(false, out)
    }

    /// 播放器回报句柄就绪
    pub fn on_playback_started(&mut self, out: &mut Vec<Command>) {
        match self.playback {
            PlaybackSlot::Pending {
                playback,
                cancelled: false,
            } => {
                self.playback = PlaybackSlot::Playing(playback);
            }
            PlaybackSlot::Pending {
                playback,
                cancelled: true,
            } => {
                self.playback = PlaybackSlot::Empty;
                out.push(Command::StopAudio { playback });
            }
            PlaybackSlot::Playing(_) | PlaybackSlot::Empty => {}
        }
    }

    /// 播放失败或自然结束
    pub fn on_playback_gone(&mut self) {
        self.playback = PlaybackSlot::Empty;
        self.audio_fade = None;
    }

    /// 推进时间
    pub fn advance(&mut self, dt_ms: u64, out: &mut Vec<Command>) {
        let fading_before = self.audio_fade.is_some();
        let mut budget = dt_ms;
        // 本次推进中才开始的音频淡出只消耗销毁之后的时间
        let mut fade_budget = dt_ms;

        loop {
            match self.phase {
                TransitionPhase::FadingIn => {
                    let left = self.config.fade_in.saturating_sub(self.phase_elapsed_ms);
                    if budget < left {
                        self.phase_elapsed_ms += budget;
                        break;
                    }
                    budget -= left;
                    self.finish_fade_in(out);
                }
                TransitionPhase::Visible(stage) => {
                    let fired = self
                        .delay_timer
                        .as_mut()
                        .and_then(|timer| timer.advance(budget));
                    let consumed = budget - fired.unwrap_or(0);
                    self.phase_elapsed_ms += consumed;

                    if stage == VisibleStage::ContentFadingIn
                        && self.phase_elapsed_ms >= CONTENT_FADE_MS
                    {
                        self.phase = TransitionPhase::Visible(VisibleStage::Holding);
                    }

                    match fired {
                        Some(leftover) => {
                            self.delay_timer = None;
                            budget = leftover;
                            fade_budget = leftover;
                            self.destroy(false, out);
                        }
                        None => break,
                    }
                }
                TransitionPhase::FadingOut => {
                    let left = self.fade_out_ms.saturating_sub(self.phase_elapsed_ms);
                    if budget < left {
                        self.phase_elapsed_ms += budget;
                        break;
                    }
                    budget -= left;
                    self.remove_surface(out);
                }
                TransitionPhase::Idle | TransitionPhase::Destroyed => break,
            }
        }

        if self.audio_fade.is_some() {
            let dt = if fading_before { dt_ms } else { fade_budget };
            self.tick_audio_fade(dt, out);
        }
    }

    fn finish_fade_in(&mut self, out: &mut Vec<Command>) {
        self.phase = TransitionPhase::Visible(VisibleStage::ContentFadingIn);
        self.phase_elapsed_ms = 0;

        self.activate_scene(out);

        out.push(Command::ShowContent { instance: self.id });

        if !self.preview {
            self.set_delay();
        }
    }

    fn activate_scene(&self, out: &mut Vec<Command>) {
        if !self.activates_scene {
            return;
        }
        if let Some(scene_id) = &self.config.scene_id {
            out.push(Command::ActivateScene {
                scene_id: scene_id.clone(),
            });
        }
    }

    fn remove_surface(&mut self, out: &mut Vec<Command>) {
        out.push(Command::RemoveOverlay { instance: self.id });
        self.has_surface = false;
        self.dismiss_bound = false;
        self.phase = TransitionPhase::Destroyed;
    }

    fn tick_audio_fade(&mut self, dt_ms: u64, out: &mut Vec<Command>) {
        let Some((playback, fade)) = self.audio_fade.as_mut() else {
            return;
        };
        let playback = *playback;

        for tick in fade.advance(dt_ms) {
            match tick {
                FadeTick::Volume(volume) => {
                    self.audio_volume = volume;
                    out.push(Command::SetAudioVolume { playback, volume });
                }
                FadeTick::Stop => out.push(Command::StopAudio { playback }),
            }
        }

        if fade.is_finished() {
            self.audio_fade = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Viewer {
        Viewer::player("p1")
    }

    fn gm() -> Viewer {
        Viewer::privileged("gm")
    }

    fn instance(config: TransitionConfig) -> TransitionInstance {
        TransitionInstance::new(1, config, false, FadeProfile::HANDLE)
    }

    fn count(out: &[Command], pred: impl Fn(&Command) -> bool) -> usize {
        out.iter().filter(|c| pred(c)).count()
    }

    #[test]
    fn test_render_emits_overlay_and_fade_in() {
        let mut inst = instance(TransitionConfig::default());
        let mut out = Vec::new();
        inst.render(&player(), &mut out);

        assert_eq!(inst.phase(), TransitionPhase::FadingIn);
        assert!(matches!(
            &out[0],
            Command::ShowOverlay { surface, .. } if surface.layer == OverlayLayer::AboveUi
        ));
        assert!(out.contains(&Command::FadeOverlay {
            instance: 1,
            fade: OverlayFade::In,
            duration_ms: 400,
        }));
        assert!(out.contains(&Command::BindDismiss { instance: 1 }));
        assert!(inst.is_dismiss_bound());
    }

    #[test]
    fn test_privileged_layer_is_below_ui() {
        let mut inst = instance(TransitionConfig::default());
        let mut out = Vec::new();
        inst.render(&gm(), &mut out);
        assert!(matches!(
            &out[0],
            Command::ShowOverlay { surface, .. } if surface.layer == OverlayLayer::BelowUi
        ));
    }

    #[test]
    fn test_show_ui_layer_is_below_ui() {
        let mut inst = instance(TransitionConfig {
            show_ui: true,
            ..TransitionConfig::default()
        });
        let mut out = Vec::new();
        inst.render(&player(), &mut out);
        assert!(matches!(
            &out[0],
            Command::ShowOverlay { surface, .. } if surface.layer == OverlayLayer::BelowUi
        ));
    }

    #[test]
    fn test_remote_render_hidden_for_privileged() {
        let mut inst = instance(TransitionConfig {
            from_socket: true,
            ..TransitionConfig::default()
        });
        let mut out = Vec::new();
        inst.render(&gm(), &mut out);

        assert!(out.is_empty());
        assert_eq!(inst.phase(), TransitionPhase::Idle);
        assert!(inst.is_skipped());
    }

    #[test]
    fn test_remote_render_shown_when_gm_hide_off() {
        let mut inst = instance(TransitionConfig {
            from_socket: true,
            gm_hide: false,
            ..TransitionConfig::default()
        });
        let mut out = Vec::new();
        inst.render(&gm(), &mut out);
        assert_eq!(inst.phase(), TransitionPhase::FadingIn);
    }

    #[test]
    fn test_fade_in_completion_activates_scene_for_privileged() {
        let mut inst = instance(TransitionConfig {
            scene_id: Some("s1".to_string()),
            ..TransitionConfig::default()
        });
        let mut out = Vec::new();
        inst.render(&gm(), &mut out);
        out.clear();

        inst.advance(399, &mut out);
        assert!(out.is_empty());

        inst.advance(1, &mut out);
        assert_eq!(
            out,
            vec![
                Command::ActivateScene {
                    scene_id: "s1".to_string()
                },
                Command::ShowContent { instance: 1 },
            ]
        );
        assert_eq!(
            inst.phase(),
            TransitionPhase::Visible(VisibleStage::ContentFadingIn)
        );
        assert_eq!(inst.delay_remaining_ms(), Some(4000));
    }

    #[test]
    fn test_click_during_fade_in_still_activates_scene() {
        let mut inst = instance(TransitionConfig {
            scene_id: Some("s1".to_string()),
            ..TransitionConfig::default()
        });
        let mut out = Vec::new();
        inst.render(&gm(), &mut out);
        inst.advance(100, &mut out);
        out.clear();

        assert!(inst.click(&gm(), &mut out));
        inst.advance(10_000, &mut out);

        let activations: Vec<_> = out
            .iter()
            .filter(|c| matches!(c, Command::ActivateScene { .. }))
            .collect();
        assert_eq!(
            activations,
            vec![&Command::ActivateScene {
                scene_id: "s1".to_string()
            }]
        );
        assert_eq!(
            count(&out, |c| matches!(c, Command::ShowContent { .. })),
            0
        );
        assert_eq!(inst.delay_remaining_ms(), None);
        assert_eq!(inst.phase(), TransitionPhase::Destroyed);
    }

    #[test]
    fn test_player_destroy_during_fade_in_does_not_activate() {
        let mut inst = instance(TransitionConfig {
            scene_id: Some("s1".to_string()),
            ..TransitionConfig::default()
        });
        let mut out = Vec::new();
        inst.render(&player(), &mut out);
        inst.destroy(true, &mut out);
        assert_eq!(
            count(&out, |c| matches!(c, Command::ActivateScene { .. })),
            0
        );
    }

    #[test]
    fn test_player_never_activates_scene() {
        let mut inst = instance(TransitionConfig {
            scene_id: Some("s1".to_string()),
            fade_in: 0,
            ..TransitionConfig::default()
        });
        let mut out = Vec::new();
        inst.render(&player(), &mut out);
        assert_eq!(
            count(&out, |c| matches!(c, Command::ActivateScene { .. })),
            0
        );
        assert!(out.contains(&Command::ShowContent { instance: 1 }));
    }

    #[test]
    fn test_preview_skips_delay_scene_and_dismiss() {
        let mut inst = TransitionInstance::new(
            1,
            TransitionConfig {
                scene_id: Some("s1".to_string()),
                fade_in: 0,
                ..TransitionConfig::default()
            },
            true,
            FadeProfile::HANDLE,
        );
        let mut out = Vec::new();
        inst.render(&gm(), &mut out);

        assert!(!inst.is_dismiss_bound());
        assert_eq!(inst.delay_remaining_ms(), None);
        assert_eq!(
            count(&out, |c| matches!(c, Command::ActivateScene { .. })),
            0
        );

        inst.advance(60_000, &mut out);
        assert_eq!(
            inst.phase(),
            TransitionPhase::Visible(VisibleStage::Holding)
        );
    }

    #[test]
    fn test_dismiss_binding_for_gm_end_all() {
        let config = TransitionConfig {
            skippable: false,
            ..TransitionConfig::default()
        };

        let mut as_player = instance(config.clone());
        as_player.render(&player(), &mut Vec::new());
        assert!(!as_player.is_dismiss_bound());

        let mut as_gm = instance(config);
        as_gm.render(&gm(), &mut Vec::new());
        assert!(as_gm.is_dismiss_bound());
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut inst = instance(TransitionConfig::default());
        let mut out = Vec::new();
        inst.render(&player(), &mut out);
        out.clear();

        assert!(inst.destroy(false, &mut out));
        let first = out.clone();
        assert!(!inst.destroy(false, &mut out));
        assert!(!inst.destroy(true, &mut out));
        assert_eq!(out, first);
        assert_eq!(
            count(&out, |c| matches!(c, Command::FadeOverlay { .. })),
            1
        );
    }

    #[test]
    fn test_set_delay_then_destroy_cancels_timer() {
        let mut inst = instance(TransitionConfig {
            fade_in: 0,
            delay: 1000,
            fade_out: 0,
            ..TransitionConfig::default()
        });
        let mut out = Vec::new();
        inst.render(&player(), &mut out);
        inst.set_delay();
        assert_eq!(inst.delay_remaining_ms(), Some(1000));

        inst.advance(500, &mut out);
        out.clear();
        inst.destroy(false, &mut out);
        assert_eq!(inst.delay_remaining_ms(), None);
        assert_eq!(
            count(&out, |c| matches!(c, Command::RemoveOverlay { .. })),
            1
        );

        out.clear();
        inst.advance(5000, &mut out);
        assert!(out.is_empty());
        assert_eq!(inst.phase(), TransitionPhase::Destroyed);
    }

    #[test]
    fn test_destroy_before_render_goes_straight_to_destroyed() {
        let mut inst = instance(TransitionConfig::default());
        let mut out = Vec::new();
        assert!(inst.destroy(false, &mut out));
        assert!(out.is_empty());
        assert_eq!(inst.phase(), TransitionPhase::Destroyed);
        assert!(inst.is_finished());

        inst.render(&player(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_click_by_privileged_broadcasts_end() {
        let mut inst = instance(TransitionConfig::default());
        let mut out = Vec::new();
        inst.render(&gm(), &mut out);
        out.clear();

        assert!(inst.click(&gm(), &mut out));
        assert_eq!(
            out[0],
            Command::Broadcast {
                message: ChannelMessage::end()
            }
        );
        assert!(inst.is_destroying());

        out.clear();
        assert!(!inst.click(&gm(), &mut out));
        assert!(out.is_empty());
    }

    #[test]
    fn test_click_by_player_does_not_broadcast() {
        let mut inst = instance(TransitionConfig::default());
        let mut out = Vec::new();
        inst.render(&player(), &mut out);
        out.clear();

        assert!(inst.click(&player(), &mut out));
        assert_eq!(
            count(&out, |c| matches!(c, Command::Broadcast { .. })),
            0
        );
    }

    #[test]
    fn test_click_ignored_without_binding() {
        let mut inst = instance(TransitionConfig {
            skippable: false,
            ..TransitionConfig::default()
        });
        let mut out = Vec::new();
        inst.render(&player(), &mut out);
        out.clear();

        assert!(!inst.click(&player(), &mut out));
        assert!(!inst.is_destroying());
    }

    #[test]
    fn test_audio_handle_installed_then_faded() {
        let mut inst = instance(TransitionConfig {
            audio: Some("x.ogg".to_string()),
            volume: 1.0,
            fade_out: 100,
            ..TransitionConfig::default()
        });
        let mut out = Vec::new();
        inst.render(&player(), &mut out);
        assert!(out.contains(&Command::PlayAudio {
            playback: 1,
            src: "x.ogg".to_string(),
            volume: 1.0,
        }));

        inst.on_playback_started(&mut out);
        assert_eq!(inst.playback(), PlaybackSlot::Playing(1));

        out.clear();
        inst.destroy(false, &mut out);
        assert!(inst.is_audio_fading());
        assert!(out.contains(&Command::SetAudioVolume {
            playback: 1,
            volume: 0.5,
        }));

        out.clear();
        inst.advance(50, &mut out);
        assert!(out.contains(&Command::StopAudio { playback: 1 }));
        assert!(!inst.is_audio_fading());
    }

    #[test]
    fn test_instant_destroy_stops_audio_without_steps() {
        let mut inst = instance(TransitionConfig {
            audio: Some("x.ogg".to_string()),
            volume: 1.0,
            ..TransitionConfig::default()
        });
        let mut out = Vec::new();
        inst.render(&player(), &mut out);
        inst.on_playback_started(&mut out);

        out.clear();
        inst.destroy(true, &mut out);
        assert_eq!(
            count(&out, |c| matches!(c, Command::SetAudioVolume { .. })),
            0
        );
        assert!(out.contains(&Command::StopAudio { playback: 1 }));
        assert!(out.contains(&Command::RemoveOverlay { instance: 1 }));
        assert!(inst.is_finished());
    }

    #[test]
    fn test_late_playback_start_after_destroy_is_stopped() {
        let mut inst = instance(TransitionConfig {
            audio: Some("x.ogg".to_string()),
            ..TransitionConfig::default()
        });
        let mut out = Vec::new();
        inst.render(&player(), &mut out);
        inst.destroy(true, &mut out);
        assert_eq!(
            inst.playback(),
            PlaybackSlot::Pending {
                playback: 1,
                cancelled: true
            }
        );

        out.clear();
        inst.on_playback_started(&mut out);
        assert_eq!(out, vec![Command::StopAudio { playback: 1 }]);
        assert_eq!(inst.playback(), PlaybackSlot::Empty);
    }

    #[test]
    fn test_update_data_merges_without_render() {
        let mut inst = instance(TransitionConfig::default());
        let patch = TransitionPatch {
            content: Some("新内容".to_string()),
            ..TransitionPatch::default()
        };
        let delay = inst.update_data(&patch).config().delay;
        assert_eq!(delay, 4000);
        assert_eq!(inst.config().content, "新内容");
        assert_eq!(inst.phase(), TransitionPhase::Idle);
    }

    #[test]
    fn test_split_updates_match_single_update() {
        let config = TransitionConfig {
            delay: 1000,
            fade_out: 200,
            ..TransitionConfig::default()
        };

        let mut whole = instance(config.clone());
        let mut out_whole = Vec::new();
        whole.render(&player(), &mut out_whole);
        whole.advance(2000, &mut out_whole);

        let mut split = instance(config);
        let mut out_split = Vec::new();
        split.render(&player(), &mut out_split);
        for _ in 0..125 {
            split.advance(16, &mut out_split);
        }

        assert_eq!(out_whole, out_split);
        assert_eq!(whole.phase(), TransitionPhase::Destroyed);
    }
}
