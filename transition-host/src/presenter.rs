//! # Presenter 模块
//!
//! 遮罩的呈现层。
//!
//! [`Presenter`] 是执行器驱动的呈现接口；[`HeadlessPresenter`] 不绘制，
//! 只维护每个遮罩的可见状态，供 CLI 输出和测试断言使用。

use std::collections::BTreeMap;
use tracing::{debug, warn};
use transition_runtime::{InstanceId, OverlayFade, OverlayLayer, OverlaySurface};

/// 遮罩呈现接口
pub trait Presenter {
    fn show_overlay(&mut self, instance: InstanceId, surface: &OverlaySurface);
    fn fade_overlay(&mut self, instance: InstanceId, fade: OverlayFade, duration_ms: u64);
    fn show_content(&mut self, instance: InstanceId);
    fn bind_dismiss(&mut self, instance: InstanceId);
    fn remove_overlay(&mut self, instance: InstanceId);
}

/// 单个遮罩的可见状态
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayView {
    pub surface: OverlaySurface,
    /// 当前不透明度目标（0 或 1）
    pub opacity: f32,
    /// 最近一次淡入淡出
    pub last_fade: Option<(OverlayFade, u64)>,
    pub content_visible: bool,
    pub dismiss_bound: bool,
}

/// 无界面呈现
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    overlays: BTreeMap<InstanceId, OverlayView>,
    removed: usize,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlay(&self, instance: InstanceId) -> Option<&OverlayView> {
        self.overlays.get(&instance)
    }

    /// 当前挂载的遮罩数
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// 累计移除的遮罩数
    pub fn removed_count(&self) -> usize {
        self.removed
    }

    /// 最上层可点击关闭的遮罩
    ///
    /// 层级高者在上，同层级后插入者在上。
    pub fn topmost_dismissable(&self) -> Option<InstanceId> {
        self.overlays
            .iter()
            .filter(|(_, view)| view.dismiss_bound)
            .max_by_key(|(id, view)| (view.surface.layer.z_index(), **id))
            .map(|(id, _)| *id)
    }

    fn view_mut(&mut self, instance: InstanceId, op: &str) -> Option<&mut OverlayView> {
        let view = self.overlays.get_mut(&instance);
        if view.is_none() {
            warn!(instance, op, "遮罩不存在");
        }
        view
    }
}

impl Presenter for HeadlessPresenter {
    fn show_overlay(&mut self, instance: InstanceId, surface: &OverlaySurface) {
        debug!(
            instance,
            above_ui = surface.layer == OverlayLayer::AboveUi,
            "插入遮罩"
        );
        self.overlays.insert(
            instance,
            OverlayView {
                surface: surface.clone(),
                opacity: 0.0,
                last_fade: None,
                content_visible: false,
                dismiss_bound: false,
            },
        );
    }

    fn fade_overlay(&mut self, instance: InstanceId, fade: OverlayFade, duration_ms: u64) {
        if let Some(view) = self.view_mut(instance, "fade") {
            view.opacity = match fade {
                OverlayFade::In => 1.0,
                OverlayFade::Out => 0.0,
            };
            view.last_fade = Some((fade, duration_ms));
            debug!(instance, ?fade, duration_ms, "遮罩淡入淡出");
        }
    }

    fn show_content(&mut self, instance: InstanceId) {
        if let Some(view) = self.view_mut(instance, "show_content") {
            view.content_visible = true;
        }
    }

    fn bind_dismiss(&mut self, instance: InstanceId) {
        if let Some(view) = self.view_mut(instance, "bind_dismiss") {
            view.dismiss_bound = true;
        }
    }

    fn remove_overlay(&mut self, instance: InstanceId) {
        if self.overlays.remove(&instance).is_some() {
            self.removed += 1;
            debug!(instance, "移除遮罩");
        }
    }
}
