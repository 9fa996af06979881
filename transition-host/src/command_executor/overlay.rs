//! # 遮罩相关命令执行

use transition_runtime::{InstanceId, OverlayFade, OverlaySurface};

use super::CommandExecutor;
use super::types::ExecuteResult;
use crate::presenter::Presenter;

impl CommandExecutor {
    pub(super) fn execute_show_overlay(
        &mut self,
        instance: InstanceId,
        surface: &OverlaySurface,
        presenter: &mut dyn Presenter,
    ) -> ExecuteResult {
        presenter.show_overlay(instance, surface);
        ExecuteResult::Ok
    }

    pub(super) fn execute_fade_overlay(
        &mut self,
        instance: InstanceId,
        fade: OverlayFade,
        duration_ms: u64,
        presenter: &mut dyn Presenter,
    ) -> ExecuteResult {
        presenter.fade_overlay(instance, fade, duration_ms);
        ExecuteResult::Ok
    }
}
