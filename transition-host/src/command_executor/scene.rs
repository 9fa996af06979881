//! # 场景相关命令执行
//!
//! 处理 ActivateScene、PreloadScene 命令。

use tracing::warn;

use super::CommandExecutor;
use super::types::ExecuteResult;
use crate::world::WorldData;

impl CommandExecutor {
    /// 执行 ActivateScene
    pub(super) fn execute_activate_scene(
        &mut self,
        scene_id: &str,
        world: &mut WorldData,
    ) -> ExecuteResult {
        match world.activate(scene_id) {
            Ok(()) => ExecuteResult::Ok,
            Err(e) => {
                warn!(scene = %scene_id, error = %e, "无法激活场景");
                ExecuteResult::Error(e.to_string())
            }
        }
    }

    /// 执行 PreloadScene
    pub(super) fn execute_preload_scene(
        &mut self,
        scene_id: &str,
        world: &mut WorldData,
    ) -> ExecuteResult {
        match world.preload(scene_id) {
            Ok(()) => ExecuteResult::Ok,
            Err(e) => {
                warn!(scene = %scene_id, error = %e, "无法预加载场景");
                ExecuteResult::Error(e.to_string())
            }
        }
    }
}
