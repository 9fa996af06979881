//! Transition Host - 无界面会话模拟
//!
//! 在进程内模拟一个 GM 和若干玩家，执行一次过渡操作后按帧推进，
//! 最后输出每个客户端的状态。

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{info, warn};
use transition_host::{Client, HostConfig, SessionBus, WorldData, probe_player};
use transition_runtime::{TransitionConfig, TransitionPatch, Viewer};

#[derive(Parser, Debug)]
#[command(name = "transition-host", about = "场景过渡遮罩的无界面会话模拟")]
struct Cli {
    /// 配置文件
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// 世界数据文件（覆盖配置）
    #[arg(long)]
    world: Option<PathBuf>,

    /// 玩家数（覆盖配置）
    #[arg(long)]
    players: Option<usize>,

    /// 模拟时长（毫秒）
    #[arg(long, default_value_t = 8000)]
    run_ms: u64,

    /// 在该时刻点击所有可关闭的遮罩（毫秒）
    #[arg(long)]
    click_at: Option<u64>,

    /// 输出 debug 日志
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// 播放场景上保存的过渡
    Play { scene: String },
    /// 用日志条目播放过渡
    Journal { id: String },
    /// 宏调用：广播给所有人
    Macro {
        /// 过渡配置（JSON）
        #[arg(long, default_value = "{}")]
        options: String,
        /// 本地也显示
        #[arg(long)]
        show_me: bool,
    },
    /// 预览场景过渡
    Preview { scene: String },
    /// 保存过渡到场景
    Save {
        scene: String,
        /// 过渡配置（JSON）
        #[arg(long, default_value = "{}")]
        options: String,
    },
    /// 删除场景上的过渡
    Delete { scene: String },
    /// 列出场景菜单
    Menu { scene: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = tracing::subscriber::with_default(tracing_subscriber::fmt().finish(), || {
        HostConfig::load(&cli.config)
    });
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        config.log_level()
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    run(cli, config)
}

fn run(cli: Cli, mut config: HostConfig) -> anyhow::Result<()> {
    if let Some(world) = cli.world {
        config.world_path = world;
    }
    if let Some(players) = cli.players {
        config.session.players = players;
    }
    config.validate()?;

    let world = match WorldData::load(&config.world_path) {
        Ok(world) => world,
        Err(e) => {
            warn!(error = %e, "世界数据不可用，使用空世界");
            WorldData::default()
        }
    };
    let world = Rc::new(RefCell::new(world));
    let bus = SessionBus::new();

    let mut gm = Client::new(
        Viewer {
            user_id: config.user_id.clone(),
            privileged: config.privileged,
        },
        probe_player(&config.audio),
        bus.connect(),
        Rc::clone(&world),
    );
    let mut players: Vec<Client> = (1..=config.session.players)
        .map(|i| {
            Client::new(
                Viewer::player(format!("player{i}")),
                probe_player(&config.audio),
                bus.connect(),
                Rc::clone(&world),
            )
        })
        .collect();

    match cli.action {
        Action::Play { scene } => {
            gm.play_scene(&scene)?;
        }
        Action::Journal { id } => {
            gm.play_journal(&id)?;
        }
        Action::Macro { options, show_me } => {
            let patch: TransitionPatch =
                serde_json::from_str(&options).context("无法解析 --options")?;
            gm.trigger_macro(patch, show_me);
        }
        Action::Preview { scene } => {
            gm.preview(&scene)?;
        }
        Action::Save { scene, options } => {
            let patch: TransitionPatch =
                serde_json::from_str(&options).context("无法解析 --options")?;
            gm.save_transition(&scene, &TransitionConfig::from_patch(&patch))?;
            world.borrow().save(&config.world_path)?;
            info!(scene = %scene, "过渡已保存");
            return Ok(());
        }
        Action::Delete { scene } => {
            gm.delete_transition(&scene)?;
            world.borrow().save(&config.world_path)?;
            info!(scene = %scene, "过渡已删除");
            return Ok(());
        }
        Action::Menu { scene } => {
            for action in gm.scene_menu(&scene) {
                println!("{}", action.label());
            }
            return Ok(());
        }
    }

    let frame_ms = config.session.frame_ms;
    let mut elapsed = 0;
    while elapsed < cli.run_ms {
        if cli
            .click_at
            .is_some_and(|at| at >= elapsed && at < elapsed + frame_ms)
        {
            info!(at = elapsed, "点击遮罩");
            gm.click();
            for player in &mut players {
                player.click();
            }
        }

        gm.pump(frame_ms);
        for player in &mut players {
            player.pump(frame_ms);
        }
        elapsed += frame_ms;
    }

    for client in std::iter::once(&gm).chain(players.iter()) {
        let stats = client.executor_stats();
        info!(
            user = %client.viewer().user_id,
            overlays = client.presenter().overlay_count(),
            removed = client.presenter().removed_count(),
            live = client.controller().live_instances(),
            executed = stats.executed,
            failed = stats.failed,
            "模拟结束"
        );
    }
    if let Some(scene) = world.borrow().active_scene() {
        info!(scene = %scene, "当前场景");
    }

    Ok(())
}
