//! 多客户端会话集成测试
//!
//! GM 与玩家共享同一个 SessionBus 和世界数据，按 100ms 一帧推进。

use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use transition_host::{
    AudioPlayer, Client, HandlePlayer, LegacyPlayer, SessionBus, SilentDevice, WorldData,
};
use transition_runtime::{OverlayLayer, TransitionPatch, Viewer};

const FRAME_MS: u64 = 100;

fn handle_player() -> Box<dyn AudioPlayer> {
    Box::new(HandlePlayer::new(Box::new(SilentDevice::new("assets")), false))
}

fn legacy_player() -> Box<dyn AudioPlayer> {
    Box::new(LegacyPlayer::new(Box::new(SilentDevice::new("assets")), false))
}

fn world() -> Rc<RefCell<WorldData>> {
    let world: WorldData = serde_json::from_value(json!({
        "scenes": [
            { "id": "s1", "name": "Night", "flags": { "transition": { "options": {
                "sceneID": "s1",
                "content": "<h2>Night falls</h2>",
                "delay": 1000,
                "fadeOut": 500,
                "audio": "rain.ogg",
                "volume": 1.0
            } } } },
            { "id": "s2", "name": "Empty" }
        ],
        "journals": [
            { "id": "j1", "pages": [
                { "type": "text", "content": "<p>Chapter one</p>" },
                { "type": "image", "src": "art/cover.webp" }
            ] }
        ]
    }))
    .unwrap();
    Rc::new(RefCell::new(world))
}

struct Session {
    bus: SessionBus,
    world: Rc<RefCell<WorldData>>,
    gm: Client,
    players: Vec<Client>,
}

impl Session {
    fn new(players: usize, audio: fn() -> Box<dyn AudioPlayer>) -> Self {
        let bus = SessionBus::new();
        let world = world();
        let gm = Client::new(
            Viewer::privileged("gm"),
            audio(),
            bus.connect(),
            Rc::clone(&world),
        );
        let players = (1..=players)
            .map(|i| {
                Client::new(
                    Viewer::player(format!("player{i}")),
                    audio(),
                    bus.connect(),
                    Rc::clone(&world),
                )
            })
            .collect();
        Self {
            bus,
            world,
            gm,
            players,
        }
    }

    fn run(&mut self, ms: u64) {
        for _ in 0..ms / FRAME_MS {
            self.gm.pump(FRAME_MS);
            for player in &mut self.players {
                player.pump(FRAME_MS);
            }
        }
    }
}

fn patch(value: serde_json::Value) -> TransitionPatch {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_scene_transition_reaches_everyone_and_ends_on_time() {
    let mut session = Session::new(2, handle_player);
    let gm_id = session.gm.play_scene("s1").unwrap();

    session.run(1000);
    assert_eq!(session.world.borrow().active_scene(), Some("s1"));
    assert_eq!(session.world.borrow().preloaded(), &["s1".to_string()]);

    let gm_view = session.gm.presenter().overlay(gm_id).unwrap();
    assert_eq!(gm_view.surface.layer, OverlayLayer::BelowUi);
    assert!(gm_view.content_visible);
    assert!(session.gm.audio().is_playing(gm_id));

    for player in &session.players {
        let id = player.controller().active_id().unwrap();
        let view = player.presenter().overlay(id).unwrap();
        assert_eq!(view.surface.layer, OverlayLayer::AboveUi);
        assert_eq!(view.surface.content.markup, "<h2>Night falls</h2>");
        assert!(player.audio().is_playing(id));
    }

    // 400 淡入 + 1000 停留 + 500 淡出
    session.run(1000);
    assert_eq!(session.gm.presenter().overlay_count(), 0);
    assert!(!session.gm.audio().is_playing(gm_id));
    for player in &session.players {
        assert_eq!(player.presenter().overlay_count(), 0);
        assert_eq!(player.presenter().removed_count(), 1);
    }
}

#[test]
fn test_gm_click_during_fade_in_still_activates_scene() {
    let mut session = Session::new(1, handle_player);
    session.gm.play_scene("s1").unwrap();

    session.run(100);
    assert_eq!(session.world.borrow().active_scene(), None);
    assert!(session.gm.click());

    session.run(1000);
    assert_eq!(session.world.borrow().active_scene(), Some("s1"));
    assert_eq!(session.gm.presenter().overlay_count(), 0);
    assert_eq!(session.players[0].presenter().overlay_count(), 0);
}

#[test]
fn test_users_filter_limits_recipients() {
    let mut session = Session::new(3, handle_player);
    let local = session.gm.trigger_macro(
        patch(json!({ "content": "psst", "users": ["player2"], "gmEndAll": false })),
        false,
    );
    assert_eq!(local, None);

    session.run(500);
    let visible: Vec<usize> = session
        .players
        .iter()
        .map(|p| p.presenter().overlay_count())
        .collect();
    assert_eq!(visible, vec![0, 1, 0]);
    assert_eq!(session.gm.presenter().overlay_count(), 0);
}

#[test]
fn test_gm_click_ends_everyone() {
    let mut session = Session::new(2, handle_player);
    let local = session
        .gm
        .trigger_macro(patch(json!({ "delay": 60000, "gmEndAll": true })), false);
    assert!(local.is_some(), "显式开启 gmEndAll 时 GM 本地也显示");

    session.run(500);
    assert!(session.players.iter().all(|p| p.presenter().overlay_count() == 1));

    assert!(session.gm.click());
    // 结束信号下一帧送达，淡出 1000ms
    session.run(1200);
    assert_eq!(session.gm.presenter().overlay_count(), 0);
    for player in &session.players {
        assert_eq!(player.presenter().overlay_count(), 0);
    }
}

#[test]
fn test_player_click_only_dismisses_own() {
    let mut session = Session::new(2, handle_player);
    session
        .gm
        .trigger_macro(patch(json!({ "delay": 60000, "fadeOut": 0 })), false);
    session.run(500);

    assert!(session.players[0].click());
    session.run(100);
    assert_eq!(session.players[0].presenter().overlay_count(), 0);
    assert_eq!(session.players[1].presenter().overlay_count(), 1);
    assert_eq!(session.gm.presenter().overlay_count(), 0);
}

#[test]
fn test_gm_hide_skips_other_privileged_viewers() {
    let mut session = Session::new(1, handle_player);
    let mut co_gm = Client::new(
        Viewer::privileged("assistant"),
        handle_player(),
        session.bus.connect(),
        Rc::clone(&session.world),
    );

    session
        .gm
        .trigger_macro(patch(json!({ "gmHide": true, "gmEndAll": false })), false);
    session.run(500);
    co_gm.pump(FRAME_MS);

    assert_eq!(co_gm.presenter().overlay_count(), 0);
    assert!(co_gm.controller().active().is_some_and(|inst| inst.is_skipped()));
    assert_eq!(session.players[0].presenter().overlay_count(), 1);
}

#[test]
fn test_legacy_audio_fades_in_tenths() {
    let mut session = Session::new(1, legacy_player);
    session.gm.play_scene("s1").unwrap();

    // 停留结束于 1400ms，之后每 100ms 降 0.2
    session.run(1500);
    let player = &session.players[0];
    let id = player.controller().active_id().unwrap();
    let volume = player.audio().volume(id).unwrap();
    assert!(volume > 0.0 && volume < 1.0, "volume = {volume}");
    assert_eq!((volume * 10.0).round() / 10.0, volume);

    session.run(600);
    assert!(!session.players[0].audio().is_playing(id));
}

#[test]
fn test_locked_audio_does_not_block_overlay() {
    let mut session = Session::new(1, handle_player);
    session.players[0].audio_mut().set_locked(true);

    session.gm.play_scene("s1").unwrap();
    session.run(1000);
    let player = &session.players[0];
    assert_eq!(player.presenter().overlay_count(), 1);
    assert_eq!(player.executor_stats().failed, 1);

    session.run(1000);
    assert_eq!(session.players[0].presenter().overlay_count(), 0);
}

#[test]
fn test_destroy_before_playback_starts_stops_audio() {
    let mut session = Session::new(0, handle_player);
    let id = session.gm.play_scene("s1").unwrap();
    assert!(!session.gm.audio().is_playing(id));

    session.gm.destroy_active(true);
    assert_eq!(session.gm.presenter().overlay_count(), 0);

    session.run(FRAME_MS);
    assert!(!session.gm.audio().is_playing(id));
    assert_eq!(session.gm.audio().volume(id), None);
}

#[test]
fn test_journal_transition() {
    let mut session = Session::new(1, handle_player);
    session.gm.play_journal("j1").unwrap();
    session.run(100);

    let player = &session.players[0];
    let id = player.controller().active_id().unwrap();
    let surface = &player.presenter().overlay(id).unwrap().surface;
    assert_eq!(surface.content.markup, "<p>Chapter one</p>");
    assert_eq!(surface.background.image, "art/cover.webp");

    assert!(session.gm.play_journal("missing").is_err());
}

#[test]
fn test_preview_is_local_and_stays() {
    let mut session = Session::new(1, handle_player);
    let id = session.gm.preview("s2").unwrap();
    session.run(6000);

    let view = session.gm.presenter().overlay(id).unwrap();
    assert!(view.content_visible);
    assert!(!view.dismiss_bound);
    assert_eq!(session.players[0].presenter().overlay_count(), 0);

    session.gm.destroy_active(false);
    session.run(1000);
    assert_eq!(session.gm.presenter().overlay_count(), 0);
}

#[test]
fn test_malformed_messages_are_ignored() {
    let mut session = Session::new(1, handle_player);
    let mut raw = session.bus.connect();
    raw.send_value(json!(42));
    raw.send_value(json!({ "action": "rewind" }));
    raw.send_value(json!({ "action": 7 }));
    raw.send_value(json!({ "content": "ok", "mystery": true }));

    session.run(500);
    assert_eq!(session.players[0].presenter().overlay_count(), 1);
    assert_eq!(session.gm.presenter().overlay_count(), 1);
    assert_eq!(session.bus.delivered(), 8);
}

#[test]
fn test_menu_and_saved_transition() {
    let mut session = Session::new(1, handle_player);
    assert!(!session.gm.scene_menu("s1").is_empty());
    assert!(session.players[0].scene_menu("s1").is_empty());

    let config = transition_runtime::TransitionConfig::from_patch(&patch(json!({
        "content": "Dawn",
        "delay": 500
    })));
    session.gm.save_transition("s2", &config).unwrap();
    session.gm.play_scene("s2").unwrap();
    session.run(200);
    let player = &session.players[0];
    let id = player.controller().active_id().unwrap();
    assert_eq!(player.presenter().overlay(id).unwrap().surface.content.markup, "Dawn");

    session.gm.delete_transition("s2").unwrap();
    assert!(session.gm.play_scene("s2").is_err());
}
