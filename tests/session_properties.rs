//! Whole-session properties driven through the public engine API.

use liminal_core::affect::fear_from_sanity;
use liminal_core::assets::{load_area_assets, StaticAssetSource};
use liminal_core::config::SimConfig;
use liminal_core::constants::{AFFECT_MAX, TICK_MS};
use liminal_core::engine::GameEngine;
use liminal_core::rng::derive_seed;
use liminal_core::types::{GenerationMode, InputFrame};
use liminal_core::world::{generate_area, AreaRequest, GridSize};
use proptest::prelude::*;

#[derive(Clone, Copy, Debug)]
struct Step {
    move_x: f32,
    move_z: f32,
    look_yaw: f32,
    interact: bool,
    quick_use: bool,
}

impl Step {
    fn input(self) -> InputFrame {
        InputFrame {
            move_x: self.move_x,
            move_z: self.move_z,
            look_yaw: self.look_yaw,
            interact: self.interact,
            quick_use: self.quick_use,
            ..InputFrame::default()
        }
    }
}

fn step_strategy() -> impl Strategy<Value = Step> {
    (
        -1.0f32..=1.0,
        -1.0f32..=1.0,
        -0.3f32..=0.3,
        prop::bool::weighted(0.2),
        prop::bool::weighted(0.02),
    )
        .prop_map(|(move_x, move_z, look_yaw, interact, quick_use)| Step {
            move_x,
            move_z,
            look_yaw,
            interact,
            quick_use,
        })
}

fn small_config() -> SimConfig {
    SimConfig::from_toml_str(
        r#"
        [surface.size]
        width = 24
        height = 24

        [pocket.size]
        width = 20
        height = 20
        "#,
    )
    .expect("valid config")
}

fn ready(engine: &mut GameEngine) {
    if engine.is_loading() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        let loaded = runtime.block_on(load_area_assets(
            &StaticAssetSource::all(),
            &engine.asset_manifest(),
        ));
        engine.complete_area_load(&loaded);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn same_seed_and_inputs_give_identical_snapshots(
        seed in any::<u32>(),
        steps in prop::collection::vec(step_strategy(), 1..150),
    ) {
        let mut a = GameEngine::new(small_config(), Some(seed)).expect("valid");
        let mut b = GameEngine::new(small_config(), Some(seed)).expect("valid");

        for step in steps {
            ready(&mut a);
            ready(&mut b);
            a.step(TICK_MS, &step.input());
            b.step(TICK_MS, &step.input());
            let sa = serde_json::to_string(&a.build_snapshot(true)).expect("serializes");
            let sb = serde_json::to_string(&b.build_snapshot(true)).expect("serializes");
            prop_assert_eq!(sa, sb);
        }
    }

    #[test]
    fn affect_stays_in_range_and_fear_tracks_sanity(
        seed in any::<u32>(),
        steps in prop::collection::vec(step_strategy(), 1..150),
    ) {
        let mut engine = GameEngine::new(small_config(), Some(seed)).expect("valid");
        for step in steps {
            ready(&mut engine);
            engine.step(TICK_MS, &step.input());
            let snapshot = engine.build_snapshot(true);
            prop_assert!((0.0..=AFFECT_MAX).contains(&snapshot.hud.health));
            prop_assert!((0.0..=AFFECT_MAX).contains(&snapshot.hud.sanity));
            prop_assert!((snapshot.render.fear - fear_from_sanity(snapshot.hud.sanity)).abs() < 1e-5);
            prop_assert!((0.0..=1.0).contains(&snapshot.render.glitch));
            if engine.is_ended() {
                prop_assert!(snapshot.terminal.is_some());
                break;
            }
        }
    }

    #[test]
    fn surfaces_and_their_pockets_are_connected(seed in any::<u32>(), door in 0u32..8) {
        let surface = generate_area(&AreaRequest::new(seed, GridSize::new(40, 40), GenerationMode::Block))
            .expect("valid");
        let pocket = generate_area(&AreaRequest::new(
            derive_seed(seed, door + 1),
            GridSize::new(40, 40),
            GenerationMode::Corridor,
        ))
        .expect("valid");

        for area in [&surface, &pocket] {
            let reachable = area.grid.reachable_from(area.spawn);
            for cell in area.grid.passable_cells() {
                prop_assert!(reachable.contains(&cell), "{:?} seed {} cell {:?}", area.mode, area.seed, cell);
            }
        }
        let exit = pocket.exit.expect("pockets have an exit");
        prop_assert!(pocket.grid.reachable_from(pocket.spawn).contains(&exit));
    }
}

#[test]
fn missing_seed_never_builds_a_session() {
    assert!(GameEngine::new(SimConfig::default(), None).is_err());
}

#[test]
fn new_session_resets_progress() {
    let mut engine = GameEngine::new(small_config(), Some(10)).expect("valid");
    ready(&mut engine);
    for _ in 0..30 {
        engine.step(
            TICK_MS,
            &InputFrame {
                move_z: 1.0,
                ..InputFrame::default()
            },
        );
    }
    assert_eq!(engine.tick(), 30);

    engine.new_session(Some(11)).expect("valid");
    assert_eq!(engine.tick(), 0);
    assert_eq!(engine.session_seed(), 11);
    assert!(engine.is_loading());
    assert_eq!(engine.area.mode, GenerationMode::Block);
    assert_eq!(engine.affect().health(), AFFECT_MAX);
    assert!(engine.inventory().items().is_empty());

    assert!(engine.new_session(None).is_err());
}

#[test]
fn area_init_and_snapshot_use_camel_case_fields() {
    let mut engine = GameEngine::new(small_config(), Some(3)).expect("valid");
    ready(&mut engine);
    let init = serde_json::to_value(engine.area_init()).expect("serializes");
    assert!(init["summary"].get("cellSize").is_some());
    assert_eq!(init["tiles"].as_array().map(Vec::len), Some(24));

    let snapshot = serde_json::to_value(engine.build_snapshot(true)).expect("serializes");
    assert!(snapshot.get("elapsedMs").is_some());
    assert!(snapshot["hud"].get("lieProbability").is_some());
    assert!(snapshot["render"].get("flashlightOn").is_some());
    let events = snapshot["events"].as_array().expect("events array");
    assert!(events.iter().any(|event| event["type"] == "area_entered"));
}
