use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use clap::Parser;
use liminal_core::affect::fear_from_sanity;
use liminal_core::assets::{load_area_assets, AssetSource, DirectoryAssetSource, StaticAssetSource};
use liminal_core::config::SimConfig;
use liminal_core::constants::{AFFECT_MAX, TICK_MS, TICK_RATE};
use liminal_core::engine::GameEngine;
use liminal_core::types::{GenerationMode, InputFrame, RuntimeEvent, Snapshot};
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    seed: Option<u32>,
    /// Ticks per scenario.
    #[arg(long, default_value_t = (TICK_RATE as u64) * 180)]
    ticks: u64,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    run_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
    #[arg(long)]
    assets_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
struct Scenario {
    name: String,
    seed: u32,
    ticks: u64,
    #[serde(rename = "interactEvery")]
    interact_every: u64,
}

#[derive(Clone, Debug, Serialize)]
struct ScenarioResultLine {
    scenario: String,
    seed: u32,
    outcome: String,
    ticks: u64,
    #[serde(rename = "elapsedMs")]
    elapsed_ms: u64,
    #[serde(rename = "areasEntered")]
    areas_entered: u32,
    #[serde(rename = "pocketsEntered")]
    pockets_entered: u32,
    #[serde(rename = "playerHits")]
    player_hits: u32,
    #[serde(rename = "notesRead")]
    notes_read: u32,
    #[serde(rename = "enemiesSummoned")]
    enemies_summoned: u32,
    desyncs: u32,
    #[serde(rename = "placeholderAssets")]
    placeholder_assets: usize,
    #[serde(rename = "minHealth")]
    min_health: f32,
    #[serde(rename = "minSanity")]
    min_sanity: f32,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug)]
struct ScenarioRunResult {
    result: ScenarioResultLine,
    anomaly_records: Vec<AnomalyRecord>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(rename = "startedAt")]
    started_at: String,
    #[serde(rename = "finishedAt")]
    finished_at: String,
    #[serde(rename = "scenarioCount")]
    scenario_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "outcomeCounts")]
    outcome_counts: BTreeMap<String, usize>,
    scenarios: Vec<ScenarioResultLine>,
}

#[derive(Default)]
struct AnomalyLog {
    messages: Vec<String>,
    records: Vec<AnomalyRecord>,
    seen: HashSet<String>,
}

impl AnomalyLog {
    /// Every occurrence is recorded; the summary lists each message once.
    fn push(&mut self, tick: u64, message: String) {
        if self.seen.insert(message.clone()) {
            self.messages.push(message.clone());
        }
        self.records.push(AnomalyRecord { tick, message });
    }
}

/// Scripted player: walks forward, turns when stuck or on a timer, and pokes
/// at whatever it is facing.
struct Walker {
    interact_every: u64,
    last_position: (f32, f32),
    stuck_ticks: u32,
}

impl Walker {
    fn new(interact_every: u64) -> Self {
        Self {
            interact_every: interact_every.max(1),
            last_position: (f32::NAN, f32::NAN),
            stuck_ticks: 0,
        }
    }

    fn next_input(&mut self, tick: u64, position: (f32, f32)) -> InputFrame {
        let moved = (position.0 - self.last_position.0).abs() + (position.1 - self.last_position.1).abs();
        self.last_position = position;
        if moved < 1e-3 {
            self.stuck_ticks += 1;
        } else {
            self.stuck_ticks = 0;
        }

        let turn = if self.stuck_ticks >= 3 {
            self.stuck_ticks = 0;
            1.9
        } else if tick % 120 == 0 {
            0.6
        } else {
            0.0
        };

        InputFrame {
            move_z: 1.0,
            move_x: if (tick / 90) % 2 == 0 { 0.2 } else { -0.2 },
            look_yaw: turn,
            interact: tick % self.interact_every == 0,
            quick_use: tick % 400 == 0,
            secondary: tick % 700 == 0,
            ..InputFrame::default()
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => match SimConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                error!(path = %path.display(), "{err}");
                std::process::exit(2);
            }
        },
        None => SimConfig::default(),
    };
    let source: Box<dyn AssetSource> = match &cli.assets_dir {
        Some(dir) => Box::new(DirectoryAssetSource::new(dir.clone(), "/assets")),
        None => Box::new(StaticAssetSource::all()),
    };

    let started_at = Utc::now();
    let scenarios = resolve_scenarios(&cli);
    let run_id = cli
        .run_id
        .clone()
        .unwrap_or_else(|| default_run_id(scenarios[0].seed, started_at.timestamp_millis()));

    let mut has_anomaly = false;
    let mut total_anomalies = 0usize;
    let mut outcome_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut scenario_results = Vec::new();

    for scenario in &scenarios {
        info!(
            run = %run_id,
            scenario = %scenario.name,
            seed = scenario.seed,
            ticks = scenario.ticks,
            "scenario started"
        );
        let run = match run_scenario(scenario, &config, source.as_ref()).await {
            Ok(run) => run,
            Err(err) => {
                error!(scenario = %scenario.name, seed = scenario.seed, "{err}");
                std::process::exit(2);
            }
        };

        for anomaly in &run.anomaly_records {
            warn!(
                scenario = %scenario.name,
                seed = scenario.seed,
                tick = anomaly.tick,
                "anomaly: {}",
                anomaly.message
            );
        }
        has_anomaly |= !run.result.anomalies.is_empty();
        total_anomalies += run.anomaly_records.len();
        *outcome_counts.entry(run.result.outcome.clone()).or_insert(0) += 1;

        info!(
            scenario = %scenario.name,
            seed = scenario.seed,
            tick = run.result.ticks,
            outcome = %run.result.outcome,
            pockets = run.result.pockets_entered,
            anomalies = run.anomaly_records.len(),
            "scenario finished"
        );
        match serde_json::to_string(&run.result) {
            Ok(line) => println!("{line}"),
            Err(err) => error!("failed to encode scenario result: {err}"),
        }
        scenario_results.push(run.result);
    }

    let summary = RunSummary {
        run_id: run_id.clone(),
        started_at: started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        finished_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        scenario_count: scenario_results.len(),
        anomaly_count: total_anomalies,
        outcome_counts,
        scenarios: scenario_results,
    };

    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(err) = write_summary(path, &summary) {
            error!(path = %path.display(), "failed to write summary: {err}");
            std::process::exit(2);
        }
    }

    info!(
        run = %run_id,
        scenarios = summary.scenario_count,
        anomalies = summary.anomaly_count,
        "run finished"
    );
    if has_anomaly {
        std::process::exit(1);
    }
}

async fn run_scenario(
    scenario: &Scenario,
    config: &SimConfig,
    source: &dyn AssetSource,
) -> Result<ScenarioRunResult, liminal_core::error::ConfigError> {
    let mut engine = GameEngine::new(config.clone(), Some(scenario.seed))?;
    let mut walker = Walker::new(scenario.interact_every);
    let mut anomalies = AnomalyLog::default();
    let mut result = ScenarioResultLine {
        scenario: scenario.name.clone(),
        seed: scenario.seed,
        outcome: "survived".to_string(),
        ticks: 0,
        elapsed_ms: 0,
        areas_entered: 0,
        pockets_entered: 0,
        player_hits: 0,
        notes_read: 0,
        enemies_summoned: 0,
        desyncs: 0,
        placeholder_assets: 0,
        min_health: AFFECT_MAX,
        min_sanity: AFFECT_MAX,
        anomalies: Vec::new(),
    };

    for tick in 0..scenario.ticks {
        if engine.is_loading() {
            check_area(&engine, tick, &mut anomalies);
            let loaded = load_area_assets(source, &engine.asset_manifest()).await;
            engine.complete_area_load(&loaded);
        }

        let position = engine.player_position();
        let input = walker.next_input(tick, (position.x, position.z));
        engine.step(TICK_MS, &input);

        let snapshot = engine.build_snapshot(true);
        for message in collect_snapshot_anomalies(&snapshot) {
            anomalies.push(snapshot.tick, message);
        }
        let cell = snapshot.hud.player_cell;
        if !engine.is_loading() && !engine.area.grid.is_passable(cell.x, cell.z) {
            anomalies.push(
                snapshot.tick,
                format!("player inside blocked cell ({}, {})", cell.x, cell.z),
            );
        }

        result.min_health = result.min_health.min(snapshot.hud.health);
        result.min_sanity = result.min_sanity.min(snapshot.hud.sanity);
        tally_events(&mut result, &snapshot.events);

        if engine.is_ended() {
            break;
        }
    }

    if let Some(reason) = engine.end_reason() {
        result.outcome = reason.key().to_string();
    }
    result.ticks = engine.tick();
    result.elapsed_ms = engine.elapsed_ms();
    result.anomalies = anomalies.messages;
    Ok(ScenarioRunResult {
        result,
        anomaly_records: anomalies.records,
    })
}

fn tally_events(result: &mut ScenarioResultLine, events: &[RuntimeEvent]) {
    for event in events {
        match event {
            RuntimeEvent::AreaEntered { mode, .. } => {
                result.areas_entered += 1;
                if *mode == GenerationMode::Corridor {
                    result.pockets_entered += 1;
                }
            }
            RuntimeEvent::AreaReady { placeholder_assets } => {
                result.placeholder_assets += placeholder_assets;
            }
            RuntimeEvent::PlayerHit { .. } => result.player_hits += 1,
            RuntimeEvent::NoteOpened { .. } => result.notes_read += 1,
            RuntimeEvent::EnemySpawned { .. } => result.enemies_summoned += 1,
            RuntimeEvent::EnemyDesync { .. } => result.desyncs += 1,
            _ => {}
        }
    }
}

/// Every passable cell of a freshly entered area must be reachable from its spawn.
fn check_area(engine: &GameEngine, tick: u64, anomalies: &mut AnomalyLog) {
    let area = &engine.area;
    let reachable = area.grid.reachable_from(area.spawn);
    let stranded = area
        .grid
        .passable_cells()
        .into_iter()
        .filter(|cell| !reachable.contains(cell))
        .count();
    if stranded > 0 {
        anomalies.push(
            tick,
            format!(
                "{stranded} unreachable cells in {:?} area seed={}",
                area.mode, area.seed
            ),
        );
    }
}

fn collect_snapshot_anomalies(snapshot: &Snapshot) -> Vec<String> {
    let mut anomalies = Vec::new();
    let in_range = |value: f32| value.is_finite() && (0.0..=AFFECT_MAX).contains(&value);

    if !in_range(snapshot.hud.health) {
        anomalies.push(format!("health out of range: {}", snapshot.hud.health));
    }
    if !in_range(snapshot.hud.sanity) {
        anomalies.push(format!("sanity out of range: {}", snapshot.hud.sanity));
    }
    let fear = snapshot.render.fear;
    if (fear - fear_from_sanity(snapshot.hud.sanity)).abs() > 1e-4 {
        anomalies.push(format!(
            "fear {fear} does not match sanity {}",
            snapshot.hud.sanity
        ));
    }
    if !(0.0..=1.0).contains(&snapshot.render.glitch) {
        anomalies.push(format!("glitch out of range: {}", snapshot.render.glitch));
    }
    if !(0.0..=1.0).contains(&snapshot.hud.lie_probability) {
        anomalies.push(format!(
            "lie probability out of range: {}",
            snapshot.hud.lie_probability
        ));
    }
    for enemy in &snapshot.render.enemies {
        if !enemy.x.is_finite() || !enemy.z.is_finite() {
            anomalies.push(format!("enemy {} has a non-finite position", enemy.id));
        }
    }
    anomalies
}

fn resolve_scenarios(cli: &Cli) -> Vec<Scenario> {
    let seed = cli
        .seed
        .unwrap_or_else(|| Utc::now().timestamp_millis() as u32);
    vec![
        Scenario {
            name: "surface-walker".to_string(),
            seed,
            ticks: cli.ticks,
            interact_every: 45,
        },
        Scenario {
            name: "door-prober".to_string(),
            seed: seed.wrapping_add(1),
            ticks: cli.ticks,
            interact_every: 6,
        },
    ]
}

fn default_run_id(seed: u32, timestamp_ms: i64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    std::fs::write(path, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_summary() -> RunSummary {
        RunSummary {
            run_id: "sim-1-1".to_string(),
            started_at: "2026-01-01T00:00:00.000Z".to_string(),
            finished_at: "2026-01-01T00:00:01.000Z".to_string(),
            scenario_count: 0,
            anomaly_count: 0,
            outcome_counts: BTreeMap::new(),
            scenarios: Vec::new(),
        }
    }

    #[test]
    fn default_run_id_contains_seed_and_timestamp() {
        assert_eq!(default_run_id(42, 123_456_789), "sim-42-123456789");
    }

    #[test]
    fn anomaly_log_deduplicates_summary_messages() {
        let mut log = AnomalyLog::default();
        log.push(10, "same anomaly".to_string());
        log.push(11, "same anomaly".to_string());

        assert_eq!(log.messages.len(), 1);
        assert_eq!(log.records.len(), 2);
        assert_eq!(log.records[1].tick, 11);
    }

    #[test]
    fn walker_turns_when_stuck() {
        let mut walker = Walker::new(10);
        let mut turned = false;
        for tick in 1..6 {
            let input = walker.next_input(tick, (1.0, 1.0));
            turned |= input.look_yaw > 1.0;
        }
        assert!(turned);
    }

    #[test]
    fn write_summary_fails_when_parent_is_missing() {
        let target = std::env::temp_dir()
            .join(format!("liminal-missing-{}", Utc::now().timestamp_millis()))
            .join("summary.json");
        assert!(write_summary(&target, &empty_summary()).is_err());
    }

    #[tokio::test]
    async fn short_run_has_no_anomalies() {
        let scenario = Scenario {
            name: "test".to_string(),
            seed: 17,
            ticks: 300,
            interact_every: 8,
        };
        let run = run_scenario(&scenario, &SimConfig::default(), &StaticAssetSource::all())
            .await
            .expect("default config is valid");
        assert!(run.result.anomalies.is_empty(), "{:?}", run.result.anomalies);
        assert!(run.result.areas_entered >= 1);
    }
}
