// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Replays recorded snapshots through the headless explorer.
//! One snapshot JSON per line; the first line is the initial render.

use std::{path::PathBuf, sync::Arc, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use lts_app_core::{
    config::ConfigService, config_port::ConfigPort, layout_store::LayoutStore,
};
use lts_config_fs::FsConfigStore;
use lts_explorer::{Explorer, ModelEngine};
use lts_scene_port::MockSurface;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const CONTAINER: &str = "replay";

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay LTS snapshots through the headless explorer")]
struct Args {
    /// File holding one snapshot JSON per line
    #[arg(long)]
    snapshots: PathBuf,
    /// Directory for layouts and prefs (defaults to the platform config dir)
    #[arg(long)]
    store_dir: Option<PathBuf>,
    /// Layout bundle imported when the store holds no layouts
    #[arg(long)]
    seed: Option<PathBuf>,
    /// Layout used when no position oracle is available (preset, dagre, cose)
    #[arg(long)]
    layout: Option<String>,
    /// Write every stored layout to this file after the replay
    #[arg(long)]
    export: Option<PathBuf>,
}

/// Engine stand-in: the replay file already holds the engine's answers.
struct LoggingEngine;

impl ModelEngine for LoggingEngine {
    fn take_step(&self, transition_json: &str) {
        info!(transition = %transition_json, "engine: take_step");
    }

    fn undo_step(&self) {
        info!("engine: undo_step");
    }

    fn advance_time(&self, seconds: f64) {
        info!(seconds, "engine: advance_time");
    }
}

fn new_surface(_container: &str) -> MockSurface {
    MockSurface::new()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let text = tokio::fs::read_to_string(&args.snapshots)
        .await
        .with_context(|| format!("reading {}", args.snapshots.display()))?;

    let store = Arc::new(match &args.store_dir {
        Some(dir) => FsConfigStore::with_base(dir),
        None => FsConfigStore::new(),
    }?);
    info!(store = %store.base().display(), "config store ready");

    let mut prefs = ConfigService::new(Arc::clone(&store))
        .load_prefs()
        .unwrap_or_default();
    if let Some(seed) = args.seed {
        prefs.seed_bundle = Some(seed);
    }
    if let Some(layout) = args.layout {
        prefs.layout = layout;
    }

    let mut explorer = Explorer::new(
        new_surface as fn(&str) -> MockSurface,
        Arc::new(LoggingEngine),
        LayoutStore::new(Arc::clone(&store)),
        prefs,
    );

    let mut rendered = 0usize;
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let first = rendered == 0;
        let now = Instant::now();
        if explorer.render_at(CONTAINER, line, first, now).await.is_err() {
            // Until a first render succeeds, the next line is tried as first.
            warn!(line = lineno + 1, "snapshot skipped");
            continue;
        }
        rendered += 1;

        if let Some(diagram) = explorer.diagram(CONTAINER) {
            let panel = diagram.panel();
            let buttons: Vec<&str> = panel.buttons.iter().map(|b| b.label.as_str()).collect();
            info!(
                line = lineno + 1,
                trace = panel.trace.as_deref().unwrap_or(""),
                flashed = ?diagram.sync().flashed(),
                enabled = ?buttons,
                undo = panel.undo_enabled,
                deadlock = panel.deadlock_text().unwrap_or(""),
                clocks = ?panel.clocks,
                variables = ?panel.variables,
                "snapshot applied"
            );
        }
        if let Some(deadline) = explorer.next_deadline() {
            explorer.tick(deadline);
        }
    }
    info!(rendered, "replay finished");

    if let Some(path) = args.export {
        match explorer.export_layouts(CONTAINER) {
            Some(bundle) => {
                tokio::fs::write(&path, bundle)
                    .await
                    .with_context(|| format!("writing {}", path.display()))?;
                info!(path = %path.display(), "layouts exported");
            }
            None => warn!("no layouts to export"),
        }
    }
    Ok(())
}
