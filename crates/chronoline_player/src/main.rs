// SPDX-License-Identifier: MIT OR Apache-2.0
//! Chronoline player - headless timeline playback
//!
//! Loads a chart from RON settings and plays it back at a fixed step:
//! - Tempo map with eased BPM changes
//! - Scroll speed timeline with accumulated scroll distance
//! - Note queue ordered by hit time
//!
//! ## Usage
//!
//! `chronoline [settings.ron]`. A missing settings file is created with
//! default contents first.

mod config;
mod error;
mod player;

use config::{PlayerSettings, SETTINGS_FILE_NAME};
use error::Result;
use player::Player;
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn load_or_create(path: &Path) -> Result<PlayerSettings> {
    if path.exists() {
        tracing::info!("Loading settings from {}", path.display());
        return PlayerSettings::load(path);
    }

    tracing::info!("Writing default settings to {}", path.display());
    let settings = PlayerSettings::default();
    settings.save(path)?;
    Ok(settings)
}

fn run() -> Result<()> {
    let path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(SETTINGS_FILE_NAME), PathBuf::from);

    let settings = load_or_create(&path)?;
    let mut player = Player::new(&settings)?;
    player.run()?;
    Ok(())
}

fn main() {
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "chronoline_player=info".parse() {
        env_filter = env_filter.add_directive(directive);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Chronoline player v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run() {
        tracing::error!("Playback failed: {e}");
        std::process::exit(1);
    }
}
