// Copyright (C) 2024-2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)] // Allow multiple versions from transitive dependencies
#![allow(clippy::cargo_common_metadata)] // Metadata is inherited from workspace

#[macro_use]
extern crate tracing;

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use vtcore_common::args::Args;
use vtcore_common::config::load_config;
use vtcore_term::interface::Controller;
use vtcore_term::io::OutboundEvent;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.show_all_debug);

    info!("Starting vtcore-cli");

    let cfg = match load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("Failed to load config: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    debug!("Loaded config: {cfg:#?}");

    let data = match read_input(args.input.as_deref()) {
        Ok(data) => data,
        Err(err) => {
            error!("Failed to read input: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let mut controller = Controller::new(args.cols, args.rows);
    controller.write(&data);

    while let Some(event) = controller.try_recv_outbound() {
        match event {
            OutboundEvent::Write(bytes) => {
                debug!("emulator requested {} bytes written back", bytes.len());
            }
            OutboundEvent::Resize(resize) => {
                debug!("emulator reported a resize to {}x{}", resize.width, resize.height);
            }
        }
    }

    println!("{}", controller.selection_text(0..args.rows, 0..args.cols));

    ExitCode::SUCCESS
}

fn read_input(path: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();

    match path {
        Some(path) => {
            std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?
                .read_to_end(&mut buffer)
                .with_context(|| format!("reading {}", path.display()))?;
        }
        None => {
            std::io::stdin()
                .read_to_end(&mut buffer)
                .context("reading stdin")?;
        }
    }

    Ok(buffer)
}

fn init_logging(show_all_debug: bool) {
    let default_level = if show_all_debug {
        Level::DEBUG
    } else {
        Level::WARN
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layer().with_target(false).compact())
        .init();
}
