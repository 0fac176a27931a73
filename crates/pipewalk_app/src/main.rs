// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pipewalk - interactive CI/CD pipeline walkthroughs.
//!
//! Steps through a pipeline diagram automatically or one step at a time:
//! - Step indicators with completed/active styling
//! - Detail panel per step
//! - Transient markers moving along fixed paths
//! - Pulse effects on configured steps
//!
//! ## Architecture
//!
//! The viewer is a thin egui shell around `pipewalk_sequencer`: the panel
//! implements the sequencer's presentation sink and feeds it frame time,
//! so all walkthrough behavior lives in the library crates.

mod app;
mod panel;
mod scene;
mod theme;

use app::PipewalkApp;
use pipewalk_diagram::{samples, Diagram};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("pipewalk_app=debug".parse().unwrap())
        .add_directive("pipewalk_sequencer=debug".parse().unwrap())
        .add_directive("wgpu=warn".parse().unwrap())
        .add_directive("naga=warn".parse().unwrap());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Pipewalk v{}", env!("CARGO_PKG_VERSION"));

    // Optional diagram file; the built-in sample is the fallback
    let diagram = match std::env::args().nth(1) {
        Some(path) => match Diagram::load(&path) {
            Ok(diagram) => {
                tracing::info!(%path, "loaded diagram");
                diagram
            }
            Err(e) => {
                tracing::warn!(%path, "failed to load diagram, using built-in sample: {e}");
                samples::aws_deploy_pipeline()
            }
        },
        None => samples::aws_deploy_pipeline(),
    };

    if let Err(e) = PipewalkApp::run(diagram) {
        tracing::error!("Viewer crashed: {e}");
        std::process::exit(1);
    }
}
