// Copyright (C) 2025 Category Labs, Inc.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use clap::Parser;
use eyre::{Context, Result};
use pajetrace::{Config, Profile, TraceExporter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pajetrace")]
#[command(about = "export a recorded task profile as a paje trace")]
#[command(version)]
struct Args {
    #[arg(help = "profile to export (json format)")]
    profile: PathBuf,

    #[arg(
        short,
        long,
        default_value = "trace.paje",
        help = "output file for the trace"
    )]
    output: PathBuf,

    #[arg(short, long, help = "configuration file path (toml format)")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config path={}", path.display()))?,
        None => Config::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    let profile = Profile::load(&args.profile)
        .with_context(|| format!("failed to load profile path={}", args.profile.display()))?;

    let summary = TraceExporter::new(&profile)
        .with_labels(config.labels)
        .export_to_path(&args.output)
        .with_context(|| format!("failed to write trace path={}", args.output.display()))?;

    tracing::info!(
        lines = summary.lines_written,
        events = summary.buffered_events,
        links = summary.links,
        unmatched_links = summary.unmatched_links,
        timer_depth = summary.timer_depth,
        "export finished"
    );
    Ok(())
}
